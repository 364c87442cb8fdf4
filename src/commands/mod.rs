//! Subcommand implementations.

pub mod clean;
pub mod clean_as_root;
pub mod info;
pub mod list;
pub mod scan;

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::engine::Engine;
use crate::unit::Unit;
use crate::units::builtin_registry;

/// Engine over the built-in units, honoring configuration.
pub fn build_engine(config: &Config) -> Engine {
    Engine::from_config(builtin_registry(&config.units), config)
}

/// Units ordered for display: by category, then sort order, then name.
pub fn display_order(mut units: Vec<Arc<dyn Unit>>) -> Vec<Arc<dyn Unit>> {
    units.sort_by(|a, b| {
        a.category()
            .as_str()
            .cmp(b.category().as_str())
            .then(a.sort_order().cmp(&b.sort_order()))
            .then_with(|| a.name().cmp(b.name()))
    });
    units
}

/// Exit with status 2 when any requested id is not registered.
pub(crate) fn ensure_known(engine: &Engine, ids: &[String]) {
    let unknown: Vec<&str> = ids
        .iter()
        .filter(|id| !engine.registry().contains(id))
        .map(String::as_str)
        .collect();

    if !unknown.is_empty() {
        eprintln!("Error: Unknown unit(s): {}", unknown.join(", "));
        eprintln!("Valid units: {}", engine.registry().ids().join(", "));
        std::process::exit(2);
    }
}

/// Spinner on stderr, or a hidden bar when output must stay clean.
pub(crate) fn spinner(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
