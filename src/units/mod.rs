//! Built-in cleaner units.

pub mod cargo;
pub mod coredumps;
pub mod electron;
pub mod old_kernels;
pub mod thumbnails;
pub mod trash;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::UnitsConfig;
use crate::unit::{Registry, Unit};

pub use cargo::CargoCacheUnit;
pub use coredumps::CoredumpsUnit;
pub use electron::ElectronCacheUnit;
pub use old_kernels::OldKernelsUnit;
pub use thumbnails::ThumbnailsUnit;
pub use trash::TrashUnit;

/// Every built-in unit for the current user.
///
/// Units rooted in a directory this platform cannot name are left out.
pub fn all_units() -> Vec<Arc<dyn Unit>> {
    let mut units: Vec<Arc<dyn Unit>> = Vec::new();

    if let Some(data) = dirs::data_dir() {
        units.push(Arc::new(TrashUnit::new(&data)));
    }
    if let Some(cache) = dirs::cache_dir() {
        units.push(Arc::new(ThumbnailsUnit::new(&cache)));
        units.push(Arc::new(ElectronCacheUnit::electron(&cache)));
        units.push(Arc::new(ElectronCacheUnit::builder(&cache)));
    }
    if let Some(cargo_home) = cargo_home() {
        units.push(Arc::new(CargoCacheUnit::registry(&cargo_home)));
        units.push(Arc::new(CargoCacheUnit::advisory_db(&cargo_home)));
    }
    units.push(Arc::new(CoredumpsUnit::new()));
    units.push(Arc::new(OldKernelsUnit::new()));

    units
}

/// Registry of built-in units minus those disabled in configuration.
pub fn builtin_registry(config: &UnitsConfig) -> Registry {
    Registry::with_units(all_units().into_iter().filter(|unit| {
        let disabled = config.disabled.iter().any(|id| id == unit.id());
        if disabled {
            tracing::debug!(unit = unit.id(), "Unit disabled by configuration");
        }
        !disabled
    }))
}

fn cargo_home() -> Option<PathBuf> {
    std::env::var_os("CARGO_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".cargo")))
}
