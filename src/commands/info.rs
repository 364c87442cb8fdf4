//! Info command implementation.

use anyhow::{bail, Result};

use crate::cli::InfoArgs;
use crate::commands::build_engine;
use crate::config::Config;
use crate::unit::{probe, UnitState};

/// Run the info command.
pub fn run(args: InfoArgs, config: &Config) -> Result<()> {
    let engine = build_engine(config);
    let Some(unit) = engine.registry().get(&args.id) else {
        bail!(
            "Unknown unit '{}'. Run 'sweep list' to see available units",
            args.id
        );
    };

    println!("{} ({})", unit.name(), unit.id());
    println!();
    println!("  {}", unit.description());
    println!();
    println!("  Category:      {}", unit.category());
    println!("  Risk level:    {}", unit.risk_level());
    println!(
        "  Requires root: {}",
        if unit.requires_root() { "yes" } else { "no" }
    );
    if let Some(group) = unit.group() {
        println!("  Group:         {} ({})", group.name, group.id);
    }

    let state = match probe(unit.as_ref()) {
        UnitState::Ready => "ready".to_string(),
        UnitState::Empty => "available, nothing to clean".to_string(),
        UnitState::Unavailable(reason) => format!("unavailable: {reason}"),
    };
    println!("  State:         {state}");

    Ok(())
}
