//! List command implementation.

use anyhow::Result;
use serde::Serialize;

use crate::cli::ListArgs;
use crate::commands::{build_engine, display_order};
use crate::config::Config;
use crate::unit::{probe, Category, RiskLevel, Unit, UnitState};

#[derive(Debug, Serialize)]
struct UnitRow {
    id: String,
    name: String,
    category: Category,
    risk_level: RiskLevel,
    requires_root: bool,
    group: Option<&'static str>,
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl UnitRow {
    fn new(unit: &dyn Unit) -> Self {
        let (state, reason) = match probe(unit) {
            UnitState::Ready => ("ready", None),
            UnitState::Empty => ("empty", None),
            UnitState::Unavailable(reason) => ("unavailable", Some(reason)),
        };

        Self {
            id: unit.id().to_string(),
            name: unit.name().to_string(),
            category: unit.category(),
            risk_level: unit.risk_level(),
            requires_root: unit.requires_root(),
            group: unit.group().map(|g| g.id),
            state,
            reason,
        }
    }
}

/// Run the list command.
pub fn run(args: ListArgs, config: &Config) -> Result<()> {
    let engine = build_engine(config);
    let units = match args.category {
        Some(category) => engine.registry().by_category(category),
        None => engine.list_units(),
    };

    let rows: Vec<UnitRow> = display_order(units)
        .iter()
        .map(|u| UnitRow::new(u.as_ref()))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No units registered.");
        return Ok(());
    }

    println!(
        "  {:<26} {:<16} {:<12} {:<11} NAME",
        "ID", "CATEGORY", "STATE", "RISK"
    );
    println!("  {}", "─".repeat(80));
    for row in &rows {
        let name = if row.requires_root {
            format!("{} (root)", row.name)
        } else {
            row.name.clone()
        };
        println!(
            "  {:<26} {:<16} {:<12} {:<11} {}",
            row.id,
            row.category.as_str(),
            row.state,
            row.risk_level.as_str(),
            name
        );
        if let Some(reason) = &row.reason {
            println!("  {:<26} {}", "", reason);
        }
    }

    Ok(())
}
