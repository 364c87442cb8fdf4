//! Scan command implementation

use anyhow::Result;
use humansize::{format_size, BINARY};

use crate::cli::ScanArgs;
use crate::commands::{build_engine, ensure_known, plural, spinner};
use crate::config::Config;
use crate::engine::{Engine, Hooks, UnitStatus};
use crate::unit::ScanResult;

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config, quiet: bool) -> Result<()> {
    let engine = build_engine(config);
    ensure_known(&engine, &args.ids);

    let ids = (!args.ids.is_empty()).then_some(args.ids.as_slice());
    let results = scan_with_spinner(&engine, ids, args.category, !quiet && !args.json);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    print_results(&engine, &results);
    Ok(())
}

/// Scan with a spinner naming the unit currently being scanned.
pub(crate) fn scan_with_spinner(
    engine: &Engine,
    ids: Option<&[String]>,
    category: Option<crate::unit::Category>,
    visible: bool,
) -> Vec<ScanResult> {
    let bar = spinner(visible);
    let on_progress = |id: &str, status: UnitStatus| {
        if status == UnitStatus::Scanning {
            bar.set_message(format!("Scanning {id}..."));
        }
    };
    let hooks: Hooks<'_, ScanResult> = Hooks::new().with_progress(&on_progress);

    let results = engine.scan(ids, category, &hooks);
    bar.finish_and_clear();
    results
}

pub(crate) fn print_results(engine: &Engine, results: &[ScanResult]) {
    let found: Vec<&ScanResult> = results.iter().filter(|r| !r.is_empty()).collect();
    if found.is_empty() {
        println!("Nothing to clean.");
        return;
    }

    println!("\n  {:<26} {:>10} {:>8}  SUMMARY", "UNIT", "SIZE", "ITEMS");
    println!("  {}", "─".repeat(80));
    for result in &found {
        let root = engine
            .registry()
            .get(&result.unit_id)
            .is_some_and(|u| u.requires_root());
        println!(
            "  {:<26} {:>10} {:>8}  {}{}",
            result.unit_id,
            format_size(result.total_bytes, BINARY),
            result.items.len(),
            result.summary,
            if root { " (root)" } else { "" }
        );
    }

    let total: u64 = found.iter().map(|r| r.total_bytes).sum();
    println!(
        "\nTotal: {} reclaimable in {}",
        format_size(total, BINARY),
        plural(found.len(), "unit")
    );
}
