//! Clean command implementation.

use anyhow::{bail, Result};
use humansize::{format_size, BINARY};
use std::io::{self, Write};

use crate::cli::CleanArgs;
use crate::commands::scan::{print_results, scan_with_spinner};
use crate::commands::{build_engine, ensure_known, plural, spinner};
use crate::config::Config;
use crate::engine::{Engine, Hooks, UnitStatus};
use crate::unit::{CleanResult, ScanResult};

/// Run the clean command.
pub fn run(args: CleanArgs, config: &Config, quiet: bool) -> Result<()> {
    if args.json && !args.yes && !args.dry_run {
        bail!("--json cannot prompt for confirmation; pass --yes or --dry-run");
    }

    let engine = build_engine(config);
    ensure_known(&engine, &args.ids);

    let interactive = !quiet && !args.json;
    let ids = (!args.ids.is_empty()).then_some(args.ids.as_slice());
    let scans = scan_with_spinner(&engine, ids, args.category, interactive);

    let mut selected: Vec<String> = scans
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.unit_id.clone())
        .collect();

    if args.dry_run {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&scans)?);
        } else {
            print_results(&engine, &scans);
            if !selected.is_empty() {
                println!("\n[DRY RUN] Nothing was removed.");
            }
        }
        return Ok(());
    }

    if selected.is_empty() {
        if args.json {
            println!("[]");
        } else {
            println!("Nothing to clean.");
        }
        return Ok(());
    }

    if !args.json {
        print_results(&engine, &scans);
        if needs_elevation(&engine, &selected) {
            println!("\nSome units require root; you will be asked to authenticate once.");
        }
    }

    // Confirmation
    if !args.yes {
        let answer = prompt("\nProceed with cleanup? [y/N/select] ")?;

        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => {}
            "select" => {
                let actionable: Vec<&ScanResult> = scans.iter().filter(|s| !s.is_empty()).collect();
                println!("\nSelect units to clean (enter numbers, comma-separated):\n");
                for (i, scan) in actionable.iter().enumerate() {
                    println!(
                        "  [{}] {:<30} {:>10}",
                        i + 1,
                        scan.unit_name,
                        format_size(scan.total_bytes, BINARY)
                    );
                }

                let raw = prompt("\nSelection: ")?;
                selected = parse_selection(&raw, actionable.len())
                    .into_iter()
                    .map(|i| actionable[i].unit_id.clone())
                    .collect();

                if selected.is_empty() {
                    println!("Nothing selected.");
                    return Ok(());
                }
            }
            _ => {
                println!("Aborted.");
                return Ok(());
            }
        }
    }

    let results = clean_with_spinner(&engine, &selected, interactive);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_summary(&engine, &results);
    }

    if results.iter().any(|r| !r.is_success()) {
        std::process::exit(5); // Partial failure
    }

    Ok(())
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Zero-based indices picked from a comma-separated list of 1-based numbers.
///
/// Non-numeric and out-of-range parts are ignored; the result is ascending
/// and has no duplicates.
fn parse_selection(raw: &str, count: usize) -> Vec<usize> {
    let mut picked = Vec::new();
    for part in raw.split(',') {
        let Ok(n) = part.trim().parse::<usize>() else {
            continue;
        };
        if (1..=count).contains(&n) && !picked.contains(&(n - 1)) {
            picked.push(n - 1);
        }
    }
    picked.sort_unstable();
    picked
}

fn needs_elevation(engine: &Engine, ids: &[String]) -> bool {
    !engine.is_privileged()
        && ids
            .iter()
            .filter_map(|id| engine.registry().get(id))
            .any(|u| u.requires_root())
}

fn clean_with_spinner(engine: &Engine, ids: &[String], visible: bool) -> Vec<CleanResult> {
    let bar = spinner(visible);
    let on_progress = |id: &str, status: UnitStatus| match status {
        UnitStatus::Cleaning => bar.set_message(format!("Cleaning {id}...")),
        UnitStatus::Authenticating => bar.set_message("Waiting for authentication..."),
        _ => {}
    };
    let hooks: Hooks<'_, CleanResult> = Hooks::new().with_progress(&on_progress);

    let results = engine.clean(Some(ids), None, &hooks);
    bar.finish_and_clear();
    results
}

fn print_summary(engine: &Engine, results: &[CleanResult]) {
    println!("\nResults:");
    for result in results {
        let noun = engine
            .registry()
            .get(&result.unit_id)
            .map(|u| u.item_noun().to_string())
            .unwrap_or_else(|| "file".to_string());
        println!(
            "  {:<26} {:>10}  {}",
            result.unit_id,
            format_size(result.freed_bytes, BINARY),
            plural(result.items_removed as usize, &noun)
        );
    }

    let freed: u64 = results.iter().map(|r| r.freed_bytes).sum();
    let failed = results.iter().filter(|r| !r.is_success()).count();
    println!("\n  Freed:   {}", format_size(freed, BINARY));
    if failed > 0 {
        println!("  Failed:  {}", plural(failed, "unit"));
    }

    // Print failures
    for result in results {
        for error in &result.errors {
            eprintln!("  Error cleaning {}: {}", result.unit_id, error);
        }
    }
}
