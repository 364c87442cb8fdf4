//! Elevated half of the privilege bridge.
//!
//! Runs as root under the elevation helper. Reads one batch request from
//! stdin, cleans it in-process, and writes the results to stdout as JSON.
//! Logs go to stderr so stdout carries nothing but the response.
//!
//! Requested paths are only removed when a fresh scan of the named unit
//! reports them, or a directory containing them.

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use crate::commands::build_engine;
use crate::config::Config;
use crate::elevation::{ElevationRequest, WireResult};
use crate::engine::{Engine, Hooks};
use crate::unit::CleanableItem;

/// Run the hidden clean-as-root command.
pub fn run(config: &Config) -> Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let request = match parse_request(&input) {
        Ok(request) => request,
        Err(failure) => {
            println!("{}", serde_json::to_string(&[failure])?);
            std::process::exit(1);
        }
    };

    let engine = build_engine(config).with_privileged(true);
    let ids = request.unit_ids();
    let mut items = request.items_by_unit();
    let refused = restrict_to_scope(&engine, &mut items);
    tracing::info!(units = ?ids, "Cleaning elevated batch");

    let mut results = engine.clean(Some(&ids), Some(&items), &Hooks::new());
    for result in &mut results {
        if let Some(errors) = refused.get(&result.unit_id) {
            result.errors.extend(errors.iter().cloned());
        }
    }
    let response: Vec<WireResult> = results.iter().map(WireResult::from).collect();
    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}

/// Drop requested items that a root scan of their unit does not cover.
///
/// Returns the refusal messages per unit id. Paths that no longer exist are
/// passed through; removing them is a no-op.
fn restrict_to_scope(
    engine: &Engine,
    items: &mut HashMap<String, Vec<CleanableItem>>,
) -> HashMap<String, Vec<String>> {
    let ids: Vec<String> = items
        .iter()
        .filter(|(id, requested)| !requested.is_empty() && engine.registry().contains(id))
        .map(|(id, _)| id.clone())
        .collect();
    if ids.is_empty() {
        return HashMap::new();
    }

    let scopes: HashMap<String, Vec<PathBuf>> = engine
        .scan(Some(&ids), None, &Hooks::new())
        .into_iter()
        .map(|scan| {
            let paths = scan.items.into_iter().map(|item| item.path).collect();
            (scan.unit_id, paths)
        })
        .collect();

    let mut refused: HashMap<String, Vec<String>> = HashMap::new();
    for id in &ids {
        let scope = scopes.get(id).map(Vec::as_slice).unwrap_or_default();
        let Some(requested) = items.get_mut(id) else {
            continue;
        };
        requested.retain(|item| {
            if in_scope(&item.path, scope) {
                return true;
            }
            tracing::warn!(unit = %id, path = %item.path.display(), "Refusing path outside unit scan");
            refused
                .entry(id.clone())
                .or_default()
                .push(format!("Refused {}: not part of the {} scan", item.path.display(), id));
            false
        });
    }
    refused
}

fn in_scope(path: &Path, scope: &[PathBuf]) -> bool {
    let plain = path.is_absolute() && !path.components().any(|c| c == Component::ParentDir);
    if !plain {
        return false;
    }
    if fs::symlink_metadata(path).is_err() {
        return true;
    }
    scope.iter().any(|root| path.starts_with(root))
}

/// Decode a request, or describe why it could not be decoded in wire form.
fn parse_request(input: &str) -> std::result::Result<ElevationRequest, WireResult> {
    serde_json::from_str(input).map_err(|err| {
        tracing::error!(error = %err, "Bad input on stdin");
        WireResult {
            plugin_id: "unknown".to_string(),
            freed_bytes: 0,
            files_removed: 0,
            errors: vec![format!("Bad input: {err}")],
        }
    })
}
