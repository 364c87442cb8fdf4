//! Wire format between the unprivileged caller and the elevated child.
//!
//! ```text
//! stdin  {"entries_by_plugin": {"<unit id>": [{"path": "...", "size_bytes": N}, ...]}}
//! stdout [{"plugin_id": "<unit id>", "freed_bytes": N, "files_removed": N, "errors": [...]}]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::unit::{CleanResult, CleanableItem};

/// One root-requiring unit waiting for elevation, with the items to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub unit_id: String,
    pub items: Vec<CleanableItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEntry {
    pub path: PathBuf,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevationRequest {
    pub entries_by_plugin: BTreeMap<String, Vec<WireEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireResult {
    pub plugin_id: String,
    #[serde(default)]
    pub freed_bytes: u64,
    #[serde(default)]
    pub files_removed: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ElevationRequest {
    pub fn from_batch(batch: &[BatchEntry]) -> Self {
        let entries_by_plugin = batch
            .iter()
            .map(|entry| {
                let items = entry
                    .items
                    .iter()
                    .map(|item| WireEntry {
                        path: item.path.clone(),
                        size_bytes: item.size_bytes,
                    })
                    .collect();
                (entry.unit_id.clone(), items)
            })
            .collect();

        Self { entries_by_plugin }
    }

    /// Unit ids in request order.
    pub fn unit_ids(&self) -> Vec<String> {
        self.entries_by_plugin.keys().cloned().collect()
    }

    /// Rebuild per-unit item lists. Descriptions are not transmitted.
    pub fn items_by_unit(&self) -> HashMap<String, Vec<CleanableItem>> {
        self.entries_by_plugin
            .iter()
            .map(|(unit_id, entries)| {
                let items = entries
                    .iter()
                    .map(|e| CleanableItem::new(e.path.clone(), e.size_bytes, ""))
                    .collect();
                (unit_id.clone(), items)
            })
            .collect()
    }
}

impl From<WireResult> for CleanResult {
    fn from(wire: WireResult) -> Self {
        CleanResult {
            unit_id: wire.plugin_id,
            freed_bytes: wire.freed_bytes,
            items_removed: wire.files_removed,
            errors: wire.errors,
        }
    }
}

impl From<&CleanResult> for WireResult {
    fn from(result: &CleanResult) -> Self {
        WireResult {
            plugin_id: result.unit_id.clone(),
            freed_bytes: result.freed_bytes,
            files_removed: result.items_removed,
            errors: result.errors.clone(),
        }
    }
}
