use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single file, directory, or logical item that a unit can remove.
///
/// Leaf items (`is_leaf`) stand for things like installed packages rather
/// than browsable paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanableItem {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub description: String,
    #[serde(default)]
    pub is_leaf: bool,
    /// Number of files inside a directory item (1 for plain files).
    #[serde(default)]
    pub child_file_count: u32,
}

impl CleanableItem {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size_bytes,
            description: description.into(),
            is_leaf: false,
            child_file_count: 0,
        }
    }

    pub fn with_file_count(mut self, count: u32) -> Self {
        self.child_file_count = count;
        self
    }

    pub fn leaf(mut self) -> Self {
        self.is_leaf = true;
        self
    }
}

/// Outcome of scanning one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub unit_id: String,
    pub unit_name: String,
    pub items: Vec<CleanableItem>,
    /// Sum of item sizes, unless the unit reports an aggregate.
    pub total_bytes: u64,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResult {
    /// Build a result whose total is the sum of its items.
    pub fn new(
        unit_id: impl Into<String>,
        unit_name: impl Into<String>,
        items: Vec<CleanableItem>,
        summary: impl Into<String>,
    ) -> Self {
        let total_bytes = items.iter().map(|i| i.size_bytes).sum();
        Self {
            unit_id: unit_id.into(),
            unit_name: unit_name.into(),
            items,
            total_bytes,
            summary: summary.into(),
            error: None,
        }
    }

    pub fn empty(unit_id: impl Into<String>, unit_name: impl Into<String>) -> Self {
        Self::new(unit_id, unit_name, Vec::new(), "Nothing to clean")
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.total_bytes == 0
    }
}

/// Outcome of cleaning one unit.
///
/// Non-empty `errors` means partial or total failure; freed bytes and
/// removed items still describe whatever part succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanResult {
    pub unit_id: String,
    pub freed_bytes: u64,
    pub items_removed: u32,
    pub errors: Vec<String>,
}

impl CleanResult {
    pub fn new(unit_id: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            ..Self::default()
        }
    }

    /// A result that freed nothing and carries a single error.
    pub fn failed(unit_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            errors: vec![error.into()],
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
