//! The user's trash can.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::unit::fs::{children_items, has_children};
use crate::unit::{Category, ScanResult, Unit};

/// Empties `~/.local/share/Trash`, both the trashed files and their
/// `.trashinfo` records.
pub struct TrashUnit {
    dir: PathBuf,
}

impl TrashUnit {
    pub fn new(data_root: &Path) -> Self {
        Self {
            dir: data_root.join("Trash"),
        }
    }
}

impl Unit for TrashUnit {
    fn id(&self) -> &str {
        "trash"
    }

    fn name(&self) -> &str {
        "Trash"
    }

    fn description(&self) -> &str {
        "Permanently deletes files in the trash. These files were already deleted by the user."
    }

    fn category(&self) -> Category {
        Category::User
    }

    fn sort_order(&self) -> u32 {
        10
    }

    fn unavailable_reason(&self) -> Option<String> {
        (!self.dir.is_dir()).then(|| "Trash directory not found".to_string())
    }

    fn has_items(&self) -> bool {
        has_children(&self.dir.join("files"))
    }

    fn scan(&self) -> Result<ScanResult> {
        let mut items = children_items(&self.dir.join("files"), "Trash", true);
        items.extend(children_items(&self.dir.join("info"), "Trash", true));

        let summary = format!(
            "Found {} items in trash totaling {}",
            items.len(),
            humansize::format_size(
                items.iter().map(|i| i.size_bytes).sum::<u64>(),
                humansize::BINARY
            )
        );
        Ok(ScanResult::new(self.id(), self.name(), items, summary))
    }
}
