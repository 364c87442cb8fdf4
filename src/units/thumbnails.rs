//! Freedesktop thumbnail cache.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::unit::fs::{has_children, remove_items, scan_children, RemoveOptions};
use crate::unit::{Category, CleanResult, CleanableItem, ScanResult, Unit};

/// Cleans `~/.cache/thumbnails`. File managers regenerate thumbnails on
/// demand.
pub struct ThumbnailsUnit {
    dir: PathBuf,
}

impl ThumbnailsUnit {
    pub fn new(cache_root: &Path) -> Self {
        Self {
            dir: cache_root.join("thumbnails"),
        }
    }
}

impl Unit for ThumbnailsUnit {
    fn id(&self) -> &str {
        "thumbnails"
    }

    fn name(&self) -> &str {
        "Thumbnails"
    }

    fn description(&self) -> &str {
        "Removes cached thumbnail images. File managers and image viewers \
         regenerate them when browsing directories."
    }

    fn category(&self) -> Category {
        Category::User
    }

    fn sort_order(&self) -> u32 {
        20
    }

    fn unavailable_reason(&self) -> Option<String> {
        (!self.dir.is_dir()).then(|| "Thumbnail cache not found".to_string())
    }

    fn has_items(&self) -> bool {
        has_children(&self.dir)
    }

    fn scan(&self) -> Result<ScanResult> {
        Ok(scan_children(self.id(), self.name(), &self.dir, "Thumbnails"))
    }

    fn remove(&self, items: &[CleanableItem]) -> CleanResult {
        let options = RemoveOptions {
            count_files: true,
            ..RemoveOptions::default()
        };
        remove_items(self.id(), items, options)
    }
}
