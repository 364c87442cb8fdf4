//! Electron framework caches under `~/.cache`.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::unit::fs::{has_children, remove_items, scan_children, RemoveOptions};
use crate::unit::{Category, CleanResult, CleanableItem, ScanResult, Unit, UnitGroup};

pub const ELECTRON_GROUP: UnitGroup = UnitGroup {
    id: "electron",
    name: "Electron Cache",
    description: "Chromium engine caches from Electron apps",
};

/// One Electron-related directory under the cache root, itemized by child.
pub struct ElectronCacheUnit {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    dir: PathBuf,
}

impl ElectronCacheUnit {
    /// Electron runtime downloads, GPU shader and code caches.
    pub fn electron(cache_root: &Path) -> Self {
        Self {
            id: "electron_cache",
            name: "Electron",
            description: "Electron framework cache",
            dir: cache_root.join("electron"),
        }
    }

    /// Electron Builder packaging cache.
    pub fn builder(cache_root: &Path) -> Self {
        Self {
            id: "electron_builder_cache",
            name: "Electron Builder",
            description: "Electron Builder packaging cache",
            dir: cache_root.join("electron-builder"),
        }
    }
}

impl Unit for ElectronCacheUnit {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn category(&self) -> Category {
        Category::Application
    }

    fn group(&self) -> Option<&UnitGroup> {
        Some(&ELECTRON_GROUP)
    }

    fn unavailable_reason(&self) -> Option<String> {
        (!self.dir.is_dir()).then(|| format!("{} cache directory not found", self.name))
    }

    fn has_items(&self) -> bool {
        has_children(&self.dir)
    }

    fn scan(&self) -> Result<ScanResult> {
        Ok(scan_children(self.id, self.name, &self.dir, self.name))
    }

    fn remove(&self, items: &[CleanableItem]) -> CleanResult {
        let options = RemoveOptions {
            count_files: true,
            ..RemoveOptions::default()
        };
        remove_items(self.id, items, options)
    }
}
