//! Cargo's global caches under `~/.cargo`.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::unit::fs::{has_children, remove_items, scan_whole_dirs, RemoveOptions};
use crate::unit::{Category, CleanResult, CleanableItem, ScanResult, Unit, UnitGroup};

pub const CARGO_GROUP: UnitGroup = UnitGroup {
    id: "rust",
    name: "Cargo Registry",
    description: "Cargo registry index, crate sources, and build cache",
};

/// Whole-directory cache that Cargo repopulates on demand.
///
/// Directories are reported as single aggregate items and recreated empty
/// after deletion so tools expecting them keep working.
pub struct CargoCacheUnit {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    dirs: Vec<PathBuf>,
}

impl CargoCacheUnit {
    pub fn registry(cargo_home: &Path) -> Self {
        Self {
            id: "cargo_registry_cache",
            name: "Cargo Registry",
            description: "Downloaded crate sources and index",
            dirs: vec![cargo_home.join("registry")],
        }
    }

    pub fn advisory_db(cargo_home: &Path) -> Self {
        Self {
            id: "cargo_advisory_db_cache",
            name: "Advisory DB",
            description: "cargo-audit advisory database",
            dirs: vec![cargo_home.join("advisory-db")],
        }
    }
}

impl Unit for CargoCacheUnit {
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
        Category::Development
    }

    fn group(&self) -> Option<&UnitGroup> {
        Some(&CARGO_GROUP)
    }

    fn unavailable_reason(&self) -> Option<String> {
        (!self.dirs.iter().any(|d| d.is_dir())).then(|| format!("{} not found", self.name))
    }

    fn has_items(&self) -> bool {
        self.dirs.iter().any(|d| has_children(d))
    }

    fn scan(&self) -> Result<ScanResult> {
        Ok(scan_whole_dirs(
            self.id,
            self.name,
            self.description,
            &self.dirs,
        ))
    }

    fn remove(&self, items: &[CleanableItem]) -> CleanResult {
        let options = RemoveOptions {
            count_files: true,
            recreate_dirs: true,
        };
        remove_items(self.id, items, options)
    }
}
