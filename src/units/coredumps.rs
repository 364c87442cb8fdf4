//! systemd core dumps.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::unit::fs::{has_children, scan_children};
use crate::unit::{Category, ScanResult, Unit};

pub const COREDUMP_DIR: &str = "/var/lib/systemd/coredump";

/// Removes crash snapshots from the systemd coredump store. Root-owned.
pub struct CoredumpsUnit {
    dir: PathBuf,
}

impl CoredumpsUnit {
    pub fn new() -> Self {
        Self::with_dir(Path::new(COREDUMP_DIR))
    }

    pub fn with_dir(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl Default for CoredumpsUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit for CoredumpsUnit {
    fn id(&self) -> &str {
        "coredumps"
    }

    fn name(&self) -> &str {
        "Core Dumps"
    }

    fn description(&self) -> &str {
        "Removes systemd core dump files. These are crash snapshots \
         typically only useful for debugging."
    }

    fn category(&self) -> Category {
        Category::System
    }

    fn requires_root(&self) -> bool {
        true
    }

    fn unavailable_reason(&self) -> Option<String> {
        (!self.dir.is_dir()).then(|| "Systemd coredump directory not found".to_string())
    }

    fn has_items(&self) -> bool {
        has_children(&self.dir)
    }

    fn scan(&self) -> Result<ScanResult> {
        Ok(scan_children(self.id(), self.name(), &self.dir, "Core dump"))
    }
}
