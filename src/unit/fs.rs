//! Filesystem helpers shared by units.
//!
//! Two scanning shapes cover most units: itemizing the immediate children of
//! one directory, and reporting a fixed list of whole directories as coarse
//! aggregate items. Removal is shared by both.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::unit::entry::{CleanResult, CleanableItem, ScanResult};

/// Options for [`remove_items`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveOptions {
    /// Count every file inside a removed directory instead of counting the
    /// directory as one item.
    pub count_files: bool,
    /// Recreate removed directories as empty directories.
    pub recreate_dirs: bool,
}

/// Total apparent size and file count of a directory tree.
///
/// Symlinks are not followed; unreadable entries are skipped.
pub fn dir_info(path: &Path) -> (u64, u32) {
    let mut size = 0u64;
    let mut count = 0u32;

    for entry in WalkDir::new(path).follow_links(false).into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(metadata) = entry.metadata() {
            size += metadata.len();
            count = count.saturating_add(1);
        }
    }

    (size, count)
}

/// Whether a directory exists and has at least one entry.
pub fn has_children(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Itemize the immediate children of `dir`, one item per child.
///
/// Children of size zero are skipped. A missing or unreadable directory
/// yields an empty result.
pub fn scan_children(unit_id: &str, unit_name: &str, dir: &Path, label: &str) -> ScanResult {
    let items = children_items(dir, label, false);
    let summary = format!(
        "Found {} {} entries totaling {}",
        items.len(),
        label,
        humansize::format_size(items.iter().map(|i| i.size_bytes).sum::<u64>(), humansize::BINARY)
    );
    ScanResult::new(unit_id, unit_name, items, summary)
}

/// Items for the children of `dir`, sorted by path.
pub fn children_items(dir: &Path, label: &str, keep_empty: bool) -> Vec<CleanableItem> {
    let mut paths: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries.flatten().map(|e| e.path()).collect(),
        Err(err) => {
            tracing::debug!(dir = %dir.display(), error = %err, "Cannot read directory");
            return Vec::new();
        }
    };
    paths.sort();

    let mut items = Vec::new();
    for path in paths {
        let metadata = match fs::symlink_metadata(&path) {
            Ok(m) => m,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "Cannot access");
                continue;
            }
        };

        let (size, count) = if metadata.is_dir() {
            dir_info(&path)
        } else {
            (metadata.len(), 1)
        };

        if size == 0 && !keep_empty {
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        items.push(
            CleanableItem::new(path, size, format!("{}: {}", label, name)).with_file_count(count),
        );
    }

    items
}

/// Report each existing, non-empty directory in `dirs` as one item.
pub fn scan_whole_dirs(
    unit_id: &str,
    unit_name: &str,
    description: &str,
    dirs: &[PathBuf],
) -> ScanResult {
    let items: Vec<CleanableItem> = dirs
        .iter()
        .filter(|d| d.is_dir())
        .filter_map(|d| {
            let (size, count) = dir_info(d);
            (size > 0).then(|| CleanableItem::new(d, size, description).with_file_count(count))
        })
        .collect();

    let total: u64 = items.iter().map(|i| i.size_bytes).sum();
    let summary = format!(
        "Found {}: {}",
        unit_name,
        humansize::format_size(total, humansize::BINARY)
    );
    ScanResult::new(unit_id, unit_name, items, summary)
}

/// Remove the given items and report what was freed.
///
/// A path that no longer exists still counts towards freed bytes (it is
/// gone either way) but not towards removed items. Failures are collected
/// per item and never stop the loop.
pub fn remove_items(unit_id: &str, items: &[CleanableItem], options: RemoveOptions) -> CleanResult {
    let mut result = CleanResult::new(unit_id);

    for item in items {
        if item.is_leaf {
            result.errors.push(format!(
                "{}: logical item cannot be removed as a path",
                item.path.display()
            ));
            continue;
        }

        match remove_path(&item.path, options) {
            Ok(removed) => {
                result.freed_bytes += item.size_bytes;
                result.items_removed = result.items_removed.saturating_add(removed);
            }
            Err(err) => {
                tracing::debug!(unit = unit_id, path = %item.path.display(), error = %err, "Remove failed");
                result.errors.push(format!("{}: {}", item.path.display(), err));
            }
        }
    }

    result
}

fn remove_path(path: &Path, options: RemoveOptions) -> io::Result<u32> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err),
    };

    if metadata.is_dir() {
        let removed = if options.count_files {
            dir_info(path).1
        } else {
            1
        };
        fs::remove_dir_all(path)?;
        if options.recreate_dirs {
            fs::create_dir_all(path)?;
        }
        Ok(removed)
    } else {
        fs::remove_file(path)?;
        Ok(1)
    }
}
