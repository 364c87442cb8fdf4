//! Old kernel images in `/boot`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use nix::sys::utsname::uname;

use crate::error::{Result, SweepError};
use crate::unit::{Category, CleanableItem, RiskLevel, ScanResult, Unit};

const BOOT_DIR: &str = "/boot";
const KERNEL_PREFIX: &str = "vmlinuz-";

/// Removes kernels other than the running one and the newest previous one.
pub struct OldKernelsUnit {
    boot_dir: PathBuf,
    running: Option<String>,
}

impl OldKernelsUnit {
    pub fn new() -> Self {
        Self {
            boot_dir: PathBuf::from(BOOT_DIR),
            running: running_release(),
        }
    }

    pub fn with_boot_dir(boot_dir: &Path, running: &str) -> Self {
        Self {
            boot_dir: boot_dir.to_path_buf(),
            running: Some(running.to_string()),
        }
    }

    /// Installed kernel versions, newest first.
    fn installed(&self) -> io::Result<Vec<String>> {
        let mut kernels: Vec<(SystemTime, String)> = fs::read_dir(&self.boot_dir)?
            .flatten()
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                let version = name.strip_prefix(KERNEL_PREFIX)?.to_string();
                let mtime = e
                    .metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                Some((mtime, version))
            })
            .collect();

        kernels.sort_by(|a, b| b.cmp(a));
        Ok(kernels.into_iter().map(|(_, version)| version).collect())
    }

    /// Versions that are neither running nor the newest fallback.
    fn removable(&self, installed: &[String]) -> Vec<String> {
        let mut keep: Vec<&str> = self.running.iter().map(String::as_str).collect();
        let fallbacks = if self.running.is_some() { 1 } else { 2 };
        keep.extend(
            installed
                .iter()
                .filter(|v| self.running.as_deref() != Some(v.as_str()))
                .take(fallbacks)
                .map(String::as_str),
        );

        installed
            .iter()
            .filter(|v| !keep.contains(&v.as_str()))
            .cloned()
            .collect()
    }

    /// Boot files belonging to one kernel version.
    fn related_files(&self, version: &str) -> Vec<PathBuf> {
        let exact = [
            format!("{KERNEL_PREFIX}{version}"),
            format!("initrd.img-{version}"),
            format!("System.map-{version}"),
            format!("config-{version}"),
        ];
        let initramfs = format!("initramfs-{version}");

        let mut files: Vec<PathBuf> = match fs::read_dir(&self.boot_dir) {
            Ok(entries) => entries
                .flatten()
                .filter(|e| {
                    let name = e.file_name().to_string_lossy().into_owned();
                    exact.contains(&name)
                        || name
                            .strip_prefix(&initramfs)
                            .is_some_and(|rest| matches!(rest, ".img" | "-fallback.img"))
                })
                .map(|e| e.path())
                .collect(),
            Err(_) => Vec::new(),
        };
        files.sort();
        files
    }
}

impl Default for OldKernelsUnit {
    fn default() -> Self {
        Self::new()
    }
}

fn running_release() -> Option<String> {
    match uname() {
        Ok(info) => Some(info.release().to_string_lossy().into_owned()),
        Err(err) => {
            tracing::warn!(error = %err, "Cannot determine running kernel");
            None
        }
    }
}

impl Unit for OldKernelsUnit {
    fn id(&self) -> &str {
        "old_kernels"
    }

    fn name(&self) -> &str {
        "Old Kernel Images"
    }

    fn description(&self) -> &str {
        "Removes old Linux kernel images from /boot, keeping the current \
         running kernel and one previous version."
    }

    fn category(&self) -> Category {
        Category::System
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::Aggressive
    }

    fn requires_root(&self) -> bool {
        true
    }

    fn unavailable_reason(&self) -> Option<String> {
        (!self.boot_dir.is_dir()).then(|| format!("{} directory not found", self.boot_dir.display()))
    }

    fn has_items(&self) -> bool {
        self.installed().map(|k| k.len() > 2).unwrap_or(false)
    }

    fn scan(&self) -> Result<ScanResult> {
        let installed = self
            .installed()
            .map_err(|err| SweepError::io(&self.boot_dir, err))?;

        let mut items = Vec::new();
        for version in self.removable(&installed) {
            for path in self.related_files(&version) {
                let size = match fs::symlink_metadata(&path) {
                    Ok(m) => m.len(),
                    Err(_) => continue,
                };
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                items.push(CleanableItem::new(path, size, format!("Old kernel: {name}")));
            }
        }

        let total: u64 = items.iter().map(|i| i.size_bytes).sum();
        let summary = format!(
            "Found {} old kernel files totaling {}",
            items.len(),
            humansize::format_size(total, humansize::BINARY)
        );
        Ok(ScanResult::new(self.id(), self.name(), items, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn install(boot: &Path, version: &str, age_days: u64) {
        let kernel = boot.join(format!("vmlinuz-{version}"));
        fs::write(&kernel, "k".repeat(1000)).unwrap();
        fs::write(boot.join(format!("initramfs-{version}.img")), "i".repeat(500)).unwrap();
        fs::write(boot.join(format!("System.map-{version}")), "s".repeat(100)).unwrap();

        let mtime = SystemTime::now() - Duration::from_secs(age_days * 86_400);
        File::options()
            .write(true)
            .open(&kernel)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    #[test]
    fn test_keeps_running_and_one_previous() {
        let tmp = TempDir::new().unwrap();
        install(tmp.path(), "6.1.0", 30);
        install(tmp.path(), "6.2.0", 20);
        install(tmp.path(), "6.3.0", 10);
        install(tmp.path(), "6.4.0", 1);

        let unit = OldKernelsUnit::with_boot_dir(tmp.path(), "6.3.0");
        assert!(unit.has_items());

        let scan = unit.scan().unwrap();
        let names: Vec<String> = scan
            .items
            .iter()
            .map(|i| i.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(scan.items.len(), 6);
        assert_eq!(scan.total_bytes, 2 * 1600);
        assert!(names.contains(&"vmlinuz-6.1.0".to_string()));
        assert!(names.contains(&"initramfs-6.2.0.img".to_string()));
        assert!(!names.iter().any(|n| n.contains("6.3.0") || n.contains("6.4.0")));
    }

    #[test]
    fn test_two_kernels_nothing_to_do() {
        let tmp = TempDir::new().unwrap();
        install(tmp.path(), "6.1.0", 10);
        install(tmp.path(), "6.2.0", 1);

        let unit = OldKernelsUnit::with_boot_dir(tmp.path(), "6.2.0");
        assert!(!unit.has_items());
        assert!(unit.scan().unwrap().is_empty());
    }

    #[test]
    fn test_initramfs_prefix_does_not_match_other_versions() {
        let tmp = TempDir::new().unwrap();
        install(tmp.path(), "6.1.0", 10);
        fs::write(tmp.path().join("initramfs-6.1.0-2.img"), "x").unwrap();

        let unit = OldKernelsUnit::with_boot_dir(tmp.path(), "6.9.0");
        let files = unit.related_files("6.1.0");

        assert_eq!(files.len(), 3);
        assert!(!files.iter().any(|f| f.ends_with("initramfs-6.1.0-2.img")));
    }

    #[test]
    fn test_unreadable_boot_is_scan_error() {
        let tmp = TempDir::new().unwrap();
        let unit = OldKernelsUnit::with_boot_dir(&tmp.path().join("missing"), "6.1.0");

        assert!(!unit.has_items());
        let err = unit.scan().unwrap_err();
        assert!(matches!(err, SweepError::Io { .. }));
    }

    #[test]
    fn test_metadata() {
        let unit = OldKernelsUnit::with_boot_dir(Path::new("/nonexistent"), "6.1.0");
        assert!(unit.requires_root());
        assert_eq!(unit.risk_level(), RiskLevel::Aggressive);
        assert_eq!(
            unit.unavailable_reason().as_deref(),
            Some("/nonexistent directory not found")
        );
    }
}
