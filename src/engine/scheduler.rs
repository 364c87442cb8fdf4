//! Scan scheduling across units.

use rayon::prelude::*;
use std::sync::Arc;
use std::thread;

use crate::engine::cache::ScanCache;
use crate::engine::progress::{Hooks, UnitStatus};
use crate::unit::{guard, guard_value, Category, Registry, ScanResult, Unit};

/// Default upper bound of concurrent scans. Each scan may walk a large tree
/// on its own; more workers only queue up on the same disk.
pub const DEFAULT_SCAN_WORKERS: usize = 4;

/// Runs unit scans, sequentially or on a bounded pool, and caches results.
pub struct ScanScheduler {
    registry: Arc<Registry>,
    cache: Arc<ScanCache>,
    max_workers: usize,
    /// Fixed CPU count; detected per scan when unset.
    cpus: Option<usize>,
}

impl ScanScheduler {
    pub fn new(registry: Arc<Registry>, cache: Arc<ScanCache>, max_workers: usize) -> Self {
        Self {
            registry,
            cache,
            max_workers: max_workers.max(1),
            cpus: None,
        }
    }

    pub fn set_max_workers(&mut self, max_workers: usize) {
        self.max_workers = max_workers.max(1);
    }

    pub fn set_cpus(&mut self, cpus: usize) {
        self.cpus = Some(cpus.max(1));
    }

    fn cpus(&self) -> usize {
        self.cpus
            .unwrap_or_else(|| thread::available_parallelism().map_or(1, |n| n.get()))
    }

    /// Decide which units a scan call covers.
    ///
    /// Explicit ids win over the category filter; unknown or unavailable
    /// ids are logged and skipped. An empty id list means "all".
    pub fn resolve(
        &self,
        unit_ids: Option<&[String]>,
        category: Option<Category>,
    ) -> Vec<Arc<dyn Unit>> {
        match unit_ids {
            Some(ids) if !ids.is_empty() => ids
                .iter()
                .filter_map(|id| {
                    let Some(unit) = self.registry.get(id) else {
                        tracing::warn!(unit = %id, "Unit not found, skipping");
                        return None;
                    };
                    match guard_value(|| unit.is_available()) {
                        Ok(true) => Some(unit),
                        Ok(false) => {
                            tracing::info!(unit = %id, "Unit not available on this system, skipping");
                            None
                        }
                        Err(err) => {
                            tracing::error!(unit = %id, error = %err, "Error checking availability, skipping");
                            None
                        }
                    }
                })
                .collect(),
            _ => self
                .registry
                .available()
                .into_iter()
                .filter(|u| category.map_or(true, |c| u.category() == c))
                .collect(),
        }
    }

    /// Scan the resolved units.
    ///
    /// A failing unit is reported as [`UnitStatus::Error`] and left out of
    /// the returned list; it never aborts the other scans.
    pub fn scan(
        &self,
        unit_ids: Option<&[String]>,
        category: Option<Category>,
        hooks: &Hooks<'_, ScanResult>,
    ) -> Vec<ScanResult> {
        let units = self.resolve(unit_ids, category);
        if units.is_empty() {
            return Vec::new();
        }

        if should_parallelize(units.len(), self.cpus()) {
            self.scan_parallel(&units, hooks)
        } else {
            self.scan_sequential(&units, hooks)
        }
    }

    fn scan_sequential(
        &self,
        units: &[Arc<dyn Unit>],
        hooks: &Hooks<'_, ScanResult>,
    ) -> Vec<ScanResult> {
        units
            .iter()
            .filter_map(|unit| self.scan_one(unit.as_ref(), hooks))
            .collect()
    }

    fn scan_parallel(
        &self,
        units: &[Arc<dyn Unit>],
        hooks: &Hooks<'_, ScanResult>,
    ) -> Vec<ScanResult> {
        let workers = worker_count(units.len(), self.max_workers);
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("sweep-scan-{i}"))
            .build()
        {
            Ok(pool) => pool,
            Err(err) => {
                tracing::warn!(error = %err, "Could not build scan pool, scanning sequentially");
                return self.scan_sequential(units, hooks);
            }
        };

        tracing::debug!(units = units.len(), workers, "Scanning in parallel");
        pool.install(|| {
            units
                .par_iter()
                .filter_map(|unit| self.scan_one(unit.as_ref(), hooks))
                .collect()
        })
    }

    fn scan_one(&self, unit: &dyn Unit, hooks: &Hooks<'_, ScanResult>) -> Option<ScanResult> {
        let id = unit.id();
        hooks.progress(id, UnitStatus::Scanning);

        match guard(|| unit.scan()) {
            Ok(result) => {
                tracing::debug!(unit = id, bytes = result.total_bytes, items = result.items.len(), "Scan finished");
                self.cache.insert(id, result.clone());
                hooks.result(&result);
                hooks.progress(id, UnitStatus::Done);
                Some(result)
            }
            Err(err) => {
                tracing::error!(unit = id, error = %err, "Unit failed during scan");
                hooks.progress(id, UnitStatus::Error);
                None
            }
        }
    }
}

/// Parallel scanning only pays off with several units and several CPUs.
pub fn should_parallelize(unit_count: usize, cpus: usize) -> bool {
    unit_count > 1 && cpus > 1
}

pub fn worker_count(unit_count: usize, max_workers: usize) -> usize {
    unit_count.min(max_workers).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parallelize() {
        assert!(!should_parallelize(0, 8));
        assert!(!should_parallelize(1, 8));
        assert!(!should_parallelize(5, 1));
        assert!(should_parallelize(2, 2));
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(worker_count(2, DEFAULT_SCAN_WORKERS), 2);
        assert_eq!(worker_count(10, DEFAULT_SCAN_WORKERS), 4);
        assert_eq!(worker_count(10, 1), 1);
        assert_eq!(worker_count(0, 4), 1);
    }

    #[test]
    fn test_empty_registry_scans_nothing() {
        let scheduler = ScanScheduler::new(
            Arc::new(Registry::new()),
            Arc::new(ScanCache::new()),
            DEFAULT_SCAN_WORKERS,
        );

        assert!(scheduler.scan(None, None, &Hooks::default()).is_empty());
        let ids = vec!["missing".to_string()];
        assert!(scheduler.resolve(Some(&ids), None).is_empty());
    }

    #[test]
    fn test_cpu_override() {
        let mut scheduler = ScanScheduler::new(
            Arc::new(Registry::new()),
            Arc::new(ScanCache::new()),
            DEFAULT_SCAN_WORKERS,
        );
        scheduler.set_cpus(0);
        assert_eq!(scheduler.cpus(), 1);
        scheduler.set_cpus(8);
        assert_eq!(scheduler.cpus(), 8);
    }
}
