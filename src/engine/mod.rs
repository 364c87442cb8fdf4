//! Scan and clean orchestration.
//!
//! This module provides:
//! - The per-unit scan cache
//! - Bounded-parallel scan scheduling
//! - Clean orchestration with batched privilege escalation
//! - The `Engine` facade consumed by presentation layers

mod cache;
mod orchestrator;
mod progress;
mod scheduler;

pub use cache::ScanCache;
pub use orchestrator::CleanOrchestrator;
pub use progress::{Hooks, UnitStatus};
pub use scheduler::{should_parallelize, worker_count, ScanScheduler, DEFAULT_SCAN_WORKERS};

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::elevation::{is_root, Elevator, PrivilegeBridge};
use crate::unit::{Category, CleanResult, CleanableItem, Registry, ScanResult, Unit};

/// Entry point for scanning and cleaning.
///
/// Owns the shared registry handle and the scan cache; cleaning consumes
/// cached scans, and a cleaned unit must be re-scanned before it can be
/// cleaned again.
pub struct Engine {
    registry: Arc<Registry>,
    cache: Arc<ScanCache>,
    scheduler: ScanScheduler,
    orchestrator: CleanOrchestrator,
}

impl Engine {
    /// Create an engine with default configuration.
    pub fn new(registry: impl Into<Arc<Registry>>) -> Self {
        Self::from_config(registry, &Config::default())
    }

    pub fn from_config(registry: impl Into<Arc<Registry>>, config: &Config) -> Self {
        let registry = registry.into();
        let cache = Arc::new(ScanCache::new());

        let scheduler = ScanScheduler::new(
            Arc::clone(&registry),
            Arc::clone(&cache),
            config.engine.max_scan_workers,
        );
        let orchestrator = CleanOrchestrator::new(
            Arc::clone(&registry),
            Arc::clone(&cache),
            Box::new(PrivilegeBridge::new(&config.elevation)),
            is_root(),
        );

        Self {
            registry,
            cache,
            scheduler,
            orchestrator,
        }
    }

    /// Replace the privilege escalation backend.
    pub fn with_elevator(mut self, elevator: impl Elevator + 'static) -> Self {
        self.orchestrator.set_elevator(Box::new(elevator));
        self
    }

    /// Override root detection. A privileged engine cleans root-requiring
    /// units in-process.
    pub fn with_privileged(mut self, privileged: bool) -> Self {
        self.orchestrator.set_privileged(privileged);
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.scheduler.set_max_workers(max_workers);
        self
    }

    /// Pin the CPU count used to choose between sequential and pooled scans.
    pub fn with_cpus(mut self, cpus: usize) -> Self {
        self.scheduler.set_cpus(cpus);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn is_privileged(&self) -> bool {
        self.orchestrator.is_privileged()
    }

    /// All registered units, in registration order.
    pub fn list_units(&self) -> Vec<Arc<dyn Unit>> {
        self.registry.all()
    }

    /// Scan units. See [`ScanScheduler::scan`].
    pub fn scan(
        &self,
        unit_ids: Option<&[String]>,
        category: Option<Category>,
        hooks: &Hooks<'_, ScanResult>,
    ) -> Vec<ScanResult> {
        self.scheduler.scan(unit_ids, category, hooks)
    }

    /// Clean units. See [`CleanOrchestrator::clean`].
    pub fn clean(
        &self,
        unit_ids: Option<&[String]>,
        items_by_unit: Option<&HashMap<String, Vec<CleanableItem>>>,
        hooks: &Hooks<'_, CleanResult>,
    ) -> Vec<CleanResult> {
        self.orchestrator.clean(unit_ids, items_by_unit, hooks)
    }

    /// The cached result of the last successful scan of a unit.
    pub fn get_last_scan(&self, unit_id: &str) -> Option<ScanResult> {
        self.cache.get(unit_id)
    }

    /// Ids with a cached scan, i.e. what a default clean would process.
    pub fn scanned_ids(&self) -> Vec<String> {
        self.cache.ids()
    }
}
