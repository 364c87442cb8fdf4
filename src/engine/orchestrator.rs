//! Cleaning across units, with root-requiring units batched for elevation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::elevation::{BatchEntry, Elevator};
use crate::engine::cache::ScanCache;
use crate::engine::progress::{Hooks, UnitStatus};
use crate::unit::{guard, CleanResult, CleanableItem, Registry, Unit};

/// Partitions units into direct and elevated cleaning and merges results.
pub struct CleanOrchestrator {
    registry: Arc<Registry>,
    cache: Arc<ScanCache>,
    elevator: Box<dyn Elevator>,
    privileged: bool,
}

impl CleanOrchestrator {
    pub fn new(
        registry: Arc<Registry>,
        cache: Arc<ScanCache>,
        elevator: Box<dyn Elevator>,
        privileged: bool,
    ) -> Self {
        Self {
            registry,
            cache,
            elevator,
            privileged,
        }
    }

    pub fn set_elevator(&mut self, elevator: Box<dyn Elevator>) {
        self.elevator = elevator;
    }

    pub fn set_privileged(&mut self, privileged: bool) {
        self.privileged = privileged;
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    /// Clean units.
    ///
    /// Without explicit ids, every unit in the scan cache is cleaned.
    /// Results list directly cleaned units first, in id order, followed by
    /// the elevated batch in the same order. Every processed id is dropped
    /// from the scan cache afterwards.
    pub fn clean(
        &self,
        unit_ids: Option<&[String]>,
        items_by_unit: Option<&HashMap<String, Vec<CleanableItem>>>,
        hooks: &Hooks<'_, CleanResult>,
    ) -> Vec<CleanResult> {
        let ids = match unit_ids {
            Some(ids) => dedup(ids),
            None => self.cache.ids(),
        };

        let mut results = Vec::new();
        let mut batch: Vec<BatchEntry> = Vec::new();

        for id in &ids {
            let Some(unit) = self.registry.get(id) else {
                tracing::warn!(unit = %id, "Unit not found, skipping");
                continue;
            };
            let explicit = items_by_unit.and_then(|m| m.get(id));

            if unit.requires_root() && !self.privileged {
                let items = explicit
                    .cloned()
                    .or_else(|| self.cache.get(id).map(|scan| scan.items))
                    .unwrap_or_default();
                tracing::debug!(unit = %id, items = items.len(), "Deferring to elevated batch");
                batch.push(BatchEntry {
                    unit_id: id.clone(),
                    items,
                });
                continue;
            }

            results.push(self.clean_direct(unit.as_ref(), explicit.map(Vec::as_slice), hooks));
        }

        if !batch.is_empty() {
            results.extend(self.clean_elevated(&batch, hooks));
        }

        for id in &ids {
            self.cache.remove(id);
        }

        results
    }

    fn clean_direct(
        &self,
        unit: &dyn Unit,
        items: Option<&[CleanableItem]>,
        hooks: &Hooks<'_, CleanResult>,
    ) -> CleanResult {
        let id = unit.id();
        hooks.progress(id, UnitStatus::Cleaning);

        let (result, status) = match guard(|| unit.clean(items)) {
            Ok(mut result) => {
                result.unit_id = id.to_string();
                tracing::info!(
                    unit = id,
                    freed = result.freed_bytes,
                    removed = result.items_removed,
                    errors = result.errors.len(),
                    "Cleaned"
                );
                (result, UnitStatus::Done)
            }
            Err(err) => {
                tracing::error!(unit = id, error = %err, "Unit failed during clean");
                let message = format!("{} failed during cleaning: {}", unit.name(), err);
                (CleanResult::failed(id, message), UnitStatus::Error)
            }
        };

        hooks.result(&result);
        hooks.progress(id, status);
        result
    }

    fn clean_elevated(
        &self,
        batch: &[BatchEntry],
        hooks: &Hooks<'_, CleanResult>,
    ) -> Vec<CleanResult> {
        if !self.elevator.is_available() {
            tracing::warn!(
                helper = self.elevator.helper_name(),
                "Elevation helper not available, cannot clean root-owned files"
            );
            return batch
                .iter()
                .map(|entry| {
                    let name = self
                        .registry
                        .get(&entry.unit_id)
                        .map(|u| u.name().to_string())
                        .unwrap_or_else(|| entry.unit_id.clone());
                    let message = format!(
                        "{} requires root privileges to clean ({} not available)",
                        name,
                        self.elevator.helper_name()
                    );
                    self.report(CleanResult::failed(&entry.unit_id, message), hooks)
                })
                .collect();
        }

        for entry in batch {
            hooks.progress(&entry.unit_id, UnitStatus::Authenticating);
        }

        match self.elevator.elevate(batch) {
            Ok(results) => results
                .into_iter()
                .map(|result| self.report(result, hooks))
                .collect(),
            Err(err) => {
                tracing::warn!(error = %err, units = batch.len(), "Privilege escalation failed");
                let message = err.to_string();
                batch
                    .iter()
                    .map(|entry| self.report(CleanResult::failed(&entry.unit_id, &message), hooks))
                    .collect()
            }
        }
    }

    fn report(&self, result: CleanResult, hooks: &Hooks<'_, CleanResult>) -> CleanResult {
        hooks.result(&result);
        let status = if result.is_success() {
            UnitStatus::Done
        } else {
            UnitStatus::Error
        };
        hooks.progress(&result.unit_id, status);
        result
    }
}

fn dedup(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
