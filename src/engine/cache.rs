use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::unit::ScanResult;

/// Last successful scan per unit id.
///
/// Written by scan workers concurrently, so every access goes through one
/// mutex. Contention is negligible: each unit writes once per scan.
#[derive(Debug, Default)]
pub struct ScanCache {
    inner: Mutex<BTreeMap<String, ScanResult>>,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, unit_id: &str, result: ScanResult) {
        self.lock().insert(unit_id.to_string(), result);
    }

    pub fn get(&self, unit_id: &str) -> Option<ScanResult> {
        self.lock().get(unit_id).cloned()
    }

    pub fn remove(&self, unit_id: &str) -> Option<ScanResult> {
        self.lock().remove(unit_id)
    }

    /// Cached unit ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, ScanResult>> {
        // Unit code never runs under this lock, so a poisoned map is still
        // consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_insert_get_remove() {
        let cache = ScanCache::new();
        assert!(cache.is_empty());

        cache.insert("alpha", ScanResult::empty("alpha", "Alpha"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("alpha").unwrap().unit_id, "alpha");

        assert!(cache.remove("alpha").is_some());
        assert!(cache.get("alpha").is_none());
        assert!(cache.remove("alpha").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let cache = ScanCache::new();
        cache.insert("alpha", ScanResult::empty("alpha", "Old"));
        cache.insert("alpha", ScanResult::empty("alpha", "New"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("alpha").unwrap().unit_name, "New");
    }

    #[test]
    fn test_concurrent_writers() {
        let cache = Arc::new(ScanCache::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let id = format!("unit-{i}");
                    cache.insert(&id, ScanResult::empty(&id, &id));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 8);
        assert_eq!(cache.ids()[0], "unit-0");
    }
}
