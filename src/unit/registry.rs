//! Registry of cleaner units keyed by id.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::unit::capability::{Category, Unit};
use crate::unit::guard::guard_value;

/// In-memory catalog of units.
///
/// Populated once at startup, then shared read-only (behind an `Arc`) by the
/// scheduler and orchestrator. Iteration follows registration order.
#[derive(Default)]
pub struct Registry {
    units: Vec<Arc<dyn Unit>>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from a list of units.
    ///
    /// # Example
    /// ```
    /// use sweep::unit::Registry;
    /// use sweep::units::all_units;
    ///
    /// let registry = Registry::with_units(all_units());
    /// assert!(registry.contains("thumbnails"));
    /// ```
    pub fn with_units(units: impl IntoIterator<Item = Arc<dyn Unit>>) -> Self {
        let mut registry = Self::new();
        for unit in units {
            registry.register(unit);
        }
        registry
    }

    /// Register a unit. The first registration of an id wins; duplicates are
    /// logged and ignored. Returns whether the unit was added.
    pub fn register(&mut self, unit: Arc<dyn Unit>) -> bool {
        let id = unit.id().to_string();
        if self.index.contains_key(&id) {
            tracing::warn!(unit = %id, "Unit already registered, skipping duplicate");
            return false;
        }

        tracing::debug!(unit = %id, name = unit.name(), "Registered unit");
        self.index.insert(id, self.units.len());
        self.units.push(unit);
        true
    }

    /// Get a unit by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Unit>> {
        self.index.get(id).map(|&i| Arc::clone(&self.units[i]))
    }

    /// All registered units.
    pub fn all(&self) -> Vec<Arc<dyn Unit>> {
        self.units.clone()
    }

    pub fn by_category(&self, category: Category) -> Vec<Arc<dyn Unit>> {
        self.units
            .iter()
            .filter(|u| u.category() == category)
            .cloned()
            .collect()
    }

    /// Units that apply to this system.
    ///
    /// A unit whose availability check panics is logged and excluded.
    pub fn available(&self) -> Vec<Arc<dyn Unit>> {
        self.units
            .iter()
            .filter(|unit| match guard_value(|| unit.is_available()) {
                Ok(available) => available,
                Err(err) => {
                    tracing::error!(unit = unit.id(), error = %err, "Error checking availability");
                    false
                }
            })
            .cloned()
            .collect()
    }

    /// Units keyed by group id. Ungrouped units are left out.
    pub fn groups(&self) -> BTreeMap<&'static str, Vec<Arc<dyn Unit>>> {
        let mut groups: BTreeMap<&'static str, Vec<Arc<dyn Unit>>> = BTreeMap::new();
        for unit in &self.units {
            if let Some(group) = unit.group() {
                groups.entry(group.id).or_default().push(Arc::clone(unit));
            }
        }
        groups
    }

    pub fn group_units(&self, group_id: &str) -> Vec<Arc<dyn Unit>> {
        self.units
            .iter()
            .filter(|u| u.group().is_some_and(|g| g.id == group_id))
            .cloned()
            .collect()
    }

    /// List all unit ids.
    pub fn ids(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.id()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::unit::capability::UnitGroup;
    use crate::unit::entry::ScanResult;

    const GROUP: UnitGroup = UnitGroup {
        id: "electron",
        name: "Electron Cache",
        description: "Chromium engine caches",
    };

    struct TestUnit {
        id: &'static str,
        name: &'static str,
        category: Category,
        available: bool,
        grouped: bool,
        panics: bool,
    }

    impl TestUnit {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                name: id,
                category: Category::User,
                available: true,
                grouped: false,
                panics: false,
            }
        }
    }

    impl Unit for TestUnit {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "test unit"
        }

        fn category(&self) -> Category {
            self.category
        }

        fn group(&self) -> Option<&UnitGroup> {
            self.grouped.then_some(&GROUP)
        }

        fn is_available(&self) -> bool {
            if self.panics {
                panic!("availability check exploded");
            }
            self.available
        }

        fn scan(&self) -> Result<ScanResult> {
            Ok(ScanResult::empty(self.id, self.name))
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = Registry::new();
        assert!(registry.register(Arc::new(TestUnit::new("alpha"))));

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("alpha"));
        assert_eq!(registry.get("alpha").unwrap().id(), "alpha");
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = Registry::new();
        let first = TestUnit {
            name: "First",
            ..TestUnit::new("alpha")
        };
        let second = TestUnit {
            name: "Second",
            ..TestUnit::new("alpha")
        };

        assert!(registry.register(Arc::new(first)));
        assert!(!registry.register(Arc::new(second)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("alpha").unwrap().name(), "First");
    }

    #[test]
    fn test_all_preserves_registration_order() {
        let registry = Registry::with_units([
            Arc::new(TestUnit::new("c")) as Arc<dyn Unit>,
            Arc::new(TestUnit::new("a")),
            Arc::new(TestUnit::new("b")),
        ]);

        assert_eq!(registry.ids(), vec!["c", "a", "b"]);
        let all: Vec<String> = registry.all().iter().map(|u| u.id().to_string()).collect();
        assert_eq!(all, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_by_category() {
        let registry = Registry::with_units([
            Arc::new(TestUnit {
                category: Category::System,
                ..TestUnit::new("sys")
            }) as Arc<dyn Unit>,
            Arc::new(TestUnit::new("usr")),
        ]);

        let system = registry.by_category(Category::System);
        assert_eq!(system.len(), 1);
        assert_eq!(system[0].id(), "sys");
        assert!(registry.by_category(Category::Browser).is_empty());
    }

    #[test]
    fn test_available_excludes_unavailable_and_panicking() {
        let registry = Registry::with_units([
            Arc::new(TestUnit::new("alpha")) as Arc<dyn Unit>,
            Arc::new(TestUnit {
                available: false,
                ..TestUnit::new("beta")
            }),
            Arc::new(TestUnit {
                panics: true,
                ..TestUnit::new("gamma")
            }),
        ]);

        let available = registry.available();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id(), "alpha");
    }

    #[test]
    fn test_groups() {
        let registry = Registry::with_units([
            Arc::new(TestUnit {
                grouped: true,
                ..TestUnit::new("electron_cache")
            }) as Arc<dyn Unit>,
            Arc::new(TestUnit {
                grouped: true,
                ..TestUnit::new("electron_builder_cache")
            }),
            Arc::new(TestUnit::new("trash")),
        ]);

        let groups = registry.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["electron"].len(), 2);

        assert_eq!(registry.group_units("electron").len(), 2);
        assert!(registry.group_units("rust").is_empty());
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert!(registry.available().is_empty());
        assert!(registry.groups().is_empty());
    }
}
