//! The capability trait every cleaner unit implements.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::unit::entry::{CleanResult, CleanableItem, ScanResult};
use crate::unit::fs::{remove_items, RemoveOptions};
use crate::unit::guard::guard_value;

/// Display grouping for related units. Carries no behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitGroup {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// How much care a user should take before cleaning a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Safe,
    Moderate,
    Aggressive,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    System,
    User,
    Development,
    PackageManager,
    Browser,
    Application,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::System,
        Category::User,
        Category::Development,
        Category::PackageManager,
        Category::Browser,
        Category::Application,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::System => "system",
            Category::User => "user",
            Category::Development => "development",
            Category::PackageManager => "package_manager",
            Category::Browser => "browser",
            Category::Application => "application",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                let valid: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
                format!("unknown category '{}' (valid: {})", s, valid.join(", "))
            })
    }
}

/// Trait for cleaner units.
///
/// Implement this trait to add a new kind of reclaimable space. A unit:
/// - reports whether it applies to this system (`unavailable_reason`)
/// - enumerates what it could remove (`scan`), never deleting anything
/// - removes either everything it finds or an explicit subset (`clean`)
///
/// Units are shared across scan workers and must not rely on interior
/// state between calls.
pub trait Unit: Send + Sync {
    /// Unique identifier (e.g., "thumbnails").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "Thumbnails").
    fn name(&self) -> &str;

    /// What this unit cleans and why that is safe.
    fn description(&self) -> &str;

    fn category(&self) -> Category;

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::Safe
    }

    /// Whether cleaning needs root privileges.
    fn requires_root(&self) -> bool {
        false
    }

    fn group(&self) -> Option<&UnitGroup> {
        None
    }

    /// Display order within a category, lower first.
    fn sort_order(&self) -> u32 {
        50
    }

    /// Singular noun for removed items ("file", "package", ...).
    fn item_noun(&self) -> &str {
        "file"
    }

    /// Why this unit cannot work on this system, or `None` if it can.
    fn unavailable_reason(&self) -> Option<String> {
        None
    }

    fn is_available(&self) -> bool {
        self.unavailable_reason().is_none()
    }

    /// Cheap existence probe, distinct from a full scan.
    fn has_items(&self) -> bool {
        true
    }

    /// Enumerate cleanable items. Must not delete anything.
    fn scan(&self) -> Result<ScanResult>;

    /// Remove items.
    ///
    /// `None` re-scans and removes everything found; `Some` removes
    /// exactly the given subset.
    fn clean(&self, items: Option<&[CleanableItem]>) -> Result<CleanResult> {
        match items {
            Some(items) => Ok(self.remove(items)),
            None => {
                let scan = self.scan()?;
                Ok(self.remove(&scan.items))
            }
        }
    }

    /// Delete the given items. Override for units that clean through an
    /// external command instead of removing paths.
    fn remove(&self, items: &[CleanableItem]) -> CleanResult {
        remove_items(self.id(), items, RemoveOptions::default())
    }
}

/// Snapshot of a unit's derived availability state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitState {
    Unavailable(String),
    /// Available, but the existence probe found nothing.
    Empty,
    Ready,
}

/// Probe a unit's state.
///
/// `unavailable_reason` and `has_items` are called one after the other with
/// no atomicity between them; a unit may change state in between. Panics in
/// either probe mark the unit unavailable.
pub fn probe(unit: &dyn Unit) -> UnitState {
    match guard_value(|| unit.unavailable_reason()) {
        Ok(Some(reason)) => return UnitState::Unavailable(reason),
        Ok(None) => {}
        Err(err) => return UnitState::Unavailable(format!("availability check {err}")),
    }

    match guard_value(|| unit.has_items()) {
        Ok(true) => UnitState::Ready,
        Ok(false) => UnitState::Empty,
        Err(err) => UnitState::Unavailable(format!("item probe {err}")),
    }
}
