//! Cleaner units: the data model, the capability trait, and the registry.
//!
//! This module provides:
//! - Value types shared by scanning and cleaning
//! - The `Unit` trait every cleaner implements
//! - Reusable scanning/removal helpers for directory-based units
//! - A crash guard isolating unit calls
//! - The id-keyed `Registry`

mod capability;
mod entry;
pub mod fs;
pub mod guard;
mod registry;

pub use capability::{probe, Category, RiskLevel, Unit, UnitGroup, UnitState};
pub use entry::{CleanResult, CleanableItem, ScanResult};
pub use guard::{guard, guard_value, UnitFailure};
pub use registry::Registry;
