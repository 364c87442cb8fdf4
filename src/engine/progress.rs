use serde::Serialize;
use std::fmt;

/// Per-unit lifecycle status reported through progress hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Scanning,
    Cleaning,
    /// Waiting on the elevation prompt.
    Authenticating,
    Done,
    Error,
}

impl UnitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Scanning => "scanning",
            UnitStatus::Cleaning => "cleaning",
            UnitStatus::Authenticating => "authenticating",
            UnitStatus::Done => "done",
            UnitStatus::Error => "error",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional progress and result callbacks for one scan or clean call.
///
/// Both may be invoked from scan worker threads, hence `Sync`. Cross-unit
/// ordering is unspecified when scanning in parallel.
pub struct Hooks<'a, R> {
    on_progress: Option<&'a (dyn Fn(&str, UnitStatus) + Sync)>,
    on_result: Option<&'a (dyn Fn(&R) + Sync)>,
}

impl<'a, R> Hooks<'a, R> {
    pub fn new() -> Self {
        Self {
            on_progress: None,
            on_result: None,
        }
    }

    pub fn with_progress(mut self, f: &'a (dyn Fn(&str, UnitStatus) + Sync)) -> Self {
        self.on_progress = Some(f);
        self
    }

    pub fn with_result(mut self, f: &'a (dyn Fn(&R) + Sync)) -> Self {
        self.on_result = Some(f);
        self
    }

    pub(crate) fn progress(&self, unit_id: &str, status: UnitStatus) {
        if let Some(f) = self.on_progress {
            f(unit_id, status);
        }
    }

    pub(crate) fn result(&self, result: &R) {
        if let Some(f) = self.on_result {
            f(result);
        }
    }
}

impl<R> Default for Hooks<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}
