//! Privilege escalation for root-requiring units.
//!
//! Unprivileged callers hand every root-requiring unit of one clean call to
//! an [`Elevator`] as a single batch, so the user authenticates once.

mod bridge;
mod privileges;
pub mod process;
pub mod protocol;

use std::time::Duration;
use thiserror::Error;

use crate::unit::CleanResult;

pub use bridge::{classify, reconcile, PrivilegeBridge, EXIT_DENIED, EXIT_DISMISSED};
pub use privileges::{find_in_path, is_root};
pub use protocol::{BatchEntry, ElevationRequest, WireEntry, WireResult};

/// Terminal failure states of an elevation attempt.
///
/// Each applies to the whole batch: the dialog either resolved for every
/// unit or for none.
#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("root privileges required ({0} not available)")]
    HelperUnavailable(String),

    #[error("Could not find the '{0}' executable on PATH")]
    ExecutableNotFound(String),

    #[error("Failed to launch privileged process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to encode privileged request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Authentication dismissed by user")]
    Dismissed,

    #[error("Authentication denied")]
    Denied,

    #[error("Privileged clean timed out after {} seconds", .0.as_secs())]
    TimedOut(Duration),

    #[error("Privileged clean failed (exit {code}): {stderr}")]
    Failed { code: i32, stderr: String },

    #[error("Privileged clean was terminated by a signal: {stderr}")]
    Killed { stderr: String },

    #[error("Malformed response from privileged process: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

/// Trait for privilege escalation backends.
pub trait Elevator: Send + Sync {
    /// Name of the helper, for user-facing messages.
    fn helper_name(&self) -> &str;

    /// Check if the helper exists on this system.
    fn is_available(&self) -> bool;

    /// Clean the whole batch as root.
    ///
    /// On success there is exactly one result per batch entry, in batch
    /// order.
    fn elevate(&self, batch: &[BatchEntry]) -> Result<Vec<CleanResult>, ElevationError>;
}
