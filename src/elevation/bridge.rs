//! Batch elevation through an external helper such as `pkexec`.

use std::process::Command;
use std::time::Duration;

use crate::config::ElevationConfig;
use crate::elevation::privileges::find_in_path;
use crate::elevation::process::{run_with_input, Captured};
use crate::elevation::protocol::{BatchEntry, ElevationRequest, WireResult};
use crate::elevation::{ElevationError, Elevator};
use crate::unit::CleanResult;

/// Exit code of the helper when the user dismissed the authentication dialog.
pub const EXIT_DISMISSED: i32 = 126;
/// Exit code of the helper when authentication was attempted and denied.
pub const EXIT_DENIED: i32 = 127;

/// Runs a batch of deletions as root behind a single authentication prompt.
///
/// The helper re-invokes this same program's hidden clean subcommand,
/// which reads the request on stdin and answers on stdout.
#[derive(Debug, Clone)]
pub struct PrivilegeBridge {
    helper: String,
    program: String,
    subcommand: String,
    timeout: Duration,
}

impl PrivilegeBridge {
    pub fn new(config: &ElevationConfig) -> Self {
        Self {
            helper: config.helper.clone(),
            program: config.program.clone(),
            subcommand: config.subcommand.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for PrivilegeBridge {
    fn default() -> Self {
        Self::new(&ElevationConfig::default())
    }
}

impl Elevator for PrivilegeBridge {
    fn helper_name(&self) -> &str {
        &self.helper
    }

    fn is_available(&self) -> bool {
        find_in_path(&self.helper).is_some()
    }

    fn elevate(&self, batch: &[BatchEntry]) -> Result<Vec<CleanResult>, ElevationError> {
        let helper = find_in_path(&self.helper)
            .ok_or_else(|| ElevationError::HelperUnavailable(self.helper.clone()))?;
        let program = find_in_path(&self.program)
            .ok_or_else(|| ElevationError::ExecutableNotFound(self.program.clone()))?;

        let payload = serde_json::to_vec(&ElevationRequest::from_batch(batch))
            .map_err(ElevationError::Encode)?;

        let mut cmd = Command::new(&helper);
        cmd.arg(&program).arg(&self.subcommand);

        tracing::info!(
            helper = %helper.display(),
            program = %program.display(),
            units = batch.len(),
            "Requesting elevated clean"
        );

        let captured = run_with_input(cmd, payload, self.timeout)
            .map_err(ElevationError::Spawn)?
            .ok_or(ElevationError::TimedOut(self.timeout))?;

        let results = classify(&captured)?;
        Ok(reconcile(batch, results))
    }
}

/// Map the child's exit status and output to results or a process-wide error.
pub fn classify(captured: &Captured) -> Result<Vec<CleanResult>, ElevationError> {
    let stderr = String::from_utf8_lossy(&captured.stderr).trim().to_string();

    match captured.status.code() {
        Some(0) => {}
        Some(EXIT_DISMISSED) => return Err(ElevationError::Dismissed),
        Some(EXIT_DENIED) => return Err(ElevationError::Denied),
        Some(code) => return Err(ElevationError::Failed { code, stderr }),
        None => return Err(ElevationError::Killed { stderr }),
    }

    let wire: Vec<WireResult> =
        serde_json::from_slice(&captured.stdout).map_err(ElevationError::MalformedResponse)?;
    Ok(wire.into_iter().map(CleanResult::from).collect())
}

/// Order results like the batch, fill in units the child did not report,
/// and drop results for units that were never requested.
pub fn reconcile(batch: &[BatchEntry], mut results: Vec<CleanResult>) -> Vec<CleanResult> {
    let mut ordered = Vec::with_capacity(batch.len());

    for entry in batch {
        match results.iter().position(|r| r.unit_id == entry.unit_id) {
            Some(pos) => ordered.push(results.remove(pos)),
            None => {
                tracing::warn!(unit = %entry.unit_id, "No result returned by privileged process");
                ordered.push(CleanResult::failed(
                    &entry.unit_id,
                    "No result returned by privileged process",
                ));
            }
        }
    }

    for stray in results {
        tracing::warn!(unit = %stray.unit_id, "Ignoring result for unit that was not requested");
    }

    ordered
}
