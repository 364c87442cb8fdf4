//! Isolation of unit calls.
//!
//! Any unit entry point may return an error or panic. The registry and the
//! engine route every unit call through [`guard`], turning a broken unit
//! into a value instead of an aborted batch.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

use crate::error::{Result, SweepError};

/// Why a guarded unit call did not produce a value.
#[derive(Debug, Error)]
pub enum UnitFailure {
    #[error(transparent)]
    Failed(#[from] SweepError),

    #[error("panicked: {0}")]
    Panicked(String),
}

/// Run a fallible unit call, converting both errors and panics.
pub fn guard<T>(f: impl FnOnce() -> Result<T>) -> std::result::Result<T, UnitFailure> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(UnitFailure::Failed(err)),
        Err(payload) => Err(UnitFailure::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Run an infallible unit call, converting panics.
pub fn guard_value<T>(f: impl FnOnce() -> T) -> std::result::Result<T, UnitFailure> {
    guard(|| Ok(f()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
