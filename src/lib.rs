//! Sweep - A Linux disk cleaner engine
//!
//! This crate provides functionality for:
//! - Defining cleaner units behind a common capability trait
//! - Scanning units with bounded parallelism and caching the results
//! - Cleaning, with root-requiring units batched into one elevated call

pub mod cli;
pub mod commands;
pub mod config;
pub mod elevation;
pub mod engine;
pub mod error;
pub mod unit;
pub mod units;

// Re-export commonly used types
pub use config::Config;
pub use engine::Engine;
pub use error::{Result, SweepError};
