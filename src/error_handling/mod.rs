//! Error handling and warning statistics.
//!
//! This module provides:
//! - Error type definitions for initialization and minifier failures
//! - Warning statistics tracking for missing resources
//!
//! The split follows the run policy: filesystem and spawn failures are
//! errors that abort the run, while absent referenced resources are
//! warnings that are counted and logged.

mod stats;
mod types;

// Re-export public API
pub use stats::WarningStats;
pub use types::{InitializationError, MinifyError, WarningType};
