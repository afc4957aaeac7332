//! Logging utilities for output and progress tracking
//!
//! This module provides the standardized log lines used by the store and the
//! rule cascade, and the progress bar used by the command line runner.

pub mod operations;
pub mod progress;

// Re-export commonly used functions for convenience
pub use operations::{log_anomaly, log_operation_complete, log_operation_start, log_rule_applied};
pub use progress::{create_year_progress_bar, finish_progress_bar};
