//! Logging utilities
//!
//! This module provides standardized logging functions for store operations
//! and rule applications.

use std::path::Path;

use crate::models::family::Rule;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::debug!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file that was operated on
/// * `rows` - Number of rows processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    rows: usize,
    elapsed: Option<std::time::Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!(
            "Successfully {} {} rows from {} in {:?}",
            operation,
            rows,
            path.display(),
            duration
        );
    } else {
        log::info!("Successfully {} {} rows from {}", operation, rows, path.display());
    }
}

/// Log the outcome of one classification rule
///
/// # Arguments
/// * `rule` - The rule that was applied
/// * `matched` - Rows the rule assigned
/// * `assigned` - Size of the result table afterwards
/// * `base` - Size of the base table
pub fn log_rule_applied(rule: Rule, matched: usize, assigned: usize, base: usize) {
    if matched == 0 {
        log::info!("Rule {} ({rule:?}) matched no rows", rule.code());
    } else {
        log::info!(
            "Rule {} ({rule:?}) assigned {matched} rows, {assigned} of {base} individuals placed",
            rule.code()
        );
    }
}

/// Log a data-quality anomaly that the run resolves and continues past
///
/// Nothing is logged when `count` is zero.
pub fn log_anomaly(kind: &str, count: usize) {
    if count > 0 {
        log::warn!("Data quality: {count} {kind}");
    }
}
