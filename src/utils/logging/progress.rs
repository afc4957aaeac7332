//! Progress reporting for multi-year runs
//!
//! This module provides the progress bar shown by the command line runner,
//! using the indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};

/// Default style for the year progress bar
pub const DEFAULT_YEAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} years {msg}";

/// Create a progress bar counting processed years
///
/// # Arguments
/// * `years` - Number of years to process
///
/// # Returns
/// A configured `ProgressBar`
#[must_use]
pub fn create_year_progress_bar(years: u64) -> ProgressBar {
    let pb = ProgressBar::new(years);
    if let Ok(style) = ProgressStyle::default_bar().template(DEFAULT_YEAR_TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Finish a progress bar with an optional completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        pb.finish_with_message(msg.to_string());
    } else {
        pb.finish();
    }
}
