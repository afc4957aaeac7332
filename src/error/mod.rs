//! Error handling for the family builder.
//!
//! Three kinds of failure abort a run: invariant violations in the rule
//! cascade, configuration/lookup errors raised before any computation, and
//! I/O or serialization errors from the table store. Data-quality anomalies
//! are never errors; they are logged and counted in the run report.

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for the family builder
#[derive(Debug, thiserror::Error)]
pub enum FamilyError {
    /// A rule produced a state the cascade must never reach
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// The minimum wage table has no entry for the requested year
    #[error("No minimum wage defined for year {0}")]
    UnknownYear(i32),

    /// The store holds no table under this name and year
    #[error("Table '{name}' not found for year {year}")]
    MissingTable { name: String, year: i32 },

    /// A required input column is absent
    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    /// A column holds a value outside its code list
    #[error("Invalid value {value} in column '{column}'")]
    InvalidValue { column: String, value: String },

    /// Unreadable or inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Conversion between typed records and record batches failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_arrow::Error),

    /// Configuration file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FamilyError {
    /// Create an invariant violation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }

    /// Whether this error signals a defect in the rule cascade itself
    #[must_use]
    pub const fn is_invariant(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

/// Result type for family builder operations
pub type Result<T> = std::result::Result<T, FamilyError>;

/// Fail with an invariant violation unless `condition` holds
///
/// # Arguments
/// * `condition` - The invariant to check
/// * `message` - Lazily built description of the violation
pub fn ensure<F>(condition: bool, message: F) -> Result<()>
where
    F: FnOnce() -> String,
{
    if condition {
        Ok(())
    } else {
        Err(FamilyError::Invariant(message()))
    }
}
