//! Household to family partitioning for survey microdata.
//!
//! Reads the individuals of a survey year, assigns each of them to exactly one
//! family through a prioritized cascade of classification rules, and writes
//! the resulting (individual, role, family) table back to a table store.

pub mod algorithm;
pub mod collections;
pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod store;
pub mod utils;

// Re-export the most common types for easier use
pub use algorithm::family::{FamilyOutcome, FamilyPipeline, RunReport};
pub use config::{FamilyConfig, MinimumWageTable, TableNames};
pub use error::{FamilyError, Result};
pub use models::{FamilyRecord, IndividualRecord, Rule};
pub use store::{MemoryStore, ParquetStore, TableStore};

// Arrow types
pub use arrow::record_batch::RecordBatch;
