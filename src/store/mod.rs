//! Named-table store
//!
//! Intermediate and output tables are addressed by a table name and a survey
//! year. The family builder reads its three input relations once at the start
//! of a run and writes the family table once at the end.

pub mod memory;
pub mod parquet_store;

use arrow::record_batch::RecordBatch;

use crate::error::Result;

pub use memory::MemoryStore;
pub use parquet_store::ParquetStore;

/// Key under which a table is stored
#[must_use]
pub fn table_key(name: &str, year: i32) -> String {
    format!("{name}_{year}")
}

/// Store of named tables addressed by year
pub trait TableStore {
    /// Read a table
    ///
    /// # Errors
    /// Returns `MissingTable` when nothing is stored under `name` and `year`.
    fn get(&self, name: &str, year: i32) -> Result<RecordBatch>;

    /// Write a table, replacing any previous version
    fn put(&mut self, name: &str, year: i32, batch: RecordBatch) -> Result<()>;

    /// Whether a table exists
    fn contains(&self, name: &str, year: i32) -> bool;
}
