//! In-memory table store

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use super::{TableStore, table_key};
use crate::error::{FamilyError, Result};

/// Store keeping every table in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: FxHashMap<String, RecordBatch>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, builder style
    #[must_use]
    pub fn with_table(mut self, name: &str, year: i32, batch: RecordBatch) -> Self {
        self.tables.insert(table_key(name, year), batch);
        self
    }

    /// Number of stored tables
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableStore for MemoryStore {
    fn get(&self, name: &str, year: i32) -> Result<RecordBatch> {
        self.tables
            .get(&table_key(name, year))
            .cloned()
            .ok_or_else(|| FamilyError::MissingTable {
                name: name.to_string(),
                year,
            })
    }

    fn put(&mut self, name: &str, year: i32, batch: RecordBatch) -> Result<()> {
        log::debug!("Storing {} rows as {}", batch.num_rows(), table_key(name, year));
        self.tables.insert(table_key(name, year), batch);
        Ok(())
    }

    fn contains(&self, name: &str, year: i32) -> bool {
        self.tables.contains_key(&table_key(name, year))
    }
}
