//! Parquet-backed table store
//!
//! Each table lives in its own file `<name>_<year>.parquet` inside the store
//! directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::{TableStore, table_key};
use crate::error::{FamilyError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Store writing one Parquet file per table
#[derive(Debug, Clone)]
pub struct ParquetStore {
    root: PathBuf,
}

impl ParquetStore {
    /// Open a store rooted at `root`
    ///
    /// # Errors
    /// Returns an error if the directory does not exist or is not a directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        validate_directory(&root)?;
        Ok(Self { root })
    }

    /// Path of the file holding a table
    #[must_use]
    pub fn table_path(&self, name: &str, year: i32) -> PathBuf {
        self.root.join(format!("{}.parquet", table_key(name, year)))
    }
}

/// Validates that a directory exists and is a directory
fn validate_directory(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(FamilyError::Config(format!(
            "store directory does not exist: {}",
            dir.display()
        )));
    }
    Ok(())
}

/// Read a parquet file into a single record batch
///
/// # Arguments
/// * `path` - Path to the Parquet file
///
/// # Errors
/// Returns an error if the file cannot be opened or if the Parquet file is invalid
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let start = std::time::Instant::now();
    log_operation_start("Reading parquet file", path);

    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;

    log_operation_complete("read", path, batch.num_rows(), Some(start.elapsed()));
    Ok(batch)
}

/// Write a record batch to a parquet file, replacing it if present
pub fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let start = std::time::Instant::now();
    log_operation_start("Writing parquet file", path);

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;

    log_operation_complete("wrote", path, batch.num_rows(), Some(start.elapsed()));
    Ok(())
}

impl TableStore for ParquetStore {
    fn get(&self, name: &str, year: i32) -> Result<RecordBatch> {
        let path = self.table_path(name, year);
        if !path.is_file() {
            return Err(FamilyError::MissingTable {
                name: name.to_string(),
                year,
            });
        }
        read_parquet(&path)
    }

    fn put(&mut self, name: &str, year: i32, batch: RecordBatch) -> Result<()> {
        write_parquet(&self.table_path(name, year), &batch)
    }

    fn contains(&self, name: &str, year: i32) -> bool {
        self.table_path(name, year).is_file()
    }
}
