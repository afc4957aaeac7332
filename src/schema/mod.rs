//! Arrow schema definitions and batch conformance
//!
//! Input tables are conformed to the declared individual schema before they
//! are deserialized: numeric columns stored with another width or as floats
//! are cast, absent nullable columns are filled with nulls. The output batch
//! is checked against the family schema before it is persisted so that type
//! drift in a derived column fails the run instead of reaching the store.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, new_null_array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::{FamilyError, Result};

/// Get the Arrow schema for individual tables
///
/// Column names follow the survey's variable names.
#[must_use]
pub fn individual_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("ident", DataType::Int64, false),
        Field::new("noi", DataType::Int64, false),
        Field::new("noindiv", DataType::Int64, true),
        Field::new("lpr", DataType::Int32, true),
        Field::new("lien", DataType::Int32, true),
        Field::new("cohab", DataType::Int32, true),
        Field::new("sexe", DataType::Int32, true),
        Field::new("agepf", DataType::Int32, true),
        Field::new("naia", DataType::Int32, true),
        Field::new("naim", DataType::Int32, true),
        Field::new("ztsai", DataType::Float64, true),
        Field::new("noimer", DataType::Int64, true),
        Field::new("noiper", DataType::Int64, true),
        Field::new("noicon", DataType::Int64, true),
        Field::new("noidec", DataType::Int64, true),
        Field::new("declar1", DataType::Utf8, true),
        Field::new("persfip", DataType::Utf8, true),
        Field::new("rga", DataType::Int32, true),
        Field::new("quelfic", DataType::Utf8, true),
        Field::new("agepr", DataType::Int32, true),
    ]))
}

/// Get the Arrow schema for the output family table
#[must_use]
pub fn family_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("noindiv", DataType::Int64, false),
        Field::new("quifam", DataType::Int32, false),
        Field::new("idfam", DataType::Int64, false),
    ]))
}

/// Project and cast a batch onto `target`
///
/// # Arguments
/// * `batch` - The batch as read from the store
/// * `target` - The declared schema
/// * `table` - Table name, for error messages
///
/// # Errors
/// Returns `MissingColumn` when a non-nullable target column is absent, or an
/// Arrow error when a column cannot be cast.
pub fn conform_batch(batch: &RecordBatch, target: &SchemaRef, table: &str) -> Result<RecordBatch> {
    let source_schema = batch.schema();
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(target.fields().len());

    for field in target.fields() {
        let column = match source_schema.index_of(field.name()) {
            Ok(idx) => {
                let column = batch.column(idx);
                if column.data_type() == field.data_type() {
                    column.clone()
                } else {
                    debug!(
                        "Casting column '{}' of '{table}' from {:?} to {:?}",
                        field.name(),
                        column.data_type(),
                        field.data_type()
                    );
                    cast(column, field.data_type())?
                }
            }
            Err(_) if field.is_nullable() => {
                debug!("Column '{}' absent from '{table}', filling with nulls", field.name());
                new_null_array(field.data_type(), batch.num_rows())
            }
            Err(_) => {
                return Err(FamilyError::MissingColumn {
                    table: table.to_string(),
                    column: field.name().clone(),
                });
            }
        };

        if !field.is_nullable() && column.null_count() > 0 {
            return Err(FamilyError::InvalidValue {
                column: field.name().clone(),
                value: format!("{} null values in '{table}'", column.null_count()),
            });
        }
        columns.push(column);
    }

    Ok(RecordBatch::try_new(target.clone(), columns)?)
}

/// Check that a batch carries exactly the declared column types
///
/// # Errors
/// Returns an invariant violation naming the first drifting column.
pub fn ensure_schema(batch: &RecordBatch, expected: &Schema, table: &str) -> Result<()> {
    let actual = batch.schema();
    if actual.fields().len() != expected.fields().len() {
        return Err(FamilyError::invariant(format!(
            "'{table}' has {} columns, expected {}",
            actual.fields().len(),
            expected.fields().len()
        )));
    }
    for (found, wanted) in actual.fields().iter().zip(expected.fields()) {
        if found.name() != wanted.name() || found.data_type() != wanted.data_type() {
            return Err(FamilyError::invariant(format!(
                "'{table}' column '{}' is {:?}, expected '{}' as {:?}",
                found.name(),
                found.data_type(),
                wanted.name(),
                wanted.data_type()
            )));
        }
        if !wanted.is_nullable() && batch.column_by_name(found.name()).is_some_and(|c| c.null_count() > 0) {
            return Err(FamilyError::invariant(format!(
                "'{table}' column '{}' contains nulls",
                found.name()
            )));
        }
    }
    Ok(())
}
