//! Unified error type for table and query operations.

use thiserror::Error;

/// Unified error type for the data-access layer.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Configured field `{field}` is missing from the table `{table}`")]
    MissingColumn { field: String, table: String },

    #[error("Deleting requires all primary key values")]
    MissingPrimaryKey,

    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

impl TableError {
    /// Create a missing-column error for a table.
    #[must_use]
    pub fn missing_column(field: impl Into<String>, table: impl Into<String>) -> Self {
        TableError::MissingColumn {
            field: field.into(),
            table: table.into(),
        }
    }
}
