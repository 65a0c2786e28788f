//! Execution-layer contract between queries and a storage engine.

mod memory;

pub use memory::MemoryConnection;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::TableError;
use crate::query::{ConditionSet, QueryKind};
use crate::value::Value;

/// Stored row shape used across the execution layer.
pub type Row = BTreeMap<String, Value>;

/// A rendered statement, ready for an engine to run.
#[derive(Debug, Clone)]
pub struct Statement {
    pub kind: QueryKind,
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    pub conditions: ConditionSet,
    pub columns: Vec<String>,
}

/// Outcome of one executed statement.
///
/// Row/cursor cleanup rides on `Drop`; there is no explicit close step.
#[derive(Debug, Default)]
pub struct StatementResult {
    row_count: u64,
    rows: Vec<Row>,
}

impl StatementResult {
    /// Result of an update or delete.
    #[must_use]
    pub fn affected(row_count: u64) -> Self {
        Self {
            row_count,
            rows: Vec::new(),
        }
    }

    /// Result of a select.
    #[must_use]
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            row_count: u64::try_from(rows.len()).unwrap_or(u64::MAX),
            rows,
        }
    }

    /// Rows affected by an update/delete, or returned by a select.
    #[must_use]
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

/// The narrow contract a storage engine implements.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Run a select, update, or delete statement.
    async fn execute(&self, statement: Statement) -> Result<StatementResult, TableError>;

    /// Insert a fresh row (the save path for new entities).
    async fn insert(&self, table: &str, row: Row) -> Result<(), TableError>;
}
