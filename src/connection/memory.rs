//! In-memory storage engine, used by tests and embedding demos.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::TableError;
use crate::query::{Condition, ConditionSet, QueryKind};
use crate::value::Value;

use super::{Connection, Row, Statement, StatementResult};

/// A [`Connection`] backed by per-table row vectors behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryConnection {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryConnection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty table.
    pub async fn create_table(&self, name: &str) {
        self.tables
            .write()
            .await
            .entry(name.to_string())
            .or_default();
    }
}

/// Strip any `Alias.` qualification down to the bare column name.
fn base_column(field: &str) -> &str {
    field.rsplit('.').next().unwrap_or(field)
}

fn lte(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Timestamp(a), Value::Timestamp(b)) => a <= b,
        (Value::Integer(a), Value::Integer(b)) => a <= b,
        (Value::Text(a), Value::Text(b)) => a <= b,
        _ => false,
    }
}

fn row_matches(conditions: &ConditionSet, row: &Row) -> bool {
    conditions.iter().all(|condition| {
        let value = row.get(base_column(condition.field()));
        match condition {
            Condition::Eq(_, expected) => value == Some(expected),
            // An absent column reads as NULL.
            Condition::IsNull(_) => value.is_none_or(Value::is_null),
            Condition::IsNotNull(_) => value.is_some_and(|v| !v.is_null()),
            Condition::Lte(_, bound) => value.is_some_and(|v| lte(v, bound)),
        }
    })
}

fn project(row: &Row, columns: &[String]) -> Row {
    if columns.is_empty() {
        return row.clone();
    }
    columns
        .iter()
        .filter_map(|column| row.get(column).map(|v| (column.clone(), v.clone())))
        .collect()
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn execute(&self, statement: Statement) -> Result<StatementResult, TableError> {
        match statement.kind {
            QueryKind::Select => {
                let tables = self.tables.read().await;
                let rows = tables
                    .get(&statement.table)
                    .ok_or_else(|| TableError::UnknownTable(statement.table.clone()))?;
                let selected: Vec<Row> = rows
                    .iter()
                    .filter(|row| row_matches(&statement.conditions, row))
                    .map(|row| project(row, &statement.columns))
                    .collect();
                Ok(StatementResult::with_rows(selected))
            }
            QueryKind::Update => {
                let mut tables = self.tables.write().await;
                let rows = tables
                    .get_mut(&statement.table)
                    .ok_or_else(|| TableError::UnknownTable(statement.table.clone()))?;
                let mut affected: u64 = 0;
                for row in rows
                    .iter_mut()
                    .filter(|row| row_matches(&statement.conditions, row))
                {
                    for (column, value) in &statement.assignments {
                        row.insert(column.clone(), value.clone());
                    }
                    affected = affected.saturating_add(1);
                }
                Ok(StatementResult::affected(affected))
            }
            QueryKind::Delete => {
                let mut tables = self.tables.write().await;
                let rows = tables
                    .get_mut(&statement.table)
                    .ok_or_else(|| TableError::UnknownTable(statement.table.clone()))?;
                let before = rows.len();
                rows.retain(|row| !row_matches(&statement.conditions, row));
                let removed = before.saturating_sub(rows.len());
                Ok(StatementResult::affected(
                    u64::try_from(removed).unwrap_or(u64::MAX),
                ))
            }
        }
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), TableError> {
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
