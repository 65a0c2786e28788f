//! The mutable query builder handed out by table factories.

use std::sync::Arc;

use crate::connection::{Connection, Statement, StatementResult};
use crate::entity::Entity;
use crate::error::TableError;
use crate::schema::TableDescriptor;
use crate::value::Value;

use super::conditions::{Condition, ConditionSet};
use super::interceptor;
use super::options::QueryOptions;

/// The statement kind a query renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    Update,
    Delete,
}

/// A single-use query builder bound to one table and connection.
///
/// Select queries pass through the interceptor exactly once, immediately
/// before execution; update and delete queries run as built.
pub struct Query {
    pub(super) kind: QueryKind,
    pub(super) descriptor: Arc<TableDescriptor>,
    pub(super) connection: Arc<dyn Connection>,
    pub(super) options: QueryOptions,
    pub(super) conditions: ConditionSet,
    pub(super) assignments: Vec<(String, Value)>,
    pub(super) columns: Vec<String>,
    pub(super) before_find_fired: bool,
}

impl Query {
    #[must_use]
    pub fn new(
        kind: QueryKind,
        connection: Arc<dyn Connection>,
        descriptor: Arc<TableDescriptor>,
    ) -> Self {
        Self {
            kind,
            descriptor,
            connection,
            options: QueryOptions::new(),
            conditions: ConditionSet::new(),
            assignments: Vec::new(),
            columns: Vec::new(),
            before_find_fired: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> QueryOptions {
        self.options
    }

    #[must_use]
    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    /// Attach normalized options.
    #[must_use]
    pub fn apply_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// `SET column = value` for update queries.
    #[must_use]
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.assignments.push((column.to_string(), value.into()));
        self
    }

    /// `AND` a predicate onto the filter clause.
    #[must_use]
    pub fn and_where(mut self, condition: Condition) -> Self {
        self.conditions.and(condition);
        self
    }

    /// `AND` an equality predicate.
    #[must_use]
    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .and(Condition::Eq(column.to_string(), value.into()));
        self
    }

    /// Fire the pre-execution hook. Repeated calls are no-ops.
    pub fn trigger_before_find(&mut self) -> Result<(), TableError> {
        interceptor::prepare_for_execution(self)
    }

    /// The builder's own pre-execution step: default the select list to
    /// every schema column.
    pub(super) fn ensure_select_columns(&mut self) {
        if self.columns.is_empty() {
            self.columns = self.descriptor.schema().column_names();
        }
    }

    /// Render and run the statement.
    pub async fn execute(mut self) -> Result<StatementResult, TableError> {
        self.trigger_before_find()?;
        let connection = Arc::clone(&self.connection);
        let statement = Statement {
            kind: self.kind,
            table: self.descriptor.name().to_string(),
            assignments: self.assignments,
            conditions: self.conditions,
            columns: self.columns,
        };
        connection.execute(statement).await
    }

    /// Execute a select and materialize entities from the result rows.
    pub async fn all(self) -> Result<Vec<Entity>, TableError> {
        let result = self.execute().await?;
        Ok(result
            .into_rows()
            .into_iter()
            .map(Entity::from_row)
            .collect())
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
