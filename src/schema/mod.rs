//! Table schemas and descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Column name used for the tombstone timestamp unless overridden.
pub const DEFAULT_SOFT_DELETE_FIELD: &str = "deleted";

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Text,
    Timestamp,
    Boolean,
}

/// Column layout of a single table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    columns: BTreeMap<String, ColumnType>,
}

impl TableSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column (builder style).
    #[must_use]
    pub fn column(mut self, name: &str, column_type: ColumnType) -> Self {
        self.columns.insert(name.to_string(), column_type);
        self
    }

    /// The type of a column, when it exists.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).copied()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// All column names, in stable order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }
}

/// Identity and layout of one relational table: name, alias, schema,
/// primary key, and the configured tombstone column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescriptor {
    name: String,
    alias: String,
    schema: TableSchema,
    primary_key: Vec<String>,
    soft_delete_column: Option<String>,
}

impl TableDescriptor {
    /// A descriptor with the alias defaulting to the table name and an
    /// `id` primary key.
    #[must_use]
    pub fn new(name: &str, schema: TableSchema) -> Self {
        Self {
            name: name.to_string(),
            alias: name.to_string(),
            schema,
            primary_key: vec!["id".to_string()],
            soft_delete_column: None,
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_string();
        self
    }

    #[must_use]
    pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Override the tombstone column name for this table.
    #[must_use]
    pub fn with_soft_delete_column(mut self, column: &str) -> Self {
        self.soft_delete_column = Some(column.to_string());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    #[must_use]
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    #[must_use]
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// Qualify a column with this table's alias, e.g. `Articles.deleted`.
    #[must_use]
    pub fn alias_field(&self, field: &str) -> String {
        format!("{}.{}", self.alias, field)
    }

    /// Resolve the configured tombstone column.
    ///
    /// Validated against the schema on every call so a misconfigured table
    /// is caught at the point of use, not at registration.
    pub fn soft_delete_field(&self) -> Result<String, TableError> {
        let field = self
            .soft_delete_column
            .clone()
            .unwrap_or_else(|| DEFAULT_SOFT_DELETE_FIELD.to_string());
        if self.schema.has_column(&field) {
            Ok(field)
        } else {
            Err(TableError::missing_column(field, self.alias.clone()))
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
