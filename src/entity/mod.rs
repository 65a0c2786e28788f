//! Row entities with persistence identity and dirty tracking.

use std::collections::{BTreeMap, BTreeSet};

use crate::value::Value;

/// An in-memory row.
///
/// Entities built with [`Entity::new`] have no persisted identity until they
/// pass through the save path; entities materialized from storage start
/// clean.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    fields: BTreeMap<String, Value>,
    dirty: BTreeSet<String>,
    is_new: bool,
}

impl Entity {
    /// A fresh, never-persisted entity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
            dirty: BTreeSet::new(),
            is_new: true,
        }
    }

    /// Materialize an entity from a stored row: persisted and clean.
    #[must_use]
    pub fn from_row(fields: BTreeMap<String, Value>) -> Self {
        Self {
            fields,
            dirty: BTreeSet::new(),
            is_new: false,
        }
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Set a field, marking it dirty.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
        self.dirty.insert(field.to_string());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether every named field is present with a non-null value.
    #[must_use]
    pub fn has(&self, fields: &[&str]) -> bool {
        fields
            .iter()
            .all(|field| self.fields.get(*field).is_some_and(|v| !v.is_null()))
    }

    /// Copy of the named fields that are present.
    #[must_use]
    pub fn extract(&self, fields: &[&str]) -> BTreeMap<String, Value> {
        fields
            .iter()
            .filter_map(|field| {
                self.fields
                    .get(*field)
                    .map(|v| ((*field).to_string(), v.clone()))
            })
            .collect()
    }

    /// Copy of the fields modified since the entity was last persisted.
    #[must_use]
    pub fn extract_dirty(&self) -> BTreeMap<String, Value> {
        self.dirty
            .iter()
            .filter_map(|field| self.fields.get(field).map(|v| (field.clone(), v.clone())))
            .collect()
    }

    /// Every field, for insert statements.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Mark the entity persisted and clean.
    pub fn mark_clean(&mut self) {
        self.is_new = false;
        self.dirty.clear();
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
