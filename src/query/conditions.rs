//! Filter predicates, combined with logical `AND`.

use crate::value::Value;

/// One predicate over a (possibly alias-qualified) column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    IsNull(String),
    IsNotNull(String),
    Lte(String, Value),
}

impl Condition {
    /// The column the predicate applies to, with any `Alias.` prefix intact.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Condition::Eq(field, _)
            | Condition::IsNull(field)
            | Condition::IsNotNull(field)
            | Condition::Lte(field, _) => field,
        }
    }
}

/// An `AND`-combined list of predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    conditions: Vec<Condition>,
}

impl ConditionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate with logical `AND`.
    pub fn and(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Builder-style equality shorthand.
    #[must_use]
    pub fn and_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Eq(field.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }
}

impl IntoIterator for ConditionSet {
    type Item = Condition;
    type IntoIter = std::vec::IntoIter<Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}
