//! Application-level rules checked before persisting or deleting.

use crate::entity::Entity;

/// The operation a rule guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    Create,
    Update,
    Delete,
}

type RuleFn = dyn Fn(&Entity) -> bool + Send + Sync;

/// Per-mode rule collection; every rule of a mode must pass.
///
/// A failing rule is a policy rejection, not an error: callers receive
/// `false` from the surrounding operation.
#[derive(Default)]
pub struct RulesRegistry {
    rules: Vec<(RuleMode, Box<RuleFn>)>,
}

impl RulesRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule for the given mode.
    pub fn add<F>(&mut self, mode: RuleMode, rule: F)
    where
        F: Fn(&Entity) -> bool + Send + Sync + 'static,
    {
        self.rules.push((mode, Box::new(rule)));
    }

    /// Check every rule registered for `mode` against `entity`.
    #[must_use]
    pub fn check(&self, entity: &Entity, mode: RuleMode) -> bool {
        self.rules
            .iter()
            .filter(|(rule_mode, _)| *rule_mode == mode)
            .all(|(_, rule)| rule(entity))
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
