//! Per-query options, including the `withDeleted` opt-out.

use serde_json::Value as JsonValue;

/// Option key recognized in legacy option bags.
pub const WITH_DELETED: &str = "withDeleted";

/// Typed options attached to a query.
///
/// Older call sites passed an untyped option bag, either a list of flags or
/// a map keyed by option name; both representations are normalized here
/// once, at the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    include_deleted: bool,
}

impl QueryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that soft-deleted rows be included in results.
    #[must_use]
    pub fn with_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    #[must_use]
    pub fn include_deleted(&self) -> bool {
        self.include_deleted
    }

    /// Normalize a list-like option bag (`["withDeleted"]`).
    #[must_use]
    pub fn from_flags(flags: &[&str]) -> Self {
        Self {
            include_deleted: flags.contains(&WITH_DELETED),
        }
    }

    /// Normalize a map-like option bag. Presence of the `withDeleted` key
    /// counts, regardless of the value stored under it.
    #[must_use]
    pub fn from_map(options: &serde_json::Map<String, JsonValue>) -> Self {
        Self {
            include_deleted: options.contains_key(WITH_DELETED),
        }
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
