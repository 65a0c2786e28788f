//! Soft-delete layer for relational tables.
//!
//! Deleting a row stamps a nullable tombstone column with the current time
//! instead of removing it. Ordinary reads are intercepted and filtered down
//! to active rows; callers opt out per query with
//! [`QueryOptions::with_deleted`]. Tombstoned rows can be restored or
//! purged in bulk once a retention cutoff has passed.

// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod association;
pub mod connection;
pub mod entity;
pub mod error;
pub mod hooks;
pub mod query;
pub mod rules;
pub mod schema;
pub mod table;
pub mod value;

// Re-export commonly used types
pub use association::{Association, AssociationManager};
pub use connection::{Connection, MemoryConnection, Row, Statement, StatementResult};
pub use entity::Entity;
pub use error::TableError;
pub use hooks::{HookEvent, HookOutcome, HookRegistry};
pub use query::{Condition, ConditionSet, Query, QueryKind, QueryOptions, WITH_DELETED};
pub use rules::{RuleMode, RulesRegistry};
pub use schema::{ColumnType, TableDescriptor, TableSchema, DEFAULT_SOFT_DELETE_FIELD};
pub use table::{DeleteOptions, Repository, SoftDelete, Table};
pub use value::Value;
