//! The soft-delete capability: tombstone writes, restore, and purge.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::entity::Entity;
use crate::error::TableError;
use crate::hooks::{HookEvent, HookOutcome};
use crate::query::{Condition, ConditionSet, Query, QueryKind};
use crate::rules::RuleMode;
use crate::value::Value;

use super::{DeleteOptions, Repository};

/// Soft-delete operations layered onto any [`Repository`].
///
/// Reads exclude tombstoned rows through query interception; the write path
/// replaces physical row removal with a timestamp update. A row moves
/// between three states: active (tombstone column `NULL`), soft-deleted
/// (tombstone column set), and purged (physically removed).
#[async_trait]
pub trait SoftDelete: Repository {
    /// The configured tombstone column, validated against the schema on
    /// every call.
    fn soft_delete_field(&self) -> Result<String, TableError> {
        self.descriptor().soft_delete_field()
    }

    /// A select query bound to this table; subject to interception.
    #[must_use]
    fn select_query(&self) -> Query {
        Query::new(
            QueryKind::Select,
            Arc::clone(self.connection()),
            Arc::clone(self.descriptor()),
        )
    }

    /// An update query bound to this table.
    #[must_use]
    fn update_query(&self) -> Query {
        Query::new(
            QueryKind::Update,
            Arc::clone(self.connection()),
            Arc::clone(self.descriptor()),
        )
    }

    /// A delete query bound to this table.
    #[must_use]
    fn delete_query(&self) -> Query {
        Query::new(
            QueryKind::Delete,
            Arc::clone(self.connection()),
            Arc::clone(self.descriptor()),
        )
    }

    /// Soft-delete one entity.
    ///
    /// An unsaved entity is a no-op returning `false`. A rule failure or a
    /// halting `BeforeDelete` observer also returns without touching
    /// storage. Cascades run before the tombstone update; `AfterDelete`
    /// fires only when a row was actually updated.
    async fn delete(&self, entity: &Entity, options: DeleteOptions) -> Result<bool, TableError> {
        if entity.is_new() {
            return Ok(false);
        }
        let pk_columns: Vec<String> = self.descriptor().primary_key().to_vec();
        let pk_refs: Vec<&str> = pk_columns.iter().map(String::as_str).collect();
        if !entity.has(&pk_refs) {
            return Err(TableError::MissingPrimaryKey);
        }
        if options.check_rules && !self.rules().check(entity, RuleMode::Delete) {
            return Ok(false);
        }
        if let HookOutcome::Halt(result) = self.hooks().dispatch(HookEvent::BeforeDelete, entity) {
            return Ok(result);
        }
        self.associations()
            .cascade_delete(entity, &options.as_secondary())
            .await?;

        let field = self.soft_delete_field()?;
        let mut query = self
            .update_query()
            .set(&field, Value::Timestamp(Utc::now()));
        for (column, value) in entity.extract(&pk_refs) {
            query = query.where_eq(&column, value);
        }
        let success = query.execute().await?.row_count() > 0;
        if success {
            self.hooks().notify(HookEvent::AfterDelete, entity);
            info!(table = self.descriptor().alias(), "soft-deleted row");
        }
        Ok(success)
    }

    /// Tombstone every row matching `conditions`.
    ///
    /// Bypasses hooks, rules, and interception. Zero affected rows is a
    /// valid outcome, not a failure.
    async fn delete_all(&self, conditions: ConditionSet) -> Result<u64, TableError> {
        let field = self.soft_delete_field()?;
        let mut query = self
            .update_query()
            .set(&field, Value::Timestamp(Utc::now()));
        for condition in conditions {
            query = query.and_where(condition);
        }
        let affected = query.execute().await?.row_count();
        info!(table = self.descriptor().alias(), affected, "bulk soft delete");
        Ok(affected)
    }

    /// Physically remove one row, running the full soft-delete path first
    /// so rules, hooks, and cascades still apply.
    ///
    /// The tombstone update and the physical delete are two sequential
    /// statements; transactional bracketing is the caller's concern.
    async fn hard_delete(&self, entity: &Entity) -> Result<bool, TableError> {
        if !self.delete(entity, DeleteOptions::default()).await? {
            return Ok(false);
        }
        let pk_columns: Vec<String> = self.descriptor().primary_key().to_vec();
        let pk_refs: Vec<&str> = pk_columns.iter().map(String::as_str).collect();
        let mut query = self.delete_query();
        for (column, value) in entity.extract(&pk_refs) {
            query = query.where_eq(&column, value);
        }
        let success = query.execute().await?.row_count() > 0;
        if success {
            info!(table = self.descriptor().alias(), "hard-deleted row");
        }
        Ok(success)
    }

    /// Physically remove rows tombstoned at or before `cutoff`.
    async fn hard_delete_all(&self, cutoff: DateTime<Utc>) -> Result<u64, TableError> {
        let field = self.soft_delete_field()?;
        let affected = self
            .delete_query()
            .and_where(Condition::IsNotNull(field.clone()))
            .and_where(Condition::Lte(field, Value::Timestamp(cutoff)))
            .execute()
            .await?
            .row_count();
        info!(table = self.descriptor().alias(), affected, "purged soft-deleted rows");
        Ok(affected)
    }

    /// Clear the tombstone and persist through the ordinary save path,
    /// returning the save outcome.
    async fn restore(&self, entity: &mut Entity) -> Result<bool, TableError> {
        let field = self.soft_delete_field()?;
        entity.set(&field, Value::Null);
        let success = self.save(entity).await?;
        if success {
            info!(table = self.descriptor().alias(), "restored row");
        }
        Ok(success)
    }
}
