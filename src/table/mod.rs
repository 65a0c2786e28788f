//! Table objects: the repository contract plus the soft-delete capability.

mod soft_delete;

pub use soft_delete::SoftDelete;

use std::sync::Arc;

use async_trait::async_trait;

use crate::association::{Association, AssociationManager};
use crate::connection::Connection;
use crate::entity::Entity;
use crate::error::TableError;
use crate::hooks::{HookEvent, HookOutcome, HookRegistry};
use crate::query::{Query, QueryOptions};
use crate::rules::{RuleMode, RulesRegistry};
use crate::schema::TableDescriptor;
use crate::value::Value;

/// Options accepted by the delete path.
#[derive(Debug, Clone, Copy)]
pub struct DeleteOptions {
    /// Run delete-mode rules before touching storage.
    pub check_rules: bool,
    /// Whether this table initiated the delete (cleared for cascades).
    pub primary: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            check_rules: true,
            primary: true,
        }
    }
}

impl DeleteOptions {
    /// The options a cascade passes through to child tables.
    #[must_use]
    pub fn as_secondary(mut self) -> Self {
        self.primary = false;
        self
    }
}

/// The table contract the soft-delete capability is layered onto.
#[async_trait]
pub trait Repository: Send + Sync {
    #[must_use]
    fn descriptor(&self) -> &Arc<TableDescriptor>;
    #[must_use]
    fn connection(&self) -> &Arc<dyn Connection>;
    #[must_use]
    fn hooks(&self) -> &HookRegistry;
    #[must_use]
    fn rules(&self) -> &RulesRegistry;
    #[must_use]
    fn associations(&self) -> &AssociationManager;

    /// Persist an entity through the ordinary save path.
    async fn save(&self, entity: &mut Entity) -> Result<bool, TableError>;
}

/// A repository bound to one table descriptor and connection.
pub struct Table {
    descriptor: Arc<TableDescriptor>,
    connection: Arc<dyn Connection>,
    hooks: HookRegistry,
    rules: RulesRegistry,
    associations: AssociationManager,
}

impl Table {
    #[must_use]
    pub fn new(connection: Arc<dyn Connection>, descriptor: TableDescriptor) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            connection,
            hooks: HookRegistry::new(),
            rules: RulesRegistry::new(),
            associations: AssociationManager::new(),
        }
    }

    /// Attach an observer (see [`HookEvent`]).
    pub fn on<F>(&mut self, event: HookEvent, listener: F)
    where
        F: Fn(&Entity) -> HookOutcome + Send + Sync + 'static,
    {
        self.hooks.on(event, listener);
    }

    /// Register a rule for the given mode.
    pub fn add_rule<F>(&mut self, mode: RuleMode, rule: F)
    where
        F: Fn(&Entity) -> bool + Send + Sync + 'static,
    {
        self.rules.add(mode, rule);
    }

    /// Register a dependent association.
    pub fn add_association(&mut self, association: Association) {
        self.associations.add(association);
    }

    /// A select query with options applied; the standard read entry point.
    #[must_use]
    pub fn find(&self, options: QueryOptions) -> Query {
        self.select_query().apply_options(options)
    }

    /// Fetch one row by primary key, honoring soft-delete visibility.
    pub async fn get(
        &self,
        id: impl Into<Value> + Send,
        options: QueryOptions,
    ) -> Result<Option<Entity>, TableError> {
        let Some(pk_column) = self.descriptor.primary_key().first() else {
            return Ok(None);
        };
        let column = self.descriptor.alias_field(pk_column);
        let rows = self.find(options).where_eq(&column, id.into()).all().await?;
        Ok(rows.into_iter().next())
    }

    async fn update_existing(&self, entity: &Entity) -> Result<bool, TableError> {
        let assignments = entity.extract_dirty();
        if assignments.is_empty() {
            return Ok(true);
        }
        let pk_columns: Vec<&str> = self
            .descriptor
            .primary_key()
            .iter()
            .map(String::as_str)
            .collect();
        if !entity.has(&pk_columns) {
            return Err(TableError::MissingPrimaryKey);
        }
        let mut query = self.update_query();
        for (column, value) in assignments {
            query = query.set(&column, value);
        }
        for (column, value) in entity.extract(&pk_columns) {
            query = query.where_eq(&column, value);
        }
        Ok(query.execute().await?.row_count() > 0)
    }
}

#[async_trait]
impl Repository for Table {
    fn descriptor(&self) -> &Arc<TableDescriptor> {
        &self.descriptor
    }

    fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    fn rules(&self) -> &RulesRegistry {
        &self.rules
    }

    fn associations(&self) -> &AssociationManager {
        &self.associations
    }

    /// Save runs save hooks and create/update rules; `restore` rides on it.
    async fn save(&self, entity: &mut Entity) -> Result<bool, TableError> {
        if let HookOutcome::Halt(result) = self.hooks.dispatch(HookEvent::BeforeSave, entity) {
            return Ok(result);
        }
        let mode = if entity.is_new() {
            RuleMode::Create
        } else {
            RuleMode::Update
        };
        if !self.rules.check(entity, mode) {
            return Ok(false);
        }
        let success = if entity.is_new() {
            self.connection
                .insert(self.descriptor.name(), entity.fields().clone())
                .await?;
            true
        } else {
            self.update_existing(entity).await?
        };
        if success {
            entity.mark_clean();
            self.hooks.notify(HookEvent::AfterSave, entity);
        }
        Ok(success)
    }
}

impl SoftDelete for Table {}


#[cfg(test)]
#[path = "table_tests_2.rs"]
mod table_tests_2;
