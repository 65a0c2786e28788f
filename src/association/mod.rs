//! Dependent associations and cascade deletion.

use std::sync::Arc;

use tracing::debug;

use crate::entity::Entity;
use crate::error::TableError;
use crate::query::ConditionSet;
use crate::table::{DeleteOptions, Repository, SoftDelete, Table};

/// A parent-to-child link eligible for cascading.
pub struct Association {
    /// Column on the child table referencing the parent row.
    pub foreign_key: String,
    /// Parent column the foreign key points at.
    pub bind_key: String,
    /// Whether child rows are deleted along with the parent.
    pub dependent: bool,
    pub target: Arc<Table>,
}

/// The set of associations hanging off one table.
#[derive(Default)]
pub struct AssociationManager {
    associations: Vec<Association>,
}

impl AssociationManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, association: Association) {
        self.associations.push(association);
    }

    /// Propagate a delete to dependent children.
    ///
    /// Children with a tombstone column are soft-deleted in bulk; children
    /// without one are removed physically. Options arrive with `primary`
    /// already cleared by the initiating table.
    pub async fn cascade_delete(
        &self,
        entity: &Entity,
        _options: &DeleteOptions,
    ) -> Result<(), TableError> {
        for association in &self.associations {
            if !association.dependent {
                continue;
            }
            let Some(parent_id) = entity.get(&association.bind_key) else {
                continue;
            };
            let conditions =
                ConditionSet::new().and_eq(&association.foreign_key, parent_id.clone());
            match association.target.descriptor().soft_delete_field() {
                Ok(_) => {
                    let affected = association.target.delete_all(conditions).await?;
                    debug!(
                        child = association.target.descriptor().alias(),
                        affected, "cascaded soft delete"
                    );
                }
                Err(_) => {
                    let mut query = association.target.delete_query();
                    for condition in conditions {
                        query = query.and_where(condition);
                    }
                    let result = query.execute().await?;
                    debug!(
                        child = association.target.descriptor().alias(),
                        affected = result.row_count(),
                        "cascaded hard delete"
                    );
                }
            }
        }
        Ok(())
    }
}
