//! Pre-execution interception for select queries.
//!
//! Every select against a table with a configured tombstone column picks up
//! an `<Alias>.<column> IS NULL` predicate here, unless the query opted out
//! via [`QueryOptions::with_deleted`](super::QueryOptions::with_deleted).

use tracing::debug;

use crate::error::TableError;

use super::builder::{Query, QueryKind};
use super::conditions::Condition;

/// Mutate `query` immediately before its first execution.
///
/// Fires at most once per query instance and only for select queries; the
/// `before_find_fired` flag makes repeated triggering a no-op. Errors from
/// tombstone-column resolution propagate to the caller.
pub(super) fn prepare_for_execution(query: &mut Query) -> Result<(), TableError> {
    if query.before_find_fired || query.kind != QueryKind::Select {
        return Ok(());
    }
    query.before_find_fired = true;

    // The underlying builder's own preparation runs first.
    query.ensure_select_columns();

    if query.options.include_deleted() {
        debug!(table = query.descriptor.alias(), "select keeps soft-deleted rows");
        return Ok(());
    }

    let field = query.descriptor.soft_delete_field()?;
    let aliased = query.descriptor.alias_field(&field);
    debug!(
        table = query.descriptor.alias(),
        field = %aliased,
        "excluding soft-deleted rows"
    );
    query.conditions.and(Condition::IsNull(aliased));
    Ok(())
}

#[cfg(test)]
#[path = "interceptor_tests.rs"]
mod tests;
