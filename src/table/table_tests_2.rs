use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::association::Association;
use crate::connection::{Connection, MemoryConnection, Row};
use crate::hooks::{HookEvent, HookOutcome};
use crate::query::{ConditionSet, QueryOptions};
use crate::rules::RuleMode;
use crate::schema::{ColumnType, TableDescriptor, TableSchema};
use crate::value::Value;

use super::{DeleteOptions, SoftDelete, Table};

fn articles_schema() -> TableSchema {
    TableSchema::new()
        .column("id", ColumnType::Integer)
        .column("title", ColumnType::Text)
        .column("deleted", ColumnType::Timestamp)
}

fn article_row(id: i64, title: &str, deleted: Value) -> Row {
    let mut row = Row::new();
    row.insert("id".to_string(), Value::Integer(id));
    row.insert("title".to_string(), Value::Text(title.to_string()));
    row.insert("deleted".to_string(), deleted);
    row
}

async fn seeded_table(rows: Vec<Row>) -> (Arc<MemoryConnection>, Table) {
    let connection = Arc::new(MemoryConnection::new());
    connection.create_table("articles").await;
    for row in rows {
        connection.insert("articles", row).await.unwrap();
    }
    let descriptor = TableDescriptor::new("articles", articles_schema()).with_alias("Articles");
    let table = Table::new(connection.clone(), descriptor);
    (connection, table)
}

async fn active_rows(rows: Vec<(i64, &str)>) -> (Arc<MemoryConnection>, Table) {
    let rows = rows
        .into_iter()
        .map(|(id, title)| article_row(id, title, Value::Null))
        .collect();
    seeded_table(rows).await
}

async fn visible_count(table: &Table, options: QueryOptions) -> usize {
    table.find(options).all().await.unwrap().len()
}

#[tokio::test]
async fn delete_all_tombstones_every_match() {
    let (_connection, table) = active_rows(vec![(1, "a"), (2, "b"), (3, "c")]).await;

    let affected = table.delete_all(ConditionSet::new()).await.unwrap();

    assert_eq!(affected, 3);
    assert_eq!(visible_count(&table, QueryOptions::new()).await, 0);
    assert_eq!(
        visible_count(&table, QueryOptions::new().with_deleted()).await,
        3
    );
}

#[tokio::test]
async fn delete_all_with_no_matches_reports_zero() {
    let (_connection, table) = active_rows(vec![(1, "a")]).await;

    let conditions = ConditionSet::new().and_eq("id", 99_i64);
    assert_eq!(table.delete_all(conditions).await.unwrap(), 0);
    assert_eq!(visible_count(&table, QueryOptions::new()).await, 1);
}

#[tokio::test]
async fn delete_all_bypasses_rules_and_hooks() {
    let (_connection, mut table) = active_rows(vec![(1, "a"), (2, "b")]).await;
    table.add_rule(RuleMode::Delete, |_| false);
    table.on(HookEvent::BeforeDelete, |_| HookOutcome::Halt(false));

    let affected = table.delete_all(ConditionSet::new()).await.unwrap();

    assert_eq!(affected, 2);
    assert_eq!(visible_count(&table, QueryOptions::new()).await, 0);
}

#[tokio::test]
async fn hard_delete_removes_the_row_entirely() {
    let (_connection, table) = active_rows(vec![(1, "a"), (2, "b")]).await;
    let entity = table.get(1_i64, QueryOptions::new()).await.unwrap().unwrap();

    assert!(table.hard_delete(&entity).await.unwrap());

    assert!(table
        .get(1_i64, QueryOptions::new().with_deleted())
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        visible_count(&table, QueryOptions::new().with_deleted()).await,
        1
    );
}

#[tokio::test]
async fn hard_delete_runs_the_soft_delete_gates_first() {
    let (_connection, mut table) = active_rows(vec![(1, "a")]).await;
    table.add_rule(RuleMode::Delete, |_| false);
    let entity = table.get(1_i64, QueryOptions::new()).await.unwrap().unwrap();

    assert!(!table.hard_delete(&entity).await.unwrap());
    assert_eq!(visible_count(&table, QueryOptions::new()).await, 1);
}

#[tokio::test]
async fn hard_delete_all_purges_at_or_before_the_cutoff() {
    let cutoff: DateTime<Utc> = Utc::now();
    let rows = vec![
        article_row(1, "old", Value::Timestamp(cutoff - Duration::hours(2))),
        article_row(2, "edge", Value::Timestamp(cutoff)),
        article_row(3, "recent", Value::Timestamp(cutoff + Duration::hours(1))),
        article_row(4, "active", Value::Null),
    ];
    let (_connection, table) = seeded_table(rows).await;

    let purged = table.hard_delete_all(cutoff).await.unwrap();

    assert_eq!(purged, 2);
    assert_eq!(
        visible_count(&table, QueryOptions::new().with_deleted()).await,
        2
    );
    assert_eq!(visible_count(&table, QueryOptions::new()).await, 1);
}

#[tokio::test]
async fn restore_clears_the_tombstone() {
    let (_connection, table) = active_rows(vec![(1, "a")]).await;
    let entity = table.get(1_i64, QueryOptions::new()).await.unwrap().unwrap();
    assert!(table.delete(&entity, DeleteOptions::default()).await.unwrap());

    let mut stored = table
        .get(1_i64, QueryOptions::new().with_deleted())
        .await
        .unwrap()
        .unwrap();
    assert!(table.restore(&mut stored).await.unwrap());

    assert_eq!(stored.get("deleted"), Some(&Value::Null));
    let revived = table.get(1_i64, QueryOptions::new()).await.unwrap();
    assert!(revived.is_some());
}

#[tokio::test]
async fn restore_rides_on_the_save_path() {
    let (_connection, mut table) = active_rows(vec![(1, "a")]).await;
    let entity = table.get(1_i64, QueryOptions::new()).await.unwrap().unwrap();
    assert!(table.delete(&entity, DeleteOptions::default()).await.unwrap());
    table.on(HookEvent::BeforeSave, |_| HookOutcome::Halt(false));

    let mut stored = table
        .get(1_i64, QueryOptions::new().with_deleted())
        .await
        .unwrap()
        .unwrap();
    assert!(!table.restore(&mut stored).await.unwrap());
    assert!(table.get(1_i64, QueryOptions::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn get_honors_soft_delete_visibility() {
    let (_connection, table) = active_rows(vec![(1, "a"), (2, "b")]).await;
    let entity = table.get(2_i64, QueryOptions::new()).await.unwrap().unwrap();
    assert!(table.delete(&entity, DeleteOptions::default()).await.unwrap());

    assert!(table.get(2_i64, QueryOptions::new()).await.unwrap().is_none());
    assert!(table
        .get(2_i64, QueryOptions::new().with_deleted())
        .await
        .unwrap()
        .is_some());
    assert!(table.get(1_i64, QueryOptions::new()).await.unwrap().is_some());
}

fn comments_schema() -> TableSchema {
    TableSchema::new()
        .column("id", ColumnType::Integer)
        .column("article_id", ColumnType::Integer)
        .column("body", ColumnType::Text)
        .column("deleted", ColumnType::Timestamp)
}

fn comment_row(id: i64, article_id: i64, body: &str) -> Row {
    let mut row = Row::new();
    row.insert("id".to_string(), Value::Integer(id));
    row.insert("article_id".to_string(), Value::Integer(article_id));
    row.insert("body".to_string(), Value::Text(body.to_string()));
    row.insert("deleted".to_string(), Value::Null);
    row
}

#[tokio::test]
async fn cascade_soft_deletes_dependent_children() {
    let connection = Arc::new(MemoryConnection::new());
    connection.create_table("articles").await;
    connection.create_table("comments").await;
    connection
        .insert("articles", article_row(1, "parent", Value::Null))
        .await
        .unwrap();
    for row in [
        comment_row(1, 1, "first"),
        comment_row(2, 1, "second"),
        comment_row(3, 2, "unrelated"),
    ] {
        connection.insert("comments", row).await.unwrap();
    }
    let comments = Arc::new(Table::new(
        connection.clone(),
        TableDescriptor::new("comments", comments_schema()).with_alias("Comments"),
    ));
    let mut articles = Table::new(
        connection.clone(),
        TableDescriptor::new("articles", articles_schema()).with_alias("Articles"),
    );
    articles.add_association(Association {
        foreign_key: "article_id".to_string(),
        bind_key: "id".to_string(),
        dependent: true,
        target: Arc::clone(&comments),
    });

    let entity = articles
        .get(1_i64, QueryOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert!(articles
        .delete(&entity, DeleteOptions::default())
        .await
        .unwrap());

    let remaining = comments.find(QueryOptions::new()).all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].get("id"), Some(&Value::Integer(3)));
    assert_eq!(
        visible_count(&comments, QueryOptions::new().with_deleted()).await,
        3
    );
}

#[tokio::test]
async fn cascade_hard_deletes_children_without_a_tombstone_column() {
    let connection = Arc::new(MemoryConnection::new());
    connection.create_table("articles").await;
    connection.create_table("tags").await;
    connection
        .insert("articles", article_row(1, "parent", Value::Null))
        .await
        .unwrap();
    let tag_schema = TableSchema::new()
        .column("id", ColumnType::Integer)
        .column("article_id", ColumnType::Integer)
        .column("label", ColumnType::Text);
    for (id, article_id, label) in [(1, 1, "rust"), (2, 1, "orm"), (3, 2, "keep")] {
        let mut row = Row::new();
        row.insert("id".to_string(), Value::Integer(id));
        row.insert("article_id".to_string(), Value::Integer(article_id));
        row.insert("label".to_string(), Value::Text(label.to_string()));
        connection.insert("tags", row).await.unwrap();
    }
    let tags = Arc::new(Table::new(
        connection.clone(),
        TableDescriptor::new("tags", tag_schema).with_alias("Tags"),
    ));
    let mut articles = Table::new(
        connection.clone(),
        TableDescriptor::new("articles", articles_schema()).with_alias("Articles"),
    );
    articles.add_association(Association {
        foreign_key: "article_id".to_string(),
        bind_key: "id".to_string(),
        dependent: true,
        target: Arc::clone(&tags),
    });

    let entity = articles
        .get(1_i64, QueryOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert!(articles
        .delete(&entity, DeleteOptions::default())
        .await
        .unwrap());

    // Tables without the column cannot be soft-deleted, so children go away.
    let remaining = tags
        .find(QueryOptions::new().with_deleted())
        .all()
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].get("label"), Some(&Value::Text("keep".to_string())));
}

#[tokio::test]
async fn non_dependent_associations_are_left_alone() {
    let connection = Arc::new(MemoryConnection::new());
    connection.create_table("articles").await;
    connection.create_table("comments").await;
    connection
        .insert("articles", article_row(1, "parent", Value::Null))
        .await
        .unwrap();
    connection
        .insert("comments", comment_row(1, 1, "kept"))
        .await
        .unwrap();
    let comments = Arc::new(Table::new(
        connection.clone(),
        TableDescriptor::new("comments", comments_schema()).with_alias("Comments"),
    ));
    let mut articles = Table::new(
        connection.clone(),
        TableDescriptor::new("articles", articles_schema()).with_alias("Articles"),
    );
    articles.add_association(Association {
        foreign_key: "article_id".to_string(),
        bind_key: "id".to_string(),
        dependent: false,
        target: Arc::clone(&comments),
    });

    let entity = articles
        .get(1_i64, QueryOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert!(articles
        .delete(&entity, DeleteOptions::default())
        .await
        .unwrap());

    assert_eq!(visible_count(&comments, QueryOptions::new()).await, 1);
}
