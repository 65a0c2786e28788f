//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use fallow::{
    ColumnType, Connection, MemoryConnection, Row, Table, TableDescriptor, TableSchema, Value,
};

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary; honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        drop(
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init(),
        );
    });
}

pub fn articles_schema() -> TableSchema {
    TableSchema::new()
        .column("id", ColumnType::Integer)
        .column("title", ColumnType::Text)
        .column("deleted", ColumnType::Timestamp)
}

pub fn article_row(id: i64, title: &str, deleted: Value) -> Row {
    let mut row = Row::new();
    row.insert("id".to_string(), Value::Integer(id));
    row.insert("title".to_string(), Value::Text(title.to_string()));
    row.insert("deleted".to_string(), deleted);
    row
}

/// Three active articles behind a fresh in-memory connection.
pub async fn blog_fixture() -> (Arc<MemoryConnection>, Table) {
    init_tracing();
    let connection = Arc::new(MemoryConnection::new());
    connection.create_table("articles").await;
    for (id, title) in [(1, "first"), (2, "second"), (3, "third")] {
        connection
            .insert("articles", article_row(id, title, Value::Null))
            .await
            .expect("seeding cannot fail");
    }
    let descriptor = TableDescriptor::new("articles", articles_schema()).with_alias("Articles");
    let table = Table::new(connection.clone(), descriptor);
    (connection, table)
}
