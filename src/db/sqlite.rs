//! SQLite database client implementation.
//!
//! Used for local report databases and as an in-process fixture in tests.
//! An in-memory database lives as long as its single pooled connection.

use super::pool::with_timeout;
use crate::config::ConnectionConfig;
use crate::db::{DatabaseClient, QueryResult, Row, Value};
use crate::error::{Result, ShowTableError};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo, ValueRef};
use std::time::{Duration, Instant};
use tracing::debug;

/// SQLite database client.
#[derive(Debug)]
pub struct SqliteClient {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl SqliteClient {
    /// Opens the configured SQLite database.
    pub async fn connect(config: &ConnectionConfig, query_timeout: Duration) -> Result<Self> {
        let conn_str = config.to_connection_string()?;
        let in_memory = conn_str.contains(":memory:");

        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = options.connect(&conn_str).await.map_err(|e| {
            ShowTableError::connection(format!(
                "Cannot open {}: {e}",
                config.display_string()
            ))
        })?;

        debug!("Opened {}", config.display_string());
        Ok(Self {
            pool,
            query_timeout,
        })
    }

    /// Opens a private in-memory database.
    pub async fn in_memory(query_timeout: Duration) -> Result<Self> {
        let config = ConnectionConfig::from_connection_string("sqlite::memory:")?;
        Self::connect(&config, query_timeout).await
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();
        let result = with_timeout(self.query_timeout, sqlx::query(sql).fetch_all(&self.pool)).await?;
        let execution_time = start.elapsed();

        debug!("Query returned {} rows in {:?}", result.len(), execution_time);

        let rows = result.iter().map(convert_row).collect();
        Ok(QueryResult::with_rows(rows).with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| (col.name().to_string(), convert_value(row, i)))
        .collect()
}

/// Converts a single value, dispatching on its storage class.
///
/// SQLite types values, not columns, so the declared column type is ignored.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let storage_class = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match storage_class.as_str() {
        "INTEGER" | "BOOLEAN" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        _ => row
            .try_get_unchecked::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}
