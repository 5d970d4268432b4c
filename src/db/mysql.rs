//! MySQL / MariaDB database client implementation.
//!
//! The host CMS usually runs on MySQL, so this is the default backend.

use super::pool::{connect_pool, with_timeout};
use crate::config::ConnectionConfig;
use crate::db::{DatabaseClient, QueryResult, Row, Value};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo};
use std::time::{Duration, Instant};
use tracing::debug;

/// MySQL database client.
#[derive(Debug)]
pub struct MySqlClient {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlClient {
    /// Connects to the configured MySQL server.
    pub async fn connect(config: &ConnectionConfig, query_timeout: Duration) -> Result<Self> {
        let pool = connect_pool(config, 5).await?;
        Ok(Self {
            pool,
            query_timeout,
        })
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
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

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| {
            (
                col.name().to_string(),
                convert_value(row, i, col.type_info().name()),
            )
        })
        .collect()
}

/// Converts a single column value from a MySqlRow to our Value type.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    let type_name = type_name.to_uppercase();

    match type_name.as_str() {
        "NULL" => Value::Null,

        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or_else(|| text_value(row, index)),

        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row
            .try_get::<Option<u64>, _>(index)
            .ok()
            .flatten()
            .map(|v| i64::try_from(v).map(Value::Int).unwrap_or_else(|_| Value::String(v.to_string())))
            .unwrap_or_else(|| text_value(row, index)),

        "FLOAT" | "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or_else(|| text_value(row, index)),

        "DATETIME" | "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or_else(|| zero_date_value(row, index, &type_name)),

        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.format("%Y-%m-%d").to_string()))
            .unwrap_or_else(|| zero_date_value(row, index, &type_name)),

        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.format("%H:%M:%S").to_string()))
            .unwrap_or(Value::Null),

        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // DECIMAL, text types, ENUM, SET, JSON: all travel as text
        _ => text_value(row, index),
    }
}

/// Recovers MySQL's zero date (`0000-00-00`), which chrono cannot represent.
///
/// Anything else that failed to decode, including a real NULL, stays NULL.
fn zero_date_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    row.try_get_unchecked::<Option<Vec<u8>>, _>(index)
        .ok()
        .flatten()
        .and_then(|raw| format_zero_date(type_name, &raw))
        .map(Value::String)
        .unwrap_or(Value::Null)
}

/// Formats a raw DATE/DATETIME/TIMESTAMP value if it holds the zero date.
///
/// Binary rows carry a length byte followed by year, month and day; a zero
/// date is sent with length 0. Text rows carry the literal.
fn format_zero_date(type_name: &str, raw: &[u8]) -> Option<String> {
    let is_zero = match raw {
        [] => true,
        [len, date @ ..] if usize::from(*len) == date.len() => date.iter().take(4).all(|b| *b == 0),
        text => text.starts_with(b"0000-00-00"),
    };

    if !is_zero {
        return None;
    }

    let formatted = if type_name == "DATE" {
        "0000-00-00"
    } else {
        "0000-00-00 00:00:00"
    };
    Some(formatted.to_string())
}

/// Reads a column as text without type checking.
///
/// MySQL sends DECIMAL and most non-temporal types as strings on the wire.
fn text_value(row: &MySqlRow, index: usize) -> Value {
    row.try_get_unchecked::<Option<String>, _>(index)
        .ok()
        .flatten()
        .map(Value::String)
        .unwrap_or(Value::Null)
}
