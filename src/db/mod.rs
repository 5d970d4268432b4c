//! Database abstraction layer for show-table.
//!
//! Provides a trait-based interface for running the report query, allowing
//! different database backends (and test doubles) to be used interchangeably.

mod mock;
mod mysql;
mod pool;
mod postgres;
mod sqlite;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use mysql::MySqlClient;
pub use postgres::PostgresClient;
pub use sqlite::SqliteClient;
pub use types::{QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Placeholder the host CMS uses for its table prefix.
pub const TABLE_PREFIX_PLACEHOLDER: &str = "#__";

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    #[serde(alias = "mariadb")]
    MySql,
    #[serde(alias = "postgresql")]
    Postgres,
    Sqlite,
}

impl DatabaseBackend {
    /// Returns the backend as a string for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::MySql),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Returns the default port for this backend.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::MySql => 3306,
            Self::Postgres => 5432,
            Self::Sqlite => 0,
        }
    }

    /// Returns the URL scheme for this backend.
    pub fn url_scheme(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Creates a database client for the given backend and configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(
    config: &ConnectionConfig,
    query_timeout: Duration,
) -> Result<Box<dyn DatabaseClient>> {
    match config.backend {
        DatabaseBackend::MySql => Ok(Box::new(MySqlClient::connect(config, query_timeout).await?)),
        DatabaseBackend::Postgres => {
            Ok(Box::new(PostgresClient::connect(config, query_timeout).await?))
        }
        DatabaseBackend::Sqlite => Ok(Box::new(SqliteClient::connect(config, query_timeout).await?)),
    }
}

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with ShowTableError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL query and returns the resulting rows.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}

/// Replaces the `#__` placeholder with the table prefix.
///
/// Placeholders inside single- or double-quoted string literals are left
/// alone; backquoted identifiers are rewritten.
pub fn replace_prefix(sql: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(sql.len() + prefix.len() * 4);
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut rest = sql;

    while let Some(c) = rest.chars().next() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => {
                if rest.starts_with(TABLE_PREFIX_PLACEHOLDER) {
                    out.push_str(prefix);
                    rest = &rest[TABLE_PREFIX_PLACEHOLDER.len()..];
                    continue;
                }
                if c == '\'' || c == '"' {
                    quote = Some(c);
                }
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}
