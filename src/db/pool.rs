//! Connection pooling and error mapping shared by the sqlx-backed clients.

use crate::config::ConnectionConfig;
use crate::error::{Result, ShowTableError};
use sqlx::pool::{Pool, PoolOptions};
use sqlx::Database;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of connection retry attempts.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay between retry attempts (doubles each retry).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Opens a pool, retrying transient failures with exponential backoff.
pub(crate) async fn connect_pool<DB: Database>(
    config: &ConnectionConfig,
    max_connections: u32,
) -> Result<Pool<DB>> {
    let conn_str = config.to_connection_string()?;

    let mut last_error = None;
    let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);

    for attempt in 1..=MAX_RETRY_ATTEMPTS {
        debug!("Connection attempt {} of {}", attempt, MAX_RETRY_ATTEMPTS);

        let result = PoolOptions::<DB>::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&conn_str)
            .await;

        match result {
            Ok(pool) => {
                debug!("Connected to {}", config.display_string());
                return Ok(pool);
            }
            Err(e) => {
                let is_transient = is_transient_error(&e);
                last_error = Some(e);

                if attempt < MAX_RETRY_ATTEMPTS && is_transient {
                    warn!(
                        "Connection attempt {} failed (transient error), retrying in {:?}",
                        attempt, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2; // Exponential backoff
                } else {
                    break;
                }
            }
        }
    }

    Err(match last_error {
        Some(e) => map_connection_error(e, config),
        None => ShowTableError::connection("No connection attempt was made"),
    })
}

/// Runs a query future under the configured timeout.
pub(crate) async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| {
            ShowTableError::query(format!(
                "Query timed out after {} seconds",
                timeout.as_secs()
            ))
        })?
        .map_err(|e| ShowTableError::query(format_query_error(&e)))
}

/// Determines if an error is transient and worth retrying.
fn is_transient_error(error: &sqlx::Error) -> bool {
    if matches!(error, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) {
        return true;
    }

    let error_str = error.to_string().to_lowercase();

    // Authentication and database-not-found errors are not transient
    if error_str.contains("access denied")
        || error_str.contains("authentication failed")
        || error_str.contains("does not exist")
        || error_str.contains("unknown database")
    {
        return false;
    }

    error_str.contains("connection refused")
        || error_str.contains("timed out")
        || error_str.contains("temporarily unavailable")
        || error_str.contains("connection reset")
        || error_str.contains("broken pipe")
}

/// Maps sqlx connection errors to operator-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> ShowTableError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.port();
    let user = config.user.as_deref().unwrap_or("unknown");
    let database = config.database.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        ShowTableError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("access denied") || error_str.contains("authentication failed") {
        ShowTableError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("unknown database")
        || (error_str.contains("does not exist") && error_str.contains("database"))
    {
        ShowTableError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        ShowTableError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        ShowTableError::connection(error.to_string())
    }
}

/// Formats a query error, keeping the database's own message and code.
fn format_query_error(error: &sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => match db_error.code() {
            Some(code) => format!("ERROR {code}: {}", db_error.message()),
            None => format!("ERROR: {}", db_error.message()),
        },
        None => error.to_string(),
    }
}
