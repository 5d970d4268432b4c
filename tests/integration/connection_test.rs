//! Connection integration tests.
//!
//! Tests database connectivity through the backend factory.

use show_table::config::ConnectionConfig;
use show_table::db::{connect, DatabaseBackend, Value};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(10);

/// Helper to get a live database configuration from the environment.
fn get_test_config() -> Option<ConnectionConfig> {
    let url = std::env::var("DATABASE_URL").ok()?;
    ConnectionConfig::from_connection_string(&url).ok()
}

#[tokio::test]
async fn test_connect_with_valid_credentials() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let client = connect(&config, TIMEOUT).await.unwrap();
    let result = client
        .execute_query("SELECT 1 AS num, 'hello' AS greeting")
        .await
        .unwrap();

    assert_eq!(result.row_count(), 1);
    assert_eq!(
        result.rows[0].columns().collect::<Vec<_>>(),
        vec!["num", "greeting"]
    );
    assert_eq!(result.rows[0].get("greeting"), Some(&Value::from("hello")));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_connect_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.db");
    std::fs::File::create(&path).unwrap();

    let config = ConnectionConfig {
        backend: DatabaseBackend::Sqlite,
        database: Some(path.display().to_string()),
        ..Default::default()
    };

    let client = connect(&config, TIMEOUT).await.unwrap();
    client
        .execute_query("CREATE TABLE t (id INTEGER)")
        .await
        .unwrap();
    client
        .execute_query("INSERT INTO t VALUES (1), (2)")
        .await
        .unwrap();

    let result = client.execute_query("SELECT id FROM t").await.unwrap();
    assert_eq!(result.row_count(), 2);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_connect_sqlite_missing_directory() {
    let config = ConnectionConfig {
        backend: DatabaseBackend::Sqlite,
        database: Some("/nonexistent/show-table/report.db".to_string()),
        ..Default::default()
    };

    let result = connect(&config, TIMEOUT).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_connect_requires_database() {
    let config = ConnectionConfig::default();
    let result = connect(&config, TIMEOUT).await;

    let error = result.err().unwrap();
    assert!(error.to_string().contains("Database name is required"));
}
