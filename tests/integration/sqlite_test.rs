//! End-to-end report tests against an in-memory SQLite database.
//!
//! The fixture mirrors the CMS user tables the default report reads.

use show_table::config::{ConnectionConfig, ReportConfig};
use show_table::db::{DatabaseClient, SqliteClient};
use show_table::report::OutputFormat;
use show_table::service::{ReportParams, ReportService};
use std::sync::Arc;
use std::time::Duration;

const SCHEMA: &[&str] = &[
    "CREATE TABLE jos_users (id INTEGER PRIMARY KEY, name TEXT, username TEXT, email TEXT, \
     registerDate TEXT, lastvisitDate TEXT)",
    "CREATE TABLE jos_usergroups (id INTEGER PRIMARY KEY, title TEXT)",
    "CREATE TABLE jos_user_usergroup_map (user_id INTEGER, group_id INTEGER)",
    "INSERT INTO jos_users VALUES \
     (1, 'Super User', 'admin', 'admin@example.com', '2020-01-01 10:00:00', '2020-06-01 08:00:00'), \
     (2, 'Jane Doe', 'jane', 'jane@example.com', '2020-03-01 09:30:00', NULL), \
     (3, 'John <Roe>', 'john', 'john@example.com', '2020-02-01 12:00:00', NULL)",
    "INSERT INTO jos_usergroups VALUES (8, 'Super Users'), (2, 'Registered')",
    "INSERT INTO jos_user_usergroup_map VALUES (1, 8), (2, 2), (3, 2)",
];

fn sqlite_connection() -> ConnectionConfig {
    ConnectionConfig {
        table_prefix: "jos_".to_string(),
        ..ConnectionConfig::from_connection_string("sqlite::memory:").unwrap()
    }
}

async fn seeded_client() -> Arc<SqliteClient> {
    let client = SqliteClient::in_memory(Duration::from_secs(5)).await.unwrap();
    for statement in SCHEMA {
        client.execute_query(statement).await.unwrap();
    }
    Arc::new(client)
}

// SQLite accepts the backquoted identifiers of the default MySQL query.
async fn default_report() -> (Arc<SqliteClient>, ReportService) {
    let db = seeded_client().await;
    let service =
        ReportService::from_config(&ReportConfig::default(), &sqlite_connection(), db.clone())
            .unwrap();
    (db, service)
}

#[tokio::test]
async fn test_default_report_raw() {
    let (db, service) = default_report().await;

    let response = service
        .handle(&ReportParams::new("Joomla", "raw"), "/show_table")
        .await;

    assert_eq!(response.status.as_u16(), 200);
    let body = &response.body;
    assert!(body.contains(
        "<thead><tr><th>UserID</th><th>Name</th><th>UserName</th><th>eMail</th>\
         <th>RegisterDate</th><th>LastVisitDate</th><th>GroupTitle</th></tr></thead>"
    ));
    assert_eq!(body.matches("<tr>").count(), 2 + 3);
    assert!(!body.contains("<html"));
    assert!(!body.contains("<script"));

    // Newest registration first
    let jane = body.find("Jane Doe").unwrap();
    let john = body.find("John &lt;Roe&gt;").unwrap();
    let admin = body.find("Super User<").unwrap();
    assert!(jane < john && john < admin);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_default_report_html() {
    let (db, service) = default_report().await;

    let body = service.render(OutputFormat::Html).await.unwrap();

    assert!(body.contains("<h1>Example of Show_Table</h1>"));
    assert!(body.contains("Number of records &nbsp;:&nbsp;3"));
    assert!(body.contains("<td>Registered</td>"));
    // NULL last visit renders as an empty cell
    assert!(body.contains("<td>2020-03-01 09:30:00</td><td></td>"));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_custom_query_without_rows() {
    let db = seeded_client().await;
    let report = ReportConfig {
        query: "SELECT id, name FROM `#__users` WHERE id > 100".to_string(),
        ..Default::default()
    };
    let service = ReportService::from_config(&report, &sqlite_connection(), db.clone()).unwrap();

    let raw = service.render(OutputFormat::Raw).await.unwrap();
    assert!(raw.is_empty());

    let html = service.render(OutputFormat::Html).await.unwrap();
    assert!(html.contains("Number of records &nbsp;:&nbsp;0"));
    assert!(!html.contains("<table"));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_missing_table_is_server_error() {
    let db = Arc::new(SqliteClient::in_memory(Duration::from_secs(5)).await.unwrap());
    let service =
        ReportService::from_config(&ReportConfig::default(), &sqlite_connection(), db.clone())
            .unwrap();

    let response = service
        .handle(&ReportParams::new("Joomla", "HTML"), "/show_table")
        .await;

    assert_eq!(response.status.as_u16(), 500);
    assert!(!response.body.contains("jos_users"));

    db.close().await.unwrap();
}
