//! Report flow tests against the mock database client.

use pretty_assertions::assert_eq;
use show_table::auth::Md5CredentialVerifier;
use show_table::config::{ConnectionConfig, ReportConfig, DEFAULT_CREDENTIAL_HASH};
use show_table::db::{FailingDatabaseClient, MockDatabaseClient, Row, Value};
use show_table::report::{OutputFormat, TableRenderer};
use show_table::service::{ReportParams, ReportService, FAILURE_MESSAGE};
use std::sync::Arc;

const ACTION: &str = "/show_table";

fn fixture_rows() -> Vec<Row> {
    vec![
        Row::new()
            .with("UserID", 42)
            .with("Name", "Super User")
            .with("GroupTitle", "Super Users"),
        Row::new()
            .with("UserID", 43)
            .with("Name", "Jane Doe")
            .with("GroupTitle", "Registered"),
        Row::new()
            .with("UserID", 44)
            .with("Name", "John Roe")
            .with("GroupTitle", Value::Null),
    ]
}

fn service(db: Arc<MockDatabaseClient>) -> ReportService {
    ReportService::new(
        "SELECT UserID, Name, GroupTitle FROM users",
        TableRenderer::new("Example of Show_Table", true),
        db,
        Arc::new(Md5CredentialVerifier::new(DEFAULT_CREDENTIAL_HASH)),
    )
}

#[tokio::test]
async fn test_raw_report_with_three_rows() {
    let db = Arc::new(MockDatabaseClient::with_rows(fixture_rows()));
    let service = service(db.clone());

    let response = service
        .handle(&ReportParams::new("Joomla", "RAW"), ACTION)
        .await;

    assert_eq!(response.status.as_u16(), 200);
    let body = &response.body;
    assert_eq!(body.matches("<thead>").count(), 1);
    assert_eq!(body.matches("<tfoot>").count(), 1);
    assert_eq!(body.matches("<td>").count(), 9);
    assert!(body.contains("<thead><tr><th>UserID</th><th>Name</th><th>GroupTitle</th></tr></thead>"));
    assert!(!body.contains("<html"));
    assert!(!body.contains("<script"));
    assert!(!body.contains("Number of records"));
    assert_eq!(db.calls(), 1);
}

#[tokio::test]
async fn test_html_report_wraps_table_in_page() {
    let db = Arc::new(MockDatabaseClient::with_rows(fixture_rows()));
    let response = service(db)
        .handle(&ReportParams::new("Joomla", "html"), ACTION)
        .await;

    assert_eq!(response.status.as_u16(), 200);
    let body = &response.body;
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("<title>Example of Show_Table</title>"));
    assert!(body.contains("<h1>Example of Show_Table</h1>"));
    assert!(body.contains("Number of records &nbsp;:&nbsp;3"));
    assert!(body.contains("jquery.dataTables.min.js"));
}

#[tokio::test]
async fn test_failed_credential_never_runs_query() {
    let db = Arc::new(MockDatabaseClient::with_rows(fixture_rows()));
    let service = service(db.clone());

    let response = service
        .handle(&ReportParams::new("joomla", "RAW"), ACTION)
        .await;

    assert_eq!(response.status.as_u16(), 403);
    assert!(response.body.contains("name=\"password\""));
    assert!(!response.body.contains("<table"));
    assert_eq!(db.calls(), 0);
}

#[tokio::test]
async fn test_empty_result() {
    let db = Arc::new(MockDatabaseClient::new());
    let service = service(db);

    let raw = service
        .handle(&ReportParams::new("Joomla", "RAW"), ACTION)
        .await;
    assert_eq!(raw.status.as_u16(), 200);
    assert!(!raw.body.contains("<table"));

    let html = service
        .handle(&ReportParams::new("Joomla", "HTML"), ACTION)
        .await;
    assert!(!html.body.contains("<table"));
    assert!(html.body.contains("<h1>Example of Show_Table</h1>"));
    assert!(html.body.contains("Number of records &nbsp;:&nbsp;0"));
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let db = Arc::new(MockDatabaseClient::with_rows(fixture_rows()));
    let service = service(db.clone());

    for format in ["HTML", "RAW"] {
        let params = ReportParams::new("Joomla", format);
        let first = service.handle(&params, ACTION).await;
        let second = service.handle(&params, ACTION).await;
        assert_eq!(first, second);
    }
    assert_eq!(db.calls(), 4);
}

#[tokio::test]
async fn test_query_failure_is_generic() {
    let db = Arc::new(FailingDatabaseClient::new(
        "Unknown column 'U.lastvisitDate' in 'field list'",
    ));
    let service = ReportService::new(
        "SELECT 1",
        TableRenderer::new("", true),
        db.clone(),
        Arc::new(Md5CredentialVerifier::new(DEFAULT_CREDENTIAL_HASH)),
    );

    let response = service
        .handle(&ReportParams::new("Joomla", "RAW"), ACTION)
        .await;

    assert_eq!(response.status.as_u16(), 500);
    assert_eq!(response.body, format!("<p>{FAILURE_MESSAGE}</p>"));
    assert_eq!(db.calls(), 1);
}

#[tokio::test]
async fn test_default_query_gets_table_prefix() {
    let db = Arc::new(MockDatabaseClient::new());
    let connection = ConnectionConfig {
        table_prefix: "jos_".to_string(),
        ..Default::default()
    };

    let service =
        ReportService::from_config(&ReportConfig::default(), &connection, db.clone()).unwrap();
    service.render(OutputFormat::Raw).await.unwrap();

    let sql = db.last_sql().unwrap();
    assert!(sql.contains("FROM `jos_users` U"));
    assert!(sql.contains("`jos_user_usergroup_map`"));
    assert!(sql.contains("`jos_usergroups`"));
    assert!(!sql.contains("#__"));
}
