//! HTTP surface tests, driving the router in-process.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use show_table::auth::Md5CredentialVerifier;
use show_table::config::DEFAULT_CREDENTIAL_HASH;
use show_table::db::{FailingDatabaseClient, MockDatabaseClient, Row};
use show_table::report::TableRenderer;
use show_table::server::router;
use show_table::service::ReportService;
use std::sync::Arc;
use tower::ServiceExt;

fn app(db: Arc<MockDatabaseClient>) -> Router {
    let service = ReportService::new(
        "SELECT id, name FROM users",
        TableRenderer::new("Users", true),
        db,
        Arc::new(Md5CredentialVerifier::new(DEFAULT_CREDENTIAL_HASH)),
    );
    router(Arc::new(service), "/show_table")
}

fn rows() -> Vec<Row> {
    vec![
        Row::new().with("id", 1).with("name", "A"),
        Row::new().with("id", 2).with("name", "B"),
    ]
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_raw_report_over_http() {
    let db = Arc::new(MockDatabaseClient::with_rows(rows()));
    let (status, content_type, body) =
        get(app(db.clone()), "/show_table?password=Joomla&format=RAW").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    assert!(body.starts_with("<table id=\"tbl\""));
    assert_eq!(db.calls(), 1);
}

#[tokio::test]
async fn test_html_is_default_format() {
    let db = Arc::new(MockDatabaseClient::with_rows(rows()));
    let (status, _, body) = get(app(db), "/show_table?password=Joomla").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("Number of records &nbsp;:&nbsp;2"));
}

#[tokio::test]
async fn test_unknown_format_falls_back_to_html() {
    let db = Arc::new(MockDatabaseClient::with_rows(rows()));
    let (status, _, body) = get(app(db), "/show_table?password=Joomla&format=csv").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html"));
}

#[tokio::test]
async fn test_missing_password_is_forbidden() {
    let db = Arc::new(MockDatabaseClient::with_rows(rows()));
    let (status, content_type, body) = get(app(db.clone()), "/show_table?format=RAW").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    assert!(body.contains("<form action=\"/show_table\" method=\"GET\">"));
    assert_eq!(db.calls(), 0);
}

#[tokio::test]
async fn test_wrong_password_is_forbidden() {
    let db = Arc::new(MockDatabaseClient::with_rows(rows()));
    let (status, _, _) = get(app(db.clone()), "/show_table?password=letmein").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(db.calls(), 0);
}

#[tokio::test]
async fn test_query_failure_is_internal_error() {
    let service = ReportService::new(
        "SELECT id FROM missing",
        TableRenderer::new("Users", true),
        Arc::new(FailingDatabaseClient::new("no such table: missing")),
        Arc::new(Md5CredentialVerifier::new(DEFAULT_CREDENTIAL_HASH)),
    );
    let app = router(Arc::new(service), "/show_table");

    let (status, _, body) = get(app, "/show_table?password=Joomla").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("missing"));
}

#[tokio::test]
async fn test_other_paths_not_found() {
    let db = Arc::new(MockDatabaseClient::with_rows(rows()));
    let (status, _, _) = get(app(db.clone()), "/other?password=Joomla").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(db.calls(), 0);
}
