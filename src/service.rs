//! The report request flow: check access, run the query, render.
//!
//! `ReportService` is transport-agnostic. It takes the request parameters and
//! hands back a status and body; the HTTP layer only adapts types.

use crate::auth::{login_form, CredentialVerifier, Md5CredentialVerifier};
use crate::config::{ConnectionConfig, ReportConfig};
use crate::db::{replace_prefix, DatabaseClient, Row};
use crate::error::{Result, ShowTableError};
use crate::report::{escape_html, OutputFormat, TableRenderer};
use crate::safety::ensure_read_only;
use axum::http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Body returned when the query fails.
pub const FAILURE_MESSAGE: &str = "The report could not be generated.";

/// Query-string parameters of a report request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParams {
    /// Plain password; absent is treated as empty.
    pub password: Option<String>,
    /// `HTML` or `RAW`, case-insensitive.
    pub format: Option<String>,
}

impl ReportParams {
    /// Creates parameters with the given password and format.
    pub fn new(password: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            format: Some(format.into()),
        }
    }
}

/// Outcome of a report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ReportResponse {
    fn ok(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    fn forbidden(body: String) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            body,
        }
    }

    fn failure(body: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body,
        }
    }
}

/// Serves the report for one fixed, read-only query.
pub struct ReportService {
    sql: String,
    renderer: TableRenderer,
    db: Arc<dyn DatabaseClient>,
    verifier: Arc<dyn CredentialVerifier>,
    debug: bool,
}

impl ReportService {
    /// Creates a service running `sql` as given.
    pub fn new(
        sql: impl Into<String>,
        renderer: TableRenderer,
        db: Arc<dyn DatabaseClient>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            sql: sql.into(),
            renderer,
            db,
            verifier,
            debug: false,
        }
    }

    /// Includes error detail in failure responses.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builds the service from configuration.
    ///
    /// The table prefix is substituted into the query, which must then be
    /// read-only for the connection's SQL dialect.
    pub fn from_config(
        report: &ReportConfig,
        connection: &ConnectionConfig,
        db: Arc<dyn DatabaseClient>,
    ) -> Result<Self> {
        let sql = replace_prefix(&report.query, &connection.table_prefix);
        ensure_read_only(&sql, connection.backend)?;
        debug!("Report query: {}", sql);

        let renderer = TableRenderer::new(report.title.clone(), report.escape_html);
        let verifier = Arc::new(Md5CredentialVerifier::new(&report.credential_hash));

        Ok(Self::new(sql, renderer, db, verifier).with_debug(report.debug))
    }

    /// The SQL run for every request.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Handles one request. `action` is the path the login form submits to.
    ///
    /// The query only runs once the credential has been accepted.
    pub async fn handle(&self, params: &ReportParams, action: &str) -> ReportResponse {
        let credential = params.password.as_deref().unwrap_or_default();
        if !self.verifier.verify(credential) {
            let e = ShowTableError::Authentication;
            warn!("{}: {}", e.category(), e);
            return ReportResponse::forbidden(login_form(action));
        }

        let format = OutputFormat::from_param(params.format.as_deref());
        match self.fetch_rows().await {
            Ok(rows) => ReportResponse::ok(self.renderer.render(&rows, format)),
            Err(e) => {
                error!("{}: {}", e.category(), e);
                ReportResponse::failure(self.failure_body(&e))
            }
        }
    }

    /// Renders the report without a credential check, for local use.
    pub async fn render(&self, format: OutputFormat) -> Result<String> {
        let rows = self.fetch_rows().await?;
        Ok(self.renderer.render(&rows, format))
    }

    async fn fetch_rows(&self) -> Result<Vec<Row>> {
        let result = self.db.execute_query(&self.sql).await?;
        info!(
            "Report query returned {} rows in {:?}",
            result.row_count(),
            result.execution_time
        );
        Ok(result.rows)
    }

    fn failure_body(&self, error: &ShowTableError) -> String {
        if self.debug {
            format!(
                "<p>{FAILURE_MESSAGE}</p><pre>{}</pre>",
                escape_html(&error.to_string())
            )
        } else {
            format!("<p>{FAILURE_MESSAGE}</p>")
        }
    }
}
