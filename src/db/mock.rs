//! Mock database clients for testing.
//!
//! `MockDatabaseClient` returns a fixed set of rows and counts how often it was
//! asked; `FailingDatabaseClient` fails every query.

use super::{DatabaseClient, QueryResult, Row};
use crate::error::{Result, ShowTableError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A mock database client that returns predefined rows.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    rows: Vec<Row>,
    calls: AtomicUsize,
    last_sql: Mutex<Option<String>>,
}

impl MockDatabaseClient {
    /// Creates a new mock database client that returns no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new mock database client returning the given rows.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Number of queries executed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recently executed SQL, if any.
    pub fn last_sql(&self) -> Option<String> {
        self.last_sql.lock().ok().and_then(|sql| sql.clone())
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_sql.lock() {
            *last = Some(sql.to_string());
        }

        Ok(QueryResult::with_rows(self.rows.clone()).with_execution_time(Duration::from_millis(1)))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A mock database client whose queries always fail.
#[derive(Debug)]
pub struct FailingDatabaseClient {
    message: String,
    calls: AtomicUsize,
}

impl FailingDatabaseClient {
    /// Creates a client failing with the given database message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of queries attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ShowTableError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
