//! SQL parsing and classification logic.
//!
//! Uses sqlparser-rs with the backend's dialect to parse SQL and classify
//! statements by their safety level. Statements the backend dialect rejects
//! get a second chance with the generic dialect, which is more lenient about
//! MySQL-isms such as parenthesised single tables.

use sqlparser::ast::{Query, Select, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::{Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;

use crate::db::DatabaseBackend;
use crate::error::{Result, ShowTableError};

use super::{ClassificationResult, SafetyLevel, StatementType};

/// SQL classifier that parses and classifies SQL queries.
#[derive(Debug)]
pub struct SqlClassifier {
    backend: DatabaseBackend,
}

impl Default for SqlClassifier {
    fn default() -> Self {
        Self::new(DatabaseBackend::default())
    }
}

impl SqlClassifier {
    /// Creates a classifier for the given backend's SQL dialect.
    pub fn new(backend: DatabaseBackend) -> Self {
        Self { backend }
    }

    fn dialect(&self) -> Box<dyn Dialect> {
        match self.backend {
            DatabaseBackend::MySql => Box::new(MySqlDialect {}),
            DatabaseBackend::Postgres => Box::new(PostgreSqlDialect {}),
            DatabaseBackend::Sqlite => Box::new(SQLiteDialect {}),
        }
    }

    /// Classifies a SQL string and returns the classification result.
    ///
    /// If the SQL cannot be parsed, it is treated as destructive.
    pub fn classify(&self, sql: &str) -> ClassificationResult {
        let parsed = Parser::parse_sql(self.dialect().as_ref(), sql)
            .or_else(|_| Parser::parse_sql(&GenericDialect {}, sql));

        match parsed {
            Ok(statements) => classify_statements(&statements),
            Err(e) => ClassificationResult::with_reason(
                SafetyLevel::Destructive,
                StatementType::Unknown,
                format!("Could not parse SQL: {e}"),
            ),
        }
    }
}

/// Convenience function to classify SQL without creating a classifier instance.
pub fn classify_sql(sql: &str, backend: DatabaseBackend) -> ClassificationResult {
    SqlClassifier::new(backend).classify(sql)
}

/// Fails unless the SQL is a read-only statement.
pub fn ensure_read_only(sql: &str, backend: DatabaseBackend) -> Result<()> {
    let result = classify_sql(sql, backend);
    if result.is_read_only() {
        return Ok(());
    }

    let mut message = format!(
        "{} statement classified as {}",
        result.statement_type, result.level
    );
    if let Some(reason) = result.reason {
        message.push_str(": ");
        message.push_str(&reason);
    }
    Err(ShowTableError::unsafe_query(message))
}

fn classify_statements(statements: &[Statement]) -> ClassificationResult {
    if statements.is_empty() {
        return ClassificationResult::with_reason(
            SafetyLevel::Destructive,
            StatementType::Unknown,
            "Empty SQL statement",
        );
    }

    if statements.len() == 1 {
        let (level, stmt_type) = classify_statement(&statements[0]);
        return ClassificationResult::new(level, stmt_type);
    }

    // Multiple statements: use the most dangerous classification
    let (level, stmt_type) = statements
        .iter()
        .map(classify_statement)
        .fold((SafetyLevel::Safe, StatementType::Select), max_classification);

    let level = if level == SafetyLevel::Safe {
        SafetyLevel::Mutating
    } else {
        level
    };

    ClassificationResult::with_reason(
        level,
        StatementType::Multiple(Box::new(stmt_type)),
        "The report runs a single statement",
    )
}

/// Keeps the more dangerous of two classifications (the first on ties).
fn max_classification(
    current: (SafetyLevel, StatementType),
    candidate: (SafetyLevel, StatementType),
) -> (SafetyLevel, StatementType) {
    if candidate.0.priority() > current.0.priority() {
        candidate
    } else {
        current
    }
}

/// Classifies a single parsed statement.
fn classify_statement(statement: &Statement) -> (SafetyLevel, StatementType) {
    match statement {
        // Query: may contain data-modifying CTEs, so recurse
        Statement::Query(query) => classify_query(query),
        Statement::Explain {
            analyze, statement, ..
        } => {
            if *analyze {
                // EXPLAIN ANALYZE executes the query - inherit inner statement's safety level
                let (inner_level, _) = classify_statement(statement);
                (inner_level, StatementType::Explain)
            } else {
                (SafetyLevel::Safe, StatementType::Explain)
            }
        }
        Statement::ShowVariable { .. }
        | Statement::ShowTables { .. }
        | Statement::ShowColumns { .. }
        | Statement::ShowCreate { .. }
        | Statement::ShowFunctions { .. }
        | Statement::ShowStatus { .. }
        | Statement::ShowCollation { .. } => (SafetyLevel::Safe, StatementType::Show),

        // Mutating: data modification
        Statement::Insert(_) => (SafetyLevel::Mutating, StatementType::Insert),
        Statement::Update { .. } => (SafetyLevel::Mutating, StatementType::Update),

        // Destructive: data loss or schema changes
        Statement::Delete(_) => (SafetyLevel::Destructive, StatementType::Delete),
        Statement::Drop { .. } => (SafetyLevel::Destructive, StatementType::Drop),
        Statement::Truncate { .. } => (SafetyLevel::Destructive, StatementType::Truncate),
        Statement::AlterTable { .. }
        | Statement::AlterIndex { .. }
        | Statement::AlterView { .. }
        | Statement::AlterRole { .. } => (SafetyLevel::Destructive, StatementType::Alter),
        Statement::CreateTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. }
        | Statement::CreateSchema { .. }
        | Statement::CreateDatabase { .. }
        | Statement::CreateFunction { .. }
        | Statement::CreateProcedure { .. }
        | Statement::CreateRole { .. } => (SafetyLevel::Destructive, StatementType::Create),
        Statement::Grant { .. } => (SafetyLevel::Destructive, StatementType::Grant),
        Statement::Revoke { .. } => (SafetyLevel::Destructive, StatementType::Revoke),

        // Conservative default: treat unknown statements as destructive
        _ => (SafetyLevel::Destructive, StatementType::Unknown),
    }
}

/// Classifies a Query by recursively inspecting for data-modifying operations.
fn classify_query(query: &Query) -> (SafetyLevel, StatementType) {
    let mut result = (SafetyLevel::Safe, StatementType::Select);

    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            result = max_classification(result, classify_query(&cte.query));
        }
    }

    result = max_classification(result, classify_set_expr(&query.body));

    // SELECT ... FOR UPDATE / FOR SHARE takes row locks
    if !query.locks.is_empty() {
        result = max_classification(result, (SafetyLevel::Mutating, StatementType::Select));
    }

    result
}

/// Classifies a SetExpr, detecting mutations and recursing into nested queries.
fn classify_set_expr(set_expr: &SetExpr) -> (SafetyLevel, StatementType) {
    match set_expr {
        SetExpr::Select(select) => classify_select(select),
        SetExpr::Query(query) => classify_query(query),
        SetExpr::SetOperation { left, right, .. } => {
            max_classification(classify_set_expr(left), classify_set_expr(right))
        }
        SetExpr::Values(_) | SetExpr::Table(_) => (SafetyLevel::Safe, StatementType::Select),
        // Data-modifying CTE bodies (INSERT/UPDATE/DELETE ... RETURNING)
        SetExpr::Insert(stmt) | SetExpr::Update(stmt) => classify_statement(stmt),
        #[allow(unreachable_patterns)]
        _ => (SafetyLevel::Destructive, StatementType::Unknown),
    }
}

/// Classifies a Select by checking SELECT INTO and its FROM clause.
fn classify_select(select: &Select) -> (SafetyLevel, StatementType) {
    // SELECT ... INTO creates a table (PostgreSQL) or writes a file (MySQL)
    if select.into.is_some() {
        return (SafetyLevel::Mutating, StatementType::Create);
    }

    select
        .from
        .iter()
        .map(classify_table_with_joins)
        .fold((SafetyLevel::Safe, StatementType::Select), max_classification)
}

/// Classifies a TableWithJoins, checking the main relation and all joins.
fn classify_table_with_joins(twj: &TableWithJoins) -> (SafetyLevel, StatementType) {
    twj.joins
        .iter()
        .map(|join| classify_table_factor(&join.relation))
        .fold(classify_table_factor(&twj.relation), max_classification)
}

/// Classifies a TableFactor, recursing into derived tables (subqueries).
fn classify_table_factor(factor: &TableFactor) -> (SafetyLevel, StatementType) {
    match factor {
        TableFactor::Derived { subquery, .. } => classify_query(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => classify_table_with_joins(table_with_joins),
        // Other variants (Table, TableFunction, etc.) are safe
        _ => (SafetyLevel::Safe, StatementType::Select),
    }
}
