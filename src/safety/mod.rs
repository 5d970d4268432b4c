//! Query safety classification module.
//!
//! The report runs one configured statement on every request, so it must
//! never change data. The statement is parsed once at startup and refused
//! unless it is read-only.

mod parser;

pub use parser::{classify_sql, ensure_read_only, SqlClassifier};

use std::fmt;

/// Safety level classification for SQL queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyLevel {
    /// Read-only queries (SELECT, EXPLAIN, SHOW).
    Safe,
    /// Data modification queries (INSERT, UPDATE, SELECT ... FOR UPDATE).
    Mutating,
    /// Data loss or schema changes (DELETE, DROP, TRUNCATE, ALTER), and
    /// anything that could not be parsed.
    Destructive,
}

impl SafetyLevel {
    /// Priority value (higher = more dangerous).
    fn priority(&self) -> u8 {
        match self {
            Self::Safe => 0,
            Self::Mutating => 1,
            Self::Destructive => 2,
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Mutating => write!(f, "Mutating"),
            Self::Destructive => write!(f, "Destructive"),
        }
    }
}

/// The type of SQL statement detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Drop,
    Truncate,
    Alter,
    Create,
    Grant,
    Revoke,
    Explain,
    Show,
    /// Multiple statements detected; contains the most dangerous type.
    Multiple(Box<StatementType>),
    /// Statement type could not be determined.
    Unknown,
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Drop => write!(f, "DROP"),
            Self::Truncate => write!(f, "TRUNCATE"),
            Self::Alter => write!(f, "ALTER"),
            Self::Create => write!(f, "CREATE"),
            Self::Grant => write!(f, "GRANT"),
            Self::Revoke => write!(f, "REVOKE"),
            Self::Explain => write!(f, "EXPLAIN"),
            Self::Show => write!(f, "SHOW"),
            Self::Multiple(inner) => write!(f, "Multiple ({})", inner),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result of classifying a SQL query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// The determined safety level.
    pub level: SafetyLevel,
    /// The type of statement(s) detected.
    pub statement_type: StatementType,
    /// Why the statement was classified this way, when not obvious.
    pub reason: Option<String>,
}

impl ClassificationResult {
    /// Creates a new classification result.
    pub fn new(level: SafetyLevel, statement_type: StatementType) -> Self {
        Self {
            level,
            statement_type,
            reason: None,
        }
    }

    /// Creates a classification result with an explanation.
    pub fn with_reason(
        level: SafetyLevel,
        statement_type: StatementType,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            level,
            statement_type,
            reason: Some(reason.into()),
        }
    }

    /// Returns true if the statement only reads data.
    pub fn is_read_only(&self) -> bool {
        self.level == SafetyLevel::Safe
    }
}
