//! Error types for show-table.
//!
//! Defines the main error enum used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for show-table operations.
#[derive(Error, Debug)]
pub enum ShowTableError {
    /// The submitted credential did not match the stored hash.
    #[error("Authentication failed")]
    Authentication,

    /// The host CMS configuration file could not be found.
    #[error(
        "The file {} can't be found, please review the site root setting to match your website root folder",
        .path.display()
    )]
    ConfigurationMissing { path: PathBuf },

    /// Query execution errors (syntax errors, missing tables, timeouts, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configured report query is not read-only.
    #[error("Unsafe query: {0}")]
    UnsafeQuery(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShowTableError {
    /// Creates a missing-configuration error for the given path.
    pub fn configuration_missing(path: impl Into<PathBuf>) -> Self {
        Self::ConfigurationMissing { path: path.into() }
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an unsafe-query error with the given message.
    pub fn unsafe_query(msg: impl Into<String>) -> Self {
        Self::UnsafeQuery(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication Failure",
            Self::ConfigurationMissing { .. } => "Configuration Missing",
            Self::Query(_) => "Query Error",
            Self::Connection(_) => "Connection Error",
            Self::Config(_) => "Configuration Error",
            Self::UnsafeQuery(_) => "Unsafe Query",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using ShowTableError.
pub type Result<T> = std::result::Result<T, ShowTableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_configuration_missing() {
        let err = ShowTableError::configuration_missing("/var/www/site/configuration.php");
        assert_eq!(
            err.to_string(),
            "The file /var/www/site/configuration.php can't be found, please review the site root setting to match your website root folder"
        );
        assert_eq!(err.category(), "Configuration Missing");
    }

    #[test]
    fn test_error_display_query() {
        let err = ShowTableError::query("Table 'joomla.jos_users' doesn't exist");
        assert_eq!(
            err.to_string(),
            "Query error: Table 'joomla.jos_users' doesn't exist"
        );
        assert_eq!(err.category(), "Query Error");
    }

    #[test]
    fn test_error_display_authentication() {
        let err = ShowTableError::Authentication;
        assert_eq!(err.to_string(), "Authentication failed");
        assert_eq!(err.category(), "Authentication Failure");
    }

    #[test]
    fn test_error_display_config() {
        let err = ShowTableError::config("missing field 'database'");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing field 'database'"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_display_unsafe_query() {
        let err = ShowTableError::unsafe_query("DELETE statements are not allowed");
        assert_eq!(
            err.to_string(),
            "Unsafe query: DELETE statements are not allowed"
        );
        assert_eq!(err.category(), "Unsafe Query");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShowTableError>();
    }
}
