//! Host CMS configuration guard.
//!
//! The report reads from the database of an existing Joomla site. Rather than
//! bootstrapping the CMS, we only require its `configuration.php` to exist and
//! lift the database settings out of it.

use crate::config::ConnectionConfig;
use crate::db::DatabaseBackend;
use crate::error::{Result, ShowTableError};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Name of the CMS configuration file in the site root.
pub const CONFIGURATION_FILE: &str = "configuration.php";

/// Matches `public $name = 'value';` (single or double quoted).
fn assignment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^\s*(?:public|var)\s+\$(\w+)\s*=\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")\s*;"#,
        )
        .expect("assignment regex is valid")
    })
}

/// Returns the expected location of the CMS configuration file.
pub fn configuration_path(root: &Path) -> PathBuf {
    root.join(CONFIGURATION_FILE)
}

/// Settings read from the host CMS configuration file.
#[derive(Debug, Clone, Default)]
pub struct HostConfiguration {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl HostConfiguration {
    /// Loads the configuration file below `root`.
    ///
    /// Fails with `ConfigurationMissing` naming the expected path when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = configuration_path(root);
        if !path.is_file() {
            return Err(ShowTableError::configuration_missing(path));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            ShowTableError::config(format!("Failed to read {}: {e}", path.display()))
        })?;

        let config = Self::parse(&content, path);
        debug!(
            "Read {} settings from {}",
            config.values.len(),
            config.path.display()
        );
        Ok(config)
    }

    /// Parses the property assignments of a configuration file.
    pub fn parse(content: &str, path: PathBuf) -> Self {
        let values = assignment_regex()
            .captures_iter(content)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str().to_string();
                let value = match (caps.get(2), caps.get(3)) {
                    (Some(single), _) => unescape_single_quoted(single.as_str()),
                    (None, Some(double)) => unescape_double_quoted(double.as_str()),
                    (None, None) => return None,
                };
                Some((name, value))
            })
            .collect();

        Self { path, values }
    }

    /// Path the configuration was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a raw setting.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Builds the database connection described by the CMS configuration.
    pub fn connection_config(&self) -> Result<ConnectionConfig> {
        let backend = match self.get("dbtype").unwrap_or("mysqli").to_lowercase().as_str() {
            "mysql" | "mysqli" | "pdomysql" => DatabaseBackend::MySql,
            "pgsql" | "postgresql" => DatabaseBackend::Postgres,
            other => {
                return Err(ShowTableError::config(format!(
                    "Unsupported database type '{other}' in {}",
                    self.path.display()
                )))
            }
        };

        let (host, port) = match self.get("host") {
            Some(raw) => split_host(raw),
            None => (None, None),
        };

        Ok(ConnectionConfig {
            backend,
            host,
            port,
            database: non_empty(self.get("db")),
            user: non_empty(self.get("user")),
            password: non_empty(self.get("password")),
            table_prefix: self.get("dbprefix").unwrap_or_default().to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

/// Splits `host[:port]`, dropping the mysqli persistent-connection marker `p:`.
fn split_host(raw: &str) -> (Option<String>, Option<u16>) {
    let raw = raw.strip_prefix("p:").unwrap_or(raw);
    if raw.is_empty() {
        return (None, None);
    }

    match raw.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (Some(host.to_string()), Some(port)),
            // host:/path/to/socket - keep the host, ignore the socket
            Err(_) => (Some(host.to_string()), None),
        },
        None => (Some(raw.to_string()), None),
    }
}

/// Undoes the escapes of a PHP single-quoted literal: only `\\` and `\'`.
fn unescape_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next)) if next == '\\' || next == '\'' => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Undoes the common escapes of a PHP double-quoted literal.
///
/// Unknown sequences keep their backslash, as PHP does.
fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let unescaped = match chars.peek() {
            Some('\\') => '\\',
            Some('"') => '"',
            Some('$') => '$',
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            _ => {
                out.push(c);
                continue;
            }
        };
        out.push(unescaped);
        chars.next();
    }
    out
}
