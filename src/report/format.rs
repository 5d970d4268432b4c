//! Output format selection.

use std::fmt;

/// How the report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Full page with styling and the interactive table widget.
    #[default]
    Html,
    /// Bare table markup, e.g. for spreadsheet imports.
    Raw,
}

impl OutputFormat {
    /// Normalizes a request parameter. Total: anything unrecognised is HTML.
    pub fn normalize(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "RAW" => Self::Raw,
            _ => Self::Html,
        }
    }

    /// Normalizes an optional request parameter; absent means HTML.
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.map(Self::normalize).unwrap_or_default()
    }

    /// Returns the canonical parameter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Raw => "RAW",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}
