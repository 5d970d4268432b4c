//! Report rendering: output format selection, table markup and the page shell.

mod assets;
mod format;
mod render;

pub use assets::{script_tags, stylesheet_links, SCRIPTS, STYLESHEETS};
pub use format::OutputFormat;
pub use render::{format_count, TableRenderer};

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
