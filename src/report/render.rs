//! Table and page rendering.

use super::assets::{script_tags, stylesheet_links};
use super::{escape_html, OutputFormat};
use crate::db::Row;
use std::borrow::Cow;

/// Renders query rows as an HTML table, bare or wrapped in a page.
///
/// Holds no mutable state: the same rows and format always give the same bytes.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    title: String,
    escape: bool,
}

impl TableRenderer {
    /// Creates a renderer. A blank title suppresses the heading.
    pub fn new(title: impl Into<String>, escape: bool) -> Self {
        Self {
            title: title.into(),
            escape,
        }
    }

    /// Renders the response body for the requested format.
    pub fn render(&self, rows: &[Row], format: OutputFormat) -> String {
        match format {
            OutputFormat::Raw => self.render_table(rows, format),
            OutputFormat::Html => self.render_page(rows),
        }
    }

    /// Renders the table, inside its titled container for HTML.
    ///
    /// No `<table>` is emitted for an empty result.
    pub fn render_table(&self, rows: &[Row], format: OutputFormat) -> String {
        let table = self.table_markup(rows);

        match format {
            OutputFormat::Raw => table,
            OutputFormat::Html => {
                let title = self.title.trim();
                let heading = if title.is_empty() {
                    String::new()
                } else {
                    format!("<h1>{}</h1>", self.text(title))
                };

                format!(
                    "<div style=\"margin:10px;\">{heading}{table}\
                     <p><strong>Number of records &nbsp;:&nbsp;{}</strong></p></div>",
                    format_count(rows.len())
                )
            }
        }
    }

    /// Renders a complete HTML document around the table.
    pub fn render_page(&self, rows: &[Row]) -> String {
        format!(
            r#"<!DOCTYPE html><html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="robots" content="noindex, nofollow" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<meta http-equiv="content-type" content="text/html; charset=UTF-8" />
<title>{title}</title>
{css}
<style>
#tbl {{margin-left : 0px ;}}
</style>
</head>
<body>
{table}
{js}
</body>
</html>
"#,
            title = self.text(self.title.trim()),
            css = stylesheet_links(),
            table = self.render_table(rows, OutputFormat::Html),
            js = script_tags(),
        )
    }

    fn table_markup(&self, rows: &[Row]) -> String {
        let Some(first) = rows.first() else {
            return String::new();
        };

        // Headers come from the first row; rows are assumed to share its shape
        let mut header = String::new();
        for column in first.columns() {
            header.push_str("<th>");
            header.push_str(&self.text(column));
            header.push_str("</th>");
        }

        let mut table = String::from("<table id=\"tbl\" class=\"display compact nowrap order-column\">");
        table.push_str("<thead><tr>");
        table.push_str(&header);
        table.push_str("</tr></thead>");
        // Repeated in the footer, where the search inputs go
        table.push_str("<tfoot><tr>");
        table.push_str(&header);
        table.push_str("</tr></tfoot>");
        table.push_str("<tbody>");

        for row in rows {
            table.push_str("<tr>");
            for value in row.values() {
                table.push_str("<td>");
                table.push_str(&self.text(&value.to_display_string()));
                table.push_str("</td>");
            }
            table.push_str("</tr>");
        }

        table.push_str("</tbody></table>");
        table
    }

    fn text<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if self.escape {
            Cow::Owned(escape_html(s))
        } else {
            Cow::Borrowed(s)
        }
    }
}

/// Formats a count with comma thousands separators.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
