//! `<table>` markup builder.
//!
//! Cell text is written verbatim unless [`MarkupOptions::escape_cells`] is
//! set, so untrusted input can inject markup into the page.

use crate::reader::Table;

const LINK_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Per-cell transformation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupOptions {
    pub detect_links: bool,
    pub escape_cells: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            detect_links: true,
            escape_cells: false,
        }
    }
}

/// Build the table fragment. Rows and cells keep input order.
pub fn build_table(table: &Table, options: &MarkupOptions) -> String {
    let mut html = String::with_capacity(estimate_len(table));

    html.push_str("<table>");
    if let Some(header) = &table.header {
        html.push_str("<thead>");
        for cell in header {
            html.push_str("<th><span class=\"header-cell-content\">");
            push_text(&mut html, cell, options.escape_cells);
            html.push_str("</span></th>");
        }
        html.push_str("</thead>");
    }

    html.push_str("<tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&render_cell(cell, options));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody>");
    html.push_str("</table>");

    html
}

/// Render one data cell's contents.
///
/// The link test runs on the raw text, before any escaping.
pub fn render_cell(cell: &str, options: &MarkupOptions) -> String {
    let mut out = String::with_capacity(cell.len());
    if options.detect_links && is_link(cell) {
        out.push_str("<a href=\"");
        push_text(&mut out, cell, options.escape_cells);
        out.push_str("\">");
        push_text(&mut out, cell, options.escape_cells);
        out.push_str("</a>");
    } else {
        push_text(&mut out, cell, options.escape_cells);
    }
    out
}

/// Exact prefix test; surrounding whitespace defeats detection.
pub fn is_link(cell: &str) -> bool {
    LINK_PREFIXES.iter().any(|prefix| cell.starts_with(prefix))
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn push_text(out: &mut String, text: &str, escape: bool) {
    if escape {
        out.push_str(&html_escape(text));
    } else {
        out.push_str(text);
    }
}

fn estimate_len(table: &Table) -> usize {
    let cells: usize = table
        .header
        .iter()
        .chain(table.rows.iter())
        .flat_map(|row| row.iter().map(|c| c.len() + 9))
        .sum();
    cells + table.rows.len() * 9 + 64
}
