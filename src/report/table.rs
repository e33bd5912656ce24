//! Bounded table views of the parsed data.
//!
//! Both renderings show every column and the first `limit` rows; a cell that
//! is missing from its row is left blank.

use crate::domain::ParsedTable;

/// Fixed-width text table for the terminal.
///
/// Columns are as wide as their widest shown cell, capped at `max_col`.
pub fn format_table(table: &ParsedTable, limit: usize, max_col: usize) -> String {
    let shown = &table.rows[..table.rows.len().min(limit)];
    let max_col = max_col.max(2);

    let widths: Vec<usize> = table
        .headers
        .iter()
        .map(|h| {
            shown
                .iter()
                .map(|r| r.get(h).unwrap_or("").chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .min(max_col)
        })
        .collect();

    let line = |cells: Vec<String>| -> String {
        let mut s = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", truncate(c, *w), w = *w))
            .collect::<Vec<_>>()
            .join(" ");
        s.truncate(s.trim_end().len());
        s.push('\n');
        s
    };

    let mut out = String::new();
    out.push_str(&line(table.headers.clone()));
    out.push_str(&line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in shown {
        out.push_str(&line(
            table
                .headers
                .iter()
                .map(|h| row.get(h).unwrap_or("").to_string())
                .collect(),
        ));
    }
    if table.rows.len() > shown.len() {
        out.push_str(&format!("... {} more rows\n", table.rows.len() - shown.len()));
    }

    out
}

/// HTML table with escaped cell text.
pub fn html_table(table: &ParsedTable, limit: usize) -> String {
    let mut out = String::from("<table>\n<thead><tr>");
    for h in &table.headers {
        out.push_str(&format!("<th>{}</th>", escape_html(h)));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in table.rows.iter().take(limit) {
        out.push_str("<tr>");
        for h in &table.headers {
            out.push_str(&format!("<td>{}</td>", escape_html(row.get(h).unwrap_or(""))));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
