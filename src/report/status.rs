//! Three-line status surface shared by the CLI, the HTML page, and the TUI.

use crate::error::{AppError, ErrorKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBoard {
    load: String,
    rows: String,
    error: String,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(&mut self, path: &str) {
        self.load = format!("Loading {path}...");
    }

    pub fn loaded(&mut self, path: &str) {
        self.load = format!("Loaded {path}");
    }

    pub fn rows(&mut self, kept: usize, read: usize, skipped: usize) {
        self.rows = format!("Rows: {kept} of {read} (skipped {skipped})");
    }

    /// Record an error; a missing chart library gets its own wording.
    pub fn error(&mut self, err: &AppError) {
        self.error = match err.kind() {
            ErrorKind::DependencyMissing => format!("Chart library missing: {}", err.message()),
            _ => format!("Error: {}", err.message()),
        };
    }

    pub fn clear_error(&mut self) {
        self.error.clear();
    }

    pub fn load_line(&self) -> &str {
        &self.load
    }

    pub fn rows_line(&self) -> &str {
        &self.rows
    }

    pub fn error_line(&self) -> &str {
        &self.error
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Non-empty lines, in display order.
    pub fn lines(&self) -> Vec<&str> {
        [self.load.as_str(), self.rows.as_str(), self.error.as_str()]
            .into_iter()
            .filter(|l| !l.is_empty())
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_progress_then_rows() {
        let mut s = StatusBoard::new();
        s.loading("data/x.csv");
        assert_eq!(s.load_line(), "Loading data/x.csv...");
        s.loaded("data/x.csv");
        s.rows(7, 9, 2);
        assert_eq!(s.render(), "Loaded data/x.csv\nRows: 7 of 9 (skipped 2)\n");
        assert!(!s.has_error());
    }

    #[test]
    fn error_wording_depends_on_kind() {
        let mut s = StatusBoard::new();
        s.error(&AppError::fetch("CSV not found: a.csv (HTTP 404 Not Found)"));
        assert_eq!(s.error_line(), "Error: CSV not found: a.csv (HTTP 404 Not Found)");

        s.error(&AppError::dependency_missing("vega-embed.min.js not found in assets"));
        assert_eq!(s.error_line(), "Chart library missing: vega-embed.min.js not found in assets");

        s.clear_error();
        assert!(s.lines().is_empty());
    }
}
