//! CSV parsing into header-keyed raw rows.
//!
//! The input format is deliberately simple:
//! - first non-empty line is the header
//! - every other non-empty line is one record
//! - fields are split on the delimiter with **no quoting support**
//!
//! Rows whose field count differs from the header are skipped and reported in
//! `ParsedTable::skipped`, never zipped partially.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::domain::{ParsedTable, RawRow, RowError};
use crate::error::AppError;

/// Parse CSV text into headers + raw rows.
pub fn parse_csv(text: &str, delimiter: u8) -> Result<ParsedTable, AppError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut skipped = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(idx + 1);
                skipped.push(RowError {
                    line,
                    message: format!("CSV read error: {e}"),
                });
                continue;
            }
        };

        // Whitespace-only lines come through as a single empty field.
        if is_blank(&record) {
            continue;
        }

        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);

        let Some(header) = &headers else {
            headers = Some(
                record
                    .iter()
                    .enumerate()
                    .map(|(i, name)| normalize_header_name(name, i))
                    .collect(),
            );
            continue;
        };

        if record.len() != header.len() {
            skipped.push(RowError {
                line,
                message: format!(
                    "expected {} fields, found {}",
                    header.len(),
                    record.len()
                ),
            });
            continue;
        }

        rows.push(RawRow::from_pairs(
            header.iter().map(String::as_str).zip(record.iter()),
        ));
    }

    let headers = headers.ok_or_else(|| AppError::data("CSV has no header line."))?;

    if !skipped.is_empty() {
        tracing::debug!(count = skipped.len(), "skipped malformed CSV rows");
    }

    Ok(ParsedTable {
        headers,
        rows,
        skipped,
    })
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

fn normalize_header_name(name: &str, position: usize) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = if position == 0 {
        name.trim_start_matches('\u{feff}')
    } else {
        name
    };
    name.trim().to_string()
}
