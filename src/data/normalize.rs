//! Raw rows -> typed rows.
//!
//! Rules:
//! - the date column passes through (trimmed); rows without a date are dropped
//! - every tracked metric is coerced with [`to_number`]
//! - under `MissingPolicy::Drop`, a null in any tracked metric drops the row
//!
//! Untracked metrics (no source column) are always null and never drop a row.

use crate::data::coerce::to_number;
use crate::domain::{ColumnMap, MissingPolicy, NormalizedRow, ParsedTable, RawRow};

/// Counts describing what normalization kept and why the rest was dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub read: usize,
    pub kept: usize,
    pub dropped_no_date: usize,
    pub dropped_missing: usize,
}

impl NormalizeStats {
    pub fn dropped(&self) -> usize {
        self.dropped_no_date + self.dropped_missing
    }
}

/// Normalize every row, keeping input order.
pub fn normalize_rows(
    rows: &[RawRow],
    columns: &ColumnMap,
    policy: MissingPolicy,
) -> (Vec<NormalizedRow>, NormalizeStats) {
    let mut out = Vec::with_capacity(rows.len());
    let mut stats = NormalizeStats {
        read: rows.len(),
        ..NormalizeStats::default()
    };

    for row in rows {
        match normalize_with_reason(row, columns, policy) {
            Ok(n) => out.push(n),
            Err(Dropped::NoDate) => stats.dropped_no_date += 1,
            Err(Dropped::MissingValue) => stats.dropped_missing += 1,
        }
    }
    stats.kept = out.len();

    tracing::debug!(
        read = stats.read,
        kept = stats.kept,
        dropped_no_date = stats.dropped_no_date,
        dropped_missing = stats.dropped_missing,
        "normalized rows"
    );

    (out, stats)
}

/// Turn normalized rows back into a parsed table keyed by canonical field names.
///
/// Only the date and tracked metrics become headers; null values are left out
/// of the row so they read back as missing.
pub fn to_table(rows: &[NormalizedRow], columns: &ColumnMap) -> (ParsedTable, ColumnMap) {
    let tracked = columns.tracked();

    let mut headers = vec!["date".to_string()];
    headers.extend(tracked.iter().map(|m| m.field().to_string()));

    let raw_rows = rows
        .iter()
        .map(|r| {
            let mut raw = RawRow::new();
            raw.insert("date", r.date.as_str());
            for metric in &tracked {
                if let Some(v) = r.value(*metric) {
                    raw.insert(metric.field(), v.to_string());
                }
            }
            raw
        })
        .collect();

    let mut canonical = ColumnMap::canonical();
    for metric in crate::domain::Metric::ALL {
        if !columns.is_tracked(metric) {
            canonical.set_column(metric, None);
        }
    }

    (
        ParsedTable {
            headers,
            rows: raw_rows,
            skipped: Vec::new(),
        },
        canonical,
    )
}

enum Dropped {
    NoDate,
    MissingValue,
}

fn normalize_with_reason(
    row: &RawRow,
    columns: &ColumnMap,
    policy: MissingPolicy,
) -> Result<NormalizedRow, Dropped> {
    let date = row
        .get(&columns.date)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(Dropped::NoDate)?;

    let mut out = NormalizedRow::new(date);
    for metric in columns.tracked() {
        let value = columns.column(metric).and_then(|col| to_number(row.get(col)));
        if value.is_none() && policy == MissingPolicy::Drop {
            return Err(Dropped::MissingValue);
        }
        out.set_value(metric, value);
    }
    Ok(out)
}
