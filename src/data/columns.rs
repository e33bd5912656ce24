//! Column resolution: map file headers to the date column and tracked metrics.

use crate::domain::{ColumnMap, ColumnOverrides, DATE_ALIASES, Metric};
use crate::error::AppError;

/// Find the first header matching any of `preferred`, case-insensitively.
///
/// Preference order wins over header order.
pub fn pick_column(headers: &[String], preferred: &[&str]) -> Option<String> {
    preferred.iter().find_map(|p| {
        headers
            .iter()
            .find(|h| h.eq_ignore_ascii_case(p))
            .cloned()
    })
}

/// Resolve the column map for a parsed file.
///
/// - explicit overrides must name an existing header
/// - the date column falls back to the first header
/// - metric columns without an alias match stay untracked
pub fn resolve_columns(headers: &[String], overrides: &ColumnOverrides) -> Result<ColumnMap, AppError> {
    if headers.is_empty() {
        return Err(AppError::data("CSV header is empty."));
    }

    let date = match overrides.date.as_deref() {
        Some(name) => require_header(headers, name, "--date-col")?,
        None => pick_column(headers, &DATE_ALIASES).unwrap_or_else(|| headers[0].clone()),
    };

    let mut map = ColumnMap {
        date,
        gdp_billions: None,
        gdp_growth_yoy: None,
        unemployment_rate: None,
        inflation_yoy: None,
    };

    // The date column never doubles as a numeric series: an alias match on it
    // is ignored, an explicit flag naming it is rejected.
    for metric in Metric::ALL {
        let column = match overrides.metric(metric) {
            Some(name) => {
                let flag = flag_for(metric);
                let column = require_header(headers, name, flag)?;
                if column == map.date {
                    return Err(AppError::config(format!(
                        "Column `{column}` given to `{flag}` is already the date column."
                    )));
                }
                Some(column)
            }
            None => pick_column(headers, metric.aliases()).filter(|c| *c != map.date),
        };
        map.set_column(metric, column);
    }

    Ok(map)
}

fn require_header(headers: &[String], name: &str, flag: &str) -> Result<String, AppError> {
    headers
        .iter()
        .find(|h| h.as_str() == name)
        .or_else(|| headers.iter().find(|h| h.eq_ignore_ascii_case(name)))
        .cloned()
        .ok_or_else(|| {
            AppError::config(format!(
                "Column `{name}` given to `{flag}` is not in the CSV header ({}).",
                headers.join(", ")
            ))
        })
}

fn flag_for(metric: Metric) -> &'static str {
    match metric {
        Metric::GdpBillions => "--gdp-col",
        Metric::GdpGrowthYoy => "--growth-col",
        Metric::UnemploymentRate => "--unemployment-col",
        Metric::InflationYoy => "--inflation-col",
    }
}
