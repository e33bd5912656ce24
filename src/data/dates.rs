//! Date parsing for plotting on a numeric (fractional-year) axis.
//!
//! Normalized rows keep the date string untouched; these helpers are only used
//! where a number is needed (terminal plots, trend fitting, hover lookup).

use chrono::{Datelike, NaiveDate};

/// Parse the date formats seen in indicator exports.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM`, `YYYY-Qn`, and `YYYY`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    const FMTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    if let Some((year, quarter)) = s.split_once("-Q").or_else(|| s.split_once("Q")) {
        let year: i32 = year.trim_end_matches('-').parse().ok()?;
        let quarter: u32 = quarter.parse().ok()?;
        if !(1..=4).contains(&quarter) {
            return None;
        }
        return NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1);
    }

    if let Some((year, month)) = s.split_once('-') {
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    if s.len() == 4 {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

/// `2020-07-01` -> `2020.497...` (year plus elapsed fraction of that year).
pub fn year_fraction(date: NaiveDate) -> f64 {
    let days_in_year = if NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some() {
        366.0
    } else {
        365.0
    };
    date.year() as f64 + date.ordinal0() as f64 / days_in_year
}

/// Parse and convert in one step.
pub fn date_to_x(s: &str) -> Option<f64> {
    parse_date(s).map(year_fraction)
}
