//! Numeric coercion for spreadsheet-style cells (`"5.5%"`, `" 21 000 "`).

/// Coerce a raw cell to a finite number.
///
/// Every `%` and space is stripped before parsing. Empty, non-numeric, and
/// non-finite inputs all map to `None`; this never fails.
pub fn to_number(raw: Option<&str>) -> Option<f64> {
    let cleaned: String = raw?
        .trim()
        .chars()
        .filter(|c| *c != '%' && *c != ' ')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let v = cleaned.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_percent_values() {
        assert_eq!(to_number(Some("5.5")), Some(5.5));
        assert_eq!(to_number(Some("5.5%")), Some(5.5));
        assert_eq!(to_number(Some("  -0.25% ")), Some(-0.25));
        assert_eq!(to_number(Some("12")), Some(12.0));
        assert_eq!(to_number(Some("-3%")), Some(-3.0));
    }

    #[test]
    fn inner_spaces_are_stripped() {
        assert_eq!(to_number(Some("21 000")), Some(21000.0));
        assert_eq!(to_number(Some("4.1 %")), Some(4.1));
    }

    #[test]
    fn non_numeric_is_missing() {
        assert_eq!(to_number(Some("bad")), None);
        assert_eq!(to_number(Some("")), None);
        assert_eq!(to_number(Some("   ")), None);
        assert_eq!(to_number(Some("%")), None);
        assert_eq!(to_number(Some("n/a")), None);
        assert_eq!(to_number(Some("1.2.3")), None);
        assert_eq!(to_number(None), None);
    }

    #[test]
    fn non_finite_is_missing() {
        assert_eq!(to_number(Some("NaN")), None);
        assert_eq!(to_number(Some("inf")), None);
        assert_eq!(to_number(Some("-infinity")), None);
        assert_eq!(to_number(Some("1e400")), None);
    }

    #[test]
    fn pattern_grid_returns_magnitude() {
        // Inputs shaped like `^\s*-?\d+(\.\d+)?%?\s*$`.
        let cases = [
            ("0", 0.0),
            ("7%", 7.0),
            (" 3.25", 3.25),
            ("-12.5% ", -12.5),
            ("\t42.0\t", 42.0),
        ];
        for (raw, expected) in cases {
            assert_eq!(to_number(Some(raw)), Some(expected), "input {raw:?}");
        }
    }
}
