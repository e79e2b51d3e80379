//! FILENAME: core/report-core/src/numeric.rs
//! PURPOSE: Numeric coercion for cells that take part in totals.
//! CONTEXT: Upstream query layers sometimes hand over already-formatted
//! amounts ("1,250.00"). Grouping separators are stripped before parsing.
//! A value that still does not parse is reported as `NotNumeric`, never as 0.

use crate::cell::CellValue;

/// Result of reading a cell as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell {
    /// A usable numeric contribution.
    Value(f64),
    /// Nothing to contribute (empty cell or blank text).
    Blank,
    /// The cell holds something that cannot be summed.
    NotNumeric,
}

/// Reads a cell as a number for aggregation purposes.
pub fn coerce_number(value: &CellValue) -> NumericCell {
    match value {
        CellValue::Empty => NumericCell::Blank,
        CellValue::Number(n) if n.is_finite() => NumericCell::Value(*n),
        CellValue::Number(_) => NumericCell::NotNumeric,
        CellValue::Text(s) => {
            if s.trim().is_empty() {
                NumericCell::Blank
            } else {
                match parse_grouped_number(s) {
                    Some(n) => NumericCell::Value(n),
                    None => NumericCell::NotNumeric,
                }
            }
        }
        CellValue::Boolean(_) | CellValue::Date(_) => NumericCell::NotNumeric,
    }
}

/// Parses a number that may carry `,` grouping separators ("1,250.50").
pub fn parse_grouped_number(s: &str) -> Option<f64> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grouped_number() {
        assert_eq!(parse_grouped_number("1,250.50"), Some(1250.5));
        assert_eq!(parse_grouped_number(" -3 "), Some(-3.0));
        assert_eq!(parse_grouped_number("1 000"), Some(1000.0));
        assert_eq!(parse_grouped_number("abc"), None);
        assert_eq!(parse_grouped_number(","), None);
        assert_eq!(parse_grouped_number("inf"), None);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&CellValue::Number(4.0)), NumericCell::Value(4.0));
        assert_eq!(coerce_number(&CellValue::text("2,000")), NumericCell::Value(2000.0));
        assert_eq!(coerce_number(&CellValue::Empty), NumericCell::Blank);
        assert_eq!(coerce_number(&CellValue::text("  ")), NumericCell::Blank);
        assert_eq!(coerce_number(&CellValue::text("n/a")), NumericCell::NotNumeric);
        assert_eq!(coerce_number(&CellValue::Boolean(true)), NumericCell::NotNumeric);
    }
}
