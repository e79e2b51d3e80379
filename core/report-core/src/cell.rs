//! FILENAME: core/report-core/src/cell.rs
//! PURPOSE: Defines the value held by a single report cell.
//! CONTEXT: Records are sequences of `CellValue`. Group keys are compared
//! with `same_key`, which is `PartialEq` except that NaN matches NaN.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the raw data within a report cell.
///
/// Serialized untagged so report jobs can be written as plain JSON rows:
/// `["East", "A", 100, null, "2024-03-01"]`. Variant order matters for
/// deserialization: dates are tried before free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Boolean(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Group-key equality. Unlike `==`, a NaN number matches another NaN so
    /// a group keyed on it still closes over its own rows.
    pub fn same_key(&self, other: &CellValue) -> bool {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self == other,
        }
    }

    /// Returns the display value of the cell as a String.
    /// Used for group headings and text-based outputs.
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// Formats a number without unnecessary decimal places.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        // Up to 10 decimals, trailing zeros trimmed
        let formatted = format!("{:.10}", n);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
