//! FILENAME: core/report-core/src/record.rs
//! PURPOSE: Records and the dataset a report is produced from.
//! CONTEXT: A dataset arrives already filtered and sorted by the upstream
//! query layer. Nothing here sorts or re-checks that order.

use crate::cell::CellValue;
use serde::{Deserialize, Serialize};

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One row of source data. Immutable once produced by the data source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: Vec<CellValue>,
}

impl Record {
    pub fn new(values: Vec<CellValue>) -> Self {
        Record { values }
    }

    /// Returns the cell at `column`, or `Empty` past the end of a short record.
    pub fn value(&self, column: usize) -> &CellValue {
        self.values.get(column).unwrap_or(&EMPTY_CELL)
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<CellValue>> for Record {
    fn from(values: Vec<CellValue>) -> Self {
        Record::new(values)
    }
}

/// An ordered sequence of records plus the schema (column identifiers).
///
/// Callers guarantee rows are sorted by the grouping fields in nesting order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Dataset { columns, rows }
    }

    /// Returns the position of `name` in the schema.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_record_reads_empty() {
        let record = Record::new(vec![CellValue::text("East")]);
        assert_eq!(record.value(0), &CellValue::text("East"));
        assert_eq!(record.value(3), &CellValue::Empty);
    }

    #[test]
    fn test_dataset_from_json() {
        let dataset: Dataset = serde_json::from_str(
            r#"{ "columns": ["Region", "Amount"], "rows": [["East", 100], ["West", "30"]] }"#,
        )
        .unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.column_index("Amount"), Some(1));
        assert_eq!(dataset.column_index("Missing"), None);
        assert_eq!(dataset.rows[1].value(1), &CellValue::text("30"));
    }
}
