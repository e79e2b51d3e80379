//! FILENAME: core/report-engine/src/totals.rs
//! Running totals and the rule for rolling them up a nesting level.
//!
//! Only `total`-flagged columns ever appear here. A column whose total
//! cannot be computed carries `TotalValue::NonAggregable`, and once a
//! column is non-aggregable in an accumulator it stays that way.

use std::collections::BTreeMap;

use report_core::{coerce_number, CellValue, NumericCell};
use serde::{Deserialize, Serialize};

// ============================================================================
// TOTAL VALUE
// ============================================================================

/// A per-column total: a numeric sum or the non-aggregable sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TotalValue {
    Sum(f64),
    NonAggregable,
}

impl TotalValue {
    /// Combines two contributions. The sentinel absorbs everything.
    pub fn combine(self, other: TotalValue) -> TotalValue {
        match (self, other) {
            (TotalValue::Sum(a), TotalValue::Sum(b)) => TotalValue::Sum(a + b),
            _ => TotalValue::NonAggregable,
        }
    }

    /// Adds one cell to a running sum. Blank cells contribute nothing.
    pub fn add_cell(self, cell: &CellValue) -> TotalValue {
        match coerce_number(cell) {
            NumericCell::Value(n) => self.combine(TotalValue::Sum(n)),
            NumericCell::Blank => self,
            NumericCell::NotNumeric => TotalValue::NonAggregable,
        }
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            TotalValue::Sum(n) => Some(n),
            TotalValue::NonAggregable => None,
        }
    }

    pub fn is_sentinel(self) -> bool {
        matches!(self, TotalValue::NonAggregable)
    }

    /// The value shown in a totals cell; the sentinel shows blank.
    pub fn to_cell(self) -> CellValue {
        match self {
            TotalValue::Sum(n) => CellValue::Number(n),
            TotalValue::NonAggregable => CellValue::Empty,
        }
    }
}

impl Default for TotalValue {
    fn default() -> Self {
        TotalValue::Sum(0.0)
    }
}

// ============================================================================
// TOTALS VECTOR
// ============================================================================

/// One entry of a totals vector. `value` is `None` for columns that are not
/// totalled (rendered blank).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalCell {
    pub column: usize,
    pub value: Option<TotalValue>,
}

/// Totals aligned with a table's visible columns, in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsVector {
    pub cells: Vec<TotalCell>,
}

impl TotalsVector {
    /// A vector of blanks over `columns`.
    pub fn blank(columns: &[usize]) -> Self {
        TotalsVector {
            cells: columns
                .iter()
                .map(|&column| TotalCell { column, value: None })
                .collect(),
        }
    }

    pub fn get(&self, column: usize) -> Option<TotalValue> {
        self.cells
            .iter()
            .find(|c| c.column == column)
            .and_then(|c| c.value)
    }

    /// True when no cell carries a total.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.value.is_none())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ============================================================================
// ACCUMULATOR
// ============================================================================

/// Running per-column totals for one nesting level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsAccumulator {
    values: BTreeMap<usize, TotalValue>,
}

impl TotalsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one child contribution into the running value for `column`.
    ///
    /// A sentinel from the child overrides the running value; a numeric
    /// contribution is added to it.
    pub fn add(&mut self, column: usize, value: TotalValue) {
        let merged = match self.values.get(&column) {
            Some(current) => current.combine(value),
            None => value,
        };
        self.values.insert(column, merged);
    }

    /// Merges a child accumulator into this one, column by column.
    pub fn merge(&mut self, child: &TotalsAccumulator) {
        for (&column, &value) in &child.values {
            self.add(column, value);
        }
    }

    pub fn get(&self, column: usize) -> Option<TotalValue> {
        self.values.get(&column).copied()
    }

    /// The numeric total for `column`, if present and aggregable.
    pub fn sum(&self, column: usize) -> Option<f64> {
        self.get(column).and_then(TotalValue::as_f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, TotalValue)> + '_ {
        self.values.iter().map(|(&c, &v)| (c, v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Lays the accumulator out over `columns`; columns it has no entry for
    /// are blank.
    pub fn to_vector(&self, columns: &[usize]) -> TotalsVector {
        TotalsVector {
            cells: columns
                .iter()
                .map(|&column| TotalCell {
                    column,
                    value: self.get(column),
                })
                .collect(),
        }
    }
}

impl From<&TotalsVector> for TotalsAccumulator {
    fn from(vector: &TotalsVector) -> Self {
        let mut acc = TotalsAccumulator::new();
        for cell in &vector.cells {
            if let Some(value) = cell.value {
                acc.add(cell.column, value);
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_adds_sums() {
        let mut parent = TotalsAccumulator::new();
        let mut child = TotalsAccumulator::new();
        child.add(2, TotalValue::Sum(150.0));
        parent.merge(&child);

        let mut other = TotalsAccumulator::new();
        other.add(2, TotalValue::Sum(30.0));
        parent.merge(&other);

        assert_eq!(parent.sum(2), Some(180.0));
    }

    #[test]
    fn test_sentinel_overrides_and_sticks() {
        let mut parent = TotalsAccumulator::new();
        parent.add(1, TotalValue::Sum(10.0));
        parent.add(1, TotalValue::NonAggregable);
        assert_eq!(parent.get(1), Some(TotalValue::NonAggregable));

        // Later numeric siblings do not restart the sum
        parent.add(1, TotalValue::Sum(5.0));
        assert_eq!(parent.get(1), Some(TotalValue::NonAggregable));
        assert_eq!(parent.sum(1), None);
    }

    #[test]
    fn test_add_cell_coerces() {
        let total = TotalValue::default()
            .add_cell(&CellValue::Number(1.5))
            .add_cell(&CellValue::text("1,000"))
            .add_cell(&CellValue::Empty);
        assert_eq!(total, TotalValue::Sum(1001.5));

        let broken = total.add_cell(&CellValue::text("n/a"));
        assert!(broken.is_sentinel());
        assert_eq!(broken.to_cell(), CellValue::Empty);
    }

    #[test]
    fn test_vector_round_trip_skips_blanks() {
        let vector = TotalsVector {
            cells: vec![
                TotalCell { column: 1, value: None },
                TotalCell { column: 2, value: Some(TotalValue::Sum(7.0)) },
            ],
        };
        let acc = TotalsAccumulator::from(&vector);
        assert_eq!(acc.len(), 1);
        assert_eq!(acc.to_vector(&[1, 2]), vector);
        assert!(!vector.is_blank());
        assert!(TotalsVector::blank(&[1, 2]).is_blank());
    }
}
