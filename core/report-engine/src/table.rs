//! FILENAME: core/report-engine/src/table.rs
//! Detail table rendering.
//!
//! A table renderer receives one contiguous run of rows, drops the columns
//! already represented by enclosing headings, appends the table to the sink
//! and returns the totals for what it drew.

use log::warn;
use report_core::{CellValue, Record};

use crate::definition::{ReportColumns, TotalsPolicy};
use crate::error::SinkError;
use crate::sink::ReportSink;
use crate::totals::{TotalCell, TotalValue, TotalsVector};
use crate::view::{ColumnHeader, ReportContent, TableBlock};

/// Everything a table renderer needs for one block of rows.
#[derive(Debug, Clone, Copy)]
pub struct TableRequest<'a> {
    pub rows: &'a [Record],
    pub columns: &'a ReportColumns,
    /// Schema indices of columns shown by enclosing headings.
    pub ignored: &'a [usize],
    pub policy: TotalsPolicy,
}

/// Strategy for drawing a leaf group's rows.
///
/// The returned vector follows the post-filtering header order.
pub trait TableRenderer {
    fn render_table(
        &self,
        sink: &mut dyn ReportSink,
        request: TableRequest<'_>,
    ) -> Result<TotalsVector, SinkError>;
}

/// The default renderer: a plain detail table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailTable;

impl DetailTable {
    /// Builds the table block and its totals without touching a sink.
    pub fn build(request: TableRequest<'_>) -> (TableBlock, TotalsVector) {
        let headers: Vec<ColumnHeader> = request
            .columns
            .iter()
            .filter(|c| !request.ignored.contains(&c.index))
            .map(ColumnHeader::from)
            .collect();

        let rows: Vec<Vec<CellValue>> = request
            .rows
            .iter()
            .map(|record| headers.iter().map(|h| record.value(h.index).clone()).collect())
            .collect();

        let totals = if request.policy.computes() {
            compute_totals(request.rows, &headers)
        } else {
            let indices: Vec<usize> = headers.iter().map(|h| h.index).collect();
            TotalsVector::blank(&indices)
        };

        let footer = match request.policy {
            TotalsPolicy::AutoWithFooter => Some(totals.clone()),
            TotalsPolicy::Auto | TotalsPolicy::None => None,
        };

        let block = TableBlock {
            columns: headers,
            rows,
            footer,
        };
        (block, totals)
    }
}

impl TableRenderer for DetailTable {
    fn render_table(
        &self,
        sink: &mut dyn ReportSink,
        request: TableRequest<'_>,
    ) -> Result<TotalsVector, SinkError> {
        let (block, totals) = DetailTable::build(request);
        sink.add(ReportContent::Table(block))?;
        Ok(totals)
    }
}

/// Sums every totalled column over `rows`; other columns are blank.
pub fn compute_totals(rows: &[Record], headers: &[ColumnHeader]) -> TotalsVector {
    let cells = headers
        .iter()
        .map(|header| {
            if !header.total {
                return TotalCell {
                    column: header.index,
                    value: None,
                };
            }

            let mut total = TotalValue::default();
            for record in rows {
                let cell = record.value(header.index);
                let next = total.add_cell(cell);
                if next.is_sentinel() && !total.is_sentinel() {
                    warn!(
                        "column '{}' holds a value that cannot be totalled: {:?}",
                        header.name, cell
                    );
                }
                total = next;
            }

            TotalCell {
                column: header.index,
                value: Some(total),
            }
        })
        .collect();

    TotalsVector { cells }
}
