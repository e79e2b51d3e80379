//! FILENAME: core/report-engine/src/summary.rs
//! Summary digest: one row per distinct value of the primary grouping field.
//!
//! A single linear scan over a dataset sorted by that field. Only the
//! grouping column and the `total`-flagged columns are kept.

use log::debug;
use report_core::{CellValue, Dataset, Record};

use crate::definition::{FieldParams, ReportColumns, ReportDefinition};
use crate::error::ReportError;
use crate::sink::ReportSink;
use crate::totals::{TotalValue, TotalsAccumulator};
use crate::view::{ColumnHeader, ReportContent, ReportSection, SectionBody, TableBlock};

/// Sums for one primary-group value while it is being scanned.
struct DigestRow {
    key: CellValue,
    sums: Vec<TotalValue>,
    contributions: usize,
}

impl DigestRow {
    fn new(key: CellValue, width: usize) -> Self {
        DigestRow {
            key,
            sums: vec![TotalValue::default(); width],
            contributions: 0,
        }
    }

    fn absorb(&mut self, record: &Record, flagged: &[usize]) {
        for (sum, &column) in self.sums.iter_mut().zip(flagged) {
            *sum = sum.add_cell(record.value(column));
        }
        self.contributions += 1;
    }

    fn into_cells(self) -> Vec<CellValue> {
        std::iter::once(self.key)
            .chain(self.sums.into_iter().map(TotalValue::to_cell))
            .collect()
    }
}

/// Collapses `dataset` into one table keyed by `primary_field`.
///
/// Assumes the dataset is sorted by `primary_field`. The returned section
/// has no heading and carries the grand sums as its table footer.
pub fn summarize(
    dataset: &Dataset,
    primary_field: &str,
    fields: &FieldParams,
) -> Result<ReportSection, ReportError> {
    let definition = ReportDefinition::grouped_by([primary_field]);
    let primary = match definition.grouping.resolve(dataset, fields)?.first() {
        Some(&index) => index,
        None => return Err(ReportError::UnknownGroupingField(primary_field.to_string())),
    };

    let columns = ReportColumns::resolve(dataset, fields);
    let flagged: Vec<usize> = columns
        .iter()
        .filter(|c| c.meta.total && c.index != primary)
        .map(|c| c.index)
        .collect();

    let mut headers = Vec::with_capacity(flagged.len() + 1);
    if let Some(spec) = columns.get(primary) {
        let mut key_header = ColumnHeader::from(spec);
        key_header.total = false;
        headers.push(key_header);
    }
    headers.extend(flagged.iter().filter_map(|&i| columns.get(i)).map(ColumnHeader::from));

    let mut digest: Vec<DigestRow> = Vec::new();
    let mut current: Option<DigestRow> = None;

    for record in &dataset.rows {
        let key = record.value(primary);
        let starts_group = current.as_ref().map_or(true, |row| !row.key.same_key(key));
        if starts_group {
            digest.extend(current.take());
            current = Some(DigestRow::new(key.clone(), flagged.len()));
        }
        if let Some(row) = current.as_mut() {
            row.absorb(record, &flagged);
        }
    }
    digest.extend(current);

    // Drop any row that never received a record
    digest.retain(|row| row.contributions > 0);
    debug!(
        "digest by '{}': {} rows into {} groups",
        primary_field,
        dataset.len(),
        digest.len()
    );

    let mut grand = TotalsAccumulator::new();
    for row in &digest {
        for (&column, &sum) in flagged.iter().zip(&row.sums) {
            grand.add(column, sum);
        }
    }

    let visible: Vec<usize> = headers.iter().map(|h| h.index).collect();
    let footer = if flagged.is_empty() {
        None
    } else {
        Some(grand.to_vector(&visible))
    };

    let table = TableBlock {
        columns: headers,
        rows: digest.into_iter().map(DigestRow::into_cells).collect(),
        footer,
    };

    Ok(ReportSection {
        heading: None,
        body: SectionBody::Table(table),
        totals: None,
    })
}

/// Builds the digest and appends its table to `sink`. Returns the grand sums.
pub fn summarize_into(
    sink: &mut dyn ReportSink,
    dataset: &Dataset,
    primary_field: &str,
    fields: &FieldParams,
) -> Result<TotalsAccumulator, ReportError> {
    let section = summarize(dataset, primary_field, fields)?;
    let totals = section
        .table()
        .and_then(|t| t.footer.as_ref())
        .map(TotalsAccumulator::from)
        .unwrap_or_default();

    if let SectionBody::Table(table) = section.body {
        sink.add(ReportContent::Table(table))?;
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::FieldMeta;

    fn params() -> FieldParams {
        FieldParams::new(vec![
            FieldMeta::new("Region", "Region"),
            FieldMeta::new("Product", "Product"),
            FieldMeta::totalled("Amount", "Amount"),
            FieldMeta::totalled("Units", "Units"),
        ])
    }

    fn row(region: &str, product: &str, amount: CellValue, units: f64) -> Record {
        Record::new(vec![
            CellValue::text(region),
            CellValue::text(product),
            amount,
            CellValue::Number(units),
        ])
    }

    fn dataset(rows: Vec<Record>) -> Dataset {
        Dataset::new(
            vec!["Region".into(), "Product".into(), "Amount".into(), "Units".into()],
            rows,
        )
    }

    #[test]
    fn test_digest_normalizes_separators() {
        let data = dataset(vec![
            row("East", "A", CellValue::text("1,000"), 1.0),
            row("East", "B", CellValue::Number(250.5), 2.0),
            row("West", "A", CellValue::text("2,000.25"), 3.0),
        ]);

        let section = summarize(&data, "Region", &params()).unwrap();
        let table = section.table().unwrap();
        assert_eq!(table.column_indices(), vec![0, 2, 3]);
        assert_eq!(
            table.rows,
            vec![
                vec![CellValue::text("East"), CellValue::Number(1250.5), CellValue::Number(3.0)],
                vec![CellValue::text("West"), CellValue::Number(2000.25), CellValue::Number(3.0)],
            ]
        );

        let footer = table.footer.as_ref().unwrap();
        assert_eq!(footer.get(0), None);
        assert_eq!(footer.get(2), Some(TotalValue::Sum(3250.75)));
        assert_eq!(footer.get(3), Some(TotalValue::Sum(6.0)));
    }

    #[test]
    fn test_digest_blank_for_non_numeric() {
        let data = dataset(vec![
            row("East", "A", CellValue::text("tbd"), 1.0),
            row("West", "A", CellValue::Number(5.0), 1.0),
        ]);
        let section = summarize(&data, "Region", &params()).unwrap();
        let table = section.table().unwrap();
        assert_eq!(table.rows[0][1], CellValue::Empty);
        assert_eq!(table.rows[1][1], CellValue::Number(5.0));
        assert_eq!(
            table.footer.as_ref().unwrap().get(2),
            Some(TotalValue::NonAggregable)
        );
    }

    #[test]
    fn test_digest_empty_dataset_and_unknown_field() {
        let data = dataset(Vec::new());
        let section = summarize(&data, "Region", &params()).unwrap();
        assert_eq!(section.detail_row_count(), 0);

        assert!(matches!(
            summarize(&data, "Country", &params()),
            Err(ReportError::UnknownGroupingField(_))
        ));
    }

    #[test]
    fn test_summarize_into_sink() {
        let data = dataset(vec![
            row("East", "A", CellValue::Number(1.0), 1.0),
            row("East", "B", CellValue::Number(2.0), 1.0),
        ]);
        let mut doc = crate::sink::ReportDocument::new();
        let totals = summarize_into(&mut doc, &data, "Region", &params()).unwrap();
        assert_eq!(totals.sum(2), Some(3.0));
        assert_eq!(doc.tables().count(), 1);
        assert_eq!(doc.sections().len(), 1);
    }
}
