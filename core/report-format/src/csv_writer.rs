//! FILENAME: core/report-format/src/csv_writer.rs
//! CSV renderer. Headings become single-field records; tables keep their
//! header record; totals rows carry their label in the first field.

use csv::{Terminator, Writer, WriterBuilder};
use report_core::CellValue;
use report_engine::{ReportContent, ReportDocument, TotalsVector};

use crate::error::FormatError;
use crate::registry::ReportRenderer;
use crate::{label_fits_first_cell, total_text};

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl ReportRenderer for CsvRenderer {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, FormatError> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        if let Some(title) = &document.title {
            writer.write_record([title.as_str()])?;
        }

        for content in document.contents() {
            match content {
                ReportContent::Heading(heading) => {
                    writer.write_record([heading.text.as_str()])?;
                }
                ReportContent::Table(table) => {
                    writer.write_record(table.columns.iter().map(|c| c.label.as_str()))?;
                    for row in &table.rows {
                        writer.write_record(row.iter().map(CellValue::display_value))?;
                    }
                    if let Some(footer) = &table.footer {
                        write_totals(&mut writer, "Total", footer)?;
                    }
                }
                ReportContent::Totals(row) => {
                    write_totals(&mut writer, &row.label, &row.totals)?;
                }
            }
        }

        writer
            .into_inner()
            .map_err(|e| FormatError::Io(e.into_error()))
    }
}

fn write_totals(writer: &mut Writer<Vec<u8>>, label: &str, totals: &TotalsVector) -> Result<(), FormatError> {
    let mut cells: Vec<String> = totals.cells.iter().map(|c| total_text(c.value)).collect();
    if label_fits_first_cell(totals) && !cells.is_empty() {
        cells[0] = label.to_string();
    } else {
        writer.write_record([label])?;
    }
    writer.write_record(&cells)?;
    Ok(())
}
