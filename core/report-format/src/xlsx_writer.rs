//! FILENAME: core/report-format/src/xlsx_writer.rs

use report_core::CellValue;
use report_engine::{ReportContent, ReportDocument, TableBlock, TotalsVector};
use rust_xlsxwriter::{Format, FormatBorder, Workbook as XlsxWorkbook, Worksheet};

use crate::error::FormatError;
use crate::label_fits_first_cell;
use crate::registry::ReportRenderer;

/// Single-worksheet XLSX output. Report pages become horizontal page breaks.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxRenderer;

struct Formats {
    title: Format,
    heading: Format,
    header: Format,
    totals: Format,
}

impl Formats {
    fn new() -> Self {
        Formats {
            title: Format::new().set_bold().set_font_size(14),
            heading: Format::new().set_bold(),
            header: Format::new().set_bold().set_border_bottom(FormatBorder::Thin),
            totals: Format::new().set_bold().set_border_top(FormatBorder::Thin),
        }
    }
}

impl ReportRenderer for XlsxRenderer {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, FormatError> {
        let mut xlsx = XlsxWorkbook::new();
        let formats = Formats::new();
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name("Report")?;

        let mut row: u32 = 0;
        if let Some(title) = &document.title {
            worksheet.write_string_with_format(row, 0, title, &formats.title)?;
            row += 2;
        }

        let mut page_breaks: Vec<u32> = Vec::new();
        let mut widths: Vec<f64> = Vec::new();

        for (page_no, page) in document.pages().iter().enumerate() {
            if page_no > 0 && row > 0 {
                page_breaks.push(row);
            }
            for content in page {
                match content {
                    ReportContent::Heading(heading) => {
                        let format = formats.heading.clone().set_indent(heading.depth as u8);
                        worksheet.write_string_with_format(row, 0, &heading.text, &format)?;
                        row += 1;
                    }
                    ReportContent::Table(table) => {
                        track_widths(&mut widths, table);
                        row = write_table(worksheet, row, table, &formats)?;
                    }
                    ReportContent::Totals(totals) => {
                        row = write_totals(worksheet, row, &totals.label, &totals.totals, &formats.totals)?;
                    }
                }
            }
        }

        for (col, width) in widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }
        if !page_breaks.is_empty() {
            worksheet.set_page_breaks(&page_breaks)?;
        }

        Ok(xlsx.save_to_buffer()?)
    }
}

fn track_widths(widths: &mut Vec<f64>, table: &TableBlock) {
    for (i, column) in table.columns.iter().enumerate() {
        let width = match column.width {
            Some(w) => f64::from(w),
            None => continue,
        };
        if widths.len() <= i {
            widths.resize(i + 1, 8.43);
        }
        widths[i] = widths[i].max(width);
    }
}

fn write_table(
    worksheet: &mut Worksheet,
    mut row: u32,
    table: &TableBlock,
    formats: &Formats,
) -> Result<u32, FormatError> {
    for (col, column) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(row, col as u16, &column.label, &formats.header)?;
    }
    row += 1;

    for cells in &table.rows {
        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell)?;
        }
        row += 1;
    }

    if let Some(footer) = &table.footer {
        row = write_totals(worksheet, row, "Total", footer, &formats.totals)?;
    }
    Ok(row + 1)
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<(), FormatError> {
    match cell {
        CellValue::Empty => {}
        CellValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Boolean(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Date(_) => {
            worksheet.write_string(row, col, cell.display_value())?;
        }
    }
    Ok(())
}

fn write_totals(
    worksheet: &mut Worksheet,
    mut row: u32,
    label: &str,
    totals: &TotalsVector,
    format: &Format,
) -> Result<u32, FormatError> {
    let label_in_first = label_fits_first_cell(totals);
    if !label_in_first {
        worksheet.write_string_with_format(row, 0, label, format)?;
        row += 1;
    }

    for (col, cell) in totals.cells.iter().enumerate() {
        match cell.value.and_then(|v| v.as_f64()) {
            Some(n) => {
                worksheet.write_number_with_format(row, col as u16, n, format)?;
            }
            None if col == 0 && label_in_first => {
                worksheet.write_string_with_format(row, 0, label, format)?;
            }
            None => {
                worksheet.write_blank(row, col as u16, format)?;
            }
        }
    }
    if totals.is_empty() {
        worksheet.write_string_with_format(row, 0, label, format)?;
    }
    Ok(row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xlsx_is_a_zip_container() {
        let document = crate::tests::sample_document();
        let bytes = XlsxRenderer.render(&document).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_document_renders() {
        let bytes = XlsxRenderer.render(&ReportDocument::new()).unwrap();
        assert!(!bytes.is_empty());
    }
}
