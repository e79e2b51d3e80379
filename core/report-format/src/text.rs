//! FILENAME: core/report-format/src/text.rs
//! Plain-text renderer: indented headings and fixed-width tables.

use report_core::CellValue;
use report_engine::{
    ColumnHeader, GroupHeading, HeadingStyle, ReportContent, ReportDocument, TableBlock,
    TotalsRow, TotalsVector, ValueKind,
};

use crate::error::FormatError;
use crate::registry::ReportRenderer;
use crate::{label_fits_first_cell, total_text};

const PAGE_BREAK: &str = "\x0c\n";

#[derive(Debug, Clone)]
pub struct TextRenderer {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Gap between columns.
    pub column_gap: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        TextRenderer {
            indent: 2,
            column_gap: 2,
        }
    }
}

/// Column layout of the most recent table, reused by the totals rows that
/// follow it.
#[derive(Debug, Clone, Default)]
struct Layout {
    indent: usize,
    widths: Vec<usize>,
    numeric: Vec<bool>,
}

impl ReportRenderer for TextRenderer {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, FormatError> {
        let mut out = String::new();

        if let Some(title) = &document.title {
            out.push_str(title);
            out.push('\n');
            out.push_str(&"=".repeat(title.chars().count()));
            out.push_str("\n\n");
        }

        let mut layout = Layout::default();
        let mut depth_indent = 0;

        for (page_no, page) in document.pages().iter().enumerate() {
            if page_no > 0 {
                out.push_str(PAGE_BREAK);
            }
            for content in page {
                match content {
                    ReportContent::Heading(heading) => {
                        self.write_heading(&mut out, heading);
                        depth_indent = (heading.depth + 1) * self.indent;
                    }
                    ReportContent::Table(table) => {
                        layout = self.layout_for(table, depth_indent);
                        self.write_table(&mut out, table, &layout);
                    }
                    ReportContent::Totals(row) => {
                        self.write_totals(&mut out, row, &layout);
                    }
                }
            }
        }

        Ok(out.into_bytes())
    }
}

impl TextRenderer {
    fn write_heading(&self, out: &mut String, heading: &GroupHeading) {
        let pad = " ".repeat(heading.depth * self.indent);
        if heading.depth == 0 {
            out.push('\n');
        }
        out.push_str(&pad);
        out.push_str(&heading.text);
        out.push('\n');
        if heading.style == HeadingStyle::Section && heading.depth == 0 {
            out.push_str(&pad);
            out.push_str(&"-".repeat(heading.text.chars().count()));
            out.push('\n');
        }
    }

    fn layout_for(&self, table: &TableBlock, indent: usize) -> Layout {
        let widths = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let content = table
                    .rows
                    .iter()
                    .map(|row| row.get(i).map_or(0, |c| c.display_value().chars().count()))
                    .max()
                    .unwrap_or(0);
                let footer = table
                    .footer
                    .as_ref()
                    .and_then(|f| f.cells.get(i))
                    .map_or(0, |c| total_text(c.value).chars().count());
                let declared = column.width.map_or(0, usize::from);
                column.label.chars().count().max(content).max(footer).max(declared)
            })
            .collect();

        Layout {
            indent,
            widths,
            numeric: table.columns.iter().map(is_numeric).collect(),
        }
    }

    fn write_table(&self, out: &mut String, table: &TableBlock, layout: &Layout) {
        let labels: Vec<String> = table.columns.iter().map(|c| c.label.clone()).collect();
        self.write_line(out, &labels, layout);

        let rule: Vec<String> = layout.widths.iter().map(|w| "-".repeat(*w)).collect();
        self.write_line(out, &rule, layout);

        for row in &table.rows {
            let cells: Vec<String> = row.iter().map(CellValue::display_value).collect();
            self.write_line(out, &cells, layout);
        }

        if let Some(footer) = &table.footer {
            self.write_line(out, &rule, layout);
            self.write_totals_cells(out, "Total", footer, layout);
        }
    }

    fn write_totals(&self, out: &mut String, row: &TotalsRow, layout: &Layout) {
        let mut row_layout = layout.clone();
        row_layout.indent = row.depth * self.indent + self.indent;
        if row_layout.widths.len() != row.totals.len() {
            row_layout.widths = row
                .totals
                .cells
                .iter()
                .map(|c| total_text(c.value).chars().count().max(row.label.chars().count()))
                .collect();
            row_layout.numeric = vec![true; row.totals.len()];
        }
        self.write_totals_cells(out, &row.label, &row.totals, &row_layout);
    }

    fn write_totals_cells(&self, out: &mut String, label: &str, totals: &TotalsVector, layout: &Layout) {
        let mut cells: Vec<String> = totals.cells.iter().map(|c| total_text(c.value)).collect();
        if label_fits_first_cell(totals) && !cells.is_empty() {
            cells[0] = label.to_string();
        } else {
            out.push_str(&" ".repeat(layout.indent));
            out.push_str(label);
            out.push('\n');
        }
        self.write_line(out, &cells, layout);
    }

    fn write_line(&self, out: &mut String, cells: &[String], layout: &Layout) {
        let mut line = " ".repeat(layout.indent);
        let gap = " ".repeat(self.column_gap);
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str(&gap);
            }
            let width = layout.widths.get(i).copied().unwrap_or(0);
            if layout.numeric.get(i).copied().unwrap_or(false) {
                line.push_str(&format!("{:>width$}", cell, width = width));
            } else {
                line.push_str(&format!("{:<width$}", cell, width = width));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn is_numeric(column: &ColumnHeader) -> bool {
    column.total || column.kind == ValueKind::Number
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_layout() {
        let document = crate::tests::sample_document();
        let bytes = TextRenderer::default().render(&document).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("Sales\n=====\n"));
        assert!(text.contains("\nEast\n----\n"));
        // Product column is padded to its declared width
        assert!(text.contains("  Product     Amount\n"));
        assert!(text.contains("  Total          150\n"));
        assert!(text.contains("Grand Total"));
        assert!(text.contains("180"));
        // One page per region
        assert_eq!(text.matches('\x0c').count(), 1);
    }
}
