//! FILENAME: core/report-format/src/lib.rs
//! Report output formats.
//!
//! Turns a collected `ReportDocument` into bytes. The set of formats is
//! closed: `ReportFormat` names every supported one and `renderer_for` is
//! the only way to obtain a renderer.

mod csv_writer;
mod error;
mod json;
mod registry;
mod text;
mod xlsx_writer;

pub use csv_writer::CsvRenderer;
pub use error::FormatError;
pub use json::JsonRenderer;
pub use registry::{renderer_for, ReportFormat, ReportRenderer};
pub use text::TextRenderer;
pub use xlsx_writer::XlsxRenderer;

use std::path::Path;

use log::info;
use report_core::format_number;
use report_engine::{ReportDocument, TotalValue, TotalsVector};

/// Renders `document` in `format`.
pub fn render_report(document: &ReportDocument, format: ReportFormat) -> Result<Vec<u8>, FormatError> {
    renderer_for(format).render(document)
}

/// Renders `document` in `format` and writes it to `path`.
pub fn write_report(document: &ReportDocument, format: ReportFormat, path: &Path) -> Result<(), FormatError> {
    let bytes = render_report(document, format)?;
    std::fs::write(path, &bytes)?;
    info!("wrote {} report ({} bytes) to {:?}", format, bytes.len(), path);
    Ok(())
}

// ============================================================================
// SHARED TOTALS LAYOUT
// ============================================================================

/// Text for one totals cell. The non-aggregable sentinel shows blank.
pub(crate) fn total_text(value: Option<TotalValue>) -> String {
    match value {
        Some(TotalValue::Sum(n)) => format_number(n),
        Some(TotalValue::NonAggregable) | None => String::new(),
    }
}

/// Whether a totals row's label can take the first cell. When the first
/// column is itself totalled the label goes on a line of its own.
pub(crate) fn label_fits_first_cell(totals: &TotalsVector) -> bool {
    totals.cells.first().map_or(true, |c| c.value.is_none())
}
