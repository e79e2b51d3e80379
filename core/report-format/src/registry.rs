//! FILENAME: core/report-format/src/registry.rs
//! The closed set of output formats and the factory that maps them to
//! renderers.

use std::fmt;
use std::str::FromStr;

use report_engine::ReportDocument;
use serde::{Deserialize, Serialize};

use crate::csv_writer::CsvRenderer;
use crate::error::FormatError;
use crate::json::JsonRenderer;
use crate::text::TextRenderer;
use crate::xlsx_writer::XlsxRenderer;

/// Turns a collected report into output bytes.
pub trait ReportRenderer {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, FormatError>;
}

/// Every supported output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Xlsx,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 4] = [
        ReportFormat::Text,
        ReportFormat::Json,
        ReportFormat::Csv,
        ReportFormat::Xlsx,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Xlsx => "xlsx",
        }
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "xlsx" | "excel" => Ok(ReportFormat::Xlsx),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Returns the renderer for `format`.
pub fn renderer_for(format: ReportFormat) -> Box<dyn ReportRenderer> {
    match format {
        ReportFormat::Text => Box::new(TextRenderer::default()),
        ReportFormat::Json => Box::new(JsonRenderer::default()),
        ReportFormat::Csv => Box::new(CsvRenderer),
        ReportFormat::Xlsx => Box::new(XlsxRenderer),
    }
}
