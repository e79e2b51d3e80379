//! FILENAME: app/report-cli/src/error.rs

use std::path::PathBuf;

use report_engine::ReportError;
use report_format::FormatError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid report job: {0}")]
    Job(#[from] serde_json::Error),

    #[error("Digest requires at least one grouping field")]
    NoPrimaryField,

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
