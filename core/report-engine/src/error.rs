//! FILENAME: core/report-engine/src/error.rs

use thiserror::Error;

/// Failure reported by an output sink while appending content.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink rejected content: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Grouping field not found in dataset: {0}")]
    UnknownGroupingField(String),

    #[error("No field metadata for grouping field: {0}")]
    MissingFieldMetadata(String),

    #[error("Grouping field listed more than once: {0}")]
    DuplicateGroupingField(String),

    #[error("Too many grouping levels: {levels} (maximum {max})")]
    TooManyLevels { levels: usize, max: usize },

    #[error("Output sink failed: {0}")]
    Sink(#[from] SinkError),
}
