//! FILENAME: core/report-core/src/lib.rs
//! PURPOSE: Shared value types for the grouped report workspace.
//! CONTEXT: Re-exports the cell, record and coercion types that both the
//! report engine and the output formats build on.

pub mod cell;
pub mod numeric;
pub mod record;

// Re-export commonly used types at the crate root
pub use cell::{format_number, CellValue};
pub use numeric::{coerce_number, parse_grouped_number, NumericCell};
pub use record::{Dataset, Record};
