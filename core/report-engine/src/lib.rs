//! FILENAME: core/report-engine/src/lib.rs
//! Grouped report subsystem.
//!
//! This crate walks a pre-sorted dataset once, emitting nested group
//! headings, detail tables and subtotal rows to an output sink, and rolls
//! the subtotals up into a grand total. It depends on `report-core` for
//! cell values, records and numeric coercion.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the report IS)
//! - `totals`: Running sums and the merge rule between nesting levels
//! - `view`: Abstract report content handed to sinks (WHAT we emit)
//! - `sink`: Output capability plus the in-memory `ReportDocument`
//! - `table` / `heading`: Injectable rendering strategies
//! - `engine`: The recursive traversal (HOW we group)
//! - `summary`: Single-level digest over the first grouping field

pub mod definition;
pub mod engine;
pub mod error;
pub mod heading;
pub mod sink;
pub mod summary;
pub mod table;
pub mod totals;
pub mod view;

pub use definition::*;
pub use engine::{ActiveKey, ActiveKeys, Cursor, GroupingEngine, ReportPlan, Traversal};
pub use error::{ReportError, SinkError};
pub use heading::{GroupKey, HeadingRenderer, LabelledHeading, StyledHeading};
pub use sink::{ReportDocument, ReportSink};
pub use summary::{summarize, summarize_into};
pub use table::{compute_totals, DetailTable, TableRenderer, TableRequest};
pub use totals::{TotalCell, TotalValue, TotalsAccumulator, TotalsVector};
pub use view::*;
