//! FILENAME: core/report-engine/src/view.rs
//! Report View - Abstract report content handed to output sinks.
//!
//! The traversal never produces bytes. It emits headings, detail tables and
//! totals rows; how they look is the sink's concern. `ReportSection` is the
//! nested form of the same content, folded by `ReportDocument`.

use report_core::CellValue;
use serde::{Deserialize, Serialize};

use crate::definition::{ColumnSpec, ValueKind};
use crate::totals::TotalsVector;

// ============================================================================
// HEADINGS
// ============================================================================

/// Styling hint for a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingStyle {
    /// Bare group value, styled as a section heading.
    Section,
    /// "Field: value" heading.
    Labelled,
}

impl Default for HeadingStyle {
    fn default() -> Self {
        HeadingStyle::Section
    }
}

/// A group-boundary heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupHeading {
    /// Nesting level, 0 for the outermost grouping field.
    pub depth: usize,

    /// Identifier of the grouping field.
    pub field: String,

    /// The group key this heading introduces.
    pub value: CellValue,

    /// Text to display.
    pub text: String,

    pub style: HeadingStyle,
}

// ============================================================================
// TABLES
// ============================================================================

/// Describes one visible column of a detail table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHeader {
    /// Position in the dataset schema.
    pub index: usize,
    pub name: String,
    pub label: String,
    pub kind: ValueKind,
    pub total: bool,
    pub width: Option<u16>,
}

impl From<&ColumnSpec> for ColumnHeader {
    fn from(spec: &ColumnSpec) -> Self {
        ColumnHeader {
            index: spec.index,
            name: spec.meta.name.clone(),
            label: spec.meta.display_label().to_string(),
            kind: spec.meta.kind,
            total: spec.meta.total,
            width: spec.meta.width,
        }
    }
}

/// A contiguous block of detail rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub columns: Vec<ColumnHeader>,

    /// Row cells, aligned with `columns`.
    pub rows: Vec<Vec<CellValue>>,

    /// Totals drawn as part of the table itself.
    #[serde(default)]
    pub footer: Option<TotalsVector>,
}

impl TableBlock {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_indices(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.index).collect()
    }
}

// ============================================================================
// TOTALS ROWS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalsKind {
    /// Subtotal beneath one group.
    Group,
    /// Report-level grand total.
    Grand,
}

/// A synthetic row summing flagged columns over the group just rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsRow {
    pub depth: usize,
    pub kind: TotalsKind,
    pub label: String,

    /// Aligned with the visible columns of the detail tables.
    pub totals: TotalsVector,
}

// ============================================================================
// CONTENT STREAM
// ============================================================================

/// One unit of content appended to a sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportContent {
    Heading(GroupHeading),
    Table(TableBlock),
    Totals(TotalsRow),
}

// ============================================================================
// NESTED SECTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionBody {
    Table(TableBlock),
    Children(Vec<ReportSection>),
}

/// A heading, its table or child sections, and its totals row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: Option<GroupHeading>,
    pub body: SectionBody,
    pub totals: Option<TotalsRow>,
}

impl ReportSection {
    pub fn table(&self) -> Option<&TableBlock> {
        match &self.body {
            SectionBody::Table(t) => Some(t),
            SectionBody::Children(_) => None,
        }
    }

    pub fn children(&self) -> &[ReportSection] {
        match &self.body {
            SectionBody::Children(c) => c,
            SectionBody::Table(_) => &[],
        }
    }

    pub fn heading_text(&self) -> Option<&str> {
        self.heading.as_ref().map(|h| h.text.as_str())
    }

    /// Number of detail rows in this section and everything below it.
    pub fn detail_row_count(&self) -> usize {
        match &self.body {
            SectionBody::Table(t) => t.row_count(),
            SectionBody::Children(c) => c.iter().map(ReportSection::detail_row_count).sum(),
        }
    }
}
