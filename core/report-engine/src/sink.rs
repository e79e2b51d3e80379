//! FILENAME: core/report-engine/src/sink.rs
//! Output sinks.
//!
//! The traversal only knows two capabilities: append a piece of content and
//! start a new page. `ReportDocument` is the in-memory sink used by the
//! format renderers and by tests.

use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::view::{
    GroupHeading, ReportContent, ReportSection, SectionBody, TableBlock, TotalsKind, TotalsRow,
};

/// Destination for report content.
pub trait ReportSink {
    fn add(&mut self, content: ReportContent) -> Result<(), SinkError>;

    fn add_page(&mut self) -> Result<(), SinkError>;
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn add(&mut self, content: ReportContent) -> Result<(), SinkError> {
        (**self).add(content)
    }

    fn add_page(&mut self) -> Result<(), SinkError> {
        (**self).add_page()
    }
}

// ============================================================================
// REPORT DOCUMENT
// ============================================================================

/// Collects content page by page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: Option<String>,
    pages: Vec<Vec<ReportContent>>,
}

impl ReportDocument {
    pub fn new() -> Self {
        ReportDocument {
            title: None,
            pages: vec![Vec::new()],
        }
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        ReportDocument {
            title: Some(title.into()),
            ..Self::new()
        }
    }

    pub fn pages(&self) -> &[Vec<ReportContent>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All content in emission order, across pages.
    pub fn contents(&self) -> impl Iterator<Item = &ReportContent> {
        self.pages.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Vec::is_empty)
    }

    pub fn headings(&self) -> impl Iterator<Item = &GroupHeading> {
        self.contents().filter_map(|c| match c {
            ReportContent::Heading(h) => Some(h),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.contents().filter_map(|c| match c {
            ReportContent::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn totals_rows(&self) -> impl Iterator<Item = &TotalsRow> {
        self.contents().filter_map(|c| match c {
            ReportContent::Totals(t) => Some(t),
            _ => None,
        })
    }

    pub fn grand_total(&self) -> Option<&TotalsRow> {
        self.totals_rows().find(|t| t.kind == TotalsKind::Grand)
    }

    /// Folds the flat content stream into nested sections.
    ///
    /// A heading at depth `d` opens a section and closes every open section
    /// at depth `d` or deeper. A totals row closes the section at its depth.
    /// A table with no open heading becomes a headless section. Grand totals
    /// are not part of any section.
    pub fn sections(&self) -> Vec<ReportSection> {
        let mut roots = Vec::new();
        let mut stack: Vec<OpenSection> = Vec::new();

        for content in self.contents() {
            match content {
                ReportContent::Heading(heading) => {
                    close_to(&mut stack, &mut roots, heading.depth);
                    stack.push(OpenSection::new(heading.depth, Some(heading.clone())));
                }
                ReportContent::Table(table) => {
                    let fits_open = matches!(
                        stack.last(),
                        Some(top) if top.table.is_none() && top.children.is_empty()
                    );
                    if fits_open {
                        if let Some(top) = stack.last_mut() {
                            top.table = Some(table.clone());
                        }
                    } else {
                        let mut headless = OpenSection::new(stack.len(), None);
                        headless.table = Some(table.clone());
                        stack.push(headless);
                    }
                }
                ReportContent::Totals(row) if row.kind == TotalsKind::Grand => {}
                ReportContent::Totals(row) => {
                    close_to(&mut stack, &mut roots, row.depth + 1);
                    let attach = matches!(
                        stack.last(),
                        Some(top) if top.depth == row.depth && top.totals.is_none()
                    );
                    if attach {
                        if let Some(mut top) = stack.pop() {
                            top.totals = Some(row.clone());
                            place(&mut stack, &mut roots, top.close());
                        }
                    }
                }
            }
        }

        close_to(&mut stack, &mut roots, 0);
        roots
    }
}

impl Default for ReportDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for ReportDocument {
    fn add(&mut self, content: ReportContent) -> Result<(), SinkError> {
        match self.pages.last_mut() {
            Some(page) => page.push(content),
            None => self.pages.push(vec![content]),
        }
        Ok(())
    }

    /// Starts a new page unless the current one is still empty.
    fn add_page(&mut self) -> Result<(), SinkError> {
        if self.pages.last().map_or(true, |p| !p.is_empty()) {
            self.pages.push(Vec::new());
        }
        Ok(())
    }
}

// ============================================================================
// SECTION FOLDING
// ============================================================================

struct OpenSection {
    depth: usize,
    heading: Option<GroupHeading>,
    table: Option<TableBlock>,
    children: Vec<ReportSection>,
    totals: Option<TotalsRow>,
}

impl OpenSection {
    fn new(depth: usize, heading: Option<GroupHeading>) -> Self {
        OpenSection {
            depth,
            heading,
            table: None,
            children: Vec::new(),
            totals: None,
        }
    }

    fn close(self) -> ReportSection {
        let body = match self.table {
            Some(table) if self.children.is_empty() => SectionBody::Table(table),
            _ => SectionBody::Children(self.children),
        };
        ReportSection {
            heading: self.heading,
            body,
            totals: self.totals,
        }
    }
}

fn place(stack: &mut [OpenSection], roots: &mut Vec<ReportSection>, section: ReportSection) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(section),
        None => roots.push(section),
    }
}

/// Closes every open section at `depth` or deeper.
fn close_to(stack: &mut Vec<OpenSection>, roots: &mut Vec<ReportSection>, depth: usize) {
    while stack.last().map_or(false, |s| s.depth >= depth) {
        if let Some(open) = stack.pop() {
            place(stack, roots, open.close());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::totals::TotalsVector;
    use crate::view::HeadingStyle;
    use report_core::CellValue;

    fn heading(depth: usize, text: &str) -> ReportContent {
        ReportContent::Heading(GroupHeading {
            depth,
            field: "F".to_string(),
            value: CellValue::text(text),
            text: text.to_string(),
            style: HeadingStyle::Section,
        })
    }

    fn table(rows: usize) -> ReportContent {
        ReportContent::Table(TableBlock {
            columns: Vec::new(),
            rows: vec![Vec::new(); rows],
            footer: None,
        })
    }

    fn totals(depth: usize) -> ReportContent {
        ReportContent::Totals(TotalsRow {
            depth,
            kind: TotalsKind::Group,
            label: "Total".to_string(),
            totals: TotalsVector::default(),
        })
    }

    #[test]
    fn test_fold_nested_with_totals() {
        let mut doc = ReportDocument::new();
        for c in [
            heading(0, "East"),
            heading(1, "A"),
            table(2),
            totals(1),
            heading(1, "B"),
            table(1),
            totals(1),
            totals(0),
            heading(0, "West"),
            heading(1, "A"),
            table(1),
            totals(1),
            totals(0),
        ] {
            doc.add(c).unwrap();
        }

        let sections = doc.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading_text(), Some("East"));
        assert_eq!(sections[0].children().len(), 2);
        assert!(sections[0].totals.is_some());
        assert_eq!(sections[0].children()[1].heading_text(), Some("B"));
        assert_eq!(sections[0].detail_row_count(), 3);
        assert_eq!(sections[1].detail_row_count(), 1);
    }

    #[test]
    fn test_fold_without_totals_rows() {
        let mut doc = ReportDocument::new();
        for c in [heading(0, "East"), heading(1, "A"), table(1), heading(1, "B"), table(1), heading(0, "West"), heading(1, "A"), table(1)] {
            doc.add(c).unwrap();
        }

        let sections = doc.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].children().len(), 2);
        assert!(sections[0].totals.is_none());
        assert_eq!(sections[1].children().len(), 1);
    }

    #[test]
    fn test_headless_table_with_totals() {
        let mut doc = ReportDocument::new();
        doc.add(table(3)).unwrap();
        doc.add(totals(0)).unwrap();

        let sections = doc.sections();
        assert_eq!(sections.len(), 1);
        assert!(sections[0].heading.is_none());
        assert_eq!(sections[0].table().map(TableBlock::row_count), Some(3));
        assert!(sections[0].totals.is_some());
    }

    #[test]
    fn test_add_page_skips_empty_page() {
        let mut doc = ReportDocument::new();
        doc.add_page().unwrap();
        assert_eq!(doc.page_count(), 1);
        doc.add(heading(0, "East")).unwrap();
        doc.add_page().unwrap();
        doc.add(heading(0, "West")).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.headings().count(), 2);
    }
}
