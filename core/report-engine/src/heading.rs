//! FILENAME: core/report-engine/src/heading.rs
//! Group heading strategies.

use report_core::CellValue;

use crate::definition::ColumnSpec;
use crate::error::SinkError;
use crate::sink::ReportSink;
use crate::view::{GroupHeading, HeadingStyle, ReportContent};

/// The group boundary a heading is drawn for.
#[derive(Debug, Clone, Copy)]
pub struct GroupKey<'a> {
    pub depth: usize,
    pub column: &'a ColumnSpec,
    pub value: &'a CellValue,
}

impl GroupKey<'_> {
    /// Display text for the key; empty keys read "(blank)".
    pub fn value_label(&self) -> String {
        if self.value.is_empty() {
            "(blank)".to_string()
        } else {
            self.value.display_value()
        }
    }

    fn heading(&self, text: String, style: HeadingStyle) -> GroupHeading {
        GroupHeading {
            depth: self.depth,
            field: self.column.meta.name.clone(),
            value: self.value.clone(),
            text,
            style,
        }
    }
}

/// Strategy for drawing a group heading.
pub trait HeadingRenderer {
    fn render_heading(&self, sink: &mut dyn ReportSink, key: GroupKey<'_>) -> Result<(), SinkError>;
}

impl<F> HeadingRenderer for F
where
    F: Fn(&mut dyn ReportSink, GroupKey<'_>) -> Result<(), SinkError>,
{
    fn render_heading(&self, sink: &mut dyn ReportSink, key: GroupKey<'_>) -> Result<(), SinkError> {
        self(sink, key)
    }
}

/// Default heading: the group value on its own, styled as a section heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledHeading;

impl HeadingRenderer for StyledHeading {
    fn render_heading(&self, sink: &mut dyn ReportSink, key: GroupKey<'_>) -> Result<(), SinkError> {
        let heading = key.heading(key.value_label(), HeadingStyle::Section);
        sink.add(ReportContent::Heading(heading))
    }
}

/// "Label: value" headings, e.g. "Region: East".
#[derive(Debug, Clone, Default)]
pub struct LabelledHeading {
    pub separator: Option<String>,
}

impl HeadingRenderer for LabelledHeading {
    fn render_heading(&self, sink: &mut dyn ReportSink, key: GroupKey<'_>) -> Result<(), SinkError> {
        let separator = self.separator.as_deref().unwrap_or(": ");
        let text = format!(
            "{}{}{}",
            key.column.meta.display_label(),
            separator,
            key.value_label()
        );
        sink.add(ReportContent::Heading(key.heading(text, HeadingStyle::Labelled)))
    }
}
