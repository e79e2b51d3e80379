//! FILENAME: core/report-engine/src/definition.rs
//! Report Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a grouped report.
//! These structures are designed to be:
//! - Serializable (report jobs are plain JSON documents)
//! - Read-only for the whole traversal
//! - Resolved against a dataset schema exactly once, before any output

use std::collections::BTreeSet;

use report_core::Dataset;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Deepest nesting a report may request.
pub const MAX_GROUPING_DEPTH: usize = 10;

// ============================================================================
// FIELD METADATA
// ============================================================================

/// The kind of value a column holds. Drives text alignment only; totals
/// coercion reads the cell value itself, so a totalled column declared
/// `text` still sums numeric and separator-grouped text cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Number,
    Text,
    Date,
}

impl Default for ValueKind {
    fn default() -> Self {
        ValueKind::Text
    }
}

/// Static description of one reportable column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Field identifier, matching a dataset column name.
    pub name: String,

    /// Header label. Falls back to `name` when empty.
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub kind: ValueKind,

    /// Whether this column participates in sum aggregation.
    #[serde(default)]
    pub total: bool,

    /// Display width in characters.
    #[serde(default)]
    pub width: Option<u16>,
}

impl FieldMeta {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        FieldMeta {
            name: name.into(),
            label: label.into(),
            kind: ValueKind::Text,
            total: false,
            width: None,
        }
    }

    /// A numeric column that is summed into totals rows.
    pub fn totalled(name: impl Into<String>, label: impl Into<String>) -> Self {
        FieldMeta {
            kind: ValueKind::Number,
            total: true,
            ..FieldMeta::new(name, label)
        }
    }

    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Per-field metadata for a report, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldParams {
    fields: Vec<FieldMeta>,
}

impl FieldParams {
    pub fn new(fields: Vec<FieldMeta>) -> Self {
        FieldParams { fields }
    }

    pub fn push(&mut self, field: FieldMeta) {
        self.fields.push(field);
    }

    pub fn get(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldMeta> for FieldParams {
    fn from_iter<I: IntoIterator<Item = FieldMeta>>(iter: I) -> Self {
        FieldParams::new(iter.into_iter().collect())
    }
}

// ============================================================================
// RESOLVED COLUMNS
// ============================================================================

/// A dataset column paired with the metadata that describes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Position in the dataset schema.
    pub index: usize,
    pub meta: FieldMeta,
}

/// Every dataset column with its metadata, in schema order.
///
/// Columns the caller gave no metadata for are shown as plain text and
/// never totalled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportColumns {
    columns: Vec<ColumnSpec>,
}

impl ReportColumns {
    pub fn resolve(dataset: &Dataset, params: &FieldParams) -> Self {
        let by_name: FxHashMap<&str, &FieldMeta> =
            params.iter().map(|f| (f.name.as_str(), f)).collect();

        let columns = dataset
            .columns
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let meta = by_name
                    .get(name.as_str())
                    .map(|m| (*m).clone())
                    .unwrap_or_else(|| FieldMeta::new(name.clone(), name.clone()));
                ColumnSpec { index, meta }
            })
            .collect();

        ReportColumns { columns }
    }

    pub fn get(&self, index: usize) -> Option<&ColumnSpec> {
        self.columns.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter()
    }

    /// Column indices that remain after removing `ignored`, in schema order.
    pub fn visible(&self, ignored: &[usize]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|c| c.index)
            .filter(|i| !ignored.contains(i))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ============================================================================
// GROUPING SPEC
// ============================================================================

/// Ordered grouping fields, outermost first.
///
/// An empty entry terminates the list (the leaf level); anything after it is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct GroupingSpec {
    fields: Vec<String>,
}

impl GroupingSpec {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(Into::into)
            .take_while(|f: &String| !f.trim().is_empty())
            .collect();
        GroupingSpec { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The field for `level`, or `None` at and below the leaf level.
    pub fn field(&self, level: usize) -> Option<&str> {
        self.fields.get(level).map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Maps every grouping field to its dataset column index.
    ///
    /// Fails before any output is produced when a field is missing from the
    /// schema or from the metadata, repeated, or the nesting is too deep.
    pub fn resolve(&self, dataset: &Dataset, params: &FieldParams) -> Result<Vec<usize>, ReportError> {
        if self.fields.len() > MAX_GROUPING_DEPTH {
            return Err(ReportError::TooManyLevels {
                levels: self.fields.len(),
                max: MAX_GROUPING_DEPTH,
            });
        }

        let mut seen = FxHashSet::default();
        let mut indices = Vec::with_capacity(self.fields.len());
        for name in &self.fields {
            let index = dataset
                .column_index(name)
                .ok_or_else(|| ReportError::UnknownGroupingField(name.clone()))?;
            if params.get(name).is_none() {
                return Err(ReportError::MissingFieldMetadata(name.clone()));
            }
            if !seen.insert(index) {
                return Err(ReportError::DuplicateGroupingField(name.clone()));
            }
            indices.push(index);
        }
        Ok(indices)
    }
}

impl From<Vec<String>> for GroupingSpec {
    fn from(fields: Vec<String>) -> Self {
        GroupingSpec::new(fields)
    }
}

impl From<GroupingSpec> for Vec<String> {
    fn from(spec: GroupingSpec) -> Self {
        spec.fields
    }
}

// ============================================================================
// POLICIES
// ============================================================================

/// Nesting levels (0-based) that start a new output page before their headings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageBreakPolicy {
    levels: BTreeSet<usize>,
}

impl PageBreakPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_break(mut self, level: usize) -> Self {
        self.levels.insert(level);
        self
    }

    pub fn set(&mut self, level: usize, enabled: bool) {
        if enabled {
            self.levels.insert(level);
        } else {
            self.levels.remove(&level);
        }
    }

    pub fn breaks_before(&self, level: usize) -> bool {
        self.levels.contains(&level)
    }
}

impl FromIterator<usize> for PageBreakPolicy {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        PageBreakPolicy {
            levels: iter.into_iter().collect(),
        }
    }
}

/// Whether a table renderer computes totals for the rows it draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalsPolicy {
    /// No totals; the returned vector is all blanks.
    None,
    /// Compute and return totals.
    Auto,
    /// Compute, return, and attach them to the table as a footer.
    AutoWithFooter,
}

impl TotalsPolicy {
    pub fn computes(self) -> bool {
        !matches!(self, TotalsPolicy::None)
    }
}

impl Default for TotalsPolicy {
    fn default() -> Self {
        TotalsPolicy::Auto
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_totals_label() -> String {
    "Total".to_string()
}

fn default_grand_total_label() -> String {
    "Grand Total".to_string()
}

/// The complete, serializable definition of a grouped report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDefinition {
    #[serde(default)]
    pub title: Option<String>,

    /// Grouping fields, outermost first.
    #[serde(default)]
    pub grouping: GroupingSpec,

    /// Draw a totals row beneath every group.
    #[serde(default = "default_true")]
    pub draw_totals: bool,

    /// Draw a report-level grand total after the last group.
    #[serde(default)]
    pub draw_grand_total: bool,

    #[serde(default = "default_totals_label")]
    pub totals_label: String,

    #[serde(default = "default_grand_total_label")]
    pub grand_total_label: String,
}

impl ReportDefinition {
    pub fn new(grouping: GroupingSpec) -> Self {
        ReportDefinition {
            title: None,
            grouping,
            draw_totals: true,
            draw_grand_total: false,
            totals_label: default_totals_label(),
            grand_total_label: default_grand_total_label(),
        }
    }

    pub fn grouped_by<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(GroupingSpec::new(fields))
    }
}

impl Default for ReportDefinition {
    fn default() -> Self {
        Self::new(GroupingSpec::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_core::{CellValue, Record};

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Region".into(), "Product".into(), "Amount".into()],
            vec![Record::new(vec![
                CellValue::text("East"),
                CellValue::text("A"),
                CellValue::Number(100.0),
            ])],
        )
    }

    fn params() -> FieldParams {
        FieldParams::new(vec![
            FieldMeta::new("Region", "Region"),
            FieldMeta::new("Product", "Product"),
            FieldMeta::totalled("Amount", "Amount"),
        ])
    }

    #[test]
    fn test_grouping_spec_stops_at_empty_entry() {
        let spec = GroupingSpec::new(vec!["Region", "", "Product"]);
        assert_eq!(spec.fields(), &["Region".to_string()]);
        assert_eq!(spec.field(1), None);
    }

    #[test]
    fn test_resolve_grouping_indices() {
        let spec = GroupingSpec::new(vec!["Product", "Region"]);
        assert_eq!(spec.resolve(&dataset(), &params()).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_resolve_rejects_unknown_field() {
        let spec = GroupingSpec::new(vec!["Country"]);
        let err = spec.resolve(&dataset(), &params()).unwrap_err();
        assert!(matches!(err, ReportError::UnknownGroupingField(ref f) if f == "Country"));
    }

    #[test]
    fn test_resolve_rejects_field_without_metadata() {
        let spec = GroupingSpec::new(vec!["Product"]);
        let params = FieldParams::new(vec![FieldMeta::new("Region", "Region")]);
        let err = spec.resolve(&dataset(), &params).unwrap_err();
        assert!(matches!(err, ReportError::MissingFieldMetadata(_)));
    }

    #[test]
    fn test_resolve_rejects_duplicates_and_depth() {
        let spec = GroupingSpec::new(vec!["Region", "Region"]);
        assert!(matches!(
            spec.resolve(&dataset(), &params()),
            Err(ReportError::DuplicateGroupingField(_))
        ));

        let deep = GroupingSpec::new(vec!["Region"; MAX_GROUPING_DEPTH + 1]);
        assert!(matches!(
            deep.resolve(&dataset(), &params()),
            Err(ReportError::TooManyLevels { .. })
        ));
    }

    #[test]
    fn test_columns_default_metadata() {
        let params = FieldParams::new(vec![FieldMeta::totalled("Amount", "Sales")]);
        let columns = ReportColumns::resolve(&dataset(), &params);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns.get(0).unwrap().meta.display_label(), "Region");
        assert!(!columns.get(0).unwrap().meta.total);
        assert_eq!(columns.get(2).unwrap().meta.display_label(), "Sales");
        assert_eq!(columns.visible(&[0]), vec![1, 2]);
    }

    #[test]
    fn test_definition_defaults_from_json() {
        let def: ReportDefinition = serde_json::from_str(r#"{ "grouping": ["Region", ""] }"#).unwrap();
        assert_eq!(def.grouping.depth(), 1);
        assert!(def.draw_totals);
        assert!(!def.draw_grand_total);
        assert_eq!(def.totals_label, "Total");
    }

    #[test]
    fn test_page_break_policy() {
        let mut policy = PageBreakPolicy::new().with_break(0);
        assert!(policy.breaks_before(0));
        assert!(!policy.breaks_before(1));
        policy.set(0, false);
        assert!(!policy.breaks_before(0));
    }
}
