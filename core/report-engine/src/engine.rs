//! FILENAME: core/report-engine/src/engine.rs
//! Grouping Engine - The recursive core that turns sorted rows into a report.
//!
//! This module takes a ReportDefinition (configuration) and a Dataset (data)
//! and drives heading/table renderers against an output sink in one forward
//! pass over the rows.
//!
//! Key properties:
//! - The cursor is a plain position returned by every recursive call and
//!   threaded into the next sibling, so each level can be tested alone
//! - The active key stack is passed down explicitly; a group ends when any
//!   enclosing key changes, not only the immediate one
//! - Totals are merged bottom-up with `TotalsAccumulator::merge`
//! - No state survives between runs; the engine is immutable once built

use log::{debug, trace};
use report_core::{CellValue, Dataset, Record};
use smallvec::SmallVec;

use crate::definition::{
    FieldParams, PageBreakPolicy, ReportColumns, ReportDefinition, TotalsPolicy,
};
use crate::error::ReportError;
use crate::heading::{GroupKey, HeadingRenderer, StyledHeading};
use crate::sink::ReportSink;
use crate::table::{DetailTable, TableRenderer, TableRequest};
use crate::totals::TotalsAccumulator;
use crate::view::{ReportContent, TotalsKind, TotalsRow};

// ============================================================================
// TRAVERSAL STATE
// ============================================================================

/// Read position into the dataset. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Cursor(usize);

impl Cursor {
    pub fn start() -> Self {
        Cursor(0)
    }

    pub fn at(position: usize) -> Self {
        Cursor(position)
    }

    pub fn position(self) -> usize {
        self.0
    }

    pub fn is_exhausted(self, dataset: &Dataset) -> bool {
        self.0 >= dataset.len()
    }
}

/// An open group: the key value and the column it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveKey {
    pub column: usize,
    pub value: CellValue,
}

/// Keys of every enclosing, still-open group, outermost first.
pub type ActiveKeys = SmallVec<[ActiveKey; 4]>;

fn keys_match(keys: &[ActiveKey], record: &Record) -> bool {
    keys.iter().all(|k| record.value(k.column).same_key(&k.value))
}

/// Outcome of traversing one level: its totals and where the next sibling
/// starts reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    pub totals: TotalsAccumulator,
    pub cursor: Cursor,
}

// ============================================================================
// REPORT PLAN
// ============================================================================

/// A definition resolved against one dataset: validated once, read-only
/// for the whole pass.
#[derive(Debug, Clone)]
pub struct ReportPlan<'a> {
    pub dataset: &'a Dataset,
    pub columns: ReportColumns,
    /// Schema index of the grouping field for each level.
    pub grouping: Vec<usize>,
    /// Columns shown by headings rather than in tables.
    pub hidden: Vec<usize>,
    pub page_breaks: &'a PageBreakPolicy,
}

impl<'a> ReportPlan<'a> {
    pub fn new(
        definition: &ReportDefinition,
        dataset: &'a Dataset,
        fields: &FieldParams,
        page_breaks: &'a PageBreakPolicy,
    ) -> Result<Self, ReportError> {
        let grouping = definition.grouping.resolve(dataset, fields)?;
        let columns = ReportColumns::resolve(dataset, fields);
        Ok(ReportPlan {
            dataset,
            columns,
            hidden: grouping.clone(),
            grouping,
            page_breaks,
        })
    }

    /// Column indices of every detail table and totals row.
    pub fn visible_columns(&self) -> Vec<usize> {
        self.columns.visible(&self.hidden)
    }

    pub fn depth(&self) -> usize {
        self.grouping.len()
    }
}

// ============================================================================
// GROUPING ENGINE
// ============================================================================

/// Renders nested grouped reports.
pub struct GroupingEngine {
    definition: ReportDefinition,
    headings: Box<dyn HeadingRenderer>,
    tables: Box<dyn TableRenderer>,
}

impl GroupingEngine {
    pub fn new(definition: ReportDefinition) -> Self {
        GroupingEngine {
            definition,
            headings: Box::new(StyledHeading),
            tables: Box::new(DetailTable),
        }
    }

    pub fn with_heading_renderer(mut self, renderer: impl HeadingRenderer + 'static) -> Self {
        self.headings = Box::new(renderer);
        self
    }

    pub fn with_table_renderer(mut self, renderer: impl TableRenderer + 'static) -> Self {
        self.tables = Box::new(renderer);
        self
    }

    pub fn definition(&self) -> &ReportDefinition {
        &self.definition
    }

    /// Runs a full report over `dataset` and returns the grand totals.
    ///
    /// Configuration errors are reported before anything reaches the sink.
    pub fn run(
        &self,
        dataset: &Dataset,
        fields: &FieldParams,
        page_breaks: &PageBreakPolicy,
        sink: &mut dyn ReportSink,
    ) -> Result<TotalsAccumulator, ReportError> {
        let plan = ReportPlan::new(&self.definition, dataset, fields, page_breaks)?;
        debug!(
            "grouped report: {} rows, {} grouping level(s)",
            dataset.len(),
            plan.depth()
        );

        let mut active = ActiveKeys::new();
        let outcome = self.traverse(&plan, Cursor::start(), 0, &mut active, sink)?;

        if self.definition.draw_grand_total && !outcome.totals.is_empty() {
            sink.add(ReportContent::Totals(TotalsRow {
                depth: 0,
                kind: TotalsKind::Grand,
                label: self.definition.grand_total_label.clone(),
                totals: outcome.totals.to_vector(&plan.visible_columns()),
            }))?;
        }

        debug!("grouped report finished at row {}", outcome.cursor.position());
        Ok(outcome.totals)
    }

    /// Traverses one nesting level starting at `cursor`.
    ///
    /// Consumes groups at `level` for as long as every key in `active` (the
    /// enclosing groups) still matches the row under the cursor. `active` is
    /// left exactly as it was passed in.
    pub fn traverse(
        &self,
        plan: &ReportPlan<'_>,
        cursor: Cursor,
        level: usize,
        active: &mut ActiveKeys,
        sink: &mut dyn ReportSink,
    ) -> Result<Traversal, ReportError> {
        let dataset = plan.dataset;
        let mut cursor = cursor;
        let mut accumulated = TotalsAccumulator::new();

        if cursor.is_exhausted(dataset) {
            return Ok(Traversal {
                totals: accumulated,
                cursor,
            });
        }

        let Some(&column) = plan.grouping.get(level) else {
            // No grouping field at all: the remaining run is one headless table
            let (totals, next) = self.detail_run(plan, cursor, active, sink)?;
            self.draw_totals(plan, level, &totals, sink)?;
            return Ok(Traversal { totals, cursor: next });
        };
        let is_leaf = level + 1 == plan.depth();

        loop {
            if plan.page_breaks.breaks_before(level) {
                sink.add_page()?;
            }

            let key = dataset.rows[cursor.position()].value(column).clone();
            if let Some(spec) = plan.columns.get(column) {
                self.headings.render_heading(
                    sink,
                    GroupKey {
                        depth: level,
                        column: spec,
                        value: &key,
                    },
                )?;
            }
            trace!("level {} opens group {:?} at row {}", level, key, cursor.position());

            active.push(ActiveKey { column, value: key });

            let step = if is_leaf {
                self.detail_run(plan, cursor, active, sink)
            } else {
                self.traverse(plan, cursor, level + 1, active, sink)
                    .map(|child| (child.totals, child.cursor))
            };
            active.pop();
            let (totals, next) = step?;
            cursor = next;

            self.draw_totals(plan, level, &totals, sink)?;
            accumulated.merge(&totals);

            if cursor.is_exhausted(dataset) || !keys_match(active, &dataset.rows[cursor.position()]) {
                break;
            }
        }

        Ok(Traversal {
            totals: accumulated,
            cursor,
        })
    }

    /// Hands the run of rows matching every active key to the table renderer.
    fn detail_run(
        &self,
        plan: &ReportPlan<'_>,
        cursor: Cursor,
        active: &ActiveKeys,
        sink: &mut dyn ReportSink,
    ) -> Result<(TotalsAccumulator, Cursor), ReportError> {
        let rows = &plan.dataset.rows;
        let start = cursor.position();
        // The row under the cursor always belongs to the run, so the cursor advances
        let end = rows[start..]
            .iter()
            .position(|record| !keys_match(active, record))
            .map_or(rows.len(), |offset| start + offset)
            .max(start + 1);

        let ignored: SmallVec<[usize; 4]> = active.iter().map(|k| k.column).collect();
        let vector = self.tables.render_table(
            sink,
            TableRequest {
                rows: &rows[start..end],
                columns: &plan.columns,
                ignored: &ignored,
                policy: TotalsPolicy::Auto,
            },
        )?;

        Ok((TotalsAccumulator::from(&vector), Cursor::at(end)))
    }

    fn draw_totals(
        &self,
        plan: &ReportPlan<'_>,
        level: usize,
        totals: &TotalsAccumulator,
        sink: &mut dyn ReportSink,
    ) -> Result<(), ReportError> {
        if !self.definition.draw_totals || totals.is_empty() {
            return Ok(());
        }
        sink.add(ReportContent::Totals(TotalsRow {
            depth: level,
            kind: TotalsKind::Group,
            label: self.definition.totals_label.clone(),
            totals: totals.to_vector(&plan.visible_columns()),
        }))?;
        Ok(())
    }
}

impl Default for GroupingEngine {
    fn default() -> Self {
        Self::new(ReportDefinition::default())
    }
}
