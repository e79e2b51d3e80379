//! FILENAME: app/report-cli/src/job.rs
//! A report job: definition, field metadata and dataset in one JSON document.

use std::path::Path;

use log::{debug, info};
use report_core::Dataset;
use report_engine::{
    summarize_into, FieldParams, GroupingEngine, PageBreakPolicy, ReportDefinition, ReportDocument,
};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportJob {
    #[serde(default)]
    pub definition: ReportDefinition,

    #[serde(default)]
    pub fields: FieldParams,

    pub dataset: Dataset,

    /// Levels that start a new page. Extended by `--page-break`.
    #[serde(default)]
    pub page_breaks: PageBreakPolicy,
}

impl ReportJob {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let job = Self::from_json(&text)?;
        info!(
            "loaded job {:?}: {} columns, {} rows",
            path,
            job.dataset.column_count(),
            job.dataset.len()
        );
        Ok(job)
    }

    pub fn from_json(text: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Runs the job into an in-memory document: the full grouped report, or
    /// the digest over the first grouping field when `digest` is set.
    pub fn build_document(&self, digest: bool) -> Result<ReportDocument, CliError> {
        let mut document = match &self.definition.title {
            Some(title) => ReportDocument::with_title(title.clone()),
            None => ReportDocument::new(),
        };

        let totals = if digest {
            let primary = self
                .definition
                .grouping
                .field(0)
                .ok_or(CliError::NoPrimaryField)?;
            summarize_into(&mut document, &self.dataset, primary, &self.fields)?
        } else {
            GroupingEngine::new(self.definition.clone()).run(
                &self.dataset,
                &self.fields,
                &self.page_breaks,
                &mut document,
            )?
        };

        debug!(
            "document built: {} page(s), {} totalled column(s)",
            document.page_count(),
            totals.len()
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_engine::{ReportContent, ReportError, TotalValue};

    const JOB: &str = r#"{
        "definition": {
            "title": "Sales",
            "grouping": ["Region", "Product"]
        },
        "fields": [
            {"name": "Region"},
            {"name": "Product", "label": "Item"},
            {"name": "Date", "kind": "date"},
            {"name": "Amount", "kind": "number", "total": true}
        ],
        "dataset": {
            "columns": ["Region", "Product", "Date", "Amount"],
            "rows": [
                ["East", "A", "2024-01-05", 100],
                ["East", "A", "2024-01-09", "1,250"],
                ["East", "B", "2024-02-01", 50],
                ["West", "A", null, 30]
            ]
        }
    }"#;

    #[test]
    fn test_parse_job_defaults() {
        let job = ReportJob::from_json(JOB).unwrap();
        assert!(job.definition.draw_totals);
        assert!(!job.definition.draw_grand_total);
        assert_eq!(job.definition.totals_label, "Total");
        assert_eq!(job.definition.grouping.depth(), 2);
        assert_eq!(job.fields.len(), 4);
        assert_eq!(job.dataset.len(), 4);
        assert_eq!(job.page_breaks, PageBreakPolicy::new());
    }

    #[test]
    fn test_build_grouped_document() {
        let mut job = ReportJob::from_json(JOB).unwrap();
        job.definition.draw_grand_total = true;
        let document = job.build_document(false).unwrap();

        assert_eq!(document.title.as_deref(), Some("Sales"));
        let headings: Vec<&str> = document.headings().map(|h| h.text.as_str()).collect();
        assert_eq!(headings, vec!["East", "A", "B", "West", "A"]);

        let grand = document.grand_total().unwrap();
        assert_eq!(grand.totals.get(3), Some(TotalValue::Sum(1430.0)));
    }

    #[test]
    fn test_build_digest_document() {
        let job = ReportJob::from_json(JOB).unwrap();
        let document = job.build_document(true).unwrap();

        assert_eq!(document.headings().count(), 0);
        let table = document.tables().next().unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], report_core::CellValue::Number(1400.0));
        assert!(document
            .contents()
            .all(|c| matches!(c, ReportContent::Table(_))));
    }

    #[test]
    fn test_digest_without_grouping() {
        let mut job = ReportJob::from_json(JOB).unwrap();
        job.definition.grouping = Default::default();
        assert!(matches!(job.build_document(true), Err(CliError::NoPrimaryField)));
    }

    #[test]
    fn test_unknown_grouping_field() {
        let mut job = ReportJob::from_json(JOB).unwrap();
        job.definition = ReportDefinition::grouped_by(["Country"]);
        assert!(matches!(
            job.build_document(false),
            Err(CliError::Report(ReportError::UnknownGroupingField(_)))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReportJob::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }
}
