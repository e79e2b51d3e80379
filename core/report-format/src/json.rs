//! FILENAME: core/report-format/src/json.rs
//! JSON renderer: the flat page stream plus the folded section tree.

use report_engine::{ReportContent, ReportDocument, ReportSection, TotalsRow};
use serde::Serialize;

use crate::error::FormatError;
use crate::registry::ReportRenderer;

#[derive(Debug, Clone)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        JsonRenderer { pretty: true }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    title: Option<&'a str>,
    pages: &'a [Vec<ReportContent>],
    sections: Vec<ReportSection>,
    grand_total: Option<&'a TotalsRow>,
}

impl ReportRenderer for JsonRenderer {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, FormatError> {
        let report = JsonReport {
            title: document.title.as_deref(),
            pages: document.pages(),
            sections: document.sections(),
            grand_total: document.grand_total(),
        };
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&report)?
        } else {
            serde_json::to_vec(&report)?
        };
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_json_structure() {
        let document = crate::tests::sample_document();
        let bytes = JsonRenderer { pretty: false }.render(&document).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["title"], "Sales");
        assert_eq!(json["pages"].as_array().unwrap().len(), 2);
        assert_eq!(json["pages"][0][0]["type"], "heading");
        assert_eq!(json["pages"][0][0]["text"], "East");

        let sections = json["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1]["heading"]["text"], "West");
        assert_eq!(sections[1]["body"]["table"]["rows"][0][1], 30.0);
        assert_eq!(json["grand_total"]["label"], "Grand Total");
    }
}
