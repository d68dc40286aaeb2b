//! Report column layout for downstream sinks (CSV, spreadsheets, JSON).

use serde::{Deserialize, Serialize};

use crate::models::{FacilityIndex, MatchResult};

/// Fixed leading columns, in output order.
pub const DRUG_COLUMN: &str = "Drug";
pub const NDC_COLUMN: &str = "NDC";
pub const DRUG_NAME_COLUMN: &str = "Drug Name";
pub const STRENGTH_COLUMN: &str = "Strength";
pub const DOSAGE_FORM_COLUMN: &str = "Dosage Form";

/// Header and row layout of a match report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportLayout {
    /// Header for the annotation column, if one is carried
    pub comments_column: Option<String>,
    /// Facility columns in index order
    pub facilities: Vec<String>,
}

impl ReportLayout {
    pub fn new(index: &FacilityIndex, comments_column: Option<String>) -> Self {
        Self {
            comments_column,
            facilities: index.facility_names().map(String::from).collect(),
        }
    }

    /// Column headers, all distinct.
    ///
    /// A comments or facility column named like an earlier header gets a
    /// ` (comments)` or ` (facility)` suffix.
    pub fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = [DRUG_COLUMN, NDC_COLUMN, DRUG_NAME_COLUMN, STRENGTH_COLUMN, DOSAGE_FORM_COLUMN]
            .iter()
            .map(|h| h.to_string())
            .collect();
        if let Some(comments) = &self.comments_column {
            headers.push(unique_header(&headers, comments, "comments"));
        }
        for facility in &self.facilities {
            let header = unique_header(&headers, facility, "facility");
            headers.push(header);
        }
        headers
    }

    /// One cell per header. Absent values and unknown facilities are empty.
    pub fn row(&self, result: &MatchResult) -> Vec<String> {
        let mut cells = vec![
            result.drug_text.clone(),
            result.ndc11.clone().unwrap_or_default(),
            result.drug_name.clone(),
            result.strength.clone(),
            result.dosage_form.clone().unwrap_or_default(),
        ];
        if self.comments_column.is_some() {
            cells.push(result.comments.clone().unwrap_or_default());
        }
        cells.extend(
            self.facilities
                .iter()
                .map(|f| result.summary_for(f).unwrap_or_default().to_string()),
        );
        cells
    }

    /// All rows of a report.
    pub fn rows(&self, results: &[MatchResult]) -> Vec<Vec<String>> {
        results.iter().map(|r| self.row(r)).collect()
    }

    /// Export a report to JSON: an array of header → value objects.
    pub fn to_json(&self, results: &[MatchResult]) -> Result<String, serde_json::Error> {
        let headers = self.headers();
        let records: Vec<serde_json::Map<String, serde_json::Value>> = results
            .iter()
            .map(|result| {
                headers
                    .iter()
                    .cloned()
                    .zip(self.row(result).into_iter().map(serde_json::Value::String))
                    .collect()
            })
            .collect();
        serde_json::to_string_pretty(&records)
    }
}

fn unique_header(taken: &[String], name: &str, role: &str) -> String {
    let is_taken = |candidate: &str| taken.iter().any(|h| h == candidate);
    if !is_taken(name) {
        return name.to_string();
    }
    let mut candidate = format!("{name} ({role})");
    let mut n = 2;
    while is_taken(&candidate) {
        candidate = format!("{name} ({role} {n})");
        n += 1;
    }
    candidate
}
