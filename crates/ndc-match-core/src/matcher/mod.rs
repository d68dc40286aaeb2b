//! Matching engine: target items against facility purchase histories.
//!
//! Pipeline: Parse → Enrich (optional) → NDC match → Name match → Summary

mod candidates;
mod index;
mod similarity;

pub use candidates::*;
pub use index::*;
pub use similarity::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enrichment::{enrich_if_eligible, Enricher};
use crate::models::{
    DateRange, FacilityIndex, FacilityRecord, FacilitySummary, FacilityTable, MatchResult, Row, Table,
};
use crate::parsing::{normalize_ndc, parse_description};

/// Minimum token-set ratio for a name match.
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 88;

/// Default description column in both target and history tables.
pub const DEFAULT_DESCRIPTION_COLUMN: &str = "Drug Name / Strength / Dosage Form";

pub const DEFAULT_NDC_COLUMN: &str = "NDC";

pub const DEFAULT_PO_DATE_COLUMN: &str = "PO Processing Date";

pub const DEFAULT_COMMENTS_COLUMN: &str = "Comments";

/// Matcher errors.
#[derive(Error, Debug, PartialEq)]
pub enum MatcherError {
    #[error("Fuzzy threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(u8),
}

pub type MatcherResult<T> = Result<T, MatcherError>;

/// Column names in facility history tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryColumns {
    pub description: String,
    pub ndc: String,
    /// Purchase-order date column; `None` disables date filtering
    pub po_date: Option<String>,
}

impl Default for HistoryColumns {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION_COLUMN.into(),
            ndc: DEFAULT_NDC_COLUMN.into(),
            po_date: Some(DEFAULT_PO_DATE_COLUMN.into()),
        }
    }
}

/// Column names in the target item table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetColumns {
    pub description: String,
    pub ndc: String,
    /// Free-text annotation carried into the report
    pub comments: Option<String>,
}

impl Default for TargetColumns {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION_COLUMN.into(),
            ndc: DEFAULT_NDC_COLUMN.into(),
            comments: Some(DEFAULT_COMMENTS_COLUMN.into()),
        }
    }
}

/// Matcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherConfig {
    pub history: HistoryColumns,
    /// Token-set ratio (0-100) a name match must reach
    pub fuzzy_threshold: u8,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            history: HistoryColumns::default(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl MatcherConfig {
    /// Set the fuzzy threshold, rejecting values above 100.
    pub fn with_fuzzy_threshold(mut self, threshold: u8) -> MatcherResult<Self> {
        validate_threshold(threshold)?;
        self.fuzzy_threshold = threshold;
        Ok(self)
    }
}

fn validate_threshold(threshold: u8) -> MatcherResult<()> {
    if threshold > 100 {
        return Err(MatcherError::InvalidThreshold(threshold));
    }
    Ok(())
}

/// Matches target items against an immutable facility index.
pub struct DrugMatcher<'e> {
    index: FacilityIndex,
    fuzzy_threshold: u8,
    enricher: Option<&'e dyn Enricher>,
}

impl<'e> DrugMatcher<'e> {
    /// Index facility histories and create a matcher.
    pub fn new(
        facilities: &[FacilityTable],
        config: &MatcherConfig,
        enricher: Option<&'e dyn Enricher>,
    ) -> MatcherResult<Self> {
        validate_threshold(config.fuzzy_threshold)?;
        let index = build_index(facilities, &config.history, enricher);
        Ok(Self {
            index,
            fuzzy_threshold: config.fuzzy_threshold,
            enricher,
        })
    }

    pub fn index(&self) -> &FacilityIndex {
        &self.index
    }

    /// Match every target row, in source order.
    pub fn build_report(&self, targets: &Table, columns: &TargetColumns, range: &DateRange) -> Vec<MatchResult> {
        let results: Vec<MatchResult> = targets
            .rows
            .iter()
            .map(|row| self.match_row(row, columns, range))
            .collect();

        tracing::info!(
            targets = results.len(),
            facilities = self.index.len(),
            matched = results.iter().filter(|r| r.has_any_match()).count(),
            date_filtered = !range.is_unbounded(),
            "built match report"
        );
        results
    }

    /// Match a single target row.
    pub fn match_row(&self, row: &Row, columns: &TargetColumns, range: &DateRange) -> MatchResult {
        let comments = columns
            .comments
            .as_deref()
            .and_then(|column| row.get(column).as_optional_text());
        self.match_item(&row.text(&columns.description), &row.text(&columns.ndc), comments, range)
    }

    /// Match one target item given its raw description and identifier.
    pub fn match_item(
        &self,
        description: &str,
        raw_ndc: &str,
        comments: Option<String>,
        range: &DateRange,
    ) -> MatchResult {
        let ndc11 = normalize_ndc(raw_ndc);
        let components = enrich_if_eligible(parse_description(description), ndc11.as_deref(), self.enricher);

        let facility_matches = self
            .index
            .iter()
            .map(|facility| {
                let records = filter_by_date(&facility.records, range);
                let outcome = FacilityMatch::find(
                    ndc11.as_deref(),
                    &components.match_key,
                    &records,
                    self.fuzzy_threshold,
                );
                tracing::trace!(
                    facility = %facility.name,
                    candidates = records.len(),
                    matched = outcome.is_match(),
                    "matched target against facility"
                );
                FacilitySummary {
                    facility: facility.name.clone(),
                    summary: outcome.summary(),
                }
            })
            .collect();

        MatchResult {
            drug_text: description.to_string(),
            ndc11,
            comments,
            drug_name: components.name,
            strength: components.strength,
            dosage_form: components.dosage_form,
            facility_matches,
        }
    }
}

/// Records inside the inclusive range; undated records always pass.
fn filter_by_date<'a>(records: &'a [FacilityRecord], range: &DateRange) -> Vec<&'a FacilityRecord> {
    records.iter().filter(|r| range.contains(r.po_date)).collect()
}
