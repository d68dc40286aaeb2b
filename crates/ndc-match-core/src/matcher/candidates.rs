//! Per-facility candidate selection and summary rendering.
//!
//! Exact NDC matches take precedence; fuzzy name matches are only considered
//! when a facility has no record with the target's NDC.

use std::collections::BTreeSet;

use crate::models::FacilityRecord;

use super::similarity::token_set_ratio;

/// Number of name-match candidates shown in a summary.
pub const MAX_NAME_CANDIDATES: usize = 3;

/// A facility record with its similarity to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRecord<'a> {
    pub record: &'a FacilityRecord,
    /// Token-set ratio, 0-100
    pub score: f64,
}

/// Outcome of matching one target against one facility.
#[derive(Debug, Clone, PartialEq)]
pub enum FacilityMatch<'a> {
    /// Records sharing the target's NDC, in source order
    Ndc(Vec<&'a FacilityRecord>),
    /// Records at or above the threshold, best first
    Name(Vec<ScoredRecord<'a>>),
    None,
}

impl<'a> FacilityMatch<'a> {
    /// Run the exact phase, then the fuzzy phase if nothing matched exactly.
    pub fn find(
        ndc11: Option<&str>,
        match_key: &str,
        records: &[&'a FacilityRecord],
        fuzzy_threshold: u8,
    ) -> Self {
        let exact = ndc_matches(ndc11, records);
        if !exact.is_empty() {
            return FacilityMatch::Ndc(exact);
        }
        let fuzzy = name_matches(match_key, records, fuzzy_threshold);
        if !fuzzy.is_empty() {
            return FacilityMatch::Name(fuzzy);
        }
        FacilityMatch::None
    }

    /// Render the reviewer-facing summary. Empty means no match.
    pub fn summary(&self) -> String {
        match self {
            FacilityMatch::Ndc(records) => {
                let ndcs: BTreeSet<&str> = records.iter().filter_map(|r| r.ndc11.as_deref()).collect();
                format!("NDC match: {}", ndcs.into_iter().collect::<Vec<_>>().join(", "))
            }
            FacilityMatch::Name(candidates) => {
                let snippets: Vec<String> = candidates
                    .iter()
                    .take(MAX_NAME_CANDIDATES)
                    .map(|c| format!("{} ({}%)", c.record.label(), display_score(c.score)))
                    .collect();
                format!("Name match: {}", snippets.join("; "))
            }
            FacilityMatch::None => String::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, FacilityMatch::None)
    }
}

/// Records whose NDC equals the target's. A target without an NDC matches nothing.
pub fn ndc_matches<'a>(ndc11: Option<&str>, records: &[&'a FacilityRecord]) -> Vec<&'a FacilityRecord> {
    let Some(ndc11) = ndc11 else {
        return Vec::new();
    };
    records
        .iter()
        .copied()
        .filter(|r| r.ndc11.as_deref() == Some(ndc11))
        .collect()
}

/// Records scoring at or above `threshold`, sorted by descending score.
///
/// Ties keep source order. Records with an empty match string are skipped.
pub fn name_matches<'a>(match_key: &str, records: &[&'a FacilityRecord], threshold: u8) -> Vec<ScoredRecord<'a>> {
    let threshold = f64::from(threshold);
    let mut candidates: Vec<ScoredRecord<'a>> = records
        .iter()
        .copied()
        .filter(|r| !r.match_string.is_empty())
        .map(|record| ScoredRecord {
            record,
            score: token_set_ratio(match_key, &record.match_string),
        })
        .filter(|c| c.score >= threshold)
        .collect();

    // Stable sort: equal scores stay in encounter order
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Whole-percent score shown to reviewers.
fn display_score(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}
