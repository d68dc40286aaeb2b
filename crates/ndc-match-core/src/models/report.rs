//! Match report rows.

use serde::{Deserialize, Serialize};

/// Summary for one facility, in index order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacilitySummary {
    pub facility: String,
    /// Empty when no match was found
    pub summary: String,
}

/// One report row per target item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    /// Target description text as read
    pub drug_text: String,
    /// Canonical NDC of the target item
    pub ndc11: Option<String>,
    /// Free-text annotation carried from the target row
    pub comments: Option<String>,
    pub drug_name: String,
    pub strength: String,
    pub dosage_form: Option<String>,
    /// Exactly one entry per indexed facility
    pub facility_matches: Vec<FacilitySummary>,
}

impl MatchResult {
    /// Summary for a facility; `None` only if the facility is not indexed.
    pub fn summary_for(&self, facility: &str) -> Option<&str> {
        self.facility_matches
            .iter()
            .find(|m| m.facility == facility)
            .map(|m| m.summary.as_str())
    }

    /// Check if any facility reported an NDC or name match.
    pub fn has_any_match(&self) -> bool {
        self.facility_matches.iter().any(|m| !m.summary.is_empty())
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
