//! Facility purchase-history records and the per-facility index.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::StructuredDescription;

/// One parsed row of a facility's purchase-order history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacilityRecord {
    /// Facility the row belongs to
    pub facility: String,
    /// Canonical 11-digit NDC, if the row's identifier could be normalized
    pub ndc11: Option<String>,
    /// Description text as read from the row
    pub description: String,
    /// Purchase-order date, if present and parseable
    pub po_date: Option<NaiveDate>,
    /// Parsed (and possibly enriched) description
    pub components: StructuredDescription,
    /// Text used for fuzzy comparison
    pub match_string: String,
}

impl FacilityRecord {
    /// Label shown in name-match summaries: the NDC if known, else the raw description.
    pub fn label(&self) -> &str {
        self.ndc11.as_deref().unwrap_or(&self.description)
    }
}

/// Records for a single facility, in source order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacilityHistory {
    pub name: String,
    pub records: Vec<FacilityRecord>,
}

/// Read-only mapping from facility name to its ordered records.
///
/// Facility order is insertion order and drives report column order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FacilityIndex {
    facilities: Vec<FacilityHistory>,
}

impl FacilityIndex {
    /// Add a facility. A repeated name replaces the earlier history in place.
    pub(crate) fn insert(&mut self, name: String, records: Vec<FacilityRecord>) {
        if let Some(existing) = self.facilities.iter_mut().find(|f| f.name == name) {
            existing.records = records;
        } else {
            self.facilities.push(FacilityHistory { name, records });
        }
    }

    /// Facility names in index order.
    pub fn facility_names(&self) -> impl Iterator<Item = &str> {
        self.facilities.iter().map(|f| f.name.as_str())
    }

    pub fn records(&self, facility: &str) -> Option<&[FacilityRecord]> {
        self.facilities
            .iter()
            .find(|f| f.name == facility)
            .map(|f| f.records.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FacilityHistory> {
        self.facilities.iter()
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Total number of records across all facilities.
    pub fn record_count(&self) -> usize {
        self.facilities.iter().map(|f| f.records.len()).sum()
    }
}
