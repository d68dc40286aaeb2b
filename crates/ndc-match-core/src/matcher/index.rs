//! Facility index construction.

use crate::enrichment::{enrich_if_eligible, Enricher};
use crate::models::{parse_date, FacilityIndex, FacilityRecord, FacilityTable, Row};
use crate::parsing::{normalize_ndc, parse_description};

use super::HistoryColumns;

/// Parse every facility history row once. No row is dropped.
pub fn build_index(
    facilities: &[FacilityTable],
    columns: &HistoryColumns,
    enricher: Option<&dyn Enricher>,
) -> FacilityIndex {
    let mut index = FacilityIndex::default();
    for facility in facilities {
        let records: Vec<FacilityRecord> = facility
            .table
            .rows
            .iter()
            .map(|row| build_record(&facility.name, row, columns, enricher))
            .collect();
        tracing::debug!(
            facility = %facility.name,
            records = records.len(),
            with_ndc = records.iter().filter(|r| r.ndc11.is_some()).count(),
            "indexed facility history"
        );
        index.insert(facility.name.clone(), records);
    }
    tracing::info!(
        facilities = index.len(),
        records = index.record_count(),
        "built facility index"
    );
    index
}

fn build_record(
    facility: &str,
    row: &Row,
    columns: &HistoryColumns,
    enricher: Option<&dyn Enricher>,
) -> FacilityRecord {
    let description = row.text(&columns.description);
    let ndc11 = normalize_ndc(&row.text(&columns.ndc));
    let components = enrich_if_eligible(parse_description(&description), ndc11.as_deref(), enricher);
    let po_date = columns
        .po_date
        .as_deref()
        .and_then(|column| parse_date(row.get(column)));

    FacilityRecord {
        facility: facility.to_string(),
        ndc11,
        description,
        po_date,
        match_string: components.match_key.clone(),
        components,
    }
}
