//! NDC-Match Core Library
//!
//! Links free-text drug records from a reference list against facility
//! purchase-order histories and summarizes each linkage for human review.
//!
//! # Architecture
//!
//! ```text
//! Facility PO tables ──► parse + normalize NDC ──► (enrich) ──► FacilityIndex
//!                                                                    │
//! Target items ──────► parse + normalize NDC ──► (enrich) ──► DrugMatcher
//!                                                                    │
//!                                          per facility: NDC match → Name match
//!                                                                    │
//!                                                       MatchResult (one per target)
//! ```
//!
//! # Modules
//!
//! - [`parsing`]: NDC canonicalization and description parsing
//! - [`models`]: Domain types (StructuredDescription, FacilityRecord, MatchResult, tables)
//! - [`matcher`]: Facility index builder and matching engine
//! - [`enrichment`]: Optional RxNav lookups for missing dosage forms/strengths
//! - [`db`]: SQLite cache for enrichment lookups
//! - [`export`]: Report column layout

pub mod db;
pub mod enrichment;
pub mod export;
pub mod matcher;
pub mod models;
pub mod parsing;

// Re-export commonly used types
pub use enrichment::{enrich_if_eligible, EnrichedProduct, Enricher, RxNavClient, RxNavConfig};
pub use export::ReportLayout;
pub use matcher::{
    build_index, token_set_ratio, DrugMatcher, HistoryColumns, MatcherConfig, MatcherError, TargetColumns,
    DEFAULT_FUZZY_THRESHOLD,
};
pub use models::{
    Cell, DateRange, FacilityIndex, FacilityRecord, FacilitySummary, FacilityTable, MatchResult, Row,
    StructuredDescription, Table,
};
pub use parsing::{normalize_ndc, parse_description};
