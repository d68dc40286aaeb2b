//! SQLite schema definition.

/// Schema for the enrichment lookup cache.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- NDC Lookups (successful responses only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS ndc_lookups (
    ndc11 TEXT PRIMARY KEY CHECK (length(ndc11) = 11),
    name TEXT,
    dosage_form TEXT,
    strength TEXT,
    fetched_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
