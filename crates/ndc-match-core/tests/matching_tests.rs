//! End-to-end matching tests over in-memory tables.

use std::cell::Cell as Counter;

use chrono::NaiveDate;
use ndc_match_core::export::ReportLayout;
use ndc_match_core::{
    Cell, DateRange, DrugMatcher, EnrichedProduct, Enricher, FacilityTable, HistoryColumns, MatcherConfig, Row, Table,
    TargetColumns,
};

const DESC: &str = "Description";
const NDC: &str = "NDC Code";
const DATE: &str = "PO Date";

fn config() -> MatcherConfig {
    MatcherConfig {
        history: HistoryColumns {
            description: DESC.into(),
            ndc: NDC.into(),
            po_date: Some(DATE.into()),
        },
        ..MatcherConfig::default()
    }
}

fn target_columns() -> TargetColumns {
    TargetColumns {
        description: DESC.into(),
        ndc: NDC.into(),
        comments: Some("Notes".into()),
    }
}

fn po(description: &str, ndc: impl Into<Cell>, date: impl Into<Cell>) -> Row {
    Row::new().with(DESC, description).with(NDC, ndc).with(DATE, date)
}

fn target(description: &str, ndc: &str) -> Row {
    Row::new().with(DESC, description).with(NDC, ndc)
}

fn facilities() -> Vec<FacilityTable> {
    vec![
        FacilityTable::new(
            "Mercy",
            Table::from_rows(vec![
                po("Ketorolac 30mg/mL vial", "0409-3795-01", "2024-03-02"),
                po("Ondansetron 4mg/2mL inj", "0409-4755-03", "03/20/2024"),
                po("Ondansetron HCl 4mg inj", Cell::Missing, "2024-01-05"),
            ]),
        ),
        FacilityTable::new(
            "St. Luke",
            Table::from_rows(vec![
                po("Ondansetron 4mg/2mL injection", "", ""),
                po("Ketorolac Tromethamine 30mg/mL inj", "", "2024-03-11"),
                po("Cefazolin 2g vial", "60505-6142-0", "2024-03-15"),
            ]),
        ),
        FacilityTable::new("Empty Clinic", Table::default()),
    ]
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_exact_ndc_match_summary() {
    let history = vec![FacilityTable::new(
        "Only",
        Table::from_rows(vec![po("Lilly product", "00002322830", "2024-03-01")]),
    )];
    let matcher = DrugMatcher::new(&history, &config(), None).unwrap();
    let targets = Table::from_rows(vec![target("Something", "00002322830")]);
    let report = matcher.build_report(&targets, &target_columns(), &DateRange::unbounded());

    assert_eq!(report[0].summary_for("Only"), Some("NDC match: 00002322830"));
}

#[test]
fn test_report_covers_every_facility() {
    let matcher = DrugMatcher::new(&facilities(), &config(), None).unwrap();
    let targets = Table::from_rows(vec![
        target("Ketorolac 30mg/mL vial", "0409-3795-01"),
        target("Vancomycin 1g vial", ""),
        target("", ""),
    ]);
    let report = matcher.build_report(&targets, &target_columns(), &DateRange::unbounded());

    assert_eq!(report.len(), 3);
    for row in &report {
        let names: Vec<&str> = row.facility_matches.iter().map(|m| m.facility.as_str()).collect();
        assert_eq!(names, vec!["Mercy", "St. Luke", "Empty Clinic"]);
    }
    assert!(!report[1].has_any_match());
    assert!(!report[2].has_any_match());
}

#[test]
fn test_ndc_then_name_fallback_per_facility() {
    let matcher = DrugMatcher::new(&facilities(), &config(), None).unwrap();
    let result = matcher.match_item("Ketorolac 30mg/mL vial", "0409-3795-01", None, &DateRange::unbounded());

    assert_eq!(result.ndc11.as_deref(), Some("00409379501"));
    assert_eq!(result.summary_for("Mercy"), Some("NDC match: 00409379501"));
    // No NDC at St. Luke: the tromethamine record's tokens contain the target's
    assert_eq!(
        result.summary_for("St. Luke"),
        Some("Name match: Ketorolac Tromethamine 30mg/mL inj (100%)")
    );
    assert_eq!(result.summary_for("Empty Clinic"), Some(""));
}

#[test]
fn test_name_candidates_ranked_and_thresholded() {
    let matcher = DrugMatcher::new(&facilities(), &config(), None).unwrap();
    // No NDC, so Mercy falls through to name matching
    let result = matcher.match_item("Ondansetron 4mg/2mL inj", "", None, &DateRange::unbounded());

    // "ONDANSETRON 4MG / 2ML INJECTION" vs "ONDANSETRON HCL 4MG INJECTION" scores 92.6
    assert_eq!(
        result.summary_for("Mercy"),
        Some("Name match: 00409475503 (100%); Ondansetron HCl 4mg inj (93%)")
    );

    let strict = DrugMatcher::new(&facilities(), &config().with_fuzzy_threshold(95).unwrap(), None).unwrap();
    let result = strict.match_item("Ondansetron 4mg/2mL inj", "", None, &DateRange::unbounded());
    assert_eq!(result.summary_for("Mercy"), Some("Name match: 00409475503 (100%)"));
}

#[test]
fn test_date_range_keeps_undated_records() {
    let matcher = DrugMatcher::new(&facilities(), &config(), None).unwrap();
    let april = DateRange::for_month(2024, 4).unwrap();
    let result = matcher.match_item("Ondansetron 4mg/2mL inj", "0409-4755-03", None, &april);

    // Mercy's ondansetron records are all dated in Q1
    assert_eq!(result.summary_for("Mercy"), Some(""));
    // St. Luke's undated record still participates
    assert_eq!(
        result.summary_for("St. Luke"),
        Some("Name match: Ondansetron 4mg/2mL injection (100%)")
    );
}

#[test]
fn test_inclusive_date_bounds() {
    let matcher = DrugMatcher::new(&facilities(), &config(), None).unwrap();
    let day = DateRange::new(Some(ymd(2024, 3, 15)), Some(ymd(2024, 3, 15)));
    let result = matcher.match_item("Cefazolin 2g vial", "60505-6142-0", None, &day);
    assert_eq!(result.summary_for("St. Luke"), Some("NDC match: 60505614200"));

    let after = DateRange::new(Some(ymd(2024, 3, 16)), None);
    let result = matcher.match_item("Cefazolin 2g vial", "60505-6142-0", None, &after);
    assert_eq!(result.summary_for("St. Luke"), Some(""));
}

/// Enricher that counts lookups and knows one NDC.
struct CountingEnricher {
    calls: Counter<usize>,
}

impl Enricher for CountingEnricher {
    fn lookup(&self, ndc11: &str) -> Option<EnrichedProduct> {
        self.calls.set(self.calls.get() + 1);
        (ndc11 == "00409475503").then(|| EnrichedProduct {
            ndc11: ndc11.to_string(),
            name: Some("ondansetron 2 MG/ML Injectable Solution".into()),
            dosage_form: Some("INJECTION".into()),
            strength: Some("4MG / 2ML".into()),
        })
    }
}

#[test]
fn test_enrichment_is_applied_to_targets_and_history() {
    let enricher = CountingEnricher { calls: Counter::new(0) };
    let history = vec![FacilityTable::new(
        "Mercy",
        Table::from_rows(vec![po("Ondansetron", "unknown", ""), po("Zofran", "1234-5678-90", "")]),
    )];
    let matcher = DrugMatcher::new(&history, &config(), Some(&enricher)).unwrap();
    // Only the history row with a usable NDC is looked up
    assert_eq!(enricher.calls.get(), 1);

    let result = matcher.match_item("Ondansetron", "0409-4755-03", None, &DateRange::unbounded());
    assert_eq!(enricher.calls.get(), 2);
    assert_eq!(result.strength, "4MG / 2ML");
    assert_eq!(result.dosage_form.as_deref(), Some("INJECTION"));
    // History "ONDANSETRON" is a token subset of the enriched target key
    assert_eq!(result.summary_for("Mercy"), Some("Name match: Ondansetron (100%)"));
}

#[test]
fn test_numeric_identifier_cells() {
    // Spreadsheet exports often store NDCs as numbers, losing leading zeros
    let history = vec![FacilityTable::new(
        "Mercy",
        Table::from_rows(vec![po("Lilly product", Cell::Float(2322830.0), ""), po("Other", Cell::Integer(409475503), "")]),
    )];
    let matcher = DrugMatcher::new(&history, &config(), None).unwrap();
    let records = matcher.index().records("Mercy").unwrap();

    assert_eq!(records[0].ndc11, None);
    assert_eq!(records[1].ndc11.as_deref(), Some("00409475503"));
}

#[test]
fn test_layout_matches_index_order() {
    let matcher = DrugMatcher::new(&facilities(), &config(), None).unwrap();
    let targets = Table::from_rows(vec![target("Cefazolin 2g vial", "60505-6142-0").with("Notes", "stat")]);
    let report = matcher.build_report(&targets, &target_columns(), &DateRange::unbounded());
    let layout = ReportLayout::new(matcher.index(), Some("Notes".into()));

    assert_eq!(
        layout.headers(),
        vec!["Drug", "NDC", "Drug Name", "Strength", "Dosage Form", "Notes", "Mercy", "St. Luke", "Empty Clinic"]
    );
    let row = layout.row(&report[0]);
    assert_eq!(row[1], "60505614200");
    assert_eq!(row[2], "Cefazolin");
    assert_eq!(row[3], "2G");
    assert_eq!(row[4], "INJECTION");
    assert_eq!(row[5], "stat");
    assert_eq!(row[7], "NDC match: 60505614200");
}
