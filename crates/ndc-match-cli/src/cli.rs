//! CLI argument definitions for the report generator.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use ndc_match_core::enrichment::DEFAULT_TIMEOUT_SECS;
use ndc_match_core::matcher::{
    DEFAULT_COMMENTS_COLUMN, DEFAULT_DESCRIPTION_COLUMN, DEFAULT_FUZZY_THRESHOLD, DEFAULT_NDC_COLUMN,
    DEFAULT_PO_DATE_COLUMN,
};

use crate::input::FacilitySource;

/// Sheet read from an injectable workbook unless overridden.
pub const DEFAULT_INJECTABLE_SHEET: &str = "Injectable";

#[derive(Parser, Debug)]
#[command(
    name = "ndc-report",
    version,
    about = "Match reference drug items against facility purchase-order histories",
    long_about = "Match each item of a reference list against every facility's purchase-order \
                  history.\n\nFacilities are matched on 11-digit NDC first, then on fuzzy \
                  description similarity, and the report carries one summary column per facility."
)]
pub struct Cli {
    /// Target items to look up: a CSV file or a workbook (.xls, .xlsx, .xlsm, .xlsb, .ods).
    #[arg(long = "injectable-file", visible_alias = "injectable-workbook", value_name = "PATH")]
    pub injectable_file: PathBuf,

    /// Sheet holding the target items when the injectable file is a workbook.
    #[arg(long = "injectable-sheet", default_value = DEFAULT_INJECTABLE_SHEET)]
    pub injectable_sheet: String,

    #[arg(long = "injectable-description-column", default_value = DEFAULT_DESCRIPTION_COLUMN)]
    pub injectable_description_column: String,

    #[arg(long = "injectable-ndc-column", default_value = DEFAULT_NDC_COLUMN)]
    pub injectable_ndc_column: String,

    /// Target column copied into the report; omitted when the file lacks it.
    #[arg(long = "comments-column", default_value = DEFAULT_COMMENTS_COLUMN)]
    pub comments_column: String,

    /// Facility purchase-order file as FACILITY=PATH[::SHEET]. Repeatable.
    ///
    /// SHEET selects a workbook sheet; the first sheet is read when it is omitted.
    #[arg(
        long = "po-file",
        value_name = "FACILITY=PATH[::SHEET]",
        value_parser = parse_facility_file,
        action = ArgAction::Append,
        required = true
    )]
    pub po_files: Vec<FacilitySource>,

    #[arg(long = "po-description-column", default_value = DEFAULT_DESCRIPTION_COLUMN)]
    pub po_description_column: String,

    #[arg(long = "po-ndc-column", default_value = DEFAULT_NDC_COLUMN)]
    pub po_ndc_column: String,

    #[arg(long = "po-date-column", default_value = DEFAULT_PO_DATE_COLUMN)]
    pub po_date_column: String,

    /// Restrict purchase orders to one calendar month (YYYY-MM).
    #[arg(long = "month", value_name = "YYYY-MM")]
    pub month: Option<String>,

    /// Earliest purchase-order date (YYYY-MM-DD). Overrides --month.
    #[arg(long = "start-date", value_name = "DATE")]
    pub start_date: Option<String>,

    /// Latest purchase-order date (YYYY-MM-DD). Overrides --month.
    #[arg(long = "end-date", value_name = "DATE")]
    pub end_date: Option<String>,

    /// Report destination (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[arg(long = "output-format", value_enum, default_value = "csv")]
    pub output_format: OutputFormatArg,

    /// Minimum token-set similarity (0-100) for a name match.
    #[arg(
        long = "fuzzy-threshold",
        default_value_t = DEFAULT_FUZZY_THRESHOLD,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub fuzzy_threshold: u8,

    /// Backfill missing dosage forms from RxNav.
    #[arg(long = "enable-rxnav")]
    pub enable_rxnav: bool,

    /// SQLite file for cached RxNav lookups (default: in memory).
    #[arg(long = "rxnav-cache", value_name = "PATH")]
    pub rxnav_cache: Option<PathBuf>,

    /// RxNav request timeout in seconds.
    #[arg(long = "rxnav-timeout", value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub rxnav_timeout: u64,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "compact")]
    pub log_format: LogFormatArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
}

/// CLI log format choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Compact,
    Json,
}

/// Parse `FACILITY=PATH[::SHEET]`.
fn parse_facility_file(value: &str) -> Result<FacilitySource, String> {
    let invalid = || format!("expected FACILITY=PATH[::SHEET], got '{value}'");
    let (name, payload) = value.split_once('=').ok_or_else(invalid)?;
    let (path, sheet) = match payload.split_once("::") {
        Some((path, sheet)) => (path, Some(sheet.trim())),
        None => (payload, None),
    };
    let (name, path) = (name.trim(), path.trim());
    if name.is_empty() || path.is_empty() || sheet.is_some_and(str::is_empty) {
        return Err(invalid());
    }
    Ok(FacilitySource {
        name: name.to_string(),
        path: PathBuf::from(path),
        sheet: sheet.map(String::from),
    })
}
