//! Purchase-order date parsing and inclusive date ranges.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Cell;

/// Largest Excel serial date (9999-12-31).
const MAX_EXCEL_SERIAL: i64 = 2_958_465;

// Two-digit years must be tried before %Y, which accepts short years
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a cell into a calendar date. Unparseable input yields `None`.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Missing => None,
        Cell::Date(d) => Some(*d),
        Cell::Integer(serial) => from_excel_serial(*serial),
        Cell::Float(serial) if serial.is_finite() => from_excel_serial(serial.floor() as i64),
        Cell::Float(_) => None,
        Cell::Text(text) => parse_date_str(text),
    }
}

/// Parse a textual date. Accepts ISO dates and date-times, US slash dates and RFC 3339.
pub fn parse_date_str(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    // Numeric text from CSV exports of spreadsheet date columns
    if text.chars().all(|c| c.is_ascii_digit()) && text.len() <= 7 {
        return text.parse::<i64>().ok().and_then(from_excel_serial);
    }
    None
}

fn from_excel_serial(serial: i64) -> Option<NaiveDate> {
    if !(1..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    // Day 0 is 1899-12-30 once Excel's phantom 1900-02-29 is accounted for
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial))
}

/// Inclusive date filter over purchase-order dates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// No filtering at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// First through last day of a calendar month.
    pub fn for_month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        let end = next.pred_opt()?;
        Some(Self {
            start: Some(start),
            end: Some(end),
        })
    }

    /// Parse `YYYY-MM` into the month's range.
    pub fn parse_month(text: &str) -> Option<Self> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", text.trim()), "%Y-%m-%d").ok()?;
        Self::for_month(date.year(), date.month())
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Undated records always pass.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return true;
        };
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}
