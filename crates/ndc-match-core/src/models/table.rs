//! Row-oriented tabular input.
//!
//! Target items and facility histories arrive as loosely typed tables whose
//! cells may be missing or non-string. Every accessor coerces instead of failing.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cell value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum Cell {
    #[default]
    Missing,
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Coerce the cell to text. Missing and NaN cells become empty.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Integer(i) => i.to_string(),
            Cell::Float(f) if !f.is_finite() => String::new(),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
            Cell::Float(f) => f.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Coerce to text, returning `None` when the result is blank.
    pub fn as_optional_text(&self) -> Option<String> {
        let text = self.as_text();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

static MISSING: Cell = Cell::Missing;

/// One table row addressed by column name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Row {
    cells: HashMap<String, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: &str, value: impl Into<Cell>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: impl Into<Cell>) {
        self.cells.insert(column.to_string(), value.into());
    }

    /// Get a cell; absent columns read as [`Cell::Missing`].
    pub fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&MISSING)
    }

    /// Get a cell as text (empty when absent).
    pub fn text(&self, column: &str) -> String {
        self.get(column).as_text()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// An ordered collection of rows sharing a header.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Column names in source order
    pub columns: Vec<String>,
    /// Rows in source order
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table whose columns are collected from the rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            let mut names: Vec<&String> = row.cells.keys().collect();
            names.sort();
            for name in names {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Purchase-order history for one facility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacilityTable {
    /// Facility name, used as the report column header
    pub name: String,
    pub table: Table,
}

impl FacilityTable {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_coercion() {
        assert_eq!(Cell::Missing.as_text(), "");
        assert_eq!(Cell::Float(f64::NAN).as_text(), "");
        assert_eq!(Cell::Float(2322830.0).as_text(), "2322830");
        assert_eq!(Cell::Float(1.5).as_text(), "1.5");
        assert_eq!(Cell::Integer(42).as_text(), "42");
        assert_eq!(
            Cell::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()).as_text(),
            "2024-03-09"
        );
    }

    #[test]
    fn test_missing_column_reads_as_missing() {
        let row = Row::new().with("NDC", "0002-3228-30");
        assert!(row.get("Description").is_missing());
        assert_eq!(row.text("Description"), "");
        assert_eq!(row.text("NDC"), "0002-3228-30");
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(Cell::from("   ").as_optional_text(), None);
        assert_eq!(Cell::from("note").as_optional_text(), Some("note".into()));
    }

    #[test]
    fn test_table_from_rows_collects_columns() {
        let table = Table::from_rows(vec![
            Row::new().with("NDC", "1"),
            Row::new().with("Drug", "x").with("NDC", "2"),
        ]);
        assert_eq!(table.columns, vec!["NDC".to_string(), "Drug".to_string()]);
        assert_eq!(table.len(), 2);
    }
}
