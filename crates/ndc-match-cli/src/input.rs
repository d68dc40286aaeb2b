//! Table loading from CSV files and spreadsheet workbooks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use ndc_match_core::models::parse_date_str;
use ndc_match_core::{Cell, FacilityTable, Row, Table};

/// Extensions read as workbooks; anything else is read as CSV.
const WORKBOOK_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// A facility purchase-order source, `FACILITY=PATH[::SHEET]` on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilitySource {
    pub name: String,
    pub path: PathBuf,
    /// Workbook sheet; the first sheet when absent
    pub sheet: Option<String>,
}

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.iter().any(|w| ext.eq_ignore_ascii_case(w)))
}

/// Read a table with a header row. `sheet` only applies to workbooks.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let table = if is_workbook(path) {
        read_workbook(path, sheet)?
    } else {
        read_csv(path)?
    };
    tracing::debug!(path = %path.display(), rows = table.len(), "read table");
    Ok(table)
}

/// Blank cells become [`Cell::Missing`]; invalid UTF-8 is replaced, not rejected.
fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers: Vec<String> = reader
        .byte_headers()
        .with_context(|| format!("failed to read header of {}", path.display()))?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    let mut table = Table::new(headers.clone());
    for (line, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("failed to read row {} of {}", line + 1, path.display()))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.clone(), text_cell(&String::from_utf8_lossy(value))))
            .collect();
        table.push(row);
    }
    Ok(table)
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("failed to open workbook {}", path.display()))?;
    let sheet = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .with_context(|| format!("workbook {} has no sheets", path.display()))?,
    };
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("failed to read sheet '{sheet}' of {}", path.display()))?;
    Ok(table_from_range(&range))
}

/// First row is the header; later rows keep typed cell values.
fn table_from_range(range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Table::default();
    };
    let headers: Vec<String> = header.iter().map(|h| h.to_string().trim().to_string()).collect();

    let mut table = Table::new(headers.clone());
    for cells in rows {
        let row: Row = headers
            .iter()
            .zip(cells)
            .map(|(column, data)| (column.clone(), cell_from_data(data)))
            .collect();
        table.push(row);
    }
    table
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Integer(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) => text_cell(s),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(Cell::Float(dt.as_f64()), |datetime| Cell::Date(datetime.date())),
        Data::DateTimeIso(s) => parse_date_str(s).map_or_else(|| text_cell(s), Cell::Date),
        Data::DurationIso(s) => text_cell(s),
        _ => Cell::Missing,
    }
}

fn text_cell(value: &str) -> Cell {
    if value.trim().is_empty() {
        Cell::Missing
    } else {
        Cell::from(value)
    }
}

/// Load facility histories, sorted by facility name.
///
/// A facility named twice keeps the later source.
pub fn read_facilities(sources: &[FacilitySource]) -> Result<Vec<FacilityTable>> {
    let mut by_name: BTreeMap<&str, &FacilitySource> = BTreeMap::new();
    for source in sources {
        if let Some(previous) = by_name.insert(source.name.as_str(), source) {
            tracing::warn!(
                facility = %source.name,
                replaced = %previous.path.display(),
                path = %source.path.display(),
                "facility given more than once; using the later file"
            );
        }
    }

    let mut facilities = Vec::with_capacity(by_name.len());
    for (name, source) in by_name {
        let table = read_table(&source.path, source.sheet.as_deref())
            .with_context(|| format!("failed to load facility '{name}'"))?;
        facilities.push(FacilityTable::new(name, table));
    }
    Ok(facilities)
}
