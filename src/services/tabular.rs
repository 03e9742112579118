//! Tabular input and export
//!
//! Reads uploaded spreadsheets (xlsx/xls via calamine, csv via the csv crate)
//! into enrichment items, and serializes records back out in a fixed
//! 16-column layout as either xlsx (rust_xlsxwriter) or csv.

use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;
use thiserror::Error;
use tracing::info;

use crate::models::{BatteryRecord, EnrichItem};

/// Header aliases accepted for the part-number column
const MPN_COLUMNS: &[&str] = &[
    "mpn",
    "part number",
    "part_number",
    "partnumber",
    "model",
    "model number",
];

/// Header aliases accepted for the manufacturer column
const MANUFACTURER_COLUMNS: &[&str] = &["manufacturer", "mfr", "brand", "maker", "vendor"];

/// Export column order (fixed)
const EXPORT_COLUMNS: &[&str] = &[
    "MPN",
    "Manufacturer",
    "Title",
    "Overview",
    "Chemistry",
    "Voltage (V)",
    "Capacity",
    "Wh",
    "Form Factor",
    "Dimensions",
    "Termination",
    "Rechargeable",
    "Operating Temp",
    "Weight",
    "Datasheet URL",
    "Source URLs",
];

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Tabular I/O errors (surface as 400s at the API layer where applicable)
#[derive(Debug, Error)]
pub enum TabularError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not find MPN column in file")]
    MissingMpnColumn,

    #[error("Failed to read file: {0}")]
    Read(String),

    #[error("Failed to write {0}: {1}")]
    Write(&'static str, String),
}

enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

/// Read an uploaded spreadsheet or CSV into enrichment items
///
/// Column detection is case-insensitive and whitespace-trimmed. A missing
/// part-number column is fatal; rows with an empty part number are skipped.
pub fn read_input(bytes: &[u8], filename: &str) -> Result<Vec<EnrichItem>, TabularError> {
    let lowered = filename.to_lowercase();
    let rows = if lowered.ends_with(".xlsx") || lowered.ends_with(".xls") {
        read_workbook_rows(bytes)?
    } else if lowered.ends_with(".csv") {
        read_csv_rows(bytes)?
    } else {
        return Err(TabularError::UnsupportedFormat(filename.to_string()));
    };

    let mut rows = rows.into_iter();
    let headers: Vec<String> = rows
        .next()
        .unwrap_or_default()
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mpn_col = headers
        .iter()
        .position(|h| MPN_COLUMNS.contains(&h.as_str()))
        .ok_or(TabularError::MissingMpnColumn)?;
    let mfr_col = headers
        .iter()
        .position(|h| MANUFACTURER_COLUMNS.contains(&h.as_str()));

    let mut items = Vec::new();
    for row in rows {
        let mpn = row.get(mpn_col).map(|s| s.trim()).unwrap_or("");
        if mpn.is_empty() {
            continue;
        }
        let manufacturer = mfr_col
            .and_then(|col| row.get(col))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        items.push(EnrichItem {
            mpn: mpn.to_string(),
            manufacturer,
        });
    }

    info!(count = items.len(), filename = %filename, "Read input rows");
    Ok(items)
}

fn read_workbook_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>, TabularError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| TabularError::Read(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TabularError::Read("workbook has no sheets".to_string()))?
        .map_err(|e| TabularError::Read(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect())
}

fn read_csv_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>, TabularError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| TabularError::Read(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Serialize records in the fixed export layout
///
/// Returns the file bytes plus the matching content type.
pub fn export_records(
    records: &[BatteryRecord],
    format: &str,
) -> Result<(Vec<u8>, &'static str), TabularError> {
    let bytes = match format.to_lowercase().as_str() {
        "xlsx" => (export_xlsx(records)?, XLSX_CONTENT_TYPE),
        "csv" => (export_csv(records)?, CSV_CONTENT_TYPE),
        other => return Err(TabularError::UnsupportedFormat(other.to_string())),
    };

    info!(count = records.len(), format = %format, "Exported records");
    Ok(bytes)
}

fn record_cells(record: &BatteryRecord) -> Vec<Cell> {
    let text = |value: &Option<String>| match value {
        Some(s) => Cell::Text(s.clone()),
        None => Cell::Blank,
    };
    let number = |value: Option<f64>| match value {
        Some(n) => Cell::Number(n),
        None => Cell::Blank,
    };

    vec![
        Cell::Text(record.mpn.clone()),
        text(&record.manufacturer),
        text(&record.title),
        text(&record.overview),
        text(&record.chemistry),
        number(record.voltage_v),
        text(&record.capacity),
        number(record.wh),
        text(&record.form_factor),
        text(&record.dimensions),
        text(&record.termination),
        match record.rechargeable {
            Some(true) => Cell::Text("Yes".to_string()),
            Some(false) => Cell::Text("No".to_string()),
            None => Cell::Blank,
        },
        text(&record.operating_temp),
        text(&record.weight),
        text(&record.datasheet_url),
        if record.source_urls.is_empty() {
            Cell::Blank
        } else {
            Cell::Text(record.source_urls.join(", "))
        },
    ]
}

fn export_csv(records: &[BatteryRecord]) -> Result<Vec<u8>, TabularError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| TabularError::Write("csv", e.to_string()))?;

    for record in records {
        let row: Vec<String> = record_cells(record)
            .into_iter()
            .map(|cell| match cell {
                Cell::Text(s) => s,
                Cell::Number(n) => n.to_string(),
                Cell::Blank => String::new(),
            })
            .collect();
        writer
            .write_record(&row)
            .map_err(|e| TabularError::Write("csv", e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| TabularError::Write("csv", e.to_string()))
}

fn export_xlsx(records: &[BatteryRecord]) -> Result<Vec<u8>, TabularError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| TabularError::Write("xlsx", e.to_string()))?;
    }

    for (row, record) in records.iter().enumerate() {
        let row = (row + 1) as u32;
        for (col, cell) in record_cells(record).into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => worksheet.write_string(row, col, &s),
                Cell::Number(n) => worksheet.write_number(row, col, n),
                Cell::Blank => continue,
            }
            .map_err(|e| TabularError::Write("xlsx", e.to_string()))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| TabularError::Write("xlsx", e.to_string()))
}
