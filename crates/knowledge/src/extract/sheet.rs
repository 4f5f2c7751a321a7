//! Spreadsheets: Excel workbooks via calamine, CSV via csv.

use calamine::{Data, Reader};
use driverag_core::{AppError, AppResult};
use std::io::Cursor;

const CELL_SEPARATOR: &str = " | ";

/// Every sheet as `Sheet: <name>` followed by its non-empty rows.
pub fn extract_workbook(bytes: &[u8]) -> AppResult<String> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::Extraction(format!("Failed to open workbook: {}", e)))?;

    let mut text = String::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                tracing::debug!("Skipping sheet '{}': {}", sheet_name, e);
                continue;
            }
        };

        text.push_str(&format!("Sheet: {}\n", sheet_name));
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            if cells.iter().any(|c| !c.is_empty()) {
                text.push_str(&cells.join(CELL_SEPARATOR));
                text.push('\n');
            }
        }
    }

    Ok(text)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

/// Header row then records. Rows may have differing lengths; rows that
/// fail to decode are skipped.
pub fn extract_csv(bytes: &[u8]) -> AppResult<String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let mut text = String::new();

    let headers = reader
        .headers()
        .map_err(|e| AppError::Extraction(format!("Failed to read CSV header: {}", e)))?;
    if !headers.is_empty() {
        text.push_str(&headers.iter().collect::<Vec<_>>().join(CELL_SEPARATOR));
        text.push('\n');
    }

    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                text.push_str(&record.iter().collect::<Vec<_>>().join(CELL_SEPARATOR));
                text.push('\n');
            }
            Err(e) => tracing::debug!("Skipping CSV record {}: {}", line + 1, e),
        }
    }

    Ok(text)
}
