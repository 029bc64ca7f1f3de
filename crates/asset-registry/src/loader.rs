//! CSV loader for the asset table.
//!
//! Only the three required columns are read; any other columns in the
//! spreadsheet export are ignored. Rows that cannot be read (short rows,
//! blank ids, unreadable printed flags) are logged and skipped so one bad
//! row never hides the rest of the table.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{AssetRecord, COL_ASSET_ID, REQUIRED_COLUMNS, RegistryError, Result};

/// Raw CSV row before the printed flag is interpreted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AssetCsvRecord {
    #[serde(rename = "WISE_ID")]
    asset_id: String,
    #[serde(rename = "Shelf_QR_ID")]
    shelf_code: String,
    #[serde(rename = "QR Code Printed")]
    printed: String,
}

/// Load all records from the CSV file at `path`.
///
/// Returns [`RegistryError::NotFound`] when the file does not exist so
/// callers can report it without treating it as a parse failure.
pub fn load_records(path: &Path) -> Result<Vec<AssetRecord>> {
    if !path.exists() {
        return Err(RegistryError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let records = load_records_from_reader(BufReader::new(file))?;
    debug!(path = %path.display(), rows = records.len(), "Loaded asset table");
    Ok(records)
}

/// Load all records from any CSV source with a header row.
pub fn load_records_from_reader<R: Read>(reader: R) -> Result<Vec<AssetRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(RegistryError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in csv_reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable row: {e}");
                skipped += 1;
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        match parse_row(&row, &headers) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!(line, "Skipping row {line}: {reason}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "{skipped} row(s) of the asset table were skipped");
    }
    Ok(records)
}

/// Turn one CSV row into a record, or explain why it cannot be used.
///
/// Cells missing from a short row read as empty.
fn parse_row(
    row: &csv::StringRecord,
    headers: &csv::StringRecord,
) -> std::result::Result<AssetRecord, String> {
    let raw: AssetCsvRecord = row.deserialize(Some(headers)).map_err(|e| e.to_string())?;
    if raw.asset_id.is_empty() {
        return Err(format!("empty {COL_ASSET_ID}"));
    }
    let printed = parse_flag(&raw.printed).ok_or_else(|| {
        format!(
            "'{}' is not a valid printed flag for {} (expected TRUE or FALSE)",
            raw.printed, raw.asset_id
        )
    })?;
    Ok(AssetRecord {
        asset_id: raw.asset_id,
        shelf_code: raw.shelf_code,
        printed,
    })
}

/// Interpret a spreadsheet boolean cell.
fn parse_flag(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Some(false)
    } else {
        None
    }
}
