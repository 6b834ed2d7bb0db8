use serde::Serialize;
use shared::FishingActivityRecord;
use std::fs;
use std::path::Path;

use crate::error::{SchemaError, StoreError};
use crate::report::VesselPresence;

/// Columns a stored table must carry to be rendered again.
const REQUIRED_COLUMNS: [&str; 5] = ["lat", "lon", "hours", "date", "flag"];

/// Write the raw records as CSV, one row per record.
pub fn write_records(path: &Path, records: &[FishingActivityRecord]) -> Result<(), StoreError> {
    write_csv(path, records)
}

pub fn write_vessels(path: &Path, vessels: &[VesselPresence]) -> Result<(), StoreError> {
    write_csv(path, vessels)
}

/// Load records written by `write_records` (or any CSV with the same columns).
pub fn read_records(path: &Path) -> Result<Vec<FishingActivityRecord>, StoreError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SchemaError::MissingColumn(column).into());
        }
    }

    let records = reader
        .deserialize::<FishingActivityRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Column names of a stored CSV, in file order.
pub fn read_columns(path: &Path) -> Result<Vec<String>, StoreError> {
    let mut reader = csv::Reader::from_path(path)?;
    Ok(reader.headers()?.iter().map(String::from).collect())
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    log::info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}
