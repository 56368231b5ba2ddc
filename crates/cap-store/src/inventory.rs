//! Inventory table codec.
//!
//! Columns are located by header name, so a file whose columns were
//! reordered by a spreadsheet still loads. Blank numeric cells read as zero.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use cap_types::activity::ActivityField;
use cap_types::{ActivityRecord, EmissionResult, Sector};

use crate::atomic_write::atomic_write;
use crate::schema::{inventory_columns, CITY_NAME_COLUMN, LAST_UPDATED_COLUMN};
use crate::{file_label, read_table_bytes, Result, StoreError};

/// A persisted inventory: the activity record plus the emissions computed
/// from it when it was saved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InventoryEntry {
    pub city_name: String,
    pub activity: ActivityRecord,
    pub emissions: EmissionResult,
    /// `None` for rows written by hand without a timestamp.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Load every inventory row in file order.
pub fn read(path: &Path) -> Result<Vec<InventoryEntry>> {
    let Some(bytes) = read_table_bytes(path)? else {
        return Ok(Vec::new());
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes.as_slice());

    let index: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect();
    let label = file_label(path);
    let city_col = *index.get(CITY_NAME_COLUMN).ok_or_else(|| StoreError::Malformed {
        file: label.clone(),
        row: 0,
        reason: format!("missing '{CITY_NAME_COLUMN}' column"),
    })?;

    let mut entries = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        let malformed = |reason: String| StoreError::Malformed {
            file: label.clone(),
            row,
            reason,
        };
        let number = |column: &str| -> Result<f64> {
            let Some(raw) = index.get(column).and_then(|&i| record.get(i)) else {
                return Ok(0.0);
            };
            if raw.is_empty() {
                return Ok(0.0);
            }
            raw.parse::<f64>()
                .map_err(|e| malformed(format!("'{column}' = '{raw}': {e}")))
        };

        let mut activity = ActivityRecord::default();
        for field in ActivityField::ALL {
            activity.set(field, number(field.column_name())?);
        }

        let mut sector_values = [0.0; Sector::ALL.len()];
        for (slot, sector) in sector_values.iter_mut().zip(Sector::ALL) {
            *slot = number(&sector.column_name())?;
        }
        let emissions = EmissionResult::from_sectors(|s| sector_values[s as usize]);

        let last_updated = match index.get(LAST_UPDATED_COLUMN).and_then(|&i| record.get(i)) {
            None | Some("") => None,
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| malformed(format!("'{LAST_UPDATED_COLUMN}' = '{raw}': {e}")))?
                    .with_timezone(&Utc),
            ),
        };

        entries.push(InventoryEntry {
            city_name: record.get(city_col).unwrap_or_default().to_string(),
            activity,
            emissions,
            last_updated,
        });
    }
    Ok(entries)
}

/// Replace the inventory file with `entries`.
pub fn write(path: &Path, entries: &[InventoryEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(inventory_columns())?;
    for entry in entries {
        let mut row = Vec::with_capacity(inventory_columns().len());
        row.push(entry.city_name.clone());
        row.extend(entry.activity.fields().map(|(_, v)| v.to_string()));
        row.extend(entry.emissions.sectors().map(|(_, v)| v.to_string()));
        row.push(
            entry
                .last_updated
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        );
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))?;
    atomic_write(path, &bytes)?;
    Ok(())
}
