//! # cap-store
//!
//! Flat-file persistence for the CAP tracker.
//!
//! Two CSV tables live in the data directory:
//! - the city master table (`cities.csv` by default), one row per city
//! - the inventory table (`cap_inventory.csv`), one row per city holding the
//!   latest activity record and its sector emissions
//!
//! Both tables are keyed by `City Name`. Every write reads the whole table,
//! substitutes or appends the row, and atomically replaces the file. There
//! is no transaction spanning the two files. A missing or empty file reads
//! as an empty table.

pub mod atomic_write;
pub mod inventory;
pub mod master;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use cap_types::{ActivityRecord, CityRecord, EmissionResult};

pub use inventory::InventoryEntry;

/// Default master table file name.
pub const DEFAULT_MASTER_FILE: &str = "cities.csv";

/// Default inventory table file name.
pub const DEFAULT_INVENTORY_FILE: &str = "cap_inventory.csv";

/// Store error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed {file} row {row}: {reason}")]
    Malformed {
        /// File name (not the full path).
        file: String,
        /// 1-based data row number.
        row: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Handle on the two table files. Holds no cached rows.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    master_path: PathBuf,
    inventory_path: PathBuf,
}

impl InventoryStore {
    /// Store rooted in `data_dir` using the given file names.
    pub fn new(data_dir: &Path, master_file: &str, inventory_file: &str) -> Self {
        Self {
            master_path: data_dir.join(master_file),
            inventory_path: data_dir.join(inventory_file),
        }
    }

    /// Store rooted in `data_dir` with the default file names.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir, DEFAULT_MASTER_FILE, DEFAULT_INVENTORY_FILE)
    }

    pub fn master_path(&self) -> &Path {
        &self.master_path
    }

    pub fn inventory_path(&self) -> &Path {
        &self.inventory_path
    }

    /// Replace the master row with matching `city_name`, or append one.
    pub fn upsert_city(&self, record: &CityRecord) -> Result<()> {
        let rows = master::read(&self.master_path)?;
        let (rows, replaced) = upsert_by_key(rows, record.clone(), |r| &r.city_name);
        master::write(&self.master_path, &rows)?;
        tracing::info!(city = %record.city_name, replaced, rows = rows.len(), "city saved");
        Ok(())
    }

    /// Replace the inventory row for `city_name`, or append one.
    pub fn upsert_inventory(
        &self,
        city_name: &str,
        activity: &ActivityRecord,
        emissions: &EmissionResult,
        last_updated: DateTime<Utc>,
    ) -> Result<()> {
        let entry = InventoryEntry {
            city_name: city_name.to_string(),
            activity: *activity,
            emissions: *emissions,
            last_updated: Some(last_updated),
        };
        let rows = inventory::read(&self.inventory_path)?;
        let (rows, replaced) = upsert_by_key(rows, entry, |e| &e.city_name);
        inventory::write(&self.inventory_path, &rows)?;
        tracing::info!(
            city = %city_name,
            replaced,
            total_tco2e = emissions.total_tco2e,
            "inventory saved"
        );
        Ok(())
    }

    /// Master row for `city_name`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the city has no master row
    pub fn get_city(&self, city_name: &str) -> Result<CityRecord> {
        master::read(&self.master_path)?
            .into_iter()
            .find(|r| r.city_name == city_name)
            .ok_or_else(|| StoreError::NotFound(format!("city '{city_name}'")))
    }

    /// Stored inventory for `city_name`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if no inventory was ever saved for the city
    pub fn get_inventory(&self, city_name: &str) -> Result<InventoryEntry> {
        inventory::read(&self.inventory_path)?
            .into_iter()
            .find(|e| e.city_name == city_name)
            .ok_or_else(|| StoreError::NotFound(format!("inventory for '{city_name}'")))
    }

    /// City names in master table order.
    pub fn list_cities(&self) -> Result<Vec<String>> {
        Ok(master::read(&self.master_path)?
            .into_iter()
            .map(|r| r.city_name)
            .collect())
    }

    /// Every master row.
    pub fn cities(&self) -> Result<Vec<CityRecord>> {
        master::read(&self.master_path)
    }

    /// Every inventory row.
    pub fn inventories(&self) -> Result<Vec<InventoryEntry>> {
        inventory::read(&self.inventory_path)
    }
}

/// Raw table bytes, or `None` when the file is missing or blank.
pub(crate) fn read_table_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(None),
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io(e)),
    }
}

/// File name component of `path`, for error messages.
pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Substitute the first row whose key matches `new`, dropping any later
/// duplicates, or append. Returns the rows and whether a row was replaced.
fn upsert_by_key<T>(rows: Vec<T>, new: T, key: impl Fn(&T) -> &String) -> (Vec<T>, bool) {
    let new_key = key(&new).clone();
    let mut out = Vec::with_capacity(rows.len() + 1);
    let mut pending = Some(new);
    let mut replaced = false;
    for row in rows {
        if *key(&row) == new_key {
            if let Some(new) = pending.take() {
                out.push(new);
                replaced = true;
            }
        } else {
            out.push(row);
        }
    }
    if let Some(new) = pending {
        out.push(new);
    }
    (out, replaced)
}
