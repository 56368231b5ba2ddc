//! City master table codec.

use std::path::Path;

use serde::{Deserialize, Serialize};

use cap_types::CityRecord;

use crate::atomic_write::atomic_write;
use crate::schema::MASTER_COLUMNS;
use crate::{file_label, read_table_bytes, Result, StoreError};

/// One CSV row, field-for-field with [`MASTER_COLUMNS`].
///
/// Categorical columns are kept as text here and parsed case-insensitively,
/// so hand-edited files still load.
#[derive(Debug, Serialize, Deserialize)]
struct CityRow {
    #[serde(rename = "City Name")]
    city_name: String,
    #[serde(rename = "District")]
    district: String,
    #[serde(rename = "Population")]
    population: u64,
    #[serde(rename = "ULB Category")]
    ulb_category: String,
    #[serde(rename = "CAP Status")]
    cap_status: String,
    #[serde(rename = "GHG Emissions")]
    ghg_total: Option<f64>,
    #[serde(rename = "Environment Department Exist")]
    env_dept_exists: String,
    #[serde(rename = "Department Name", default)]
    dept_name: String,
    #[serde(rename = "Head Name", default)]
    head_name: String,
    #[serde(rename = "Department Email", default)]
    dept_email: String,
}

impl From<&CityRecord> for CityRow {
    fn from(r: &CityRecord) -> Self {
        Self {
            city_name: r.city_name.clone(),
            district: r.district.clone(),
            population: r.population,
            ulb_category: r.ulb_category.to_string(),
            cap_status: r.cap_status.to_string(),
            ghg_total: r.ghg_total,
            env_dept_exists: r.env_dept_exists.to_string(),
            dept_name: r.dept_name.clone(),
            head_name: r.head_name.clone(),
            dept_email: r.dept_email.clone(),
        }
    }
}

impl CityRow {
    fn into_record(self) -> std::result::Result<CityRecord, cap_types::TypesError> {
        Ok(CityRecord {
            ulb_category: self.ulb_category.parse()?,
            cap_status: self.cap_status.parse()?,
            env_dept_exists: self.env_dept_exists.parse()?,
            city_name: self.city_name,
            district: self.district,
            population: self.population,
            ghg_total: self.ghg_total,
            dept_name: self.dept_name,
            head_name: self.head_name,
            dept_email: self.dept_email,
        })
    }
}

/// Load every master row in file order.
pub fn read(path: &Path) -> Result<Vec<CityRecord>> {
    let Some(bytes) = read_table_bytes(path)? else {
        return Ok(Vec::new());
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes.as_slice());

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<CityRow>().enumerate() {
        let record = row?.into_record().map_err(|e| StoreError::Malformed {
            file: file_label(path),
            row: idx + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Replace the master file with `records`.
pub fn write(path: &Path, records: &[CityRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(MASTER_COLUMNS)?;
    for record in records {
        writer.serialize(CityRow::from(record))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))?;
    atomic_write(path, &bytes)?;
    Ok(())
}
