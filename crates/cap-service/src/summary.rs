//! Read-side views for the home page and the city dashboard.

use serde::Serialize;

use cap_store::schema::inventory_columns;
use cap_store::{InventoryEntry, InventoryStore, StoreError};
use cap_types::{CapStatus, CityRecord, Sector, UlbCategory};

use crate::{require_city, Result, ServiceError};

/// Master row for `city`.
///
/// # Errors
///
/// - [`ServiceError::NotFound`] if the city has no master row
pub fn get_city(store: &InventoryStore, city: &str) -> Result<CityRecord> {
    let city = require_city(city)?;
    store.get_city(city).map_err(|e| match e {
        StoreError::NotFound(_) => ServiceError::NotFound(city.to_string()),
        other => other.into(),
    })
}

/// Stored inventory for `city`, exactly as persisted.
///
/// # Errors
///
/// - [`ServiceError::NoInventory`] if none was ever saved
pub fn get_inventory(store: &InventoryStore, city: &str) -> Result<InventoryEntry> {
    let city = require_city(city)?;
    store.get_inventory(city).map_err(|e| match e {
        StoreError::NotFound(_) => ServiceError::NoInventory(city.to_string()),
        other => other.into(),
    })
}

/// State-wide figures for the home view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, ts_rs::TS)]
#[ts(export)]
pub struct StateSummary {
    pub city_count: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub municipal_corporations: usize,
    pub municipal_councils: usize,
    pub total_population: u64,
    /// Master cities that also have a stored inventory.
    pub cities_with_inventory: usize,
    /// Sum of `total_tco2e` over those inventories.
    pub inventory_total_tco2e: f64,
}

pub fn state_summary(store: &InventoryStore) -> Result<StateSummary> {
    let cities = store.cities()?;
    let inventories = store.inventories()?;

    let mut summary = StateSummary {
        city_count: cities.len(),
        ..StateSummary::default()
    };
    for city in &cities {
        match city.cap_status {
            CapStatus::NotStarted => summary.not_started += 1,
            CapStatus::InProgress => summary.in_progress += 1,
            CapStatus::Completed => summary.completed += 1,
        }
        match city.ulb_category {
            UlbCategory::MunicipalCorporation => summary.municipal_corporations += 1,
            UlbCategory::MunicipalCouncil => summary.municipal_councils += 1,
        }
        summary.total_population = summary.total_population.saturating_add(city.population);

        if let Some(entry) = inventories.iter().find(|e| e.city_name == city.city_name) {
            summary.cities_with_inventory += 1;
            summary.inventory_total_tco2e += entry.emissions.total_tco2e;
        }
    }
    Ok(summary)
}

/// One slice of a city's emissions pie.
#[derive(Clone, Debug, PartialEq, Serialize, ts_rs::TS)]
#[ts(export)]
pub struct SectorShare {
    pub sector: Sector,
    pub tco2e: f64,
    /// Share of the city total in percent; zero when the total is zero.
    pub percent: f64,
}

/// Per-sector values and shares for `city`, in inventory column order.
///
/// # Errors
///
/// - [`ServiceError::NoInventory`] if none was ever saved
pub fn sector_breakdown(store: &InventoryStore, city: &str) -> Result<Vec<SectorShare>> {
    let entry = get_inventory(store, city)?;
    let total = entry.emissions.total_tco2e;

    Ok(inventory_columns()
        .iter()
        .filter_map(|column| Sector::from_column_name(column))
        .map(|sector| {
            let tco2e = entry.emissions.get(sector);
            let percent = if total > 0.0 { tco2e / total * 100.0 } else { 0.0 };
            SectorShare {
                sector,
                tco2e,
                percent,
            }
        })
        .collect())
}
