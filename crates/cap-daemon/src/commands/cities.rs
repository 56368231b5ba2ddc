//! Home view and admin panel commands.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use cap_service::Session;
use cap_types::{roster, CapStatus, CityRecord, CENSUS_YEAR};

use super::{str_param, to_value, typed_param, Result};
use crate::DaemonState;

/// The fixed city roster with districts.
pub async fn get_roster() -> Result {
    let entries: Vec<Value> = roster::ROSTER
        .iter()
        .map(|e| json!({"city_name": e.city_name, "district": e.district}))
        .collect();
    Ok(json!({"census_year": CENSUS_YEAR, "cities": entries}))
}

/// City names in master table order.
pub async fn list_cities(state: &Arc<DaemonState>) -> Result {
    let store = state.store.lock().await;
    let cities = store
        .list_cities()
        .map_err(cap_service::ServiceError::from)?;
    Ok(json!({"cities": cities}))
}

/// One master row.
pub async fn get_city(state: &Arc<DaemonState>, params: &Value) -> Result {
    let city = str_param(params, "city")?;
    let store = state.store.lock().await;
    let record = cap_service::get_city(&store, city)?;
    to_value(&record)
}

/// Insert or replace a master row. Admin only.
pub async fn upsert_city(state: &Arc<DaemonState>, session: &mut Session, params: &Value) -> Result {
    let record: CityRecord = typed_param(params, "city")?;
    let store = state.store.lock().await;
    let saved = cap_service::upsert_city(session, &store, record)?;
    info!(city = %saved.city_name, "City master row saved");
    to_value(&saved)
}

/// Advance a city's CAP status. Admin only.
pub async fn set_cap_status(
    state: &Arc<DaemonState>,
    session: &mut Session,
    params: &Value,
) -> Result {
    let city = str_param(params, "city")?;
    let status: CapStatus = typed_param(params, "status")?;
    let store = state.store.lock().await;
    let saved = cap_service::set_cap_status(session, &store, city, status)?;
    to_value(&saved)
}

/// State-wide totals for the home view.
pub async fn get_state_summary(state: &Arc<DaemonState>) -> Result {
    let store = state.store.lock().await;
    let summary = cap_service::state_summary(&store)?;
    to_value(&summary)
}
