//! CAP preparation and city dashboard commands.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use cap_service::Session;
use cap_types::ActivityRecord;

use super::{str_param, to_value, typed_param, Result};
use crate::DaemonState;

/// The active factor table.
pub async fn get_emission_factors(state: &Arc<DaemonState>) -> Result {
    to_value(&state.config.emission_factors)
}

/// Calculate and store a city's activity record. Admin only.
///
/// Returns the computed emission result.
pub async fn save_inventory(
    state: &Arc<DaemonState>,
    session: &mut Session,
    params: &Value,
) -> Result {
    let city = str_param(params, "city")?;
    let activity: ActivityRecord = typed_param(params, "activity")?;
    let store = state.store.lock().await;
    let result = cap_service::save_inventory(
        session,
        &store,
        &state.config.emission_factors,
        city,
        &activity,
        Utc::now(),
    )?;
    to_value(&result)
}

/// The stored activity record and emissions for a city.
pub async fn get_inventory(state: &Arc<DaemonState>, params: &Value) -> Result {
    let city = str_param(params, "city")?;
    let store = state.store.lock().await;
    let entry = cap_service::get_inventory(&store, city)?;
    to_value(&entry)
}

/// Per-sector values and percentage shares for a city.
pub async fn get_sector_breakdown(state: &Arc<DaemonState>, params: &Value) -> Result {
    let city = str_param(params, "city")?;
    let store = state.store.lock().await;
    let shares = cap_service::sector_breakdown(&store, city)?;
    Ok(json!({"city": city, "sectors": to_value(&shares)?}))
}
