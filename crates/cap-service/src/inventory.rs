//! CAP preparation: inventory save.

use chrono::{DateTime, Utc};

use cap_store::InventoryStore;
use cap_types::{roster, ActivityRecord, EmissionFactors, EmissionResult};

use crate::{require_city, Result, ServiceError, Session};

/// Validate, calculate and persist an activity record for `city`.
///
/// Replaces any earlier inventory for the city. The city's CAP status is
/// left alone. Returns the freshly computed result for display.
///
/// # Errors
///
/// - [`ServiceError::AuthFailure`] if the session is locked
/// - [`ServiceError::IncompleteRequest`] if `city` is blank
/// - [`ServiceError::UnknownCity`] if the city is not in the roster
/// - [`ServiceError::InvalidActivity`] for a negative or non-finite quantity
/// - [`ServiceError::StoreIo`] if the inventory table cannot be written
pub fn save_inventory(
    session: &Session,
    store: &InventoryStore,
    factors: &EmissionFactors,
    city: &str,
    activity: &ActivityRecord,
    now: DateTime<Utc>,
) -> Result<EmissionResult> {
    session.require_admin()?;
    let city = require_city(city)?;
    if !roster::contains(city) {
        return Err(ServiceError::UnknownCity(city.to_string()));
    }

    let emissions = cap_calc::compute(activity, factors)?;
    store.upsert_inventory(city, activity, &emissions, now)?;
    Ok(emissions)
}
