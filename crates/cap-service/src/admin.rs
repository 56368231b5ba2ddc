//! Admin panel operations on the city master table.

use cap_store::{InventoryStore, StoreError};
use cap_types::{roster, CapStatus, CityRecord};

use crate::{require_city, Result, ServiceError, Session};

/// Save a city master row after binding its district to the roster.
///
/// A blank district is filled in from the roster; any other district must
/// match it exactly. An existing row's CAP status may only move forward.
/// Returns the record as stored.
///
/// # Errors
///
/// - [`ServiceError::AuthFailure`] if the session is locked
/// - [`ServiceError::IncompleteRequest`] if `city_name` is blank
/// - [`ServiceError::UnknownCity`] if the city is not in the roster
/// - [`ServiceError::DistrictMismatch`] if the district disagrees with the roster
/// - [`ServiceError::InvalidTransition`] if the record would move a stored
///   CAP status backward
/// - [`ServiceError::StoreIo`] if the master table cannot be written
pub fn upsert_city(
    session: &Session,
    store: &InventoryStore,
    mut record: CityRecord,
) -> Result<CityRecord> {
    session.require_admin()?;

    record.city_name = require_city(&record.city_name)?.to_string();
    let expected = roster::district_for(&record.city_name)
        .ok_or_else(|| ServiceError::UnknownCity(record.city_name.clone()))?;

    let given = record.district.trim();
    if given.is_empty() {
        record.district = expected.to_string();
    } else if given != expected {
        return Err(ServiceError::DistrictMismatch {
            city: record.city_name.clone(),
            expected: expected.to_string(),
            given: given.to_string(),
        });
    } else {
        record.district = expected.to_string();
    }

    match store.get_city(&record.city_name) {
        Ok(existing) if !existing.cap_status.can_transition_to(record.cap_status) => {
            return Err(ServiceError::InvalidTransition {
                from: existing.cap_status,
                to: record.cap_status,
            });
        }
        Ok(_) | Err(StoreError::NotFound(_)) => {}
        Err(other) => return Err(other.into()),
    }

    store.upsert_city(&record)?;
    Ok(record)
}

/// Move a city's CAP status forward.
///
/// # Errors
///
/// - [`ServiceError::AuthFailure`] if the session is locked
/// - [`ServiceError::NotFound`] if the city has no master row
/// - [`ServiceError::InvalidTransition`] for a backward move
pub fn set_cap_status(
    session: &Session,
    store: &InventoryStore,
    city: &str,
    status: CapStatus,
) -> Result<CityRecord> {
    session.require_admin()?;
    let city = require_city(city)?;

    let mut record = store.get_city(city).map_err(|e| match e {
        StoreError::NotFound(_) => ServiceError::NotFound(city.to_string()),
        other => other.into(),
    })?;
    if !record.cap_status.can_transition_to(status) {
        return Err(ServiceError::InvalidTransition {
            from: record.cap_status,
            to: status,
        });
    }
    if record.cap_status != status {
        tracing::info!(city = %city, from = %record.cap_status, to = %status, "CAP status changed");
        record.cap_status = status;
        store.upsert_city(&record)?;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{admin, city, store};

    #[test]
    fn test_blank_district_is_filled_from_roster() {
        let (_dir, store) = store();
        let mut record = city("Kalyan-Dombivli");
        record.district.clear();

        let saved = upsert_city(&admin(), &store, record).expect("upsert");
        assert_eq!(saved.district, "Thane");
        assert_eq!(store.get_city("Kalyan-Dombivli").expect("get").district, "Thane");
    }

    #[test]
    fn test_mismatched_district_is_rejected() {
        let (_dir, store) = store();
        let mut record = city("Pune");
        record.district = "Nagpur".into();

        let err = upsert_city(&admin(), &store, record).expect_err("mismatch");
        assert!(matches!(err, ServiceError::DistrictMismatch { ref expected, .. } if expected == "Pune"));
        assert!(store.list_cities().expect("list").is_empty());
    }

    #[test]
    fn test_city_outside_roster_is_rejected() {
        let (_dir, store) = store();
        let err = upsert_city(&admin(), &store, city("Atlantis")).expect_err("unknown");
        assert!(matches!(err, ServiceError::UnknownCity(ref c) if c == "Atlantis"));
    }

    #[test]
    fn test_city_name_is_trimmed() {
        let (_dir, store) = store();
        let mut record = city("Nashik");
        record.city_name = "  Nashik ".into();
        upsert_city(&admin(), &store, record).expect("upsert");
        assert_eq!(store.list_cities().expect("list"), vec!["Nashik"]);
    }

    #[test]
    fn test_locked_session_cannot_upsert() {
        let (_dir, store) = store();
        let err = upsert_city(&Session::new(), &store, city("Pune")).expect_err("locked");
        assert!(matches!(err, ServiceError::AuthFailure));
        assert!(!store.master_path().exists());
    }

    #[test]
    fn test_status_moves_forward_only() {
        let (_dir, store) = store();
        let session = admin();
        upsert_city(&session, &store, city("Solapur")).expect("upsert");

        let r = set_cap_status(&session, &store, "Solapur", CapStatus::Completed).expect("skip ahead");
        assert_eq!(r.cap_status, CapStatus::Completed);

        let err = set_cap_status(&session, &store, "Solapur", CapStatus::InProgress)
            .expect_err("backwards");
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
        assert_eq!(
            store.get_city("Solapur").expect("get").cap_status,
            CapStatus::Completed
        );

        set_cap_status(&session, &store, "Solapur", CapStatus::Completed).expect("same state");
    }

    #[test]
    fn test_upsert_cannot_move_status_backwards() {
        let (_dir, store) = store();
        let session = admin();
        upsert_city(&session, &store, city("Pune")).expect("upsert");
        set_cap_status(&session, &store, "Pune", CapStatus::Completed).expect("complete");

        let mut edit = city("Pune");
        edit.population = 2;
        assert_eq!(edit.cap_status, CapStatus::NotStarted);
        let err = upsert_city(&session, &store, edit).expect_err("backwards");
        assert!(matches!(
            err,
            ServiceError::InvalidTransition {
                from: CapStatus::Completed,
                to: CapStatus::NotStarted
            }
        ));
        let stored = store.get_city("Pune").expect("get");
        assert_eq!(stored.cap_status, CapStatus::Completed);
        assert_ne!(stored.population, 2);

        let mut edit = city("Pune");
        edit.population = 2;
        edit.cap_status = CapStatus::Completed;
        upsert_city(&session, &store, edit).expect("same status");
        assert_eq!(store.get_city("Pune").expect("get").population, 2);
    }

    #[test]
    fn test_status_for_missing_city() {
        let (_dir, store) = store();
        let err = set_cap_status(&admin(), &store, "Akola", CapStatus::InProgress)
            .expect_err("missing");
        assert!(matches!(err, ServiceError::NotFound(ref c) if c == "Akola"));
    }

    #[test]
    fn test_status_requires_admin() {
        let (_dir, store) = store();
        upsert_city(&admin(), &store, city("Akola")).expect("upsert");
        let err = set_cap_status(&Session::new(), &store, "Akola", CapStatus::InProgress)
            .expect_err("locked");
        assert!(matches!(err, ServiceError::AuthFailure));
        assert_eq!(
            store.get_city("Akola").expect("get").cap_status,
            CapStatus::NotStarted
        );
    }
}
