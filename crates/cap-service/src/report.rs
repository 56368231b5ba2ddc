//! City dashboard: PDF report request.

use chrono::{DateTime, Utc};

use cap_report::{build_report, report_filename, ReportInput};
use cap_store::InventoryStore;
use cap_types::RequesterIdentity;

use crate::summary::{get_city, get_inventory};
use crate::{require_city, ReportSink, Result, ServiceError};

/// Generate the inventory report for `city` and hand it to `sink`.
///
/// Steps run in a fixed order and stop at the first failure; nothing
/// reaches the sink unless rendering succeeded. An inventory row without a
/// timestamp is reported as updated at `now`. Returns the delivered file
/// name.
///
/// # Errors
///
/// - [`ServiceError::IncompleteRequest`] if the city or any requester field is blank
/// - [`ServiceError::NotFound`] if the city has no master row
/// - [`ServiceError::NoInventory`] if no inventory was saved for the city
/// - [`ServiceError::StoreIo`] if a table cannot be read or the sink cannot write
pub fn request_report(
    store: &InventoryStore,
    city: &str,
    requester: &RequesterIdentity,
    sink: &mut dyn ReportSink,
    now: DateTime<Utc>,
) -> Result<String> {
    let city = require_city(city)?;
    if let Some(field) = requester.first_missing() {
        return Err(ServiceError::IncompleteRequest(field));
    }

    let record = get_city(store, city)?;
    let entry = get_inventory(store, city)?;

    let pdf = build_report(&ReportInput {
        city: &record,
        emissions: &entry.emissions,
        last_updated: entry.last_updated.unwrap_or(now),
        requester,
        generated_at: now,
    })?;

    let filename = report_filename(city);
    sink.accept(&filename, &pdf)?;
    tracing::info!(city = %city, bytes = pdf.len(), "report delivered");
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{admin, city, store};
    use crate::{save_inventory, MemorySink};
    use cap_types::{ActivityRecord, EmissionFactors};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-15T10:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    fn requester() -> RequesterIdentity {
        RequesterIdentity {
            name: "S. Kulkarni".into(),
            email: "s.kulkarni@example.org".into(),
            contact: "9820000000".into(),
        }
    }

    fn seeded(name: &str) -> (tempfile::TempDir, InventoryStore) {
        let (dir, store) = store();
        let session = admin();
        crate::upsert_city(&session, &store, city(name)).expect("upsert");
        let mut a = ActivityRecord::default();
        a.energy.electricity_mwh = 1000.0;
        save_inventory(&session, &store, &EmissionFactors::default(), name, &a, now())
            .expect("save");
        (dir, store)
    }

    #[test]
    fn test_report_reaches_sink() {
        let (_dir, store) = seeded("Navi Mumbai");
        let mut sink = MemorySink::new();
        let name = request_report(&store, "Navi Mumbai", &requester(), &mut sink, now())
            .expect("report");
        assert_eq!(name, "Navi_Mumbai_GHG_Inventory_Report.pdf");

        let (filename, pdf) = sink.last().expect("delivered");
        assert_eq!(filename, name);
        assert!(pdf.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn test_report_is_repeatable() {
        let (_dir, store) = seeded("Pune");
        let mut sink = MemorySink::new();
        request_report(&store, "Pune", &requester(), &mut sink, now()).expect("first");
        request_report(&store, "Pune", &requester(), &mut sink, now()).expect("second");
        let (_, second) = sink.take_last().expect("second");
        let (_, first) = sink.take_last().expect("first");
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_contact_emits_nothing() {
        let (_dir, store) = seeded("Pune");
        let mut sink = MemorySink::new();
        let who = RequesterIdentity {
            contact: String::new(),
            ..requester()
        };
        let err = request_report(&store, "Pune", &who, &mut sink, now()).expect_err("incomplete");
        assert!(matches!(err, ServiceError::IncompleteRequest("contact")));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_blank_city_is_incomplete() {
        let (_dir, store) = store();
        let mut sink = MemorySink::new();
        let err = request_report(&store, "", &requester(), &mut sink, now()).expect_err("no city");
        assert!(matches!(err, ServiceError::IncompleteRequest("city")));
    }

    #[test]
    fn test_city_without_inventory() {
        let (_dir, store) = store();
        crate::upsert_city(&admin(), &store, city("Wardha")).expect("upsert");
        let mut sink = MemorySink::new();
        let err = request_report(&store, "Wardha", &requester(), &mut sink, now())
            .expect_err("no inventory");
        assert!(matches!(err, ServiceError::NoInventory(ref c) if c == "Wardha"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_city_without_master_row() {
        let (_dir, store) = store();
        let mut sink = MemorySink::new();
        let err = request_report(&store, "Beed", &requester(), &mut sink, now())
            .expect_err("not found");
        assert!(matches!(err, ServiceError::NotFound(ref c) if c == "Beed"));
    }
}
