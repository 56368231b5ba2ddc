//! Integration test crate for the CAP tracker.
//!
//! Holds fixtures shared by the end-to-end flows in `tests/`. The flows use
//! only the library crates and a temporary data directory; no daemon
//! process is started.
//!
//! ```sh
//! cargo test -p cap-integration-tests
//! ```

use chrono::{DateTime, TimeZone, Utc};
use lopdf::content::Content;
use lopdf::{Document, Object};
use proptest::prelude::*;

use cap_service::Session;
use cap_store::InventoryStore;
use cap_types::activity::ActivityField;
use cap_types::{ActivityRecord, CityRecord, RequesterIdentity, UlbCategory};

/// Admin secret used by every fixture session.
pub const ADMIN_SECRET: &str = "integration-secret";

/// A store over a private temporary data directory.
///
/// The directory is removed when the workspace is dropped.
pub struct TestWorkspace {
    pub dir: tempfile::TempDir,
    pub store: InventoryStore,
}

impl TestWorkspace {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let store = InventoryStore::in_dir(dir.path());
        Ok(Self { dir, store })
    }

    /// Current bytes of both table files (`None` when absent).
    pub fn snapshot(&self) -> (Option<Vec<u8>>, Option<Vec<u8>>) {
        (
            std::fs::read(self.store.master_path()).ok(),
            std::fs::read(self.store.inventory_path()).ok(),
        )
    }
}

/// An authenticated session.
pub fn admin_session() -> Session {
    let mut session = Session::new();
    session
        .authenticate(ADMIN_SECRET, ADMIN_SECRET)
        .expect("authenticate");
    session
}

/// Master row for a roster city with its roster district.
pub fn roster_city(name: &str, population: u64) -> CityRecord {
    let district = cap_types::roster::district_for(name).unwrap_or_default();
    CityRecord {
        population,
        ..CityRecord::new(name, district, UlbCategory::MunicipalCorporation)
    }
}

pub fn requester() -> RequesterIdentity {
    RequesterIdentity {
        name: "P. Joshi".to_string(),
        email: "p.joshi@example.org".to_string(),
        contact: "9822000000".to_string(),
    }
}

/// Fixed point in time so reports are reproducible.
pub fn frozen_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Every text run a report shows, across all pages in drawing order.
///
/// Report strings are WinAnsi, which matches Latin-1 for the characters
/// the fixtures use.
pub fn report_text(pdf: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(pdf).expect("parse pdf");
    let mut runs = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let raw = doc.get_page_content(page_id).expect("page content");
        let content = Content::decode(&raw).expect("decode content");
        for op in content.operations.iter().filter(|op| op.operator == "Tj") {
            if let Some(Object::String(bytes, _)) = op.operands.first() {
                runs.push(bytes.iter().map(|&b| char::from(b)).collect());
            }
        }
    }
    runs
}

/// Whether the report shows exactly `text` as one run.
pub fn report_shows(pdf: &[u8], text: &str) -> bool {
    report_text(pdf).iter().any(|run| run == text)
}

/// Activity records with every field in `0..max`.
pub fn activity_strategy(max: f64) -> impl Strategy<Value = ActivityRecord> {
    proptest::collection::vec(0.0..max, ActivityField::ALL.len()).prop_map(|values| {
        let mut activity = ActivityRecord::default();
        for (field, value) in ActivityField::ALL.into_iter().zip(values) {
            activity.set(field, value);
        }
        activity
    })
}

/// Relative float comparison.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
