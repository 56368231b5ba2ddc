//! Integration test: laws that hold for every input.

use proptest::prelude::*;

use cap_calc::calculate;
use cap_integration_tests::{
    activity_strategy, admin_session, approx_eq, frozen_now, requester, roster_city,
    TestWorkspace,
};
use cap_report::{build_report, ReportInput};
use cap_service::{save_inventory, set_cap_status, upsert_city, ServiceError, Session};
use cap_types::{roster, ActivityRecord, CapStatus, EmissionFactors, Sector};

#[test]
fn zero_activity_gives_zero_emissions() {
    let r = calculate(&ActivityRecord::default(), &EmissionFactors::default());
    for (sector, value) in r.sectors() {
        assert_eq!(value, 0.0, "{sector}");
    }
    assert_eq!(r.total_tco2e, 0.0);
}

proptest! {
    #[test]
    fn calculation_is_linear(a in activity_strategy(1.0e6), k in 0.0_f64..1000.0) {
        let ef = EmissionFactors::default();
        let base = calculate(&a, &ef);
        let scaled = calculate(&a.scaled(k), &ef);
        for sector in Sector::ALL {
            prop_assert!(approx_eq(scaled.get(sector), k * base.get(sector)), "{}", sector);
        }
        prop_assert!(approx_eq(scaled.total_tco2e, k * base.total_tco2e));
    }

    #[test]
    fn total_matches_sector_sum_at_two_decimals(a in activity_strategy(1.0e6)) {
        let r = calculate(&a, &EmissionFactors::default());
        let sum: f64 = r.sectors().map(|(_, v)| v).sum();
        prop_assert_eq!(format!("{:.2}", r.total_tco2e), format!("{:.2}", sum));
    }

    #[test]
    fn upsert_city_is_idempotent(
        index in 0..roster::ROSTER.len(),
        population in 0u64..20_000_000,
        ghg in proptest::option::of(0.0_f64..1.0e7),
    ) {
        let ws = TestWorkspace::new().expect("workspace");
        let session = admin_session();
        let mut record = roster_city(roster::ROSTER[index].city_name, population);
        record.ghg_total = ghg;

        upsert_city(&session, &ws.store, record.clone()).expect("first");
        upsert_city(&session, &ws.store, record.clone()).expect("second");

        let rows = ws.store.cities().expect("cities");
        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(&rows[0], &record);
    }
}

#[test]
fn every_roster_city_binds_to_its_district() {
    let ws = TestWorkspace::new().expect("workspace");
    let session = admin_session();
    for entry in roster::ROSTER.iter() {
        let mut blank = roster_city(entry.city_name, 1);
        blank.district.clear();
        let saved = upsert_city(&session, &ws.store, blank).expect("coerced");
        assert_eq!(saved.district, entry.district);

        let mut wrong = roster_city(entry.city_name, 1);
        wrong.district = format!("Not {}", entry.district);
        let err = upsert_city(&session, &ws.store, wrong).expect_err("mismatch");
        assert!(matches!(err, ServiceError::DistrictMismatch { .. }));
    }

    let rows = ws.store.cities().expect("cities");
    assert_eq!(rows.len(), roster::ROSTER.len());
    for row in rows {
        assert_eq!(roster::district_for(&row.city_name), Some(row.district.as_str()));
    }
}

#[test]
fn report_bytes_are_reproducible() {
    let city = roster_city("Kolhapur", 549_236);
    let mut a = ActivityRecord::default();
    a.energy.electricity_mwh = 12_345.678;
    a.buildings.area_sqm = 2_000.0;
    a.other_emissions_tco2e = 3.25;
    let emissions = calculate(&a, &EmissionFactors::default());
    let who = requester();
    let input = ReportInput {
        city: &city,
        emissions: &emissions,
        last_updated: frozen_now(),
        requester: &who,
        generated_at: frozen_now(),
    };

    let first = build_report(&input).expect("first");
    for _ in 0..3 {
        assert_eq!(build_report(&input).expect("again"), first);
    }
}

#[test]
fn locked_session_cannot_write() {
    let ws = TestWorkspace::new().expect("workspace");
    let admin = admin_session();
    upsert_city(&admin, &ws.store, roster_city("Jalgaon", 460_228)).expect("seed city");
    let mut a = ActivityRecord::default();
    a.waste.msw_tonnes = 10.0;
    save_inventory(&admin, &ws.store, &EmissionFactors::default(), "Jalgaon", &a, frozen_now())
        .expect("seed inventory");
    let before = ws.snapshot();

    let mut locked = Session::new();
    locked
        .authenticate("wrong", cap_integration_tests::ADMIN_SECRET)
        .expect_err("wrong secret");

    let mut changed = roster_city("Jalgaon", 1);
    changed.dept_name = "Environment Cell".into();
    assert!(matches!(
        upsert_city(&locked, &ws.store, changed),
        Err(ServiceError::AuthFailure)
    ));
    assert!(matches!(
        set_cap_status(&locked, &ws.store, "Jalgaon", CapStatus::Completed),
        Err(ServiceError::AuthFailure)
    ));
    a.waste.msw_tonnes = 99.0;
    assert!(matches!(
        save_inventory(&locked, &ws.store, &EmissionFactors::default(), "Jalgaon", &a, frozen_now()),
        Err(ServiceError::AuthFailure)
    ));

    assert_eq!(ws.snapshot(), before, "store must be untouched");
}
