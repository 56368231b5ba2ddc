//! Emission calculator.
//!
//! ```text
//! energy     = electricity_mwh * EF.electricity
//!            + energy.diesel_l * EF.diesel / 1000
//!            + energy.petrol_l * EF.petrol / 1000
//! transport  = transport.diesel_l * EF.diesel / 1000
//!            + transport.petrol_l * EF.petrol / 1000
//! buildings  = area_sqm * 0.05
//! water      = consumption_ml * EF.water
//! wastewater = wastewater_ml * EF.wastewater
//! waste      = msw_tonnes * EF.waste
//! industry   = industry.energy_mwh * EF.industry_energy
//! other      = other_emissions_tco2e
//! total      = sum of the above
//! ```
//!
//! No rounding happens here; presentation rounds to two decimals.

use cap_types::factors::KG_PER_TONNE;
use cap_types::{ActivityRecord, EmissionFactors, EmissionResult, Sector};

/// Fixed building energy intensity, tCO2e per square metre of built-up area.
pub const BUILDINGS_INTENSITY_TCO2E_PER_SQM: f64 = 0.05;

/// Emissions for one sector, in tCO2e.
pub fn sector_emissions(sector: Sector, a: &ActivityRecord, ef: &EmissionFactors) -> f64 {
    match sector {
        Sector::Energy => {
            a.energy.electricity_mwh * ef.electricity
                + a.energy.diesel_l * ef.diesel / KG_PER_TONNE
                + a.energy.petrol_l * ef.petrol / KG_PER_TONNE
        }
        Sector::Transport => {
            a.transport.diesel_l * ef.diesel / KG_PER_TONNE
                + a.transport.petrol_l * ef.petrol / KG_PER_TONNE
        }
        Sector::Buildings => a.buildings.area_sqm * BUILDINGS_INTENSITY_TCO2E_PER_SQM,
        Sector::Water => a.water.consumption_ml * ef.water,
        Sector::Wastewater => a.water.wastewater_ml * ef.wastewater,
        Sector::Waste => a.waste.msw_tonnes * ef.waste,
        Sector::Industry => a.industry.energy_mwh * ef.industry_energy,
        Sector::Other => a.other_emissions_tco2e,
    }
}

/// Calculate every sector and the total.
///
/// Total over any record; callers wanting the non-negativity guarantee
/// validate first (see [`crate::compute`]).
pub fn calculate(activity: &ActivityRecord, factors: &EmissionFactors) -> EmissionResult {
    let result = EmissionResult::from_sectors(|s| sector_emissions(s, activity, factors));
    tracing::debug!(total_tco2e = result.total_tco2e, "emissions calculated");
    result
}
