//! Derived per-sector emissions.

use serde::{Deserialize, Serialize};

use crate::sector::Sector;

/// Sector-keyed emission result, in tCO2e, unrounded.
///
/// Only built through [`EmissionResult::from_sectors`], so `total_tco2e`
/// is always the sum of the eight sector values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct EmissionResult {
    pub energy_tco2e: f64,
    pub transport_tco2e: f64,
    pub buildings_tco2e: f64,
    pub water_tco2e: f64,
    pub wastewater_tco2e: f64,
    pub waste_tco2e: f64,
    pub industry_tco2e: f64,
    pub other_tco2e: f64,
    pub total_tco2e: f64,
}

impl EmissionResult {
    /// Build a result from a per-sector value function and sum the total.
    pub fn from_sectors(mut value: impl FnMut(Sector) -> f64) -> Self {
        let mut out = Self::default();
        for sector in Sector::ALL {
            *out.slot(sector) = value(sector);
        }
        out.total_tco2e = Sector::ALL.into_iter().map(|s| out.get(s)).sum();
        out
    }

    pub fn get(&self, sector: Sector) -> f64 {
        match sector {
            Sector::Energy => self.energy_tco2e,
            Sector::Transport => self.transport_tco2e,
            Sector::Buildings => self.buildings_tco2e,
            Sector::Water => self.water_tco2e,
            Sector::Wastewater => self.wastewater_tco2e,
            Sector::Waste => self.waste_tco2e,
            Sector::Industry => self.industry_tco2e,
            Sector::Other => self.other_tco2e,
        }
    }

    fn slot(&mut self, sector: Sector) -> &mut f64 {
        match sector {
            Sector::Energy => &mut self.energy_tco2e,
            Sector::Transport => &mut self.transport_tco2e,
            Sector::Buildings => &mut self.buildings_tco2e,
            Sector::Water => &mut self.water_tco2e,
            Sector::Wastewater => &mut self.wastewater_tco2e,
            Sector::Waste => &mut self.waste_tco2e,
            Sector::Industry => &mut self.industry_tco2e,
            Sector::Other => &mut self.other_tco2e,
        }
    }

    /// `(sector, value)` pairs in [`Sector::ALL`] order.
    pub fn sectors(&self) -> impl Iterator<Item = (Sector, f64)> + '_ {
        Sector::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}
