//! Annual activity data for one city.
//!
//! The record is input-only: it carries quantities, never emissions derived
//! from them. Missing fields deserialize as zero, and zero means "no
//! reported activity".

use serde::{Deserialize, Serialize};

/// Grid electricity and stationary fuel use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(default)]
pub struct EnergyActivity {
    pub electricity_mwh: f64,
    pub diesel_l: f64,
    pub petrol_l: f64,
}

/// Road transport fuel use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(default)]
pub struct TransportActivity {
    pub diesel_l: f64,
    pub petrol_l: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(default)]
pub struct BuildingsActivity {
    pub area_sqm: f64,
}

/// Water supplied and wastewater generated, in megalitres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(default)]
pub struct WaterActivity {
    pub consumption_ml: f64,
    pub wastewater_ml: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(default)]
pub struct WasteActivity {
    pub msw_tonnes: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(default)]
pub struct IndustryActivity {
    pub energy_mwh: f64,
}

/// The structured input bundle for one city's annual inventory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(default)]
pub struct ActivityRecord {
    pub energy: EnergyActivity,
    pub transport: TransportActivity,
    pub buildings: BuildingsActivity,
    pub water: WaterActivity,
    pub waste: WasteActivity,
    pub industry: IndustryActivity,
    /// Emissions reported directly, already in tCO2e.
    pub other_emissions_tco2e: f64,
}

/// Addressable leaf field of an [`ActivityRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActivityField {
    EnergyElectricityMwh,
    EnergyDieselL,
    EnergyPetrolL,
    TransportDieselL,
    TransportPetrolL,
    BuildingsAreaSqm,
    WaterConsumptionMl,
    WaterWastewaterMl,
    WasteMswTonnes,
    IndustryEnergyMwh,
    OtherEmissionsTco2e,
}

impl ActivityField {
    /// Every field, in inventory-file column order.
    pub const ALL: [ActivityField; 11] = [
        Self::EnergyElectricityMwh,
        Self::EnergyDieselL,
        Self::EnergyPetrolL,
        Self::TransportDieselL,
        Self::TransportPetrolL,
        Self::BuildingsAreaSqm,
        Self::WaterConsumptionMl,
        Self::WaterWastewaterMl,
        Self::WasteMswTonnes,
        Self::IndustryEnergyMwh,
        Self::OtherEmissionsTco2e,
    ];

    /// Dotted path as used in request payloads and error messages.
    pub fn key(self) -> &'static str {
        match self {
            Self::EnergyElectricityMwh => "energy.electricity_mwh",
            Self::EnergyDieselL => "energy.diesel_l",
            Self::EnergyPetrolL => "energy.petrol_l",
            Self::TransportDieselL => "transport.diesel_l",
            Self::TransportPetrolL => "transport.petrol_l",
            Self::BuildingsAreaSqm => "buildings.area_sqm",
            Self::WaterConsumptionMl => "water.consumption_ml",
            Self::WaterWastewaterMl => "water.wastewater_ml",
            Self::WasteMswTonnes => "waste.msw_tonnes",
            Self::IndustryEnergyMwh => "industry.energy_mwh",
            Self::OtherEmissionsTco2e => "other_emissions_tco2e",
        }
    }

    /// Header used in the inventory file.
    ///
    /// None of these end in `Emissions (tCO2e)`; that suffix is reserved
    /// for sector result columns.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::EnergyElectricityMwh => "Electricity Consumption (MWh)",
            Self::EnergyDieselL => "Energy Diesel (L)",
            Self::EnergyPetrolL => "Energy Petrol (L)",
            Self::TransportDieselL => "Transport Diesel (L)",
            Self::TransportPetrolL => "Transport Petrol (L)",
            Self::BuildingsAreaSqm => "Built-up Area (sqm)",
            Self::WaterConsumptionMl => "Water Consumption (ML)",
            Self::WaterWastewaterMl => "Wastewater Generated (ML)",
            Self::WasteMswTonnes => "MSW Generated (tonnes)",
            Self::IndustryEnergyMwh => "Industrial Energy (MWh)",
            Self::OtherEmissionsTco2e => "Other Reported (tCO2e)",
        }
    }
}

impl ActivityRecord {
    pub fn get(&self, field: ActivityField) -> f64 {
        match field {
            ActivityField::EnergyElectricityMwh => self.energy.electricity_mwh,
            ActivityField::EnergyDieselL => self.energy.diesel_l,
            ActivityField::EnergyPetrolL => self.energy.petrol_l,
            ActivityField::TransportDieselL => self.transport.diesel_l,
            ActivityField::TransportPetrolL => self.transport.petrol_l,
            ActivityField::BuildingsAreaSqm => self.buildings.area_sqm,
            ActivityField::WaterConsumptionMl => self.water.consumption_ml,
            ActivityField::WaterWastewaterMl => self.water.wastewater_ml,
            ActivityField::WasteMswTonnes => self.waste.msw_tonnes,
            ActivityField::IndustryEnergyMwh => self.industry.energy_mwh,
            ActivityField::OtherEmissionsTco2e => self.other_emissions_tco2e,
        }
    }

    pub fn set(&mut self, field: ActivityField, value: f64) {
        let slot = match field {
            ActivityField::EnergyElectricityMwh => &mut self.energy.electricity_mwh,
            ActivityField::EnergyDieselL => &mut self.energy.diesel_l,
            ActivityField::EnergyPetrolL => &mut self.energy.petrol_l,
            ActivityField::TransportDieselL => &mut self.transport.diesel_l,
            ActivityField::TransportPetrolL => &mut self.transport.petrol_l,
            ActivityField::BuildingsAreaSqm => &mut self.buildings.area_sqm,
            ActivityField::WaterConsumptionMl => &mut self.water.consumption_ml,
            ActivityField::WaterWastewaterMl => &mut self.water.wastewater_ml,
            ActivityField::WasteMswTonnes => &mut self.waste.msw_tonnes,
            ActivityField::IndustryEnergyMwh => &mut self.industry.energy_mwh,
            ActivityField::OtherEmissionsTco2e => &mut self.other_emissions_tco2e,
        };
        *slot = value;
    }

    /// `(field, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (ActivityField, f64)> + '_ {
        ActivityField::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Every quantity multiplied by `k`.
    pub fn scaled(&self, k: f64) -> Self {
        let mut out = *self;
        for field in ActivityField::ALL {
            out.set(field, self.get(field) * k);
        }
        out
    }
}
