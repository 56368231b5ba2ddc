//! Emission factor table.
//!
//! | stream          | default | unit          |
//! |-----------------|---------|---------------|
//! | electricity     | 0.82    | tCO2e / MWh   |
//! | diesel          | 2.68    | kgCO2e / L    |
//! | petrol          | 2.31    | kgCO2e / L    |
//! | waste (MSW)     | 1.2     | tCO2e / tonne |
//! | water supply    | 0.5     | tCO2e / ML    |
//! | wastewater      | 0.7     | tCO2e / ML    |
//! | industry energy | 0.82    | tCO2e / MWh   |
//!
//! The table is passed explicitly into the calculator. The daemon reads it
//! from the `[emission_factors]` section of its config file; every key
//! falls back to the default above.

use serde::{Deserialize, Serialize};

use crate::{Result, TypesError};

/// Grid electricity, tCO2e per MWh.
pub const DEFAULT_ELECTRICITY: f64 = 0.82;
/// Diesel combustion, kgCO2e per litre.
pub const DEFAULT_DIESEL: f64 = 2.68;
/// Petrol combustion, kgCO2e per litre.
pub const DEFAULT_PETROL: f64 = 2.31;
/// Municipal solid waste, tCO2e per tonne.
pub const DEFAULT_WASTE: f64 = 1.2;
/// Water supply, tCO2e per megalitre.
pub const DEFAULT_WATER: f64 = 0.5;
/// Wastewater treatment, tCO2e per megalitre.
pub const DEFAULT_WASTEWATER: f64 = 0.7;
/// Industrial energy use, tCO2e per MWh.
pub const DEFAULT_INDUSTRY_ENERGY: f64 = 0.82;

/// Kilograms per tonne, for the litre-based fuel factors.
pub const KG_PER_TONNE: f64 = 1000.0;

/// Multiplicative factors converting activity quantities into emissions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct EmissionFactors {
    #[serde(default = "default_electricity")]
    pub electricity: f64,
    #[serde(default = "default_diesel")]
    pub diesel: f64,
    #[serde(default = "default_petrol")]
    pub petrol: f64,
    #[serde(default = "default_waste")]
    pub waste: f64,
    #[serde(default = "default_water")]
    pub water: f64,
    #[serde(default = "default_wastewater")]
    pub wastewater: f64,
    #[serde(default = "default_industry_energy")]
    pub industry_energy: f64,
}

fn default_electricity() -> f64 {
    DEFAULT_ELECTRICITY
}

fn default_diesel() -> f64 {
    DEFAULT_DIESEL
}

fn default_petrol() -> f64 {
    DEFAULT_PETROL
}

fn default_waste() -> f64 {
    DEFAULT_WASTE
}

fn default_water() -> f64 {
    DEFAULT_WATER
}

fn default_wastewater() -> f64 {
    DEFAULT_WASTEWATER
}

fn default_industry_energy() -> f64 {
    DEFAULT_INDUSTRY_ENERGY
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            electricity: DEFAULT_ELECTRICITY,
            diesel: DEFAULT_DIESEL,
            petrol: DEFAULT_PETROL,
            waste: DEFAULT_WASTE,
            water: DEFAULT_WATER,
            wastewater: DEFAULT_WASTEWATER,
            industry_energy: DEFAULT_INDUSTRY_ENERGY,
        }
    }
}

impl EmissionFactors {
    /// `(name, value)` pairs using the configuration key names.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("electricity", self.electricity),
            ("diesel", self.diesel),
            ("petrol", self.petrol),
            ("waste", self.waste),
            ("water", self.water),
            ("wastewater", self.wastewater),
            ("industry_energy", self.industry_energy),
        ]
    }

    /// Reject any factor that is not a positive finite number.
    ///
    /// # Errors
    ///
    /// - [`TypesError::InvalidFactor`] naming the first offending factor
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.entries() {
            if !value.is_finite() || value <= 0.0 {
                return Err(TypesError::InvalidFactor { name, value });
            }
        }
        Ok(())
    }
}
