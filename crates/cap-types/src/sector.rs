//! Emission sectors.
//!
//! The inventory file's result columns, the report rows and the dashboard's
//! pie chart are all derived from [`Sector::ALL`], so the column-name
//! contract lives in exactly one place.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::activity::ActivityField;

/// Suffix that marks a sector result column in the inventory file.
pub const EMISSIONS_COLUMN_SUFFIX: &str = "Emissions (tCO2e)";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Energy,
    Transport,
    Buildings,
    Water,
    Wastewater,
    Waste,
    Industry,
    Other,
}

impl Sector {
    /// Fixed presentation and storage order.
    pub const ALL: [Sector; 8] = [
        Self::Energy,
        Self::Transport,
        Self::Buildings,
        Self::Water,
        Self::Wastewater,
        Self::Waste,
        Self::Industry,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Energy => "Energy",
            Self::Transport => "Transport",
            Self::Buildings => "Buildings",
            Self::Water => "Water",
            Self::Wastewater => "Wastewater",
            Self::Waste => "Waste",
            Self::Industry => "Industry",
            Self::Other => "Other",
        }
    }

    /// Inventory file header, e.g. `Energy Emissions (tCO2e)`.
    pub fn column_name(self) -> String {
        format!("{} {EMISSIONS_COLUMN_SUFFIX}", self.label())
    }

    /// Inverse of [`Sector::column_name`].
    pub fn from_column_name(column: &str) -> Option<Sector> {
        let label = column.strip_suffix(EMISSIONS_COLUMN_SUFFIX)?.trim_end();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Activity fields this sector draws on.
    pub fn activity_fields(self) -> &'static [ActivityField] {
        match self {
            Self::Energy => &[
                ActivityField::EnergyElectricityMwh,
                ActivityField::EnergyDieselL,
                ActivityField::EnergyPetrolL,
            ],
            Self::Transport => &[ActivityField::TransportDieselL, ActivityField::TransportPetrolL],
            Self::Buildings => &[ActivityField::BuildingsAreaSqm],
            Self::Water => &[ActivityField::WaterConsumptionMl],
            Self::Wastewater => &[ActivityField::WaterWastewaterMl],
            Self::Waste => &[ActivityField::WasteMswTonnes],
            Self::Industry => &[ActivityField::IndustryEnergyMwh],
            Self::Other => &[ActivityField::OtherEmissionsTco2e],
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_column_names() {
        assert_eq!(Sector::Energy.column_name(), "Energy Emissions (tCO2e)");
        assert_eq!(Sector::Other.column_name(), "Other Emissions (tCO2e)");
        for sector in Sector::ALL {
            assert_eq!(Sector::from_column_name(&sector.column_name()), Some(sector));
        }
        assert_eq!(Sector::from_column_name("City Name"), None);
        assert_eq!(Sector::from_column_name("Solar Emissions (tCO2e)"), None);
    }

    #[test]
    fn test_every_activity_field_belongs_to_one_sector() {
        let mut seen = HashSet::new();
        for sector in Sector::ALL {
            for field in sector.activity_fields() {
                assert!(seen.insert(*field), "{field:?} claimed twice");
            }
        }
        assert_eq!(seen.len(), ActivityField::ALL.len());
    }
}
