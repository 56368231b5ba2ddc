//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};

use cap_types::activity::ActivityField;
use cap_types::{ActivityRecord, CapStatus, EnvDeptExists, UlbCategory};

#[derive(Parser, Debug)]
#[command(name = "cap")]
#[command(about = "Climate Action Plan tracker client")]
pub struct Cli {
    /// Daemon socket. Defaults to `daemon.sock` in the data directory.
    #[arg(long, global = true)]
    pub socket: Option<PathBuf>,

    /// Admin secret; sent before any write on the same connection.
    #[arg(long, global = true, env = "CAP_ADMIN_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reference roster of cities and districts
    Roster,
    /// Cities in the master table
    List,
    /// One city's master row
    Show { city: String },
    /// State-wide CAP status and inventory totals
    Summary,
    /// The emission factor table in use
    Factors,
    /// Stored activity record and emissions for a city
    Inventory { city: String },
    /// Per-sector emissions and shares for a city
    Breakdown { city: String },
    /// Insert or replace a city master row (admin)
    UpsertCity(UpsertCityArgs),
    /// Move a city's CAP status forward (admin)
    SetStatus {
        city: String,
        #[arg(value_parser = parse_cap_status)]
        status: CapStatus,
    },
    /// Calculate and store a city's activity data (admin)
    SaveInventory(SaveInventoryArgs),
    /// Generate a city's PDF inventory report
    Report(ReportArgs),
}

#[derive(Args, Debug)]
pub struct UpsertCityArgs {
    pub city: String,
    /// Left blank, the daemon fills it from the roster.
    #[arg(long, default_value = "")]
    pub district: String,
    #[arg(long, default_value_t = 0)]
    pub population: u64,
    #[arg(long, value_parser = parse_ulb_category, default_value = "Municipal Corporation")]
    pub ulb_category: UlbCategory,
    #[arg(long, value_parser = parse_cap_status, default_value = "Not Started")]
    pub cap_status: CapStatus,
    #[arg(long)]
    pub ghg_total: Option<f64>,
    #[arg(long, value_parser = parse_env_dept, default_value = "No")]
    pub env_dept: EnvDeptExists,
    #[arg(long, default_value = "")]
    pub dept_name: String,
    #[arg(long, default_value = "")]
    pub head_name: String,
    #[arg(long, default_value = "")]
    pub dept_email: String,
}

impl UpsertCityArgs {
    pub fn to_params(&self) -> Value {
        json!({"city": {
            "city_name": self.city,
            "district": self.district,
            "population": self.population,
            "ulb_category": self.ulb_category,
            "cap_status": self.cap_status,
            "ghg_total": self.ghg_total,
            "env_dept_exists": self.env_dept,
            "dept_name": self.dept_name,
            "head_name": self.head_name,
            "dept_email": self.dept_email,
        }})
    }
}

/// Activity quantities; anything not given is zero.
#[derive(Args, Debug)]
pub struct SaveInventoryArgs {
    pub city: String,
    #[arg(long, default_value_t = 0.0)]
    pub electricity_mwh: f64,
    #[arg(long, default_value_t = 0.0)]
    pub energy_diesel_l: f64,
    #[arg(long, default_value_t = 0.0)]
    pub energy_petrol_l: f64,
    #[arg(long, default_value_t = 0.0)]
    pub transport_diesel_l: f64,
    #[arg(long, default_value_t = 0.0)]
    pub transport_petrol_l: f64,
    #[arg(long, default_value_t = 0.0)]
    pub area_sqm: f64,
    #[arg(long, default_value_t = 0.0)]
    pub water_ml: f64,
    #[arg(long, default_value_t = 0.0)]
    pub wastewater_ml: f64,
    #[arg(long, default_value_t = 0.0)]
    pub msw_tonnes: f64,
    #[arg(long, default_value_t = 0.0)]
    pub industry_mwh: f64,
    #[arg(long, default_value_t = 0.0)]
    pub other_tco2e: f64,
}

impl SaveInventoryArgs {
    pub fn activity(&self) -> ActivityRecord {
        let mut a = ActivityRecord::default();
        for (field, value) in [
            (ActivityField::EnergyElectricityMwh, self.electricity_mwh),
            (ActivityField::EnergyDieselL, self.energy_diesel_l),
            (ActivityField::EnergyPetrolL, self.energy_petrol_l),
            (ActivityField::TransportDieselL, self.transport_diesel_l),
            (ActivityField::TransportPetrolL, self.transport_petrol_l),
            (ActivityField::BuildingsAreaSqm, self.area_sqm),
            (ActivityField::WaterConsumptionMl, self.water_ml),
            (ActivityField::WaterWastewaterMl, self.wastewater_ml),
            (ActivityField::WasteMswTonnes, self.msw_tonnes),
            (ActivityField::IndustryEnergyMwh, self.industry_mwh),
            (ActivityField::OtherEmissionsTco2e, self.other_tco2e),
        ] {
            a.set(field, value);
        }
        a
    }
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    pub city: String,
    /// Requester name
    #[arg(long)]
    pub name: String,
    /// Requester email
    #[arg(long)]
    pub email: String,
    /// Requester contact number
    #[arg(long)]
    pub contact: String,
    /// Directory the PDF is written to
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
}

impl Command {
    /// Whether the command needs an authenticated session.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::UpsertCity(_) | Self::SetStatus { .. } | Self::SaveInventory(_)
        )
    }
}

fn parse_cap_status(s: &str) -> Result<CapStatus, String> {
    s.parse().map_err(|e: cap_types::TypesError| e.to_string())
}

fn parse_ulb_category(s: &str) -> Result<UlbCategory, String> {
    s.parse().map_err(|e: cap_types::TypesError| e.to_string())
}

fn parse_env_dept(s: &str) -> Result<EnvDeptExists, String> {
    s.parse().map_err(|e: cap_types::TypesError| e.to_string())
}
