//! City master record and its categorical columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TypesError;

/// One row of the city master table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct CityRecord {
    /// Unique key, drawn from the reference roster.
    pub city_name: String,
    /// Always equal to the roster district for `city_name` once stored.
    pub district: String,
    /// Census population (see [`crate::CENSUS_YEAR`]).
    pub population: u64,
    pub ulb_category: UlbCategory,
    pub cap_status: CapStatus,
    /// Free-form summary figure entered by an administrator.
    #[serde(default)]
    pub ghg_total: Option<f64>,
    pub env_dept_exists: EnvDeptExists,
    #[serde(default)]
    pub dept_name: String,
    #[serde(default)]
    pub head_name: String,
    /// Not syntactically validated.
    #[serde(default)]
    pub dept_email: String,
}

impl CityRecord {
    /// A fresh record for a roster city with every optional column empty.
    pub fn new(city_name: &str, district: &str, ulb_category: UlbCategory) -> Self {
        Self {
            city_name: city_name.to_string(),
            district: district.to_string(),
            population: 0,
            ulb_category,
            cap_status: CapStatus::NotStarted,
            ghg_total: None,
            env_dept_exists: EnvDeptExists::No,
            dept_name: String::new(),
            head_name: String::new(),
            dept_email: String::new(),
        }
    }
}

/// Urban Local Body category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub enum UlbCategory {
    #[serde(rename = "Municipal Corporation")]
    MunicipalCorporation,
    #[serde(rename = "Municipal Council")]
    MunicipalCouncil,
}

impl UlbCategory {
    pub const ALL: [UlbCategory; 2] = [Self::MunicipalCorporation, Self::MunicipalCouncil];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MunicipalCorporation => "Municipal Corporation",
            Self::MunicipalCouncil => "Municipal Council",
        }
    }
}

/// Climate Action Plan preparation status.
///
/// Ordered: a status only ever moves towards [`CapStatus::Completed`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ts_rs::TS,
)]
#[ts(export)]
pub enum CapStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl CapStatus {
    pub const ALL: [CapStatus; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Whether an administrator may move a city from `self` to `next`.
    ///
    /// Staying put and skipping ahead are allowed; moving back is not.
    pub fn can_transition_to(self, next: CapStatus) -> bool {
        next >= self
    }
}

/// Whether the city has a dedicated environment department.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub enum EnvDeptExists {
    Yes,
    No,
}

impl EnvDeptExists {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

macro_rules! display_from_str {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::variants()
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| TypesError::InvalidEnum {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl UlbCategory {
    fn variants() -> &'static [Self] {
        &Self::ALL
    }
}

impl CapStatus {
    fn variants() -> &'static [Self] {
        &Self::ALL
    }
}

impl EnvDeptExists {
    fn variants() -> &'static [Self] {
        &[Self::Yes, Self::No]
    }
}

display_from_str!(UlbCategory, "ULB Category");
display_from_str!(CapStatus, "CAP Status");
display_from_str!(EnvDeptExists, "Environment Department Exist");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_status_forward_only() {
        assert!(CapStatus::NotStarted.can_transition_to(CapStatus::InProgress));
        assert!(CapStatus::NotStarted.can_transition_to(CapStatus::Completed));
        assert!(CapStatus::InProgress.can_transition_to(CapStatus::InProgress));
        assert!(!CapStatus::Completed.can_transition_to(CapStatus::InProgress));
        assert!(!CapStatus::InProgress.can_transition_to(CapStatus::NotStarted));
    }

    #[test]
    fn test_parse_categorical_columns() {
        assert_eq!(
            "Municipal Council".parse::<UlbCategory>().expect("parse"),
            UlbCategory::MunicipalCouncil
        );
        assert_eq!(
            " in progress ".parse::<CapStatus>().expect("parse"),
            CapStatus::InProgress
        );
        assert_eq!("yes".parse::<EnvDeptExists>().expect("parse"), EnvDeptExists::Yes);

        let err = "Village Panchayat"
            .parse::<UlbCategory>()
            .expect_err("not a ULB category");
        assert!(matches!(err, TypesError::InvalidEnum { field: "ULB Category", .. }));
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&CapStatus::NotStarted).expect("serialize");
        assert_eq!(json, "\"Not Started\"");
        let back: UlbCategory =
            serde_json::from_str("\"Municipal Corporation\"").expect("deserialize");
        assert_eq!(back, UlbCategory::MunicipalCorporation);
    }

    #[test]
    fn test_new_record_defaults() {
        let r = CityRecord::new("Pune", "Pune", UlbCategory::MunicipalCorporation);
        assert_eq!(r.cap_status, CapStatus::NotStarted);
        assert_eq!(r.env_dept_exists, EnvDeptExists::No);
        assert!(r.ghg_total.is_none());
    }
}
