//! # cap-types
//!
//! Shared domain types for the CAP tracker workspace: the city master
//! record, the annual activity record, the emission factor table, the
//! sector variant and the derived emission result.
//!
//! Nothing in this crate touches the filesystem. Reference tables
//! ([`roster`], [`factors::EmissionFactors::default`]) are compiled in.

pub mod activity;
pub mod city;
pub mod emission;
pub mod factors;
pub mod request;
pub mod roster;
pub mod sector;

pub use activity::ActivityRecord;
pub use city::{CapStatus, CityRecord, EnvDeptExists, UlbCategory};
pub use emission::EmissionResult;
pub use factors::EmissionFactors;
pub use request::RequesterIdentity;
pub use sector::Sector;

/// Census year the `population` column refers to.
pub const CENSUS_YEAR: u16 = 2011;

/// Number of urban local bodies in the reference roster.
pub const ROSTER_SIZE: usize = 43;

/// Error types for domain value parsing and validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypesError {
    /// A categorical column held a value outside its enumeration.
    #[error("invalid {field}: '{value}'")]
    InvalidEnum {
        /// Column or field name.
        field: &'static str,
        /// Rejected text.
        value: String,
    },

    /// City is not part of the reference roster.
    #[error("unknown city '{0}'")]
    UnknownCity(String),

    /// Emission factor outside the accepted range.
    #[error("emission factor '{name}' must be positive and finite, got {value}")]
    InvalidFactor {
        /// Factor name as used in configuration.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Convenience result type for domain operations.
pub type Result<T> = std::result::Result<T, TypesError>;
