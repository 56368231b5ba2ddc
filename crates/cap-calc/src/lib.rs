//! # cap-calc
//!
//! Maps an [`ActivityRecord`](cap_types::ActivityRecord) to a sector-keyed
//! [`EmissionResult`](cap_types::EmissionResult).
//!
//! ## Modules
//!
//! - [`validate`]: activity constraints (finite, non-negative)
//! - [`calculator`]: per-sector factor application and totals

pub mod calculator;
pub mod validate;

pub use calculator::{calculate, sector_emissions, BUILDINGS_INTENSITY_TCO2E_PER_SQM};
pub use validate::validate;

use cap_types::{ActivityRecord, EmissionFactors, EmissionResult};

/// Error types for activity validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    /// A quantity was below zero.
    #[error("{field} must be non-negative, got {value}")]
    Negative {
        /// Dotted activity field path.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A quantity was NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFinite {
        /// Dotted activity field path.
        field: &'static str,
    },
}

/// Convenience result type for calculator operations.
pub type Result<T> = std::result::Result<T, CalcError>;

/// Validate `activity`, then calculate its emissions.
///
/// # Errors
///
/// - [`CalcError::Negative`] / [`CalcError::NonFinite`] from [`validate`]
pub fn compute(activity: &ActivityRecord, factors: &EmissionFactors) -> Result<EmissionResult> {
    validate(activity)?;
    Ok(calculate(activity, factors))
}
