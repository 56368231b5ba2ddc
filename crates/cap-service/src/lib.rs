//! # cap-service
//!
//! Request sequencing for the CAP tracker. Every operation takes the
//! caller's [`Session`] and the [`InventoryStore`](cap_store::InventoryStore)
//! explicitly; nothing here holds process-wide state.
//!
//! ## Modules
//!
//! - [`session`]: per-connection admin authentication flag
//! - [`admin`]: city master edits and CAP status transitions
//! - [`inventory`]: validate, calculate and persist an activity record
//! - [`report`]: requester checks, report rendering, delivery to a sink
//! - [`sink`]: where rendered PDFs go
//! - [`summary`]: read-side views: state summary, sector breakdown

pub mod admin;
pub mod inventory;
pub mod report;
pub mod session;
pub mod sink;
pub mod summary;

use cap_calc::CalcError;
use cap_report::ReportError;
use cap_store::StoreError;
use cap_types::CapStatus;

pub use admin::{set_cap_status, upsert_city};
pub use inventory::save_inventory;
pub use report::request_report;
pub use session::Session;
pub use sink::{DirectorySink, MemorySink, ReportSink};
pub use summary::{get_city, get_inventory, sector_breakdown, state_summary};

/// Errors surfaced to the caller of any service operation.
///
/// None are fatal; the request fails and the session carries on.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A required field is blank.
    #[error("incomplete request: {0} is required")]
    IncompleteRequest(&'static str),

    #[error("no inventory stored for '{0}'")]
    NoInventory(String),

    #[error("city '{0}' not found")]
    NotFound(String),

    #[error("store error: {0}")]
    StoreIo(#[from] StoreError),

    /// Wrong secret, or a write attempted without authenticating.
    #[error("authentication failed")]
    AuthFailure,

    #[error("invalid activity: {0}")]
    InvalidActivity(#[from] CalcError),

    #[error("district for '{city}' is '{expected}', not '{given}'")]
    DistrictMismatch {
        city: String,
        expected: String,
        given: String,
    },

    #[error("'{0}' is not in the city roster")]
    UnknownCity(String),

    #[error("CAP status cannot move from {from} to {to}")]
    InvalidTransition { from: CapStatus, to: CapStatus },

    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

impl ServiceError {
    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IncompleteRequest(_) => "INCOMPLETE_REQUEST",
            Self::NoInventory(_) => "NO_INVENTORY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::StoreIo(_) => "STORE_IO",
            Self::AuthFailure => "AUTH_FAILURE",
            Self::InvalidActivity(_) => "INVALID_ACTIVITY",
            Self::DistrictMismatch { .. } => "DISTRICT_MISMATCH",
            Self::UnknownCity(_) => "UNKNOWN_CITY",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Report(_) => "REPORT",
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Trimmed `city`, or [`ServiceError::IncompleteRequest`] when blank.
pub(crate) fn require_city(city: &str) -> Result<&str> {
    let city = city.trim();
    if city.is_empty() {
        return Err(ServiceError::IncompleteRequest("city"));
    }
    Ok(city)
}
