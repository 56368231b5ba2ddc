//! Activity record constraints.

use cap_types::ActivityRecord;

use crate::{CalcError, Result};

/// Check that every activity quantity is finite and `>= 0`.
///
/// Fields are checked in inventory column order; the first violation is
/// reported.
pub fn validate(activity: &ActivityRecord) -> Result<()> {
    for (field, value) in activity.fields() {
        if !value.is_finite() {
            return Err(CalcError::NonFinite { field: field.key() });
        }
        if value < 0.0 {
            return Err(CalcError::Negative {
                field: field.key(),
                value,
            });
        }
    }
    Ok(())
}
