//! Column contracts for the two table files.
//!
//! Master table columns are fixed. Inventory columns are derived from
//! [`ActivityField::ALL`] and [`Sector::ALL`]; the dashboard discovers sector
//! columns by their `Emissions (tCO2e)` suffix.

use cap_types::activity::ActivityField;
use cap_types::Sector;

pub const CITY_NAME_COLUMN: &str = "City Name";

/// Trailing inventory column holding the RFC 3339 save time.
pub const LAST_UPDATED_COLUMN: &str = "Last Updated";

/// Master table header, in order.
pub const MASTER_COLUMNS: [&str; 10] = [
    CITY_NAME_COLUMN,
    "District",
    "Population",
    "ULB Category",
    "CAP Status",
    "GHG Emissions",
    "Environment Department Exist",
    "Department Name",
    "Head Name",
    "Department Email",
];

/// Inventory table header: city, activity fields, sector results, save time.
pub fn inventory_columns() -> Vec<String> {
    std::iter::once(CITY_NAME_COLUMN.to_string())
        .chain(ActivityField::ALL.iter().map(|f| f.column_name().to_string()))
        .chain(Sector::ALL.iter().map(|s| s.column_name()))
        .chain(std::iter::once(LAST_UPDATED_COLUMN.to_string()))
        .collect()
}
