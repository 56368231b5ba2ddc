//! Fixed city → district reference table.
//!
//! The admin form never lets a user type a district: it is looked up here
//! from the selected city.

/// A single roster entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    pub city_name: &'static str,
    pub district: &'static str,
}

const fn entry(city_name: &'static str, district: &'static str) -> RosterEntry {
    RosterEntry {
        city_name,
        district,
    }
}

/// The 43 urban local bodies tracked by the dashboard, in display order.
pub const ROSTER: [RosterEntry; crate::ROSTER_SIZE] = [
    entry("Mumbai", "Mumbai Suburban"),
    entry("Pune", "Pune"),
    entry("Pimpri-Chinchwad", "Pune"),
    entry("Nagpur", "Nagpur"),
    entry("Thane", "Thane"),
    entry("Nashik", "Nashik"),
    entry("Kalyan-Dombivli", "Thane"),
    entry("Vasai-Virar", "Palghar"),
    entry("Navi Mumbai", "Thane"),
    entry("Chhatrapati Sambhajinagar", "Chhatrapati Sambhajinagar"),
    entry("Solapur", "Solapur"),
    entry("Mira-Bhayandar", "Thane"),
    entry("Bhiwandi-Nizampur", "Thane"),
    entry("Amravati", "Amravati"),
    entry("Kolhapur", "Kolhapur"),
    entry("Ulhasnagar", "Thane"),
    entry("Sangli-Miraj-Kupwad", "Sangli"),
    entry("Malegaon", "Nashik"),
    entry("Jalgaon", "Jalgaon"),
    entry("Akola", "Akola"),
    entry("Latur", "Latur"),
    entry("Dhule", "Dhule"),
    entry("Ahilyanagar", "Ahilyanagar"),
    entry("Chandrapur", "Chandrapur"),
    entry("Parbhani", "Parbhani"),
    entry("Ichalkaranji", "Kolhapur"),
    entry("Jalna", "Jalna"),
    entry("Panvel", "Raigad"),
    entry("Nanded-Waghala", "Nanded"),
    entry("Ambernath", "Thane"),
    entry("Bhusawal", "Jalgaon"),
    entry("Kulgaon-Badlapur", "Thane"),
    entry("Beed", "Beed"),
    entry("Gondia", "Gondia"),
    entry("Satara", "Satara"),
    entry("Barshi", "Solapur"),
    entry("Yavatmal", "Yavatmal"),
    entry("Achalpur", "Amravati"),
    entry("Dharashiv", "Dharashiv"),
    entry("Wardha", "Wardha"),
    entry("Udgir", "Latur"),
    entry("Hinganghat", "Wardha"),
    entry("Ratnagiri", "Ratnagiri"),
];

/// District for a roster city, matched exactly.
pub fn district_for(city_name: &str) -> Option<&'static str> {
    ROSTER
        .iter()
        .find(|e| e.city_name == city_name)
        .map(|e| e.district)
}

/// Whether `city_name` is part of the roster.
pub fn contains(city_name: &str) -> bool {
    district_for(city_name).is_some()
}

/// Roster city names in display order.
pub fn city_names() -> impl Iterator<Item = &'static str> {
    ROSTER.iter().map(|e| e.city_name)
}
