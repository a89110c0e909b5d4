//! Identity field validation.
//!
//! All validators are pure predicates: they return `bool` and never fail.
//! Roster ingestion uses them to drop invalid rows silently.

mod national_id;

pub use national_id::{NATIONAL_ID_LEN, is_valid_national_id, normalize_national_id};

/// True when the name is non-empty after trimming.
pub fn is_valid_person_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// True when the organizational unit is non-empty after trimming.
pub fn is_valid_org_unit(unit: &str) -> bool {
    !unit.trim().is_empty()
}

/// Variant of the text predicates for optional cells.
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
