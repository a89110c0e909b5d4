//! The validated employee record.

use serde::Serialize;

use crate::validation::{
    is_valid_national_id, is_valid_org_unit, is_valid_person_name, normalize_national_id,
};

/// A validated employee.
///
/// Instances can only be obtained through [`Person::validated`], so every
/// `Person` carries a checksum-valid national identifier and non-empty,
/// trimmed name and organizational unit. Fields are read-only.
///
/// # Example
///
/// ```
/// use grade_engine::models::Person;
///
/// let person = Person::validated("10000000146", "  Fatma KARACA ", "Marmara Enstitüsü").unwrap();
/// assert_eq!(person.full_name(), "Fatma KARACA");
/// assert!(Person::validated("10000000145", "Fatma KARACA", "Marmara Enstitüsü").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Person {
    national_id: String,
    full_name: String,
    org_unit: String,
}

impl Person {
    /// Normalizes and validates raw identity fields.
    ///
    /// Returns `None` when any field fails validation; callers filter such
    /// rows out rather than reporting them.
    pub fn validated(national_id: &str, full_name: &str, org_unit: &str) -> Option<Self> {
        let national_id = normalize_national_id(national_id);
        if !is_valid_national_id(&national_id)
            || !is_valid_person_name(full_name)
            || !is_valid_org_unit(org_unit)
        {
            return None;
        }

        Some(Self {
            national_id,
            full_name: full_name.trim().to_string(),
            org_unit: org_unit.trim().to_string(),
        })
    }

    /// The canonical 11-digit national identifier.
    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    /// The trimmed full name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The trimmed organizational unit.
    pub fn org_unit(&self) -> &str {
        &self.org_unit
    }
}
