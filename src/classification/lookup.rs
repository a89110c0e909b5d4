//! Single-stage lookups over the classification table.
//!
//! Each function answers one question of the pipeline and is usable on its
//! own; [`classify`](super::classify) composes them.

use rust_decimal::Decimal;

use super::table::{ClassificationTable, DAYS_PER_YEAR};
use crate::error::EngineResult;
use crate::models::{EducationLevel, ServiceGroup, StepLabel, Title};

/// Converts in-field prim-days into tenure years.
///
/// Plain division by 360, without rounding. Zero and negative inputs pass
/// through unchanged in sign.
///
/// # Example
///
/// ```
/// use grade_engine::classification::tenure_years;
/// use rust_decimal::Decimal;
///
/// assert_eq!(tenure_years(Decimal::from(1440)), Decimal::from(4));
/// assert_eq!(tenure_years(Decimal::from(180)), Decimal::new(5, 1));
/// ```
pub fn tenure_years(in_field_prim_days: Decimal) -> Decimal {
    in_field_prim_days / Decimal::from(DAYS_PER_YEAR)
}

/// Selects the service group for a tenure.
///
/// The first band, in descending lower-bound order, whose lower bound is at
/// most `tenure_years` wins. Tenure below every band falls back to the
/// lowest group.
pub fn service_group(table: &ClassificationTable, tenure_years: Decimal) -> ServiceGroup {
    table
        .group_bands()
        .iter()
        .find(|band| band.min_years <= tenure_years)
        .map(|band| band.group)
        .unwrap_or(ServiceGroup::Ag6)
}

/// Looks up the title bound to a group code such as `"A/AG-4"`.
///
/// # Errors
///
/// Returns [`EngineError::UnknownServiceGroup`](crate::error::EngineError::UnknownServiceGroup)
/// for a code outside the five known groups.
pub fn title_for_code(code: &str) -> EngineResult<Title> {
    ServiceGroup::from_code(code).map(ServiceGroup::title)
}

/// Looks up the step for a tenure, group and education level.
///
/// Finds the sub-band of `group` with `min <= tenure_years < max` (the last
/// sub-band is unbounded above) and reads the cell for `education`. Returns
/// `None` when no sub-band matches or the cell is unavailable.
///
/// # Example
///
/// ```
/// use grade_engine::classification::{ClassificationTable, step};
/// use grade_engine::models::{EducationLevel, ServiceGroup};
/// use rust_decimal::Decimal;
///
/// let table = ClassificationTable::standard();
/// let label = step(&table, Decimal::from(13), ServiceGroup::Ag3, EducationLevel::Bachelor);
/// assert_eq!(label.unwrap().as_str(), "5");
///
/// assert!(step(&table, Decimal::ONE, ServiceGroup::Ag6, EducationLevel::Doctorate).is_none());
/// ```
pub fn step(
    table: &ClassificationTable,
    tenure_years: Decimal,
    group: ServiceGroup,
    education: EducationLevel,
) -> Option<StepLabel> {
    let band = table
        .step_bands(group)
        .find(|band| band.contains(tenure_years))?;
    table
        .step_cell(band, education)
        .label()
        .map(StepLabel::new)
}
