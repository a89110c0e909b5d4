//! Grade/step classification.
//!
//! The ordered range tables [`SERVICE_GROUP_BANDS`] and [`STEP_BANDS`] are
//! the single source of truth for the business rule. The native lookups
//! below and the formula compiler in [`crate::formula`] both read them.

mod classifier;
mod lookup;
mod table;

pub use classifier::classify;
pub use lookup::{service_group, step, tenure_years, title_for_code};
pub use table::{
    ClassificationTable, DAYS_PER_YEAR, DoctoratePolicy, GroupBand, SERVICE_GROUP_BANDS,
    STEP_BANDS, StepBand, StepCell,
};
