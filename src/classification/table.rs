//! The grade/step (D-K) classification table.
//!
//! Two independent ordered range tables drive every decision:
//!
//! - [`SERVICE_GROUP_BANDS`] selects the coarse service group from tenure.
//! - [`STEP_BANDS`] splits each group's tenure span into finer sub-bands,
//!   each with its own per-education step row.
//!
//! Bounds are inclusive below and exclusive above; a band with no upper bound
//! is open-ended. Both the native classifier and the formula compiler read
//! these arrays, so the two can never disagree about a boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{EducationLevel, ServiceGroup};

/// Prim-days that make up one tenure year.
pub const DAYS_PER_YEAR: u32 = 360;

const fn years(n: u32) -> Decimal {
    Decimal::from_parts(n, 0, 0, false, 0)
}

/// One entry of a step row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCell {
    /// A step label such as `"5"` or `"3-4"`.
    Step(&'static str),
    /// No step exists for this education level in this sub-band.
    Unavailable,
}

impl StepCell {
    /// The step label, or `None` for [`StepCell::Unavailable`].
    pub fn label(self) -> Option<&'static str> {
        match self {
            StepCell::Step(label) => Some(label),
            StepCell::Unavailable => None,
        }
    }
}

/// A coarse band: tenure at or above `min_years` selects `group`, checked in
/// descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupBand {
    /// Inclusive lower bound in tenure years.
    pub min_years: Decimal,
    /// The group selected by this band.
    pub group: ServiceGroup,
}

/// A fine sub-band inside one group with its step row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBand {
    /// The group this sub-band belongs to.
    pub group: ServiceGroup,
    /// Inclusive lower bound in tenure years.
    pub min_years: Decimal,
    /// Exclusive upper bound; `None` when unbounded above.
    pub max_years: Option<Decimal>,
    /// Steps indexed by [`EducationLevel::index`].
    pub steps: [StepCell; 4],
}

impl StepBand {
    /// True when `tenure_years` falls inside `[min_years, max_years)`.
    pub fn contains(&self, tenure_years: Decimal) -> bool {
        tenure_years >= self.min_years && self.max_years.is_none_or(|max| tenure_years < max)
    }
}

use StepCell::{Step, Unavailable};

/// Coarse bands, highest lower bound first.
pub const SERVICE_GROUP_BANDS: [GroupBand; 5] = [
    GroupBand { min_years: years(16), group: ServiceGroup::Ag2 },
    GroupBand { min_years: years(12), group: ServiceGroup::Ag3 },
    GroupBand { min_years: years(8), group: ServiceGroup::Ag4 },
    GroupBand { min_years: years(3), group: ServiceGroup::Ag5 },
    GroupBand { min_years: years(0), group: ServiceGroup::Ag6 },
];

/// Fine sub-bands, grouped by service group and ordered by lower bound.
///
/// Step columns: Bachelor's, Non-thesis Master's, Thesis Master's, Doctorate.
pub const STEP_BANDS: [StepBand; 9] = [
    StepBand {
        group: ServiceGroup::Ag6,
        min_years: years(0),
        max_years: Some(years(2)),
        steps: [Step("5-6"), Step("5-6"), Step("3"), Unavailable],
    },
    StepBand {
        group: ServiceGroup::Ag6,
        min_years: years(2),
        max_years: Some(years(3)),
        steps: [Step("3-4"), Step("3-4"), Step("2"), Unavailable],
    },
    StepBand {
        group: ServiceGroup::Ag5,
        min_years: years(3),
        max_years: Some(years(5)),
        steps: [Step("5"), Step("5"), Step("4"), Step("2")],
    },
    StepBand {
        group: ServiceGroup::Ag5,
        min_years: years(5),
        max_years: Some(years(8)),
        steps: [Step("3"), Step("3"), Step("2"), Step("2")],
    },
    StepBand {
        group: ServiceGroup::Ag4,
        min_years: years(8),
        max_years: Some(years(9)),
        steps: [Step("5"), Step("5"), Step("4"), Step("3")],
    },
    StepBand {
        group: ServiceGroup::Ag4,
        min_years: years(9),
        max_years: Some(years(12)),
        steps: [Step("3"), Step("3"), Step("3"), Step("3")],
    },
    StepBand {
        group: ServiceGroup::Ag3,
        min_years: years(12),
        max_years: Some(years(14)),
        steps: [Step("5"), Step("5"), Step("4"), Step("2")],
    },
    StepBand {
        group: ServiceGroup::Ag3,
        min_years: years(14),
        max_years: Some(years(16)),
        steps: [Step("3"), Step("3"), Step("2"), Step("2")],
    },
    StepBand {
        group: ServiceGroup::Ag2,
        min_years: years(16),
        max_years: None,
        steps: [Step("4"), Step("3-4"), Step("3"), Step("3")],
    },
];

/// How Doctorate is treated where the table has no Doctorate step.
///
/// Earlier revisions of the decision table disagreed: some leave the entry
/// band without a Doctorate step, others grade Doctorate like a Thesis
/// Master's there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctoratePolicy {
    /// Unavailable Doctorate entries stay unavailable.
    #[default]
    NoStep,
    /// Unavailable Doctorate entries take the Thesis Master's step of the same sub-band.
    SameAsThesisMaster,
}

/// The classification table with its policy choices applied.
///
/// The band arrays are static; the table only carries the policy used to
/// resolve individual step cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassificationTable {
    doctorate_policy: DoctoratePolicy,
}

impl ClassificationTable {
    /// The documented table: no Doctorate step in the entry group.
    pub fn standard() -> Self {
        Self::with_policy(DoctoratePolicy::NoStep)
    }

    /// A table resolving Doctorate entries with the given policy.
    pub fn with_policy(doctorate_policy: DoctoratePolicy) -> Self {
        Self { doctorate_policy }
    }

    /// The active Doctorate policy.
    pub fn doctorate_policy(&self) -> DoctoratePolicy {
        self.doctorate_policy
    }

    /// Coarse bands, highest lower bound first.
    pub fn group_bands(&self) -> &'static [GroupBand] {
        &SERVICE_GROUP_BANDS
    }

    /// The fine sub-bands of `group`, lowest first.
    pub fn step_bands(&self, group: ServiceGroup) -> impl Iterator<Item = &'static StepBand> {
        STEP_BANDS.iter().filter(move |band| band.group == group)
    }

    /// The step cell for `education` in `band`, with the Doctorate policy applied.
    pub fn step_cell(&self, band: &StepBand, education: EducationLevel) -> StepCell {
        let cell = band.steps[education.index()];
        match (cell, education, self.doctorate_policy) {
            (Unavailable, EducationLevel::Doctorate, DoctoratePolicy::SameAsThesisMaster) => {
                band.steps[EducationLevel::ThesisMaster.index()]
            }
            _ => cell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_bands_descend_and_start_at_zero() {
        let bounds: Vec<Decimal> = SERVICE_GROUP_BANDS.iter().map(|b| b.min_years).collect();
        assert!(bounds.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(*bounds.last().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_step_bands_tile_each_group_span() {
        for (index, band) in SERVICE_GROUP_BANDS.iter().enumerate() {
            let upper = index.checked_sub(1).map(|i| SERVICE_GROUP_BANDS[i].min_years);
            let table = ClassificationTable::standard();
            let subs: Vec<&StepBand> = table.step_bands(band.group).collect();

            assert!(subs.len() >= 1, "{} has no sub-bands", band.group);
            assert_eq!(subs.first().unwrap().min_years, band.min_years);
            assert_eq!(subs.last().unwrap().max_years, upper);
            for pair in subs.windows(2) {
                assert_eq!(pair[0].max_years, Some(pair[1].min_years));
            }
        }
    }

    #[test]
    fn test_sub_band_boundaries_differ_from_group_boundaries() {
        let table = ClassificationTable::standard();
        let ag3_splits: Vec<Decimal> = table
            .step_bands(ServiceGroup::Ag3)
            .map(|b| b.min_years)
            .collect();
        assert_eq!(ag3_splits, vec![years(12), years(14)]);

        let ag4_splits: Vec<Decimal> = table
            .step_bands(ServiceGroup::Ag4)
            .map(|b| b.min_years)
            .collect();
        assert_eq!(ag4_splits, vec![years(8), years(9)]);
    }

    #[test]
    fn test_band_contains_is_half_open() {
        let band = &STEP_BANDS[0];
        assert!(band.contains(Decimal::ZERO));
        assert!(band.contains(Decimal::new(1999, 3)));
        assert!(!band.contains(years(2)));
        assert!(!band.contains(Decimal::new(-1, 0)));
    }

    #[test]
    fn test_unbounded_band_contains_large_tenure() {
        assert!(STEP_BANDS[8].contains(years(100)));
        assert!(!STEP_BANDS[8].contains(Decimal::new(15999, 3)));
    }

    #[test]
    fn test_standard_policy_keeps_doctorate_unavailable() {
        let table = ClassificationTable::standard();
        assert_eq!(
            table.step_cell(&STEP_BANDS[0], EducationLevel::Doctorate),
            Unavailable
        );
    }

    #[test]
    fn test_thesis_master_policy_fills_doctorate() {
        let table = ClassificationTable::with_policy(DoctoratePolicy::SameAsThesisMaster);
        assert_eq!(table.step_cell(&STEP_BANDS[0], EducationLevel::Doctorate), Step("3"));
        assert_eq!(table.step_cell(&STEP_BANDS[1], EducationLevel::Doctorate), Step("2"));
        // Defined doctorate cells are untouched.
        assert_eq!(table.step_cell(&STEP_BANDS[2], EducationLevel::Doctorate), Step("2"));
    }

    #[test]
    fn test_doctorate_policy_serde() {
        let policy: DoctoratePolicy = serde_yaml::from_str("same_as_thesis_master").unwrap();
        assert_eq!(policy, DoctoratePolicy::SameAsThesisMaster);
        assert_eq!(DoctoratePolicy::default(), DoctoratePolicy::NoStep);
    }
}
