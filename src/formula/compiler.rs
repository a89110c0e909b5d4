//! Compiles the classification range tables into nested conditionals.
//!
//! The step, title and group formulas are all produced here from the same
//! band arrays the native classifier walks, so a boundary can only ever be
//! changed in one place.

use crate::classification::{ClassificationTable, GroupBand, StepBand, StepCell};
use crate::models::{EducationLevel, ServiceGroup};

use super::expr::FormulaExpr;

/// Folds `(condition, value)` arms into `IF(c1, v1, IF(c2, v2, ... default))`.
///
/// Arms are tested in the order given.
pub fn cascade(arms: Vec<(FormulaExpr, FormulaExpr)>, default: FormulaExpr) -> FormulaExpr {
    arms.into_iter()
        .rev()
        .fold(default, |otherwise, (condition, then)| {
            FormulaExpr::if_then_else(condition, then, otherwise)
        })
}

/// Descending `subject >= lower` cascade over the coarse group bands.
///
/// The last band (lower bound 0) becomes the default, so tenure below every
/// threshold selects the lowest group.
pub fn compile_group_cascade(
    table: &ClassificationTable,
    subject: &FormulaExpr,
    mut value: impl FnMut(&GroupBand) -> FormulaExpr,
) -> FormulaExpr {
    let bands = table.group_bands();
    let Some((lowest, upper)) = bands.split_last() else {
        return FormulaExpr::empty_text();
    };
    let arms = upper
        .iter()
        .map(|band| {
            (
                FormulaExpr::ge(subject.clone(), FormulaExpr::Number(band.min_years)),
                value(band),
            )
        })
        .collect();
    cascade(arms, value(lowest))
}

/// Ascending `subject < upper` cascade over one group's fine sub-bands.
///
/// Only meaningful once the outer cascade has established that `subject`
/// lies in `group`'s span; the last sub-band becomes the default.
pub fn compile_sub_band_cascade(
    table: &ClassificationTable,
    group: ServiceGroup,
    subject: &FormulaExpr,
    mut value: impl FnMut(&StepBand) -> FormulaExpr,
) -> FormulaExpr {
    let bands: Vec<&StepBand> = table.step_bands(group).collect();
    let Some((last, lower)) = bands.split_last() else {
        return FormulaExpr::empty_text();
    };
    let arms = lower
        .iter()
        .filter_map(|band| {
            band.max_years.map(|max| {
                (
                    FormulaExpr::lt(subject.clone(), FormulaExpr::Number(max)),
                    value(*band),
                )
            })
        })
        .collect();
    cascade(arms, value(*last))
}

/// Per-education branch for one sub-band.
///
/// Every level is tested by its label; unavailable cells and an
/// unrecognised education cell both yield `""`.
pub fn compile_education_branch(
    table: &ClassificationTable,
    band: &StepBand,
    education: &FormulaExpr,
) -> FormulaExpr {
    let arms = EducationLevel::ALL
        .into_iter()
        .map(|level| {
            let value = match table.step_cell(band, level) {
                StepCell::Step(label) => FormulaExpr::text(label),
                StepCell::Unavailable => FormulaExpr::empty_text(),
            };
            (
                FormulaExpr::eq(education.clone(), FormulaExpr::text(level.label())),
                value,
            )
        })
        .collect();
    cascade(arms, FormulaExpr::empty_text())
}
