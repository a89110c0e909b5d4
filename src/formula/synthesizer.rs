//! Builds the formulas placed into each employee sheet.
//!
//! All operations return [`FormulaExpr`] trees addressed to cell references;
//! render them with [`FormulaExpr::to_formula`] in the dialect the target
//! needs. The classification formulas are compiled from the same
//! [`ClassificationTable`] the native classifier uses.

use rust_decimal::Decimal;

use crate::classification::{ClassificationTable, DAYS_PER_YEAR};

use super::cell::{CellRange, CellRef};
use super::compiler::{
    compile_education_branch, compile_group_cascade, compile_sub_band_cascade,
};
use super::expr::FormulaExpr;

/// Marker typed into the in-field column ("E" for evet).
pub const IN_FIELD_MARKER: &str = "E";

/// The cells of one education row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EducationRowCells {
    /// Cell holding the level label (e.g. "Lisans").
    pub label: CellRef,
    /// Cell holding the school name; empty when the row is unused.
    pub school: CellRef,
    /// Cell holding the in-field marker.
    pub in_field: CellRef,
}

/// Formula factory bound to one classification table.
///
/// # Example
///
/// ```
/// use grade_engine::classification::ClassificationTable;
/// use grade_engine::formula::{CellRef, FormulaSynthesizer, OoxmlDialect, TurkishDialect};
///
/// let synth = FormulaSynthesizer::new(ClassificationTable::standard());
/// let z1 = CellRef::parse("Z1").unwrap();
/// let title = synth.title_formula(z1);
/// assert!(title.to_formula(&OoxmlDialect).starts_with("=IF(Z1>=16,\"Kıdemli Başuzman\","));
/// assert!(title.to_formula(&TurkishDialect).starts_with("=EĞER(Z1>=16;\"Kıdemli Başuzman\";"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaSynthesizer {
    table: ClassificationTable,
}

impl FormulaSynthesizer {
    /// Creates a synthesizer for `table`.
    pub fn new(table: ClassificationTable) -> Self {
        Self { table }
    }

    /// The table the classification formulas are compiled from.
    pub fn table(&self) -> &ClassificationTable {
        &self.table
    }

    /// `IF(AND(start<>"",end<>""),end-start,"")`.
    pub fn prim_day_for_row(&self, start: CellRef, end: CellRef) -> FormulaExpr {
        FormulaExpr::if_then_else(
            FormulaExpr::and(vec![FormulaExpr::is_filled(start), FormulaExpr::is_filled(end)]),
            FormulaExpr::subtract(FormulaExpr::cell(end), FormulaExpr::cell(start)),
            FormulaExpr::empty_text(),
        )
    }

    /// `IF(marker="E",prim_day,"")`.
    pub fn in_field_prim_day_for_row(&self, marker: CellRef, prim_day: CellRef) -> FormulaExpr {
        FormulaExpr::if_then_else(
            FormulaExpr::eq(FormulaExpr::cell(marker), FormulaExpr::text(IN_FIELD_MARKER)),
            FormulaExpr::cell(prim_day),
            FormulaExpr::empty_text(),
        )
    }

    /// `SUM(col first:col last)`.
    pub fn range_sum(&self, col: u16, first_row: u32, last_row: u32) -> FormulaExpr {
        FormulaExpr::sum(CellRange::column(col, first_row, last_row))
    }

    /// `prim_days/360`.
    pub fn tenure_years(&self, prim_days: CellRef) -> FormulaExpr {
        FormulaExpr::divide(
            FormulaExpr::cell(prim_days),
            FormulaExpr::Number(Decimal::from(DAYS_PER_YEAR)),
        )
    }

    /// The label of the highest completed in-field education.
    ///
    /// `rows` are ordered from the lowest credential to the highest. The
    /// generated cascade scans from the highest row down and returns the
    /// label of the first row whose school is filled in and whose in-field
    /// marker is set, or `""` when none qualifies.
    pub fn highest_in_field_education(&self, rows: &[EducationRowCells]) -> FormulaExpr {
        let arms = rows
            .iter()
            .rev()
            .map(|row| {
                (
                    FormulaExpr::and(vec![
                        FormulaExpr::is_filled(row.school),
                        FormulaExpr::eq(
                            FormulaExpr::cell(row.in_field),
                            FormulaExpr::text(IN_FIELD_MARKER),
                        ),
                    ]),
                    FormulaExpr::cell(row.label),
                )
            })
            .collect();
        super::compiler::cascade(arms, FormulaExpr::empty_text())
    }

    /// Title cascade over the group bands, highest threshold first.
    pub fn title_formula(&self, tenure: CellRef) -> FormulaExpr {
        compile_group_cascade(&self.table, &FormulaExpr::cell(tenure), |band| {
            FormulaExpr::text(band.group.title().label())
        })
    }

    /// Group-code cascade over the group bands, highest threshold first.
    pub fn service_group_formula(&self, tenure: CellRef) -> FormulaExpr {
        compile_group_cascade(&self.table, &FormulaExpr::cell(tenure), |band| {
            FormulaExpr::text(band.group.code())
        })
    }

    /// Step lookup: group cascade, then sub-band cascade, then education branch.
    ///
    /// Evaluates to `""` wherever the native lookup has no step.
    pub fn step_formula(&self, tenure: CellRef, education: CellRef) -> FormulaExpr {
        let subject = FormulaExpr::cell(tenure);
        let education = FormulaExpr::cell(education);
        compile_group_cascade(&self.table, &subject, |group_band| {
            compile_sub_band_cascade(&self.table, group_band.group, &subject, |step_band| {
                compile_education_branch(&self.table, step_band, &education)
            })
        })
    }

    /// `IF(step="",group,group & "/" & step)`.
    pub fn grade_display(&self, group: CellRef, step: CellRef) -> FormulaExpr {
        FormulaExpr::if_then_else(
            FormulaExpr::eq(FormulaExpr::cell(step), FormulaExpr::empty_text()),
            FormulaExpr::cell(group),
            FormulaExpr::concat(vec![
                FormulaExpr::cell(group),
                FormulaExpr::text("/"),
                FormulaExpr::cell(step),
            ]),
        )
    }
}
