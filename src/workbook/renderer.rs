//! Renders employees into a workbook, one sheet each.

use tracing::{debug, info};

use crate::classification::ClassificationTable;
use crate::error::EngineResult;
use crate::formula::{
    CellRef, EducationRowCells, FormulaExpr, FormulaSynthesizer, IN_FIELD_MARKER,
};
use crate::models::{EducationLevel, Person};

use super::layout::SheetLayout;
use super::model::{ColumnFormat, ListValidation, Sheet, Workbook};
use super::naming::SheetNamer;

/// Marker for a career or education entry outside the field.
pub const OUT_OF_FIELD_MARKER: &str = "H";

/// The per-employee sheet: fixed labels plus every formula.
///
/// Built once from a layout and copied for each employee.
#[derive(Debug, Clone)]
pub struct SheetTemplate {
    layout: SheetLayout,
    synthesizer: FormulaSynthesizer,
}

impl SheetTemplate {
    /// Creates a template for `layout`, compiling formulas from `table`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLayout`](crate::error::EngineError::InvalidLayout)
    /// when the layout fails [`SheetLayout::validate`].
    pub fn new(layout: SheetLayout, table: ClassificationTable) -> EngineResult<Self> {
        layout.validate()?;
        Ok(Self {
            layout,
            synthesizer: FormulaSynthesizer::new(table),
        })
    }

    /// The layout this template writes.
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Every formula cell of the sheet, in writing order.
    ///
    /// Career rows first, then totals, helpers and finally the visible
    /// result cells.
    pub fn formula_cells(&self) -> Vec<(CellRef, FormulaExpr)> {
        let synth = &self.synthesizer;
        let career = &self.layout.career;
        let helpers = &self.layout.helpers;
        let identity = &self.layout.identity;
        let mut cells = Vec::new();

        for row in career.rows() {
            cells.push((
                career.prim_days.at(row),
                synth.prim_day_for_row(career.start.at(row), career.end.at(row)),
            ));
            cells.push((
                career.in_field_prim_days.at(row),
                synth.in_field_prim_day_for_row(career.in_field.at(row), career.prim_days.at(row)),
            ));
        }

        for column in [career.prim_days, career.in_field_prim_days] {
            cells.push((
                column.at(career.totals_row),
                synth.range_sum(column.index(), career.first_row, career.last_row),
            ));
        }

        let education_rows: Vec<EducationRowCells> = self
            .layout
            .education
            .rows()
            .map(|(row, _)| EducationRowCells {
                label: self.layout.education.label.at(row),
                school: self.layout.education.school.at(row),
                in_field: self.layout.education.in_field.at(row),
            })
            .collect();

        cells.push((
            helpers.tenure,
            synth.tenure_years(career.in_field_prim_days.at(career.totals_row)),
        ));
        cells.push((helpers.service_group, synth.service_group_formula(helpers.tenure)));
        cells.push((helpers.step, synth.step_formula(helpers.tenure, helpers.education)));
        cells.push((helpers.education, synth.highest_in_field_education(&education_rows)));
        cells.push((identity.title, synth.title_formula(helpers.tenure)));
        cells.push((
            identity.grade,
            synth.grade_display(helpers.service_group, helpers.step),
        ));

        cells
    }

    /// Builds the template sheet under `name`.
    pub fn build_sheet(&self, name: &str) -> Sheet {
        let layout = &self.layout;
        let mut sheet = Sheet::new(name);

        for label in &layout.labels {
            sheet.set_text(label.cell, label.text.as_str());
        }
        for (row, level) in layout.education.rows() {
            sheet.set_text(layout.education.label.at(row), level.label());
        }
        for (at, expr) in self.formula_cells() {
            sheet.set_formula(at, expr);
        }

        let markers = vec![IN_FIELD_MARKER.to_string(), OUT_OF_FIELD_MARKER.to_string()];
        sheet.add_validation(ListValidation {
            first: layout.career.in_field.at(layout.career.first_row),
            last: layout.career.in_field.at(layout.career.last_row),
            options: markers.clone(),
        });
        sheet.add_validation(ListValidation {
            first: layout.education.in_field.at(layout.education.first_row),
            last: layout.education.in_field.at(layout.education.last_row()),
            options: markers,
        });
        sheet.add_validation(ListValidation {
            first: layout.education.label.at(layout.education.first_row),
            last: layout.education.label.at(layout.education.last_row()),
            options: EducationLevel::ALL
                .iter()
                .map(|level| level.label().to_string())
                .collect(),
        });

        sheet.set_column_format(layout.career.start.index(), ColumnFormat::Date);
        sheet.set_column_format(layout.career.end.index(), ColumnFormat::Date);
        for col in layout.hidden_columns() {
            sheet.hide_column(col);
        }
        sheet
    }

    /// Writes the identity fields of `person` into `sheet`.
    pub fn fill_identity(&self, sheet: &mut Sheet, person: &Person) {
        let identity = &self.layout.identity;
        sheet.set_text(identity.full_name, person.full_name());
        sheet.set_text(identity.national_id, person.national_id());
        sheet.set_text(identity.org_unit, person.org_unit());
    }
}

/// Renders a batch of employees.
///
/// # Example
///
/// ```
/// use grade_engine::classification::ClassificationTable;
/// use grade_engine::models::Person;
/// use grade_engine::workbook::{SheetLayout, WorkbookRenderer};
///
/// let renderer = WorkbookRenderer::new(SheetLayout::default(), ClassificationTable::standard()).unwrap();
/// let person = Person::validated("10000000146", "Fatma KARACA", "Marmara").unwrap();
/// let workbook = renderer.render(&[person]).unwrap();
/// assert_eq!(workbook.sheet_names(), vec!["Fatma KARACA - 10000000146"]);
/// ```
#[derive(Debug, Clone)]
pub struct WorkbookRenderer {
    template: SheetTemplate,
}

impl WorkbookRenderer {
    /// Creates a renderer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLayout`](crate::error::EngineError::InvalidLayout)
    /// for an unusable layout.
    pub fn new(layout: SheetLayout, table: ClassificationTable) -> EngineResult<Self> {
        Ok(Self {
            template: SheetTemplate::new(layout, table)?,
        })
    }

    /// The sheet template.
    pub fn template(&self) -> &SheetTemplate {
        &self.template
    }

    /// Renders one sheet per person, in input order.
    ///
    /// The template sheet is added, copied for every person and removed at
    /// the end. An empty batch yields a single placeholder sheet so the
    /// workbook can still be saved.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SheetError`](crate::error::EngineError::SheetError)
    /// if sheet bookkeeping fails.
    pub fn render(&self, persons: &[Person]) -> EngineResult<Workbook> {
        let layout = self.template.layout();
        let template_name = layout.template_sheet.as_str();

        let mut workbook = Workbook::new();
        workbook.add_sheet(self.template.build_sheet(template_name))?;

        let mut namer = SheetNamer::new();
        namer.reserve(template_name);
        for person in persons {
            let name = namer.assign(person.full_name(), person.national_id());
            debug!(sheet = %name, "rendering employee sheet");
            let sheet = workbook.copy_sheet(template_name, &name)?;
            self.template.fill_identity(sheet, person);
            sheet.recalculate();
        }

        workbook.remove_sheet(template_name);
        if workbook.is_empty() {
            workbook.add_sheet(Sheet::new(layout.placeholder_sheet.as_str()))?;
        }

        info!(
            persons = persons.len(),
            sheets = workbook.len(),
            "workbook rendered"
        );
        Ok(workbook)
    }
}
