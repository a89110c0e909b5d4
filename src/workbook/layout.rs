//! Cell addresses of the employee sheet.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::formula::{CellRef, col_to_letter, letter_to_col};
use crate::models::EducationLevel;

/// A column given by its letters in layout files (`"K"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Column(u16);

impl Column {
    /// Parses column letters.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLayout`] for anything but ASCII letters.
    pub fn parse(letters: &str) -> EngineResult<Self> {
        letter_to_col(letters.trim())
            .map(Column)
            .ok_or_else(|| EngineError::InvalidLayout {
                message: format!("invalid column '{}'", letters),
            })
    }

    /// The 0-based column index.
    pub fn index(self) -> u16 {
        self.0
    }

    /// The cell of this column on `row`.
    pub fn at(self, row: u32) -> CellRef {
        CellRef::new(self.0, row)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&col_to_letter(self.0))
    }
}

impl TryFrom<String> for Column {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Column> for String {
    fn from(value: Column) -> Self {
        value.to_string()
    }
}

/// Where the identity fields and visible results go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityCells {
    /// Full name.
    pub full_name: CellRef,
    /// National identifier.
    pub national_id: CellRef,
    /// Organizational unit.
    pub org_unit: CellRef,
    /// Visible title formula.
    pub title: CellRef,
    /// Visible grade (`group/step`) formula.
    pub grade: CellRef,
}

/// The block of career rows the employee fills in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerBlock {
    /// First career row.
    pub first_row: u32,
    /// Last career row, inclusive.
    pub last_row: u32,
    /// Row holding the column totals.
    pub totals_row: u32,
    /// Start date column.
    pub start: Column,
    /// End date column.
    pub end: Column,
    /// In-field marker column.
    pub in_field: Column,
    /// Computed prim-day column.
    pub prim_days: Column,
    /// Computed in-field prim-day column.
    pub in_field_prim_days: Column,
}

impl CareerBlock {
    /// The career row numbers.
    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        self.first_row..=self.last_row
    }
}

/// The block of education rows, one per level, lowest credential first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationBlock {
    /// Row of the lowest credential; the others follow directly below.
    pub first_row: u32,
    /// Level label column.
    pub label: Column,
    /// School name column.
    pub school: Column,
    /// In-field marker column.
    pub in_field: Column,
}

impl EducationBlock {
    /// Row numbers paired with the level each row holds.
    pub fn rows(&self) -> impl Iterator<Item = (u32, EducationLevel)> + '_ {
        EducationLevel::ALL
            .into_iter()
            .enumerate()
            .map(|(i, level)| (self.first_row + i as u32, level))
    }

    /// The last education row.
    pub fn last_row(&self) -> u32 {
        self.first_row + EducationLevel::ALL.len() as u32 - 1
    }
}

/// Hidden cells holding intermediate results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperCells {
    /// Tenure in years.
    pub tenure: CellRef,
    /// Service group code.
    pub service_group: CellRef,
    /// Step label.
    pub step: CellRef,
    /// Highest in-field education label.
    pub education: CellRef,
}

impl HelperCells {
    fn all(&self) -> [CellRef; 4] {
        [self.tenure, self.service_group, self.step, self.education]
    }
}

/// A fixed text cell of the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticLabel {
    /// Where the text goes.
    pub cell: CellRef,
    /// The text.
    pub text: String,
}

fn label(a1: (u16, u32), text: &str) -> StaticLabel {
    StaticLabel {
        cell: CellRef::new(a1.0, a1.1),
        text: text.to_string(),
    }
}

/// The complete sheet layout.
///
/// The default is the version-1 decision sheet: identity on row 3,
/// education rows 6 to 9, career rows 11 to 18 with totals on row 19 and
/// helper cells in the hidden column Z.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Name of the template sheet while rendering.
    pub template_sheet: String,
    /// Name of the placeholder sheet for an empty batch.
    pub placeholder_sheet: String,
    /// Identity and visible result cells.
    pub identity: IdentityCells,
    /// Career rows.
    pub career: CareerBlock,
    /// Education rows.
    pub education: EducationBlock,
    /// Hidden helper cells.
    pub helpers: HelperCells,
    /// Fixed labels.
    #[serde(default)]
    pub labels: Vec<StaticLabel>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        let col = |letters: &str| Column(letter_to_col(letters).unwrap_or_default());
        Self {
            template_sheet: "ŞABLON".to_string(),
            placeholder_sheet: "Empty".to_string(),
            identity: IdentityCells {
                full_name: CellRef::new(1, 3),
                national_id: CellRef::new(2, 3),
                org_unit: CellRef::new(3, 3),
                title: CellRef::new(4, 3),
                grade: CellRef::new(5, 3),
            },
            career: CareerBlock {
                first_row: 11,
                last_row: 18,
                totals_row: 19,
                start: col("E"),
                end: col("F"),
                in_field: col("J"),
                prim_days: col("K"),
                in_field_prim_days: col("L"),
            },
            education: EducationBlock {
                first_row: 6,
                label: col("B"),
                school: col("C"),
                in_field: col("K"),
            },
            helpers: HelperCells {
                tenure: CellRef::new(25, 1),
                service_group: CellRef::new(25, 2),
                step: CellRef::new(25, 3),
                education: CellRef::new(25, 4),
            },
            labels: vec![
                label((1, 1), "KADRO DERECE / KADEME TESPİT FORMU"),
                label((1, 2), "AD SOYAD"),
                label((2, 2), "TCKN"),
                label((3, 2), "BİRİMİ"),
                label((4, 2), "UNVAN"),
                label((5, 2), "GRUP / KADEME"),
                label((1, 5), "ÖĞRENİM"),
                label((2, 5), "OKUL"),
                label((10, 5), "ALAN İÇİ (E/H)"),
                label((1, 10), "KURUM"),
                label((4, 10), "BAŞLANGIÇ"),
                label((5, 10), "BİTİŞ"),
                label((9, 10), "ALAN İÇİ (E/H)"),
                label((10, 10), "PRİM GÜN"),
                label((11, 10), "ALAN İÇİ PRİM GÜN"),
                label((9, 19), "TOPLAM"),
            ],
        }
    }
}

impl SheetLayout {
    /// Checks the layout for blocks that cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLayout`] when the career block is empty,
    /// the totals row lies inside the career rows, the education block
    /// overlaps the career block, or a helper shares a column with the
    /// visible blocks.
    pub fn validate(&self) -> EngineResult<()> {
        let career = &self.career;
        if career.first_row == 0 || career.first_row > career.last_row {
            return Err(invalid(format!(
                "career rows {}..={} are empty",
                career.first_row, career.last_row
            )));
        }
        if career.rows().contains(&career.totals_row) {
            return Err(invalid(format!(
                "totals row {} lies inside the career rows",
                career.totals_row
            )));
        }
        let education = &self.education;
        if education.first_row == 0 {
            return Err(invalid("education rows start at row 0".to_string()));
        }
        let education_span = education.first_row..=education.last_row();
        if career.rows().any(|row| education_span.contains(&row))
            || education_span.contains(&career.totals_row)
        {
            return Err(invalid(format!(
                "education rows {}..={} overlap the career block",
                education.first_row,
                education.last_row()
            )));
        }
        let visible = [
            career.start,
            career.end,
            career.in_field,
            career.prim_days,
            career.in_field_prim_days,
            education.label,
            education.school,
            education.in_field,
        ];
        for helper in self.helpers.all() {
            if visible.iter().any(|c| c.index() == helper.col()) {
                return Err(invalid(format!(
                    "helper cell {} shares a column with the visible blocks",
                    helper
                )));
            }
        }
        Ok(())
    }

    /// Columns holding only helper cells; these are hidden on export.
    pub fn hidden_columns(&self) -> Vec<u16> {
        let mut cols: Vec<u16> = self.helpers.all().iter().map(CellRef::col).collect();
        cols.sort_unstable();
        cols.dedup();
        cols
    }
}

fn invalid(message: String) -> EngineError {
    EngineError::InvalidLayout { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_matches_version_one_sheet() {
        let layout = SheetLayout::default();
        assert_eq!(layout.identity.full_name.to_string(), "B3");
        assert_eq!(layout.identity.national_id.to_string(), "C3");
        assert_eq!(layout.identity.org_unit.to_string(), "D3");
        assert_eq!(layout.career.in_field_prim_days.at(19).to_string(), "L19");
        assert_eq!(layout.helpers.education.to_string(), "Z4");
        assert_eq!(layout.education.last_row(), 9);
        layout.validate().unwrap();
    }

    #[test]
    fn test_education_rows_follow_level_order() {
        let layout = SheetLayout::default();
        let rows: Vec<(u32, EducationLevel)> = layout.education.rows().collect();
        assert_eq!(rows.first(), Some(&(6, EducationLevel::Bachelor)));
        assert_eq!(rows.last(), Some(&(9, EducationLevel::Doctorate)));
    }

    #[test]
    fn test_hidden_columns_are_helper_columns() {
        assert_eq!(SheetLayout::default().hidden_columns(), vec![25]);
    }

    #[test]
    fn test_totals_inside_career_rows_is_rejected() {
        let mut layout = SheetLayout::default();
        layout.career.totals_row = 15;
        assert!(matches!(layout.validate(), Err(EngineError::InvalidLayout { .. })));
    }

    #[test]
    fn test_overlapping_education_block_is_rejected() {
        let mut layout = SheetLayout::default();
        layout.education.first_row = 17;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_helper_in_visible_column_is_rejected() {
        let mut layout = SheetLayout::default();
        layout.helpers.step = CellRef::parse("K30").unwrap();
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_layout_round_trips_through_yaml() {
        let layout = SheetLayout::default();
        let yaml = serde_yaml::to_string(&layout).unwrap();
        assert!(yaml.contains("full_name: B3"));
        assert!(yaml.contains("start: E"));
        let parsed: SheetLayout = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, layout);
    }

    #[test]
    fn test_invalid_column_letters_fail_to_parse() {
        assert!(Column::parse("1").is_err());
        assert_eq!(Column::parse("k").unwrap().index(), 10);
    }
}
