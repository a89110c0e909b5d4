//! In-memory workbook model.
//!
//! Sheets hold literal cells and formula trees. Formula results are cached
//! by [`Sheet::recalculate`] so exporters can write them next to the
//! formula text.

use std::cell::RefCell;
use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::formula::{CellError, CellRef, CellResolver, CellValue, FormulaExpr};

/// The content of one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A literal string.
    Text(String),
    /// A literal number.
    Number(Decimal),
    /// A formula with its last computed value.
    Formula {
        /// The formula tree.
        expr: FormulaExpr,
        /// Result of the last recalculation.
        cached: CellValue,
    },
}

impl Cell {
    /// A formula cell with no cached value yet.
    pub fn formula(expr: FormulaExpr) -> Self {
        Cell::Formula {
            expr,
            cached: CellValue::Empty,
        }
    }
}

/// A drop-down list restricting what can be typed into a block of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListValidation {
    /// Top-left cell of the block.
    pub first: CellRef,
    /// Bottom-right cell of the block.
    pub last: CellRef,
    /// Allowed entries.
    pub options: Vec<String>,
}

/// How a column's values are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    /// Day serials shown as dates.
    Date,
}

/// One worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<CellRef, Cell>,
    hidden_columns: Vec<u16>,
    column_formats: Vec<(u16, ColumnFormat)>,
    validations: Vec<ListValidation>,
}

impl Sheet {
    /// Creates an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            hidden_columns: Vec::new(),
            column_formats: Vec::new(),
            validations: Vec::new(),
        }
    }

    /// The sheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes a cell, replacing whatever was there.
    pub fn set(&mut self, at: CellRef, cell: Cell) {
        self.cells.insert(at, cell);
    }

    /// Writes a literal string.
    pub fn set_text(&mut self, at: CellRef, text: impl Into<String>) {
        self.set(at, Cell::Text(text.into()));
    }

    /// Writes a literal number.
    pub fn set_number(&mut self, at: CellRef, value: Decimal) {
        self.set(at, Cell::Number(value));
    }

    /// Writes a formula.
    pub fn set_formula(&mut self, at: CellRef, expr: FormulaExpr) {
        self.set(at, Cell::formula(expr));
    }

    /// Reads a cell.
    pub fn get(&self, at: CellRef) -> Option<&Cell> {
        self.cells.get(&at)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (&CellRef, &Cell)> {
        self.cells.iter()
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when no cell is set.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Marks a column hidden.
    pub fn hide_column(&mut self, col: u16) {
        if !self.hidden_columns.contains(&col) {
            self.hidden_columns.push(col);
        }
    }

    /// Hidden columns.
    pub fn hidden_columns(&self) -> &[u16] {
        &self.hidden_columns
    }

    /// Sets a display format for a whole column.
    pub fn set_column_format(&mut self, col: u16, format: ColumnFormat) {
        self.column_formats.retain(|(c, _)| *c != col);
        self.column_formats.push((col, format));
    }

    /// Column display formats.
    pub fn column_formats(&self) -> &[(u16, ColumnFormat)] {
        &self.column_formats
    }

    /// Adds a drop-down list.
    pub fn add_validation(&mut self, validation: ListValidation) {
        self.validations.push(validation);
    }

    /// Drop-down lists.
    pub fn validations(&self) -> &[ListValidation] {
        &self.validations
    }

    /// The current value of a cell, evaluating formulas on demand.
    pub fn value(&self, at: CellRef) -> CellValue {
        SheetResolver::new(self).resolve(&at)
    }

    /// Re-evaluates every formula and stores the results.
    pub fn recalculate(&mut self) {
        let results: Vec<(CellRef, CellValue)> = {
            let resolver = SheetResolver::new(self);
            self.cells
                .iter()
                .filter(|(_, cell)| matches!(cell, Cell::Formula { .. }))
                .map(|(at, _)| (*at, resolver.resolve(at)))
                .collect()
        };
        for (at, value) in results {
            if let Some(Cell::Formula { cached, .. }) = self.cells.get_mut(&at) {
                *cached = value;
            }
        }
    }

    fn renamed(&self, name: &str) -> Self {
        let mut copy = self.clone();
        copy.name = name.to_string();
        copy
    }
}

/// Resolves references within one sheet, evaluating formula cells recursively.
struct SheetResolver<'a> {
    sheet: &'a Sheet,
    visiting: RefCell<Vec<CellRef>>,
}

impl<'a> SheetResolver<'a> {
    fn new(sheet: &'a Sheet) -> Self {
        Self {
            sheet,
            visiting: RefCell::new(Vec::new()),
        }
    }
}

impl CellResolver for SheetResolver<'_> {
    fn resolve(&self, cell: &CellRef) -> CellValue {
        match self.sheet.cells.get(cell) {
            None => CellValue::Empty,
            Some(Cell::Text(text)) => CellValue::text(text.as_str()),
            Some(Cell::Number(value)) => CellValue::Number(*value),
            Some(Cell::Formula { expr, .. }) => {
                if self.visiting.borrow().contains(cell) {
                    return CellValue::Error(CellError::Ref);
                }
                self.visiting.borrow_mut().push(*cell);
                let value = expr.evaluate(self);
                self.visiting.borrow_mut().pop();
                value
            }
        }
    }
}

/// An ordered collection of uniquely named sheets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Creates an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sheet.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SheetError`] when the name is already used
    /// (compared case-insensitively).
    pub fn add_sheet(&mut self, sheet: Sheet) -> EngineResult<&mut Sheet> {
        if self.position(sheet.name()).is_some() {
            return Err(EngineError::SheetError {
                name: sheet.name().to_string(),
                message: "a sheet with this name already exists".to_string(),
            });
        }
        self.sheets.push(sheet);
        let last = self.sheets.len() - 1;
        Ok(&mut self.sheets[last])
    }

    /// Appends a copy of `source` named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SheetError`] when `source` does not exist or
    /// `name` is taken.
    pub fn copy_sheet(&mut self, source: &str, name: &str) -> EngineResult<&mut Sheet> {
        let copy = self
            .sheet(source)
            .map(|sheet| sheet.renamed(name))
            .ok_or_else(|| EngineError::SheetError {
                name: source.to_string(),
                message: "no such sheet to copy".to_string(),
            })?;
        self.add_sheet(copy)
    }

    /// Removes and returns a sheet.
    pub fn remove_sheet(&mut self, name: &str) -> Option<Sheet> {
        self.position(name).map(|index| self.sheets.remove(index))
    }

    /// Looks up a sheet by name (case-insensitive).
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.position(name).map(|index| &self.sheets[index])
    }

    /// Looks up a sheet for editing.
    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.position(name).map(|index| &mut self.sheets[index])
    }

    /// Sheets in order.
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Sheet names in order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// True when the workbook has no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.sheets
            .iter()
            .position(|sheet| sheet.name.to_lowercase() == wanted)
    }
}
