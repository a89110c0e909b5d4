//! A1-style cell and range references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Converts a 0-based column index to its letters (`0` → `"A"`, `26` → `"AA"`).
///
/// # Example
///
/// ```
/// use grade_engine::formula::col_to_letter;
///
/// assert_eq!(col_to_letter(0), "A");
/// assert_eq!(col_to_letter(25), "Z");
/// assert_eq!(col_to_letter(27), "AB");
/// ```
pub fn col_to_letter(col: u16) -> String {
    let mut result = String::new();
    let mut n = u32::from(col) + 1;
    while n > 0 {
        n -= 1;
        result.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    result
}

/// Converts column letters to a 0-based index (`"A"` → `0`). Case-insensitive.
pub fn letter_to_col(letters: &str) -> Option<u16> {
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let mut n: u32 = 0;
    for b in letters.bytes() {
        n = n * 26 + u32::from(b.to_ascii_uppercase() - b'A') + 1;
        if n > u32::from(u16::MAX) {
            return None;
        }
    }
    u16::try_from(n - 1).ok()
}

/// A single cell: 0-based column, 1-based row.
///
/// Serializes as A1 text (`"B3"`), which is also the form layout files use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    row: u32,
    col: u16,
}

impl CellRef {
    /// Creates a reference from a 0-based column and a 1-based row.
    pub fn new(col: u16, row: u32) -> Self {
        Self { row: row.max(1), col }
    }

    /// Creates a reference from column letters and a 1-based row.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLayout`] for malformed column letters or row 0.
    pub fn at(column: &str, row: u32) -> EngineResult<Self> {
        let col = letter_to_col(column).ok_or_else(|| EngineError::InvalidLayout {
            message: format!("invalid column '{}'", column),
        })?;
        if row == 0 {
            return Err(EngineError::InvalidLayout {
                message: format!("row numbers start at 1 (column {})", column),
            });
        }
        Ok(Self { row, col })
    }

    /// Parses A1 notation such as `"Z4"`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLayout`] when the text is not a plain A1 reference.
    pub fn parse(text: &str) -> EngineResult<Self> {
        let text = text.trim();
        let split = text
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| EngineError::InvalidLayout {
                message: format!("'{}' is not an A1 cell reference", text),
            })?;
        let (letters, digits) = text.split_at(split);
        let row: u32 = digits.parse().map_err(|_| EngineError::InvalidLayout {
            message: format!("'{}' is not an A1 cell reference", text),
        })?;
        Self::at(letters, row)
    }

    /// The 0-based column index.
    pub fn col(&self) -> u16 {
        self.col
    }

    /// The 1-based row number.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// The column letters.
    pub fn column_letters(&self) -> String {
        col_to_letter(self.col)
    }

    /// The same column on another row.
    pub fn with_row(&self, row: u32) -> Self {
        Self::new(self.col, row)
    }

    /// The cell to the right by `offset` columns.
    pub fn offset_col(&self, offset: u16) -> Self {
        Self::new(self.col.saturating_add(offset), self.row)
    }

    /// The 0-based row index used by xlsx writers.
    pub fn row_index(&self) -> u32 {
        self.row - 1
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_letter(self.col), self.row)
    }
}

impl FromStr for CellRef {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CellRef {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CellRef> for String {
    fn from(value: CellRef) -> Self {
        value.to_string()
    }
}

/// A rectangular block of cells, corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    start: CellRef,
    end: CellRef,
}

impl CellRange {
    /// Creates a range; corners are normalized so `start` is top-left.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        let start = CellRef::new(a.col.min(b.col), a.row.min(b.row));
        let end = CellRef::new(a.col.max(b.col), a.row.max(b.row));
        Self { start, end }
    }

    /// A slice of one column between two rows, inclusive.
    pub fn column(col: u16, first_row: u32, last_row: u32) -> Self {
        Self::new(CellRef::new(col, first_row), CellRef::new(col, last_row))
    }

    /// Top-left corner.
    pub fn start(&self) -> CellRef {
        self.start
    }

    /// Bottom-right corner.
    pub fn end(&self) -> CellRef {
        self.end
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.start.row..=self.end.row).flat_map(move |row| {
            (self.start.col..=self.end.col).map(move |col| CellRef::new(col, row))
        })
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
