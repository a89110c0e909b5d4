//! Spreadsheet formula synthesis.
//!
//! Formulas are expression trees ([`FormulaExpr`]) rendered to text by a
//! [`FormulaDialect`]. The classification formulas come out of a single
//! range-table compiler, and the trees can be evaluated natively to check
//! them against the classifier or to cache their results in written files.

mod cell;
mod compiler;
mod dialect;
mod eval;
mod expr;
mod synthesizer;

pub use cell::{CellRange, CellRef, col_to_letter, letter_to_col};
pub use compiler::{
    cascade, compile_education_branch, compile_group_cascade, compile_sub_band_cascade,
};
pub use dialect::{Dialect, FormulaDialect, OoxmlDialect, TurkishDialect};
pub use eval::{CellError, CellResolver, CellValue};
pub use expr::{CompareOp, FormulaExpr};
pub use synthesizer::{EducationRowCells, FormulaSynthesizer, IN_FIELD_MARKER};
