//! Workbook rendering.
//!
//! Turns a batch of [`Person`](crate::models::Person)s into a workbook with
//! one decision sheet each, then writes it out as xlsx.

mod layout;
mod model;
mod naming;
mod renderer;
mod xlsx;

pub use layout::{
    CareerBlock, Column, EducationBlock, HelperCells, IdentityCells, SheetLayout, StaticLabel,
};
pub use model::{Cell, ColumnFormat, ListValidation, Sheet, Workbook};
pub use naming::{MAX_SHEET_NAME_LEN, SheetNamer, sheet_name};
pub use renderer::{OUT_OF_FIELD_MARKER, SheetTemplate, WorkbookRenderer};
pub use xlsx::export_xlsx;
