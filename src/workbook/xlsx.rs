//! xlsx export.
//!
//! Formulas are always written in the OOXML dialect, which is what the file
//! format stores regardless of the UI language of the program opening it.
//! Each formula carries its cached result so viewers that do not recalculate
//! still show values. The workbook is flagged for a full recalculation on
//! load, so spreadsheet programs replace the cache with live results.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{DataValidation, Format, Formula, Workbook as XlsxWorkbook, XlsxError};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::formula::{CellValue, OoxmlDialect};

use super::model::{Cell, ColumnFormat, Sheet, Workbook};

const DATE_FORMAT: &str = "dd.mm.yyyy";

/// Serializes a workbook to xlsx bytes.
///
/// # Errors
///
/// Returns [`EngineError::WorkbookExport`] when the writer rejects a sheet
/// name, a cell or a validation, or when the workbook is empty.
pub fn export_xlsx(workbook: &Workbook) -> EngineResult<Vec<u8>> {
    if workbook.is_empty() {
        return Err(EngineError::WorkbookExport {
            message: "a workbook needs at least one sheet".to_string(),
        });
    }

    let mut xlsx = XlsxWorkbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    for sheet in workbook.sheets() {
        write_sheet(&mut xlsx, sheet, &date_format).map_err(|e| EngineError::WorkbookExport {
            message: format!("sheet '{}': {}", sheet.name(), e),
        })?;
    }

    let buffer = xlsx.save_to_buffer().map_err(export_error)?;
    info!(
        sheets = workbook.len(),
        bytes = buffer.len(),
        "workbook exported"
    );
    Ok(buffer)
}

fn write_sheet(xlsx: &mut XlsxWorkbook, sheet: &Sheet, date_format: &Format) -> Result<(), XlsxError> {
    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(sheet.name())?;

    for (col, format) in sheet.column_formats() {
        match format {
            ColumnFormat::Date => {
                worksheet.set_column_format(*col, date_format)?;
                worksheet.set_column_width(*col, 12)?;
            }
        }
    }

    for (at, cell) in sheet.cells() {
        let (row, col) = (at.row_index(), at.col());
        match cell {
            Cell::Text(text) => {
                worksheet.write_string(row, col, text)?;
            }
            Cell::Number(value) => {
                worksheet.write_number(row, col, value.to_f64().unwrap_or_default())?;
            }
            Cell::Formula { expr, cached } => {
                let formula =
                    Formula::new(expr.to_formula(&OoxmlDialect)).set_result(cached_result(cached));
                worksheet.write_formula(row, col, formula)?;
            }
        }
    }

    for validation in sheet.validations() {
        let options: Vec<&str> = validation.options.iter().map(String::as_str).collect();
        let rule = DataValidation::new().allow_list_strings(&options)?;
        worksheet.add_data_validation(
            validation.first.row_index(),
            validation.first.col(),
            validation.last.row_index(),
            validation.last.col(),
            &rule,
        )?;
    }

    for col in sheet.hidden_columns() {
        worksheet.set_column_hidden(*col)?;
    }

    Ok(())
}

/// Cached result text for a formula cell.
///
/// The writer types a cached value by its text alone: anything that parses
/// as a number is stored as a number. A text step such as `"3"` is therefore
/// cached as the number 3 and only becomes text again once the file is
/// recalculated. The displayed value is the same either way.
fn cached_result(value: &CellValue) -> String {
    value.display_text()
}

fn export_error(error: XlsxError) -> EngineError {
    EngineError::WorkbookExport {
        message: error.to_string(),
    }
}
