//! The report pipeline shared by the CLI and the HTTP API.
//!
//! A [`ReportService`] owns the loaded configuration and wires roster
//! ingestion, classification, formula synthesis and workbook export
//! together.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::classification::{ClassificationTable, classify};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::formula::Dialect;
use crate::models::{ClassificationResult, EducationLevel};
use crate::roster::{Roster, RosterReader};
use crate::workbook::{WorkbookRenderer, export_xlsx};

/// One formula cell of the employee sheet, rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaCell {
    /// A1 address of the cell.
    pub cell: String,
    /// Formula text with its leading `=`.
    pub formula: String,
}

/// The outcome of rendering a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWorkbook {
    /// The xlsx file contents.
    pub bytes: Vec<u8>,
    /// Sheet names in order.
    pub sheet_names: Vec<String>,
    /// Number of roster rows dropped by validation.
    pub skipped_rows: usize,
}

/// Runs the roster → workbook pipeline with one configuration.
///
/// # Example
///
/// ```
/// use grade_engine::config::ConfigLoader;
/// use grade_engine::service::ReportService;
///
/// let service = ReportService::new(ConfigLoader::default()).unwrap();
/// let csv = "TCKN,AD SOYAD,BİRİMİ\n10000000146,Fatma KARACA,Marmara\n";
/// let rendered = service.render_csv(csv.as_bytes()).unwrap();
/// assert_eq!(rendered.sheet_names, vec!["Fatma KARACA - 10000000146"]);
/// ```
#[derive(Debug, Clone)]
pub struct ReportService {
    config: ConfigLoader,
    table: ClassificationTable,
    reader: RosterReader,
    renderer: WorkbookRenderer,
}

impl ReportService {
    /// Builds the pipeline from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLayout`] if the configured layout is
    /// unusable.
    pub fn new(config: ConfigLoader) -> EngineResult<Self> {
        let table = config.table();
        let reader = RosterReader::new(config.engine().roster.clone());
        let renderer = WorkbookRenderer::new(config.layout().clone(), table)?;
        Ok(Self {
            config,
            table,
            reader,
            renderer,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Classifies an employee directly from aggregated in-field prim-days.
    pub fn classify(
        &self,
        in_field_prim_days: Decimal,
        education: EducationLevel,
    ) -> EngineResult<ClassificationResult> {
        classify(&self.table, in_field_prim_days, education)
    }

    /// The sheet's formula cells rendered in `dialect`, or in the configured
    /// dialect when `None`.
    pub fn formulas(&self, dialect: Option<Dialect>) -> Vec<FormulaCell> {
        let dialect = dialect.unwrap_or(self.config.engine().dialect).strategy();
        self.renderer
            .template()
            .formula_cells()
            .into_iter()
            .map(|(cell, expr)| FormulaCell {
                cell: cell.to_string(),
                formula: expr.to_formula(dialect),
            })
            .collect()
    }

    /// Reads a CSV roster.
    pub fn read_roster<R: Read>(&self, input: R) -> EngineResult<Roster> {
        self.reader.read(input)
    }

    /// Renders a CSV roster into xlsx bytes.
    pub fn render_csv<R: Read>(&self, input: R) -> EngineResult<RenderedWorkbook> {
        let roster = self.read_roster(input)?;
        self.render_roster(&roster)
    }

    /// Renders an already read roster into xlsx bytes.
    pub fn render_roster(&self, roster: &Roster) -> EngineResult<RenderedWorkbook> {
        let start_time = Instant::now();
        let workbook = self.renderer.render(&roster.persons)?;
        let bytes = export_xlsx(&workbook)?;

        info!(
            persons = roster.persons.len(),
            skipped_rows = roster.skipped_rows,
            duration_us = start_time.elapsed().as_micros(),
            "roster rendered"
        );

        Ok(RenderedWorkbook {
            bytes,
            sheet_names: workbook.sheet_names().into_iter().map(String::from).collect(),
            skipped_rows: roster.skipped_rows,
        })
    }

    /// Reads `input` and writes the rendered workbook to `output`.
    ///
    /// # Errors
    ///
    /// Fails on any roster, rendering or export error, and with
    /// [`EngineError::WorkbookExport`] when `output` cannot be written.
    pub fn render_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> EngineResult<RenderedWorkbook> {
        let roster = self.reader.read_path(input)?;
        let rendered = self.render_roster(&roster)?;

        let output = output.as_ref();
        fs::write(output, &rendered.bytes).map_err(|e| EngineError::WorkbookExport {
            message: format!("cannot write {}: {}", output.display(), e),
        })?;
        info!(path = %output.display(), "workbook written");

        Ok(rendered)
    }
}
