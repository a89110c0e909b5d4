//! Roster ingestion.
//!
//! Reads a CSV roster with a header row and turns each row into a validated
//! [`Person`]. Rows with a missing or invalid field are dropped; only a
//! missing required column, or unreadable input, fails the whole read.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::Person;
use crate::validation::is_present;

/// Header names of the three required roster columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    /// National identifier column.
    pub national_id: String,
    /// Full name column.
    pub full_name: String,
    /// Organizational unit column.
    pub org_unit: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            national_id: "TCKN".to_string(),
            full_name: "AD SOYAD".to_string(),
            org_unit: "BİRİMİ".to_string(),
        }
    }
}

/// The outcome of reading a roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    /// Valid persons in input order.
    pub persons: Vec<Person>,
    /// Number of data rows dropped by validation.
    pub skipped_rows: usize,
}

/// Reads CSV rosters using a configured set of column names.
///
/// # Example
///
/// ```
/// use grade_engine::roster::{RosterColumns, RosterReader};
///
/// let csv = "TCKN,AD SOYAD,BİRİMİ\n10000000146,Fatma KARACA,Marmara Enstitüsü\n10000000145,Bad Id,X\n";
/// let roster = RosterReader::new(RosterColumns::default()).read(csv.as_bytes()).unwrap();
/// assert_eq!(roster.persons.len(), 1);
/// assert_eq!(roster.skipped_rows, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterReader {
    columns: RosterColumns,
}

impl RosterReader {
    /// Creates a reader for the given column names.
    pub fn new(columns: RosterColumns) -> Self {
        Self { columns }
    }

    /// Reads a roster file from disk.
    ///
    /// # Errors
    ///
    /// [`EngineError::RosterRead`] when the file cannot be opened, plus
    /// everything [`RosterReader::read`] reports.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> EngineResult<Roster> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| EngineError::RosterRead {
            message: format!("{}: {}", path.display(), e),
        })?;
        self.read(file)
    }

    /// Reads a roster from any CSV source.
    ///
    /// # Errors
    ///
    /// - [`EngineError::MissingColumns`] listing every required header absent
    ///   from the source
    /// - [`EngineError::RosterRead`] when the CSV itself is malformed
    pub fn read<R: Read>(&self, reader: R) -> EngineResult<Roster> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(read_error)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let required = [
            &self.columns.national_id,
            &self.columns.full_name,
            &self.columns.org_unit,
        ];
        let positions: Vec<Option<usize>> = required
            .iter()
            .map(|name| headers.iter().position(|h| h == *name))
            .collect();
        let missing: Vec<String> = required
            .iter()
            .zip(&positions)
            .filter(|(_, position)| position.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::MissingColumns { columns: missing });
        }
        let &[Some(id_at), Some(name_at), Some(unit_at)] = positions.as_slice() else {
            return Err(EngineError::MissingColumns {
                columns: required.iter().map(|name| name.to_string()).collect(),
            });
        };

        let mut roster = Roster::default();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record.map_err(read_error)?;
            let line = index + 2;
            let fields = (record.get(id_at), record.get(name_at), record.get(unit_at));

            let person = match fields {
                (id, name, unit) if is_present(id) && is_present(name) && is_present(unit) => {
                    Person::validated(
                        id.unwrap_or_default(),
                        name.unwrap_or_default(),
                        unit.unwrap_or_default(),
                    )
                }
                _ => None,
            };

            match person {
                Some(person) => roster.persons.push(person),
                None => {
                    debug!(line, "skipping roster row with missing or invalid identity fields");
                    roster.skipped_rows += 1;
                }
            }
        }

        info!(
            persons = roster.persons.len(),
            skipped = roster.skipped_rows,
            "roster read"
        );
        Ok(roster)
    }
}

fn read_error(error: csv::Error) -> EngineError {
    EngineError::RosterRead {
        message: error.to_string(),
    }
}
