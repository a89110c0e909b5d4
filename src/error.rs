//! Error types for the grade engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during classification, formula
//! synthesis, roster ingestion and workbook rendering.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{EducationLevel, ServiceGroup};

/// The main error type for the grade engine.
///
/// Row-level roster problems are never reported through this type; invalid
/// rows are filtered out during ingestion. Everything that reaches the caller
/// is either structural or a classification failure.
///
/// # Example
///
/// ```
/// use grade_engine::error::EngineError;
///
/// let error = EngineError::UnknownServiceGroup {
///     code: "A/AG-9".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown service group: A/AG-9");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A service group code outside the five known codes was looked up.
    #[error("Unknown service group: {code}")]
    UnknownServiceGroup {
        /// The offending group code.
        code: String,
    },

    /// An education label did not match any known education level.
    #[error("Unknown education level: {label}")]
    UnknownEducationLevel {
        /// The offending label.
        label: String,
    },

    /// The classification table has no step for this combination.
    #[error(
        "Cannot classify: no step defined for tenure={tenure_years} years, group={service_group}, education={education}"
    )]
    StepUnavailable {
        /// The computed tenure in years.
        tenure_years: Decimal,
        /// The service group selected for that tenure.
        service_group: ServiceGroup,
        /// The education level that has no step.
        education: EducationLevel,
    },

    /// Required columns are absent from the roster source.
    #[error("Roster is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Names of every missing column.
        columns: Vec<String>,
    },

    /// The roster source could not be read.
    #[error("Failed to read roster: {message}")]
    RosterRead {
        /// A description of the read failure.
        message: String,
    },

    /// A cell address or sheet layout value was invalid.
    #[error("Invalid sheet layout: {message}")]
    InvalidLayout {
        /// A description of what was wrong.
        message: String,
    },

    /// A sheet name is already taken, or a referenced sheet does not exist.
    #[error("Sheet error for '{name}': {message}")]
    SheetError {
        /// The sheet name involved.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// The workbook could not be written.
    #[error("Workbook export failed: {message}")]
    WorkbookExport {
        /// A description of the export failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_unknown_service_group_displays_code() {
        let error = EngineError::UnknownServiceGroup {
            code: "A/AG-9".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown service group: A/AG-9");
    }

    #[test]
    fn test_step_unavailable_mentions_all_inputs() {
        let error = EngineError::StepUnavailable {
            tenure_years: Decimal::new(5, 1),
            service_group: ServiceGroup::Ag6,
            education: EducationLevel::Doctorate,
        };
        let message = error.to_string();
        assert!(message.contains("0.5"));
        assert!(message.contains("A/AG-6"));
        assert!(message.contains("Doktora"));
    }

    #[test]
    fn test_missing_columns_lists_every_column() {
        let error = EngineError::MissingColumns {
            columns: vec!["AD SOYAD".to_string(), "BİRİMİ".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Roster is missing required columns: AD SOYAD, BİRİMİ"
        );
    }

    #[test]
    fn test_workbook_export_displays_message() {
        let error = EngineError::WorkbookExport {
            message: "duplicate sheet name".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Workbook export failed: duplicate sheet name"
        );
    }

    #[test]
    fn test_sheet_error_displays_name() {
        let error = EngineError::SheetError {
            name: "Fatma KARACA - 10000000146".to_string(),
            message: "already exists".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Sheet error for 'Fatma KARACA - 10000000146': already exists"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_unknown_group() -> EngineResult<()> {
            Err(EngineError::UnknownServiceGroup {
                code: "X".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_unknown_group()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
