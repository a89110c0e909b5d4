//! Response types for the grade engine API.
//!
//! This module defines the success envelopes, the error response
//! structures and the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::formula::Dialect;
use crate::models::ClassificationResult;
use crate::service::FormulaCell;

/// Response body of the `/classify` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyResponse {
    /// Correlation id, also written to the logs.
    pub request_id: Uuid,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
    /// The engine version.
    pub engine_version: String,
    /// The visible grade text, e.g. `"A/AG-5/4"`.
    pub grade: String,
    /// The full classification with its audit trace.
    pub result: ClassificationResult,
}

/// Response body of the `/formulas` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FormulasResponse {
    /// Correlation id, also written to the logs.
    pub request_id: Uuid,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
    /// Dialect the formulas are rendered in.
    pub dialect: Dialect,
    /// Every formula cell of the employee sheet.
    pub cells: Vec<FormulaCell>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::UnknownServiceGroup { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "UNKNOWN_SERVICE_GROUP",
                    message,
                    "The classification table produced a group code it cannot resolve",
                ),
            ),
            EngineError::UnknownEducationLevel { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("UNKNOWN_EDUCATION_LEVEL", message),
            ),
            EngineError::StepUnavailable { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "STEP_UNAVAILABLE",
                    message,
                    "The classification table defines no step for this combination",
                ),
            ),
            EngineError::MissingColumns { columns } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "MISSING_COLUMNS",
                    message,
                    format!("Required roster headers: {}", columns.join(", ")),
                ),
            ),
            EngineError::RosterRead { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("ROSTER_READ_ERROR", message))
            }
            EngineError::InvalidLayout { .. } | EngineError::SheetError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("LAYOUT_ERROR", "Sheet layout error", message),
            ),
            EngineError::WorkbookExport { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("EXPORT_ERROR", "Workbook export failed", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}
