//! HTTP request handlers for the grade engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::request::{ClassifyRequest, FormulasRequest};
use super::response::{ApiError, ApiErrorResponse, ClassifyResponse, FormulasResponse};
use super::state::AppState;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Response header carrying the number of roster rows dropped by validation.
pub const SKIPPED_ROWS_HEADER: &str = "x-skipped-rows";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/classify", post(classify_handler))
        .route("/formulas", post(formulas_handler))
        .route("/workbook", post(workbook_handler))
        .with_state(state)
}

/// Handler for POST /classify.
///
/// Classifies aggregated in-field prim-days and an education level.
async fn classify_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing classification request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match state
        .service()
        .classify(request.in_field_prim_days, request.education)
    {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                grade = %result.grade_label(),
                duration_us = start_time.elapsed().as_micros(),
                "Classification completed successfully"
            );
            let response = ClassifyResponse {
                request_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                grade: result.grade_label(),
                result,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Classification failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /formulas.
///
/// Returns every formula cell of the employee sheet as text.
async fn formulas_handler(
    State(state): State<AppState>,
    payload: Result<Json<FormulasRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let service = state.service();
    let dialect = request
        .dialect
        .unwrap_or(service.config().engine().dialect);
    let cells = service.formulas(Some(dialect));
    info!(
        correlation_id = %correlation_id,
        dialect = ?dialect,
        cells = cells.len(),
        "Formulas rendered"
    );

    let response = FormulasResponse {
        request_id: correlation_id,
        timestamp: Utc::now(),
        dialect,
        cells,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Handler for POST /workbook.
///
/// Takes a CSV roster as the request body and returns the rendered xlsx.
async fn workbook_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        bytes = body.len(),
        "Processing workbook request"
    );

    match state.service().render_csv(&body[..]) {
        Ok(rendered) => {
            info!(
                correlation_id = %correlation_id,
                sheets = rendered.sheet_names.len(),
                skipped_rows = rendered.skipped_rows,
                "Workbook rendered"
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"kadro.xlsx\"".to_string(),
                    ),
                    (
                        HeaderName::from_static(SKIPPED_ROWS_HEADER),
                        rendered.skipped_rows.to_string(),
                    ),
                ],
                rendered.bytes,
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Workbook rendering failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Turns a JSON extraction failure into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // serde's message is in the body text
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}
