//! HTTP API module for the grade engine.
//!
//! This module provides the REST endpoints for classifying employees,
//! listing the sheet formulas and rendering roster workbooks.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{SKIPPED_ROWS_HEADER, create_router};
pub use request::{ClassifyRequest, FormulasRequest};
pub use response::{ApiError, ApiErrorResponse, ClassifyResponse, FormulasResponse};
pub use state::AppState;
