//! Request types for the grade engine API.
//!
//! This module defines the JSON request structures for the `/classify` and
//! `/formulas` endpoints. `/workbook` takes a raw CSV body.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::formula::Dialect;
use crate::models::EducationLevel;

/// Request body for the `/classify` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Aggregated in-field prim-days.
    pub in_field_prim_days: Decimal,
    /// Highest in-field education level, either the snake_case name
    /// (`thesis_master`) or the sheet label (`"Tezli Yüksek Lisans"`).
    pub education: EducationLevel,
}

/// Request body for the `/formulas` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormulasRequest {
    /// Dialect to render in; the configured dialect when absent.
    #[serde(default)]
    pub dialect: Option<Dialect>,
}
