//! Civil-service grade engine.
//!
//! This crate classifies employees into a service group, title and pay-scale
//! step from their in-field service time and education, and renders decision
//! workbooks whose embedded formulas reproduce the same decision when the
//! employee's career rows are filled in later.

#![warn(missing_docs)]

pub mod api;
pub mod classification;
pub mod config;
pub mod error;
pub mod formula;
pub mod models;
pub mod roster;
pub mod service;
pub mod telemetry;
pub mod validation;
pub mod workbook;
