//! Core data models for the grade engine.
//!
//! This module contains all the domain models used throughout the engine.

mod classification_result;
mod education;
mod person;
mod service_group;

pub use classification_result::{AuditStep, AuditTrace, ClassificationResult, StepLabel};
pub use education::EducationLevel;
pub use person::Person;
pub use service_group::{ServiceGroup, Title};
