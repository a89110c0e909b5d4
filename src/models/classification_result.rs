//! Classification result models.
//!
//! This module contains the [`ClassificationResult`] type produced by the
//! classifier, the [`StepLabel`] it carries, and the audit structures that
//! record every stage of the decision.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EducationLevel, ServiceGroup, Title};

/// A pay-scale step as printed on the decision record.
///
/// Steps are labels rather than numbers: either a single numeral (`"5"`)
/// or a range (`"3-4"`).
///
/// # Example
///
/// ```
/// use grade_engine::models::StepLabel;
///
/// let step = StepLabel::new("3-4");
/// assert!(step.is_range());
/// assert_eq!(step.to_string(), "3-4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepLabel(String);

impl StepLabel {
    /// Wraps a step label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for range labels such as `"5-6"`.
    pub fn is_range(&self) -> bool {
        self.0.contains('-')
    }
}

impl fmt::Display for StepLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single step in the audit trace recording a classification decision.
///
/// Each step captures the input, output, and reasoning for one stage of the
/// tenure → group → title → step pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The table (or constant) the rule read from.
    pub table_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trace for a classification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of decision steps.
    pub steps: Vec<AuditStep>,
}

impl AuditTrace {
    /// The step number the next recorded step should use.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    /// Appends a step.
    pub fn push(&mut self, step: AuditStep) {
        self.steps.push(step);
    }
}

/// The outcome of classifying one employee.
///
/// # Example
///
/// ```
/// use grade_engine::classification::{ClassificationTable, classify};
/// use grade_engine::models::{EducationLevel, ServiceGroup};
/// use rust_decimal::Decimal;
///
/// let table = ClassificationTable::standard();
/// let result = classify(&table, Decimal::from(1440), EducationLevel::ThesisMaster).unwrap();
/// assert_eq!(result.service_group, ServiceGroup::Ag5);
/// assert_eq!(result.step.as_str(), "4");
/// assert_eq!(result.grade_label(), "A/AG-5/4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The title bound to the selected service group.
    pub title: Title,
    /// The selected service group.
    pub service_group: ServiceGroup,
    /// The step for the tenure sub-band and education level.
    pub step: StepLabel,
    /// In-field tenure in years.
    pub tenure_years: Decimal,
    /// The education level the step was looked up for.
    pub education: EducationLevel,
    /// Record of every decision made.
    pub audit_trace: AuditTrace,
}

impl ClassificationResult {
    /// The combined grade as shown in the visible grade cell, e.g. `"A/AG-5/4"`.
    pub fn grade_label(&self) -> String {
        format!("{}/{}", self.service_group.code(), self.step)
    }
}
