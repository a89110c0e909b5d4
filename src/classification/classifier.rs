//! The full classification pipeline with an audit trace.

use rust_decimal::Decimal;

use super::lookup::{service_group, step, tenure_years};
use super::table::{ClassificationTable, DAYS_PER_YEAR};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditTrace, ClassificationResult, EducationLevel};

/// Classifies one employee from in-field prim-days and education level.
///
/// Runs prim-days → tenure years → service group → title → step and records
/// one [`AuditStep`] per stage.
///
/// # Errors
///
/// Returns [`EngineError::StepUnavailable`] when the table defines no step
/// for the resulting tenure, group and education level (for example the
/// lowest group with a Doctorate under the standard table).
///
/// # Example
///
/// ```
/// use grade_engine::classification::{ClassificationTable, classify};
/// use grade_engine::models::{EducationLevel, Title};
/// use rust_decimal::Decimal;
///
/// let table = ClassificationTable::standard();
/// let result = classify(&table, Decimal::from(360 * 17), EducationLevel::Doctorate).unwrap();
/// assert_eq!(result.title, Title::SeniorChiefSpecialist);
/// assert_eq!(result.step.as_str(), "3");
/// assert_eq!(result.audit_trace.steps.len(), 4);
/// ```
pub fn classify(
    table: &ClassificationTable,
    in_field_prim_days: Decimal,
    education: EducationLevel,
) -> EngineResult<ClassificationResult> {
    let mut trace = AuditTrace::default();

    let tenure = tenure_years(in_field_prim_days);
    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "tenure_years".to_string(),
        rule_name: "Tenure Years".to_string(),
        table_ref: "days_per_year".to_string(),
        input: serde_json::json!({
            "in_field_prim_days": in_field_prim_days.to_string()
        }),
        output: serde_json::json!({
            "tenure_years": tenure.to_string()
        }),
        reasoning: format!(
            "{} in-field prim-days / {} = {} years",
            in_field_prim_days, DAYS_PER_YEAR, tenure
        ),
    });

    let group = service_group(table, tenure);
    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "service_group".to_string(),
        rule_name: "Service Group Band".to_string(),
        table_ref: "service_group_bands".to_string(),
        input: serde_json::json!({
            "tenure_years": tenure.to_string()
        }),
        output: serde_json::json!({
            "service_group": group.code()
        }),
        reasoning: format!("Tenure {} years falls in band {}", tenure, group),
    });

    let title = group.title();
    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "title".to_string(),
        rule_name: "Title For Group".to_string(),
        table_ref: "service_group_titles".to_string(),
        input: serde_json::json!({
            "service_group": group.code()
        }),
        output: serde_json::json!({
            "title": title.label()
        }),
        reasoning: format!("Group {} holds the title '{}'", group, title.label()),
    });

    let Some(step_label) = step(table, tenure, group, education) else {
        tracing::debug!(
            tenure_years = %tenure,
            service_group = group.code(),
            education = education.label(),
            "no step defined"
        );
        return Err(EngineError::StepUnavailable {
            tenure_years: tenure,
            service_group: group,
            education,
        });
    };
    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "step".to_string(),
        rule_name: "Step For Sub-band".to_string(),
        table_ref: "step_bands".to_string(),
        input: serde_json::json!({
            "tenure_years": tenure.to_string(),
            "service_group": group.code(),
            "education": education.label(),
            "doctorate_policy": table.doctorate_policy()
        }),
        output: serde_json::json!({
            "step": step_label.as_str()
        }),
        reasoning: format!(
            "{} with {} at {} years is step {}",
            group,
            education.label(),
            tenure,
            step_label
        ),
    });

    Ok(ClassificationResult {
        title,
        service_group: group,
        step: step_label,
        tenure_years: tenure,
        education,
        audit_trace: trace,
    })
}
