//! Controls of a profile and how they fared in a scan.

use crate::types::ComplianceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameter supplied to an assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_value: Option<serde_json::Value>,
}

/// Assessment with its evaluation counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentWithStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplianceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_count: Option<i64>,
}

/// Control specification with its assessments and counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSpecificationWithStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_specification_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_specification_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessments: Option<Vec<AssessmentWithStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplianceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliant_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_compliant_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unable_to_perform_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_evaluation_required_count: Option<i64>,
}

/// Control with its specifications and counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlWithStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_library_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_library_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_specifications: Option<Vec<ControlSpecificationWithStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplianceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliant_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_compliant_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unable_to_perform_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_evaluation_required_count: Option<i64>,
}

/// Controls of a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportControls {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_library_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_library_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplianceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliant_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_compliant_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unable_to_perform_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_evaluation_required_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<Vec<ControlWithStats>>,
}

/// Resource type a rule targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_kind: Option<String>,
}

/// Rule backing an assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<RuleTarget>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_nesting() {
        let controls: ReportControls = serde_json::from_str(
            r#"{
                "report_id": "r1",
                "status": "not_compliant",
                "controls": [{
                    "id": "c1",
                    "control_name": "SC-7",
                    "control_specifications": [{
                        "control_specification_id": "s1",
                        "assessments": [{
                            "assessment_id": "rule-1",
                            "parameters": [{"parameter_name": "ports", "parameter_value": [22, 3389]}],
                            "status": "compliant"
                        }]
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(controls.status, Some(ComplianceStatus::NotCompliant));
        let control = &controls.controls.as_ref().unwrap()[0];
        let spec = &control.control_specifications.as_ref().unwrap()[0];
        let assessment = &spec.assessments.as_ref().unwrap()[0];
        assert_eq!(assessment.status, Some(ComplianceStatus::Compliant));
        assert_eq!(
            assessment.parameters.as_ref().unwrap()[0].parameter_value,
            Some(serde_json::json!([22, 3389]))
        );
    }

    #[test]
    fn test_rule_type_field() {
        let rule: Rule = serde_json::from_str(r#"{"id":"rule-1","type":"system_defined"}"#).unwrap();
        assert_eq!(rule.rule_type.as_deref(), Some("system_defined"));
        assert!(rule.labels.is_none());
    }
}
