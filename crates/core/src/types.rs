use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregated compliance status of a control, specification, assessment or resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComplianceStatus {
    Compliant,
    NotCompliant,
    UnableToPerform,
    UserEvaluationRequired,
    /// A value this client does not know about yet.
    Other(String),
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Compliant => "compliant",
            Self::NotCompliant => "not_compliant",
            Self::UnableToPerform => "unable_to_perform",
            Self::UserEvaluationRequired => "user_evaluation_required",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for ComplianceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "compliant" => Self::Compliant,
            "not_compliant" => Self::NotCompliant,
            "unable_to_perform" => Self::UnableToPerform,
            "user_evaluation_required" => Self::UserEvaluationRequired,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ComplianceStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ComplianceStatus> for String {
    fn from(value: ComplianceStatus) -> Self {
        match value {
            ComplianceStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EvaluationStatus {
    Pass,
    Failure,
    Error,
    Skipped,
    Other(String),
}

impl EvaluationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pass => "pass",
            Self::Failure => "failure",
            Self::Error => "error",
            Self::Skipped => "skipped",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for EvaluationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pass" => Self::Pass,
            "failure" => Self::Failure,
            "error" => Self::Error,
            "skipped" => Self::Skipped,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for EvaluationStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EvaluationStatus> for String {
    fn from(value: EvaluationStatus) -> Self {
        match value {
            EvaluationStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a scan was triggered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScanType {
    Ondemand,
    Scheduled,
    Other(String),
}

impl ScanType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ondemand => "ondemand",
            Self::Scheduled => "scheduled",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for ScanType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ondemand" => Self::Ondemand,
            "scheduled" => Self::Scheduled,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ScanType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ScanType> for String {
    fn from(value: ScanType) -> Self {
        match value {
            ScanType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link to a page of a paginated collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageHRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Account that owns a report or resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

/// User, access and service tags attached to a report or resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<String>>,
}

/// Name/value pair describing an attachment scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// Counts of controls (or resources) by aggregated status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceStats {
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

/// Counts of evaluations by outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStats {
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

/// Overall score of a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceScore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<i64>,
}
