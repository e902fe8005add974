//! Reports and the per-report aggregates derived from them.

use crate::pagination::Paginated;
use crate::types::{
    Account, ComplianceScore, ComplianceStats, ComplianceStatus, EvaluationStats, PageHRef,
    ScanType, ScopeProperty, Tags,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile a scan was evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Scope of resources an attachment applies to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentScope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<ScopeProperty>>,
}

/// Binding of a profile to a scope that produced the scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<AttachmentScope>>,
}

/// Scope reference carried on a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<ScopeProperty>>,
}

/// A single compliance scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_time: Option<DateTime<Utc>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub report_type: Option<ScanType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cos_object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

/// Latest report per attachment, with account-wide summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportLatest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls_summary: Option<ComplianceStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluations_summary: Option<EvaluationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ComplianceScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<Report>>,
}

/// One page of reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportPage {
    pub total_count: i64,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    pub first: PageHRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageHRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<Report>>,
}

impl Paginated for ReportPage {
    type Item = Report;

    fn next(&self) -> Option<&PageHRef> {
        self.next.as_ref()
    }

    fn into_items(self) -> Vec<Report> {
        self.reports.unwrap_or_default()
    }
}

/// Resource that failed the most checks in a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummaryItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
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
    pub completed_count: Option<i64>,
}

/// Resource counts by status for a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
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
    pub top_failed: Option<Vec<ResourceSummaryItem>>,
}

/// Summary of a single report.
///
/// The service spells the instance field `isntance_id`; it is read from that
/// key (or `instance_id`) and written back under the wire spelling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(
        rename = "isntance_id",
        alias = "instance_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ComplianceScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<ComplianceStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluations: Option<EvaluationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceSummary>,
}

/// Tags found across the resources of a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

/// Control counts for one scan in a drift series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportViolationDataPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<ComplianceStats>,
}

/// Violation counts over time for the attachment behind a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportViolationsDrift {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_points: Option<Vec<ReportViolationDataPoint>>,
}

/// Profiles referenced by reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportProfiles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<ProfileInfo>>,
}

/// Scopes referenced by reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportScopes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<ScopeInfo>>,
}
