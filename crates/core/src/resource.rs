//! Resources scanned as part of a report.

use crate::pagination::Paginated;
use crate::types::{Account, ComplianceStatus, PageHRef};
use serde::{Deserialize, Serialize};

/// A scanned resource with its evaluation counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_crn: Option<String>,
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

/// One page of resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePage {
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
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
}

impl Paginated for ResourcePage {
    type Item = Resource;

    fn next(&self) -> Option<&PageHRef> {
        self.next.as_ref()
    }

    fn into_items(self) -> Vec<Resource> {
        self.resources.unwrap_or_default()
    }
}
