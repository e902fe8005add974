//! Resources API endpoints.

use super::{get, Call, Operation, OperationOptions, APPLICATION_JSON};
use crate::client::ResultsClient;
use crate::context::RequestContext;
use crate::error::ResultsResult;
use crate::pager::{PagedOptions, ReportResourcesPager};
use crate::response::DetailedResponse;
use compliance_results_core::{ComplianceStatus, ResourcePage};
use reqwest::header::HeaderMap;

static LIST_REPORT_RESOURCES: Operation = get(
    "ListReportResources",
    "/reports/{report_id}/resources",
    APPLICATION_JSON,
);

/// Resources API: scanned resources of a report.
pub struct ResourcesApi<'a> {
    client: &'a ResultsClient,
}

impl<'a> ResourcesApi<'a> {
    pub(crate) fn new(client: &'a ResultsClient) -> Self {
        Self { client }
    }

    /// One page of a report's resources.
    pub async fn list_report_resources(
        &self,
        options: &ListReportResourcesOptions,
    ) -> ResultsResult<DetailedResponse<ResourcePage>> {
        self.list_report_resources_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn list_report_resources_with_context(
        &self,
        options: &ListReportResourcesOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ResourcePage>> {
        self.client.invoke_json(options.call(), ctx).await
    }

    /// Pager over [`ResourcesApi::list_report_resources`].
    pub fn list_report_resources_pager(
        &self,
        options: &ListReportResourcesOptions,
    ) -> ResultsResult<ReportResourcesPager> {
        ReportResourcesPager::new(self.client, options)
    }
}

/// Options for [`ResourcesApi::list_report_resources`].
#[derive(Debug, Clone, Default)]
pub struct ListReportResourcesOptions {
    pub report_id: String,
    /// Resource id filter, sent as `id`.
    pub id: Option<String>,
    pub resource_name: Option<String>,
    pub account_id: Option<String>,
    pub component_id: Option<String>,
    pub status: Option<ComplianceStatus>,
    pub start: Option<String>,
    pub limit: Option<i64>,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl ListReportResourcesOptions {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            ..Default::default()
        }
    }
}

call_options!(ListReportResourcesOptions);
optional_setters!(ListReportResourcesOptions {
    id: String => with_id,
    resource_name: String => with_resource_name,
    account_id: String => with_account_id,
    component_id: String => with_component_id,
    status: ComplianceStatus => with_status,
    start: String => with_start,
    limit: i64 => with_limit,
});

impl OperationOptions for ListReportResourcesOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &LIST_REPORT_RESOURCES,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .path_param("report_id", &self.report_id)
        .query("id", self.id.as_ref())
        .query("resource_name", self.resource_name.as_ref())
        .query("account_id", self.account_id.as_ref())
        .query("component_id", self.component_id.as_ref())
        .query("status", self.status.as_ref())
        .query("start", self.start.as_ref())
        .query("limit", self.limit.as_ref())
    }
}

impl PagedOptions for ListReportResourcesOptions {
    type Page = ResourcePage;

    fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    fn set_start(&mut self, start: Option<String>) {
        self.start = start;
    }
}
