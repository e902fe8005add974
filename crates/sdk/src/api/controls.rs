//! Controls API endpoints.

use super::{get, Call, Operation, OperationOptions, APPLICATION_JSON};
use crate::client::ResultsClient;
use crate::context::RequestContext;
use crate::error::ResultsResult;
use crate::response::DetailedResponse;
use compliance_results_core::{ComplianceStatus, ReportControls, Rule};
use reqwest::header::HeaderMap;

static GET_REPORT_CONTROLS: Operation = get(
    "GetReportControls",
    "/reports/{report_id}/controls",
    APPLICATION_JSON,
);
static GET_REPORT_RULE: Operation = get(
    "GetReportRule",
    "/reports/{report_id}/rules/{rule_id}",
    APPLICATION_JSON,
);

/// Controls API: control results and the rules behind them.
pub struct ControlsApi<'a> {
    client: &'a ResultsClient,
}

impl<'a> ControlsApi<'a> {
    pub(crate) fn new(client: &'a ResultsClient) -> Self {
        Self { client }
    }

    /// Controls of a report with their specifications and assessments.
    pub async fn get_report_controls(
        &self,
        options: &GetReportControlsOptions,
    ) -> ResultsResult<DetailedResponse<ReportControls>> {
        self.get_report_controls_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn get_report_controls_with_context(
        &self,
        options: &GetReportControlsOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ReportControls>> {
        self.client.invoke_json(options.call(), ctx).await
    }

    /// A rule evaluated by the report.
    pub async fn get_report_rule(
        &self,
        options: &GetReportRuleOptions,
    ) -> ResultsResult<DetailedResponse<Rule>> {
        self.get_report_rule_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn get_report_rule_with_context(
        &self,
        options: &GetReportRuleOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<Rule>> {
        self.client.invoke_json(options.call(), ctx).await
    }
}

/// Options for [`ControlsApi::get_report_controls`].
#[derive(Debug, Clone, Default)]
pub struct GetReportControlsOptions {
    pub report_id: String,
    pub control_id: Option<String>,
    pub control_name: Option<String>,
    pub control_description: Option<String>,
    pub control_category: Option<String>,
    /// Passed through as given; unknown statuses are not rejected.
    pub status: Option<ComplianceStatus>,
    pub sort: Option<String>,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl GetReportControlsOptions {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            ..Default::default()
        }
    }
}

call_options!(GetReportControlsOptions);
optional_setters!(GetReportControlsOptions {
    control_id: String => with_control_id,
    control_name: String => with_control_name,
    control_description: String => with_control_description,
    control_category: String => with_control_category,
    status: ComplianceStatus => with_status,
    sort: String => with_sort,
});

impl OperationOptions for GetReportControlsOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &GET_REPORT_CONTROLS,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .path_param("report_id", &self.report_id)
        .query("control_id", self.control_id.as_ref())
        .query("control_name", self.control_name.as_ref())
        .query("control_description", self.control_description.as_ref())
        .query("control_category", self.control_category.as_ref())
        .query("status", self.status.as_ref())
        .query("sort", self.sort.as_ref())
    }
}

/// Options for [`ControlsApi::get_report_rule`].
#[derive(Debug, Clone, Default)]
pub struct GetReportRuleOptions {
    pub report_id: String,
    pub rule_id: String,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl GetReportRuleOptions {
    pub fn new(report_id: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            rule_id: rule_id.into(),
            ..Default::default()
        }
    }
}

call_options!(GetReportRuleOptions);

impl OperationOptions for GetReportRuleOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &GET_REPORT_RULE,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .path_param("report_id", &self.report_id)
        .path_param("rule_id", &self.rule_id)
    }
}
