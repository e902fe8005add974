//! Evaluations API endpoints.

use super::{get, Call, Operation, OperationOptions, APPLICATION_JSON};
use crate::client::ResultsClient;
use crate::context::RequestContext;
use crate::error::ResultsResult;
use crate::pager::{PagedOptions, ReportEvaluationsPager};
use crate::response::DetailedResponse;
use compliance_results_core::{EvaluationPage, EvaluationStatus};
use reqwest::header::HeaderMap;

static LIST_REPORT_EVALUATIONS: Operation = get(
    "ListReportEvaluations",
    "/reports/{report_id}/evaluations",
    APPLICATION_JSON,
);

/// Evaluations API: per-target assessment outcomes of a report.
pub struct EvaluationsApi<'a> {
    client: &'a ResultsClient,
}

impl<'a> EvaluationsApi<'a> {
    pub(crate) fn new(client: &'a ResultsClient) -> Self {
        Self { client }
    }

    /// One page of a report's evaluations.
    pub async fn list_report_evaluations(
        &self,
        options: &ListReportEvaluationsOptions,
    ) -> ResultsResult<DetailedResponse<EvaluationPage>> {
        self.list_report_evaluations_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn list_report_evaluations_with_context(
        &self,
        options: &ListReportEvaluationsOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<EvaluationPage>> {
        self.client.invoke_json(options.call(), ctx).await
    }

    /// Pager over [`EvaluationsApi::list_report_evaluations`].
    pub fn list_report_evaluations_pager(
        &self,
        options: &ListReportEvaluationsOptions,
    ) -> ResultsResult<ReportEvaluationsPager> {
        ReportEvaluationsPager::new(self.client, options)
    }
}

/// Options for [`EvaluationsApi::list_report_evaluations`].
#[derive(Debug, Clone, Default)]
pub struct ListReportEvaluationsOptions {
    pub report_id: String,
    pub assessment_id: Option<String>,
    pub component_id: Option<String>,
    pub target_id: Option<String>,
    pub target_name: Option<String>,
    pub status: Option<EvaluationStatus>,
    pub start: Option<String>,
    pub limit: Option<i64>,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl ListReportEvaluationsOptions {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            ..Default::default()
        }
    }
}

call_options!(ListReportEvaluationsOptions);
optional_setters!(ListReportEvaluationsOptions {
    assessment_id: String => with_assessment_id,
    component_id: String => with_component_id,
    target_id: String => with_target_id,
    target_name: String => with_target_name,
    status: EvaluationStatus => with_status,
    start: String => with_start,
    limit: i64 => with_limit,
});

impl OperationOptions for ListReportEvaluationsOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &LIST_REPORT_EVALUATIONS,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .path_param("report_id", &self.report_id)
        .query("assessment_id", self.assessment_id.as_ref())
        .query("component_id", self.component_id.as_ref())
        .query("target_id", self.target_id.as_ref())
        .query("target_name", self.target_name.as_ref())
        .query("status", self.status.as_ref())
        .query("start", self.start.as_ref())
        .query("limit", self.limit.as_ref())
    }
}

impl PagedOptions for ListReportEvaluationsOptions {
    type Page = EvaluationPage;

    fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    fn set_start(&mut self, start: Option<String>) {
        self.start = start;
    }
}
