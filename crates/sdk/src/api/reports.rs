//! Reports API endpoints.

use super::{get, Call, Operation, OperationOptions, APPLICATION_CSV, APPLICATION_JSON};
use crate::client::ResultsClient;
use crate::codec::ByteStream;
use crate::context::RequestContext;
use crate::error::ResultsResult;
use crate::pager::{PagedOptions, ReportsPager};
use crate::response::DetailedResponse;
use compliance_results_core::{
    Report, ReportLatest, ReportPage, ReportProfiles, ReportScopes, ReportSummary, ReportTags,
    ReportViolationsDrift, ScanType,
};
use reqwest::header::HeaderMap;

static GET_LATEST_REPORTS: Operation =
    get("GetLatestReports", "/reports/latest", APPLICATION_JSON);
static LIST_REPORTS: Operation = get("ListReports", "/reports", APPLICATION_JSON);
static GET_REPORTS_PROFILES: Operation =
    get("GetReportsProfiles", "/reports/profiles", APPLICATION_JSON);
static GET_REPORTS_SCOPES: Operation =
    get("GetReportsScopes", "/reports/scopes", APPLICATION_JSON);
static GET_REPORT: Operation = get("GetReport", "/reports/{report_id}", APPLICATION_JSON);
static GET_REPORT_SUMMARY: Operation = get(
    "GetReportSummary",
    "/reports/{report_id}/summary",
    APPLICATION_JSON,
);
static GET_REPORT_EVALUATION: Operation = get(
    "GetReportEvaluation",
    "/reports/{report_id}/download",
    APPLICATION_CSV,
);
static GET_REPORT_TAGS: Operation =
    get("GetReportTags", "/reports/{report_id}/tags", APPLICATION_JSON);
static GET_REPORT_VIOLATIONS_DRIFT: Operation = get(
    "GetReportViolationsDrift",
    "/reports/{report_id}/violations_drift",
    APPLICATION_JSON,
);

/// Reports API: scans, their summaries and downloads.
pub struct ReportsApi<'a> {
    client: &'a ResultsClient,
}

impl<'a> ReportsApi<'a> {
    pub(crate) fn new(client: &'a ResultsClient) -> Self {
        Self { client }
    }

    /// Latest report of every attachment.
    pub async fn get_latest_reports(
        &self,
        options: &GetLatestReportsOptions,
    ) -> ResultsResult<DetailedResponse<ReportLatest>> {
        self.get_latest_reports_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn get_latest_reports_with_context(
        &self,
        options: &GetLatestReportsOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ReportLatest>> {
        self.client.invoke_json(options.call(), ctx).await
    }

    /// One page of reports. See [`ReportsApi::list_reports_pager`] to walk
    /// every page.
    pub async fn list_reports(
        &self,
        options: &ListReportsOptions,
    ) -> ResultsResult<DetailedResponse<ReportPage>> {
        self.list_reports_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn list_reports_with_context(
        &self,
        options: &ListReportsOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ReportPage>> {
        self.client.invoke_json(options.call(), ctx).await
    }

    /// Pager over [`ReportsApi::list_reports`]. `options.start` must be unset.
    pub fn list_reports_pager(&self, options: &ListReportsOptions) -> ResultsResult<ReportsPager> {
        ReportsPager::new(self.client, options)
    }

    /// Profiles used by the reports of the account.
    pub async fn get_reports_profiles(
        &self,
        options: &GetReportsProfilesOptions,
    ) -> ResultsResult<DetailedResponse<ReportProfiles>> {
        self.get_reports_profiles_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn get_reports_profiles_with_context(
        &self,
        options: &GetReportsProfilesOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ReportProfiles>> {
        self.client.invoke_json(options.call(), ctx).await
    }

    /// Scopes used by the reports of the account.
    pub async fn get_reports_scopes(
        &self,
        options: &GetReportsScopesOptions,
    ) -> ResultsResult<DetailedResponse<ReportScopes>> {
        self.get_reports_scopes_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn get_reports_scopes_with_context(
        &self,
        options: &GetReportsScopesOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ReportScopes>> {
        self.client.invoke_json(options.call(), ctx).await
    }

    /// Get a report by id.
    pub async fn get_report(
        &self,
        options: &GetReportOptions,
    ) -> ResultsResult<DetailedResponse<Report>> {
        self.get_report_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn get_report_with_context(
        &self,
        options: &GetReportOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<Report>> {
        self.client.invoke_json(options.call(), ctx).await
    }

    /// Compliance, evaluation and resource summary of a report.
    pub async fn get_report_summary(
        &self,
        options: &GetReportSummaryOptions,
    ) -> ResultsResult<DetailedResponse<ReportSummary>> {
        self.get_report_summary_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn get_report_summary_with_context(
        &self,
        options: &GetReportSummaryOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ReportSummary>> {
        self.client.invoke_json(options.call(), ctx).await
    }

    /// Download the report's evaluations as CSV.
    ///
    /// The body is streamed; read it with [`ByteStream::collect`] or chunk by
    /// chunk, and drop or [`ByteStream::close`] it when done.
    pub async fn get_report_evaluation(
        &self,
        options: &GetReportEvaluationOptions,
    ) -> ResultsResult<DetailedResponse<ByteStream>> {
        self.get_report_evaluation_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn get_report_evaluation_with_context(
        &self,
        options: &GetReportEvaluationOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ByteStream>> {
        self.client.invoke_stream(options.call(), ctx).await
    }

    /// Tags attached to a report.
    pub async fn get_report_tags(
        &self,
        options: &GetReportTagsOptions,
    ) -> ResultsResult<DetailedResponse<ReportTags>> {
        self.get_report_tags_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn get_report_tags_with_context(
        &self,
        options: &GetReportTagsOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ReportTags>> {
        self.client.invoke_json(options.call(), ctx).await
    }

    /// Violation counts of the report's attachment over time.
    pub async fn get_report_violations_drift(
        &self,
        options: &GetReportViolationsDriftOptions,
    ) -> ResultsResult<DetailedResponse<ReportViolationsDrift>> {
        self.get_report_violations_drift_with_context(options, &RequestContext::default())
            .await
    }

    pub async fn get_report_violations_drift_with_context(
        &self,
        options: &GetReportViolationsDriftOptions,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ReportViolationsDrift>> {
        self.client.invoke_json(options.call(), ctx).await
    }
}

/// Options for [`ReportsApi::get_latest_reports`].
#[derive(Debug, Clone, Default)]
pub struct GetLatestReportsOptions {
    /// Field to sort by, e.g. `profile_name`.
    pub sort: Option<String>,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl GetLatestReportsOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

call_options!(GetLatestReportsOptions);
optional_setters!(GetLatestReportsOptions { sort: String => with_sort });

impl OperationOptions for GetLatestReportsOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &GET_LATEST_REPORTS,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .query("sort", self.sort.as_ref())
    }
}

/// Options for [`ReportsApi::list_reports`].
#[derive(Debug, Clone, Default)]
pub struct ListReportsOptions {
    pub attachment_id: Option<String>,
    pub group_id: Option<String>,
    pub profile_id: Option<String>,
    pub scope_id: Option<String>,
    /// Scan type filter, sent as `type`.
    pub report_type: Option<ScanType>,
    /// Page cursor. Leave unset when building a pager.
    pub start: Option<String>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl ListReportsOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

call_options!(ListReportsOptions);
optional_setters!(ListReportsOptions {
    attachment_id: String => with_attachment_id,
    group_id: String => with_group_id,
    profile_id: String => with_profile_id,
    scope_id: String => with_scope_id,
    report_type: ScanType => with_type,
    start: String => with_start,
    limit: i64 => with_limit,
    sort: String => with_sort,
});

impl OperationOptions for ListReportsOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &LIST_REPORTS,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .query("attachment_id", self.attachment_id.as_ref())
        .query("group_id", self.group_id.as_ref())
        .query("profile_id", self.profile_id.as_ref())
        .query("scope_id", self.scope_id.as_ref())
        .query("type", self.report_type.as_ref())
        .query("start", self.start.as_ref())
        .query("limit", self.limit.as_ref())
        .query("sort", self.sort.as_ref())
    }
}

impl PagedOptions for ListReportsOptions {
    type Page = ReportPage;

    fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    fn set_start(&mut self, start: Option<String>) {
        self.start = start;
    }
}

/// Options for [`ReportsApi::get_reports_profiles`].
#[derive(Debug, Clone, Default)]
pub struct GetReportsProfilesOptions {
    /// Restrict to the profiles of one report.
    pub report_id: Option<String>,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl GetReportsProfilesOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

call_options!(GetReportsProfilesOptions);
optional_setters!(GetReportsProfilesOptions { report_id: String => with_report_id });

impl OperationOptions for GetReportsProfilesOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &GET_REPORTS_PROFILES,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .query("report_id", self.report_id.as_ref())
    }
}

/// Options for [`ReportsApi::get_reports_scopes`].
#[derive(Debug, Clone, Default)]
pub struct GetReportsScopesOptions {
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl GetReportsScopesOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

call_options!(GetReportsScopesOptions);

impl OperationOptions for GetReportsScopesOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &GET_REPORTS_SCOPES,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
    }
}

/// Options for [`ReportsApi::get_report`].
#[derive(Debug, Clone, Default)]
pub struct GetReportOptions {
    pub report_id: String,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl GetReportOptions {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            ..Default::default()
        }
    }
}

call_options!(GetReportOptions);

impl OperationOptions for GetReportOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &GET_REPORT,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .path_param("report_id", &self.report_id)
    }
}

/// Options for [`ReportsApi::get_report_summary`].
#[derive(Debug, Clone, Default)]
pub struct GetReportSummaryOptions {
    pub report_id: String,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl GetReportSummaryOptions {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            ..Default::default()
        }
    }
}

call_options!(GetReportSummaryOptions);

impl OperationOptions for GetReportSummaryOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &GET_REPORT_SUMMARY,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .path_param("report_id", &self.report_id)
    }
}

/// Options for [`ReportsApi::get_report_evaluation`].
#[derive(Debug, Clone, Default)]
pub struct GetReportEvaluationOptions {
    pub report_id: String,
    /// Leave the summary out of the CSV.
    pub exclude_summary: Option<bool>,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl GetReportEvaluationOptions {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            ..Default::default()
        }
    }
}

call_options!(GetReportEvaluationOptions);
optional_setters!(GetReportEvaluationOptions { exclude_summary: bool => with_exclude_summary });

impl OperationOptions for GetReportEvaluationOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &GET_REPORT_EVALUATION,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .path_param("report_id", &self.report_id)
        .query("exclude_summary", self.exclude_summary.as_ref())
    }
}

/// Options for [`ReportsApi::get_report_tags`].
#[derive(Debug, Clone, Default)]
pub struct GetReportTagsOptions {
    pub report_id: String,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl GetReportTagsOptions {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            ..Default::default()
        }
    }
}

call_options!(GetReportTagsOptions);

impl OperationOptions for GetReportTagsOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &GET_REPORT_TAGS,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .path_param("report_id", &self.report_id)
    }
}

/// Options for [`ReportsApi::get_report_violations_drift`].
#[derive(Debug, Clone, Default)]
pub struct GetReportViolationsDriftOptions {
    pub report_id: String,
    /// Lookback window in days. Zero is sent as given.
    pub scan_time_duration: Option<i64>,
    pub x_correlation_id: Option<String>,
    pub x_request_id: Option<String>,
    pub headers: HeaderMap,
}

impl GetReportViolationsDriftOptions {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            ..Default::default()
        }
    }
}

call_options!(GetReportViolationsDriftOptions);
optional_setters!(GetReportViolationsDriftOptions {
    scan_time_duration: i64 => with_scan_time_duration,
});

impl OperationOptions for GetReportViolationsDriftOptions {
    fn call(&self) -> Call<'_> {
        Call::new(
            &GET_REPORT_VIOLATIONS_DRIFT,
            self.x_correlation_id.as_deref(),
            self.x_request_id.as_deref(),
            &self.headers,
        )
        .path_param("report_id", &self.report_id)
        .query("scan_time_duration", self.scan_time_duration.as_ref())
    }
}
