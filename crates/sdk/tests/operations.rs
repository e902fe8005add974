mod common;

use compliance_results_sdk::{
    ComplianceStatus, GetLatestReportsOptions, GetReportControlsOptions,
    GetReportEvaluationOptions, GetReportOptions, GetReportRuleOptions, GetReportSummaryOptions,
    GetReportTagsOptions, GetReportViolationsDriftOptions, GetReportsProfilesOptions,
    GetReportsScopesOptions, ListReportEvaluationsOptions, ListReportResourcesOptions,
    ListReportsOptions, ResultsError, ScanType,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("accept", "application/json"))
        .respond_with(ok(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_latest_reports_with_correlation_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/latest"))
        .and(query_param("sort", "testString"))
        .and(header("x-correlation-id", "testString"))
        .and(header("accept", "application/json"))
        .respond_with(ok(json!({
            "home_account_id": "HomeAccountID",
            "reports": [{"id": "44a5-a292-32114fa73558", "type": "scheduled"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client(&server);
    let options = GetLatestReportsOptions::new()
        .with_correlation_id("testString")
        .with_sort("testString");

    let response = client.reports().get_latest_reports(&options).await.unwrap();

    assert_eq!(response.status_code, 200);
    let latest = response.result().unwrap();
    assert_eq!(latest.home_account_id.as_deref(), Some("HomeAccountID"));
    let reports = latest.reports.as_ref().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].report_type, Some(ScanType::Scheduled));
}

#[tokio::test]
async fn test_every_operation_hits_its_endpoint() {
    let server = MockServer::start().await;
    let client = common::client(&server);

    mount_json(&server, "/reports", json!({"reports": [], "total_count": 0, "limit": 50, "first": {"href": "https://x/reports"}})).await;
    mount_json(&server, "/reports/profiles", json!({"profiles": []})).await;
    mount_json(&server, "/reports/scopes", json!({"scopes": []})).await;
    mount_json(&server, "/reports/r1", json!({"id": "r1"})).await;
    mount_json(&server, "/reports/r1/summary", json!({"report_id": "r1"})).await;
    mount_json(&server, "/reports/r1/controls", json!({"controls": []})).await;
    mount_json(&server, "/reports/r1/rules/rule-1", json!({"id": "rule-1"})).await;
    mount_json(&server, "/reports/r1/evaluations", json!({"evaluations": [], "total_count": 0, "limit": 50, "first": {"href": "https://x/e"}})).await;
    mount_json(&server, "/reports/r1/resources", json!({"resources": [], "total_count": 0, "limit": 50, "first": {"href": "https://x/r"}})).await;
    mount_json(&server, "/reports/r1/tags", json!({"tags": {"user": ["a"]}})).await;
    mount_json(&server, "/reports/r1/violations_drift", json!({"data_points": []})).await;

    let reports = client.reports();
    reports.list_reports(&ListReportsOptions::new()).await.unwrap();
    reports
        .get_reports_profiles(&GetReportsProfilesOptions::new())
        .await
        .unwrap();
    reports
        .get_reports_scopes(&GetReportsScopesOptions::new())
        .await
        .unwrap();
    let report = reports.get_report(&GetReportOptions::new("r1")).await.unwrap();
    assert_eq!(report.result().unwrap().id.as_deref(), Some("r1"));
    reports
        .get_report_summary(&GetReportSummaryOptions::new("r1"))
        .await
        .unwrap();
    let tags = reports
        .get_report_tags(&GetReportTagsOptions::new("r1"))
        .await
        .unwrap();
    assert!(tags.result().unwrap().tags.is_some());
    reports
        .get_report_violations_drift(&GetReportViolationsDriftOptions::new("r1"))
        .await
        .unwrap();

    client
        .controls()
        .get_report_controls(&GetReportControlsOptions::new("r1"))
        .await
        .unwrap();
    let rule = client
        .controls()
        .get_report_rule(&GetReportRuleOptions::new("r1", "rule-1"))
        .await
        .unwrap();
    assert_eq!(rule.result().unwrap().id.as_deref(), Some("rule-1"));

    client
        .evaluations()
        .list_report_evaluations(&ListReportEvaluationsOptions::new("r1"))
        .await
        .unwrap();
    client
        .resources()
        .list_report_resources(&ListReportResourcesOptions::new("r1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_query_parameters_follow_descriptor_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/r1/controls"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client(&server);
    let options = GetReportControlsOptions::new("r1")
        .with_sort("control_name")
        .with_status(ComplianceStatus::NotCompliant)
        .with_control_id("c1");
    client.controls().get_report_controls(&options).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("control_id=c1&status=not_compliant&sort=control_name")
    );
    assert_eq!(
        requests[0].headers.get("x-ibmcloud-sdk-analytics").unwrap(),
        "service_name=compliance_results;service_version=V3;operation_id=GetReportControls"
    );
}

#[tokio::test]
async fn test_missing_path_parameter_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = common::client(&server);

    let err = client
        .reports()
        .get_report(&GetReportOptions::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, ResultsError::Validation(ref m) if m == "report_id is required"));
    assert!(err.response().is_none());

    let err = client
        .controls()
        .get_report_rule(&GetReportRuleOptions::new("r1", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, ResultsError::Validation(ref m) if m == "rule_id is required"));

    for report_id in [".", ".."] {
        let err = client
            .reports()
            .get_report(&GetReportOptions::new(report_id))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ResultsError::Validation(ref m) if m == "report_id must not be a dot segment")
        );
    }

    let err = client
        .evaluations()
        .list_report_evaluations(&ListReportEvaluationsOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ResultsError::Validation(_)));
}

#[tokio::test]
async fn test_report_evaluation_download() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/r1/download"))
        .and(query_param("exclude_summary", "true"))
        .and(header("accept", "application/csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/csv")
                .set_body_bytes("col1,col2\n1,2\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client(&server);
    let options = GetReportEvaluationOptions::new("r1").with_exclude_summary(true);

    let response = client
        .reports()
        .get_report_evaluation(&options)
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    let body = response.into_result().unwrap().collect().await.unwrap();
    assert_eq!(&body[..], b"col1,col2\n1,2\n");
}

#[tokio::test]
async fn test_non_json_body_is_decode_error_with_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/r1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-correlation-id", "corr-9")
                .set_body_string("this is not json"),
        )
        .mount(&server)
        .await;

    let client = common::client(&server);
    let err = client
        .reports()
        .get_report(&GetReportOptions::new("r1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ResultsError::Decode { .. }));
    let response = err.response().unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.correlation_id(), Some("corr-9"));
    assert_eq!(err.correlation_id(), Some("corr-9"));
}

#[tokio::test]
async fn test_page_without_envelope_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-correlation-id", "corr-page")
                .set_body_json(json!({"reports": [{"id": "A"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client(&server);
    let err = client
        .reports()
        .list_reports(&ListReportsOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ResultsError::Decode { .. }));
    let response = err.response().unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(err.correlation_id(), Some("corr-page"));
}

#[tokio::test]
async fn test_empty_body_yields_no_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/r1/tags"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = common::client(&server);
    let response = client
        .reports()
        .get_report_tags(&GetReportTagsOptions::new("r1"))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert!(response.result().is_none());
}

#[tokio::test]
async fn test_service_error_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-correlation-id", "corr-404")
                .set_body_json(json!({
                    "errors": [{"code": "not_found", "message": "Report not found"}],
                    "trace": "abc",
                    "status_code": 404
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client(&server);
    let err = client
        .reports()
        .get_report(&GetReportOptions::new("missing"))
        .await
        .unwrap_err();

    match &err {
        ResultsError::Service {
            status,
            message,
            correlation_id,
            ..
        } => {
            assert_eq!(*status, 404);
            assert_eq!(message, "Report not found");
            assert_eq!(correlation_id.as_deref(), Some("corr-404"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_retryable());
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_summary_decodes_wire_spelling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/r1/summary"))
        .respond_with(ok(json!({"report_id": "r1", "isntance_id": "inst-1"})))
        .mount(&server)
        .await;

    let client = common::client(&server);
    let response = client
        .reports()
        .get_report_summary(&GetReportSummaryOptions::new("r1"))
        .await
        .unwrap();

    assert_eq!(
        response.result().unwrap().instance_id.as_deref(),
        Some("inst-1")
    );
}
