mod common;

use compliance_results_sdk::{
    CancelReason, GetReportOptions, RequestContext, ResultsError,
};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_500_then_200(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/reports/r1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("transient"))
        .up_to_n_times(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reports/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "r1"})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_retry_on_500_then_success() {
    let server = MockServer::start().await;
    mount_500_then_200(&server).await;

    let client = common::retrying_client(&server, 4);
    let response = client
        .reports()
        .get_report(&GetReportOptions::new("r1"))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.result().unwrap().id.as_deref(), Some("r1"));

    let calls = server.received_requests().await.unwrap().len();
    assert!((2..=5).contains(&calls));
}

#[tokio::test]
async fn test_500_surfaces_without_retries() {
    let server = MockServer::start().await;
    mount_500_then_200(&server).await;

    let client = common::client(&server);
    let err = client
        .reports()
        .get_report(&GetReportOptions::new("r1"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert!(err.is_retryable());
    assert!(matches!(err, ResultsError::Service { ref message, .. } if message == "transient"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_enable_retries_on_existing_client() {
    let server = MockServer::start().await;
    mount_500_then_200(&server).await;

    let mut client = common::client(&server);
    client.enable_retries(2, Duration::from_millis(1));
    let response = client
        .reports()
        .get_report(&GetReportOptions::new("r1"))
        .await
        .unwrap();
    assert_eq!(response.status_code, 200);

    client.disable_retries();
    assert!(!client.config().retry_config.is_enabled());
}

#[tokio::test]
async fn test_exhausted_retries_return_last_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/r1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(3)
        .mount(&server)
        .await;

    let client = common::retrying_client(&server, 2);
    let err = client
        .reports()
        .get_report(&GetReportOptions::new("r1"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn test_not_implemented_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/r1"))
        .respond_with(ResponseTemplate::new(501))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::retrying_client(&server, 4);
    let err = client
        .reports()
        .get_report(&GetReportOptions::new("r1"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(501));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_deadline_exceeded_during_send() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/r1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "r1"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    for client in [common::client(&server), common::retrying_client(&server, 4)] {
        let ctx = RequestContext::with_timeout(Duration::from_millis(100));
        let err = client
            .reports()
            .get_report_with_context(&GetReportOptions::new("r1"), &ctx)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResultsError::Canceled(CancelReason::DeadlineExceeded)
        ));
        assert!(err.to_string().contains("deadline exceeded"));
    }
}

#[tokio::test]
async fn test_deadline_bounds_retry_backoff() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/r1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut client = common::client(&server);
    client.enable_retries(4, Duration::from_secs(30));

    let ctx = RequestContext::with_timeout(Duration::from_millis(300));
    let err = client
        .reports()
        .get_report_with_context(&GetReportOptions::new("r1"), &ctx)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ResultsError::Canceled(CancelReason::DeadlineExceeded)
    ));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancellation_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/r1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = common::client(&server);
    let token = CancellationToken::new();
    let ctx = RequestContext::new().cancellation(token.clone());

    let canceler = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let err = client
        .reports()
        .get_report_with_context(&GetReportOptions::new("r1"), &ctx)
        .await
        .unwrap_err();
    canceler.await.unwrap();

    assert!(matches!(err, ResultsError::Canceled(CancelReason::Canceled)));
    assert!(err.to_string().contains("context canceled"));
}
