mod common;

use compliance_results_sdk::auth::{BasicAuthenticator, NoAuthAuthenticator};
use compliance_results_sdk::{
    construct_service_url, url_for_region, EnvConfigProvider, FileConfigProvider,
    GetReportsScopesOptions, ResultsClient, ResultsError, DEFAULT_SERVICE_URL,
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_bad_parameterized_url_variable() {
    let provided = HashMap::from([("invalid_variable_name".to_string(), "value".to_string())]);

    let err = construct_service_url(&provided).unwrap_err();
    assert!(matches!(err, ResultsError::Config(ref m) if m.contains("invalid_variable_name")));
}

#[test]
fn test_construct_service_url_overrides_defaults() {
    let provided = HashMap::from([("instance_id".to_string(), "abc".to_string())]);
    assert_eq!(
        construct_service_url(&provided).unwrap(),
        "https://us-south.compliance.cloud.ibm.com/instances/abc/v3"
    );
    assert_eq!(construct_service_url(&HashMap::new()).unwrap(), DEFAULT_SERVICE_URL);
}

#[test]
fn test_regional_urls_unsupported() {
    assert!(matches!(url_for_region("eu-de"), Err(ResultsError::Config(_))));
}

#[test]
fn test_clone_is_independent() {
    let original = ResultsClient::builder()
        .authenticator(NoAuthAuthenticator)
        .build()
        .unwrap();
    let mut copy = original.clone();

    assert_eq!(original.service_url(), copy.service_url());
    assert!(Arc::ptr_eq(original.authenticator(), copy.authenticator()));

    let mut headers = HeaderMap::new();
    headers.insert("x-team", HeaderValue::from_static("red"));
    copy.set_default_headers(headers);
    copy.set_service_url("https://eu-de.compliance.cloud.ibm.com/instances/x/v3")
        .unwrap();

    assert_eq!(original.service_url().as_str(), DEFAULT_SERVICE_URL);
    assert!(original.config().default_headers.is_empty());
    assert_eq!(copy.config().default_headers.len(), 1);
}

#[tokio::test]
async fn test_default_headers_and_authentication_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/scopes"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(header("x-team", "blue"))
        .and(header("x-request-id", "req-1"))
        .and(header("user-agent", compliance_results_sdk::client::SDK_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"scopes": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("x-team", HeaderValue::from_static("blue"));

    let client = ResultsClient::builder()
        .service_url(server.uri())
        .authenticator(BasicAuthenticator::new("user", "pass").unwrap())
        .default_headers(headers)
        .build()
        .unwrap();

    let response = client
        .reports()
        .get_reports_scopes(&GetReportsScopesOptions::new().with_request_id("req-1"))
        .await
        .unwrap();
    assert_eq!(response.result().unwrap().scopes.as_deref(), Some(&[][..]));
}

#[tokio::test]
async fn test_client_from_environment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/scopes"))
        .and(header("authorization", "Bearer env-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    std::env::set_var("ENV_CLIENT_RESULTS_URL", server.uri());
    std::env::set_var("ENV_CLIENT_RESULTS_AUTH_TYPE", "bearertoken");
    std::env::set_var("ENV_CLIENT_RESULTS_BEARER_TOKEN", "env-token");

    let client =
        ResultsClient::from_external_config("env_client_results", &EnvConfigProvider).unwrap();
    client
        .reports()
        .get_reports_scopes(&GetReportsScopesOptions::new())
        .await
        .unwrap();
}

#[test]
fn test_client_from_credentials_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[compliance_results]
url = "https://example.com/instances/abc/v3"
auth_type = "basic"
username = "user"
password = "pass"
"#
    )
    .unwrap();

    let client = ResultsClient::from_external_config(
        "compliance_results",
        &FileConfigProvider::new(file.path()),
    )
    .unwrap();

    assert_eq!(client.service_url().as_str(), "https://example.com/instances/abc/v3");
    assert_eq!(client.authenticator().authentication_type(), "basic");
}
