#![allow(dead_code)]

use compliance_results_sdk::auth::NoAuthAuthenticator;
use compliance_results_sdk::{ResultsClient, RetryConfig};
use std::time::Duration;
use wiremock::MockServer;

/// Client without retries pointed at the mock server.
pub fn client(server: &MockServer) -> ResultsClient {
    ResultsClient::builder()
        .service_url(server.uri())
        .authenticator(NoAuthAuthenticator)
        .build()
        .unwrap()
}

/// Client with fast retries pointed at the mock server.
pub fn retrying_client(server: &MockServer, max_retries: u32) -> ResultsClient {
    ResultsClient::builder()
        .service_url(server.uri())
        .authenticator(NoAuthAuthenticator)
        .retry_config(RetryConfig {
            max_retries,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(50),
            ..RetryConfig::default()
        })
        .build()
        .unwrap()
}
