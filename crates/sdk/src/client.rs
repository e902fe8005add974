//! Main client for the compliance results service.

use crate::api::{Call, ControlsApi, EvaluationsApi, ReportsApi, ResourcesApi};
use crate::auth::{authenticator_from_properties, Authenticator};
use crate::codec::{decode_json, ByteStream};
use crate::config::external::{ConfigProvider, ServiceProperties};
use crate::config::{parse_service_url, ClientConfig, RetryConfig};
use crate::context::RequestContext;
use crate::endpoint::DEFAULT_SERVICE_URL;
use crate::error::{ResultsError, ResultsResult};
use crate::request::{RequestBuilder, ServiceRequest};
use crate::response::DetailedResponse;
use crate::transport::{ReqwestTransport, RetryTransport, Transport, TransportResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Name and version of this SDK, sent as `User-Agent`.
pub const SDK_USER_AGENT: &str = concat!("compliance-results-sdk/", env!("CARGO_PKG_VERSION"));

/// Header identifying the service, version and operation of each call.
pub const SDK_ANALYTICS_HEADER: &str = "x-ibmcloud-sdk-analytics";

const SERVICE_ANALYTICS_NAME: &str = "compliance_results";
const SERVICE_API_VERSION: &str = "V3";

const CORRELATION_ID: HeaderName = HeaderName::from_static("x-correlation-id");
const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Upper bound on the body read from a failed response.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// Client for the compliance results API.
///
/// Cloning is cheap. A clone shares the authenticator and transport but owns
/// its configuration, so setters on one client never affect another.
#[derive(Debug, Clone)]
pub struct ResultsClient {
    config: Arc<ClientConfig>,
    authenticator: Arc<dyn Authenticator>,
    transport: Arc<dyn Transport>,
}

impl ResultsClient {
    /// Create a new client builder.
    pub fn builder() -> ResultsClientBuilder {
        ResultsClientBuilder::new()
    }

    /// Build a client from the external configuration of `service_name`.
    ///
    /// The service URL, gzip, retry and authentication settings are read from
    /// `provider`. Fails if no authentication type is configured.
    pub fn from_external_config(
        service_name: &str,
        provider: &dyn ConfigProvider,
    ) -> ResultsResult<Self> {
        Self::builder()
            .external_config(service_name, provider)?
            .build()
    }

    /// Get the reports API.
    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }

    /// Get the controls API.
    pub fn controls(&self) -> ControlsApi<'_> {
        ControlsApi::new(self)
    }

    /// Get the evaluations API.
    pub fn evaluations(&self) -> EvaluationsApi<'_> {
        EvaluationsApi::new(self)
    }

    /// Get the resources API.
    pub fn resources(&self) -> ResourcesApi<'_> {
        ResourcesApi::new(self)
    }

    /// Current configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL requests are sent to.
    pub fn service_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Authenticator signing this client's requests.
    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    /// Change the base URL.
    pub fn set_service_url(&mut self, url: &str) -> ResultsResult<()> {
        let url = parse_service_url(url)?;
        Arc::make_mut(&mut self.config).base_url = url;
        Ok(())
    }

    /// Replace the headers sent with every request.
    pub fn set_default_headers(&mut self, headers: HeaderMap) {
        Arc::make_mut(&mut self.config).default_headers = headers;
    }

    /// Compress request bodies with gzip.
    pub fn set_enable_gzip_compression(&mut self, enabled: bool) {
        Arc::make_mut(&mut self.config).enable_gzip = enabled;
    }

    /// Whether request bodies are compressed.
    pub fn enable_gzip_compression(&self) -> bool {
        self.config.enable_gzip
    }

    /// Retry retryable failures up to `max_retries` times, with backoff capped
    /// at `max_interval`. Zero selects the default for that argument.
    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        Arc::make_mut(&mut self.config).retry_config =
            RetryConfig::with_limits(max_retries, max_interval);
    }

    /// Send every request exactly once.
    pub fn disable_retries(&mut self) {
        Arc::make_mut(&mut self.config).retry_config = RetryConfig::no_retry();
    }

    /// Run a JSON operation and decode its body.
    pub(crate) async fn invoke_json<T: DeserializeOwned>(
        &self,
        call: Call<'_>,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<T>> {
        let response = self.execute(call, ctx).await?;
        let status_code = response.status.as_u16();
        let headers = response.headers;
        let body = match ctx.run(response.body.collect()).await {
            Ok(Ok(body)) => body,
            Ok(Err(ResultsError::Transport {
                message, source, ..
            })) => {
                return Err(ResultsError::Transport {
                    message,
                    source,
                    response: Some(Box::new(DetailedResponse {
                        status_code,
                        headers,
                        result: None,
                        raw_result: None,
                    })),
                });
            }
            Ok(Err(e)) | Err(e) => return Err(e),
        };

        match decode_json::<T>(&body) {
            Ok(result) => Ok(DetailedResponse {
                status_code,
                headers,
                result,
                raw_result: Some(body),
            }),
            Err(ResultsError::Decode {
                message,
                path,
                snippet,
                ..
            }) => Err(ResultsError::Decode {
                message,
                path,
                snippet,
                response: Some(Box::new(DetailedResponse {
                    status_code,
                    headers,
                    result: None,
                    raw_result: Some(body),
                })),
            }),
            Err(e) => Err(e),
        }
    }

    /// Run an operation whose body is handed to the caller unread.
    pub(crate) async fn invoke_stream(
        &self,
        call: Call<'_>,
        ctx: &RequestContext,
    ) -> ResultsResult<DetailedResponse<ByteStream>> {
        let response = self.execute(call, ctx).await?;

        Ok(DetailedResponse {
            status_code: response.status.as_u16(),
            headers: response.headers,
            result: Some(response.body),
            raw_result: None,
        })
    }

    /// Validate, build, sign and send a call. Non-2xx responses become
    /// service errors.
    async fn execute(
        &self,
        call: Call<'_>,
        ctx: &RequestContext,
    ) -> ResultsResult<TransportResponse> {
        let operation = call.operation;
        let mut request = self.build_request(call)?;

        ctx.run(self.authenticator.authenticate(&mut request))
            .await?
            .map_err(|e| match e {
                ResultsError::Auth(_) | ResultsError::Canceled(_) => e,
                other => ResultsError::Auth(other.to_string()),
            })?;

        debug!(
            operation = operation.id,
            method = %request.method,
            url = %request.url,
            "Invoking operation"
        );

        let transport = RetryTransport::new(
            Arc::clone(&self.transport),
            self.config.retry_config.clone(),
        );
        let response = transport.send(request, ctx).await?;
        let status = response.status;

        debug!(operation = operation.id, status = status.as_u16(), "Received response");

        if status.is_success() {
            return Ok(response);
        }

        let headers = response.headers;
        let body = ctx
            .run(response.body.collect_limited(MAX_ERROR_BODY))
            .await??;

        Err(ResultsError::from_response(DetailedResponse {
            status_code: status.as_u16(),
            headers,
            result: None,
            raw_result: Some(body),
        }))
    }

    fn build_request(&self, call: Call<'_>) -> ResultsResult<ServiceRequest> {
        let operation = call.operation;

        for (name, value) in &call.path_params {
            if value.is_empty() {
                return Err(ResultsError::Validation(format!("{name} is required")));
            }
        }

        let headers = self.merge_headers(&call)?;

        let mut builder = RequestBuilder::new(operation.method.clone(), self.config.base_url.as_str())
            .path(operation.path)
            .headers(&headers)
            .gzip(self.config.enable_gzip);

        for (name, value) in call.path_params {
            builder = builder.path_param(name, value);
        }
        for (name, value) in call.query {
            builder = builder.query_opt(name, value);
        }

        builder.build()
    }

    /// Per-call headers override SDK headers, which override default headers.
    fn merge_headers(&self, call: &Call<'_>) -> ResultsResult<HeaderMap> {
        let operation = call.operation;
        let mut headers = self.config.default_headers.clone();

        headers.insert(USER_AGENT, HeaderValue::from_static(SDK_USER_AGENT));
        headers.insert(
            HeaderName::from_static(SDK_ANALYTICS_HEADER),
            header_value(
                "analytics",
                &format!(
                    "service_name={SERVICE_ANALYTICS_NAME};service_version={SERVICE_API_VERSION};operation_id={}",
                    operation.id
                ),
            )?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(operation.accept));

        if let Some(id) = call.x_correlation_id {
            headers.insert(CORRELATION_ID, header_value("x_correlation_id", id)?);
        }
        if let Some(id) = call.x_request_id {
            headers.insert(REQUEST_ID, header_value("x_request_id", id)?);
        }

        for name in call.headers.keys() {
            headers.remove(name);
            for value in call.headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        Ok(headers)
    }
}

fn header_value(field: &str, value: &str) -> ResultsResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| ResultsError::Validation(format!("{field} is not a valid header value")))
}

/// Builder for creating a [`ResultsClient`].
pub struct ResultsClientBuilder {
    service_url: Option<String>,
    authenticator: Option<Arc<dyn Authenticator>>,
    properties: Option<ServiceProperties>,
    timeout: Duration,
    retry_config: RetryConfig,
    default_headers: HeaderMap,
    enable_gzip: bool,
    transport: Option<Arc<dyn Transport>>,
}

impl ResultsClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            service_url: None,
            authenticator: None,
            properties: None,
            timeout: Duration::from_secs(60),
            retry_config: RetryConfig::no_retry(),
            default_headers: HeaderMap::new(),
            enable_gzip: false,
            transport: None,
        }
    }

    /// Set the service URL. Defaults to the `us-south` endpoint.
    pub fn service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    /// Set the authenticator.
    pub fn authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    /// Set a shared authenticator.
    pub fn shared_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Set the request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Set headers sent with every request.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Compress request bodies with gzip.
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.enable_gzip = enabled;
        self
    }

    /// Send requests through a custom transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Apply the external configuration of `service_name`.
    ///
    /// Settings present in the configuration replace those set earlier on the
    /// builder. The authenticator is only taken from the configuration when
    /// none is set at build time.
    pub fn external_config(
        mut self,
        service_name: &str,
        provider: &dyn ConfigProvider,
    ) -> ResultsResult<Self> {
        let properties = provider.service_properties(service_name)?;

        if let Some(url) = properties.url() {
            self.service_url = Some(url.to_string());
        }
        if let Some(enabled) = properties.bool("enable_gzip")? {
            self.enable_gzip = enabled;
        }
        if properties.bool("enable_retries")? == Some(true) {
            let max_retries = properties.u64("max_retries")?.unwrap_or(0);
            let max_retries = u32::try_from(max_retries).map_err(|_| {
                ResultsError::Config(format!("max_retries {max_retries} is out of range"))
            })?;
            let interval = Duration::from_secs(properties.u64("retry_interval")?.unwrap_or(0));
            self.retry_config = RetryConfig::with_limits(max_retries, interval);
        }

        info!(service = service_name, "Loaded external configuration");
        self.properties = Some(properties);
        Ok(self)
    }

    /// Build the client.
    pub fn build(self) -> ResultsResult<ResultsClient> {
        let authenticator = match (self.authenticator, &self.properties) {
            (Some(authenticator), _) => authenticator,
            (None, Some(properties)) => authenticator_from_properties(properties)?,
            (None, None) => {
                return Err(ResultsError::Config("authenticator is required".to_string()))
            }
        };
        authenticator.validate()?;

        let base_url =
            parse_service_url(self.service_url.as_deref().unwrap_or(DEFAULT_SERVICE_URL))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.timeout)?),
        };

        let config = ClientConfig {
            base_url,
            timeout: self.timeout,
            default_headers: self.default_headers,
            enable_gzip: self.enable_gzip,
            retry_config: self.retry_config,
        };

        Ok(ResultsClient {
            config: Arc::new(config),
            authenticator,
            transport,
        })
    }
}

impl Default for ResultsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GetReportOptions, OperationOptions};
    use crate::auth::{BearerTokenAuthenticator, NoAuthAuthenticator};
    use crate::config::external::MapConfigProvider;

    fn client() -> ResultsClient {
        ResultsClient::builder()
            .authenticator(NoAuthAuthenticator)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let client = client();
        assert_eq!(client.service_url().as_str(), DEFAULT_SERVICE_URL);
        assert!(!client.config().retry_config.is_enabled());
        assert_eq!(client.config().timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builder_requires_authenticator() {
        let err = ResultsClient::builder().build().unwrap_err();
        assert!(matches!(err, ResultsError::Config(_)));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let err = ResultsClient::builder()
            .authenticator(NoAuthAuthenticator)
            .service_url("{bad}")
            .build()
            .unwrap_err();
        assert!(matches!(err, ResultsError::Config(_)));
    }

    #[test]
    fn test_clone_has_independent_config() {
        let mut original = client();
        let mut copy = original.clone();

        assert_eq!(original.service_url(), copy.service_url());
        assert!(Arc::ptr_eq(original.authenticator(), copy.authenticator()));

        copy.set_service_url("https://copy.example.com/v3").unwrap();
        copy.set_enable_gzip_compression(true);
        copy.enable_retries(0, Duration::ZERO);
        assert_eq!(original.service_url().as_str(), DEFAULT_SERVICE_URL);
        assert!(!original.enable_gzip_compression());
        assert!(!original.config().retry_config.is_enabled());

        original.set_service_url("https://original.example.com/v3").unwrap();
        assert_eq!(copy.service_url().as_str(), "https://copy.example.com/v3");
        assert_eq!(copy.config().retry_config, RetryConfig::default());
    }

    #[test]
    fn test_set_service_url_validates() {
        let mut client = client();
        assert!(client.set_service_url("not a url").is_err());
        assert_eq!(client.service_url().as_str(), DEFAULT_SERVICE_URL);
    }

    #[test]
    fn test_external_config() {
        let provider = MapConfigProvider::new()
            .with("compliance_results", "url", "https://example.com/instances/i/v3")
            .with("compliance_results", "auth_type", "bearertoken")
            .with("compliance_results", "bearer_token", "tok")
            .with("compliance_results", "enable_gzip", "true")
            .with("compliance_results", "enable_retries", "true")
            .with("compliance_results", "max_retries", "2");

        let client = ResultsClient::from_external_config("compliance_results", &provider).unwrap();

        assert_eq!(client.service_url().as_str(), "https://example.com/instances/i/v3");
        assert_eq!(client.authenticator().authentication_type(), "bearertoken");
        assert!(client.enable_gzip_compression());
        assert_eq!(client.config().retry_config.max_retries, 2);
    }

    #[test]
    fn test_external_config_missing_auth_type() {
        let provider =
            MapConfigProvider::new().with("compliance_results", "url", "https://example.com/v3");

        let err = ResultsClient::from_external_config("compliance_results", &provider).unwrap_err();
        assert!(matches!(err, ResultsError::Config(_)));
    }

    #[test]
    fn test_caller_authenticator_wins_over_external_config() {
        let provider = MapConfigProvider::new()
            .with("compliance_results", "auth_type", "basic")
            .with("compliance_results", "username", "user");

        let client = ResultsClient::builder()
            .authenticator(BearerTokenAuthenticator::new("tok").unwrap())
            .external_config("compliance_results", &provider)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(client.authenticator().authentication_type(), "bearertoken");
    }

    #[test]
    fn test_header_precedence() {
        let mut defaults = HeaderMap::new();
        defaults.insert(USER_AGENT, HeaderValue::from_static("default-agent"));
        defaults.insert("x-team", HeaderValue::from_static("blue"));

        let mut client = client();
        client.set_default_headers(defaults);

        let options = GetReportOptions::new("r1")
            .with_correlation_id("corr-1")
            .with_header(HeaderName::from_static("x-team"), HeaderValue::from_static("red"));
        let request = client.build_request(options.call()).unwrap();

        assert_eq!(request.headers[USER_AGENT], SDK_USER_AGENT);
        assert_eq!(request.headers["x-team"], "red");
        assert_eq!(request.headers["x-correlation-id"], "corr-1");
        assert_eq!(request.accept(), Some("application/json"));
        assert_eq!(
            request.headers[SDK_ANALYTICS_HEADER],
            "service_name=compliance_results;service_version=V3;operation_id=GetReport"
        );
        assert_eq!(
            request.url.as_str(),
            "https://us-south.compliance.cloud.ibm.com/instances/instance_id/v3/reports/r1"
        );
    }

    #[test]
    fn test_empty_path_param_is_validation_error() {
        let client = client();
        let err = client
            .build_request(GetReportOptions::default().call())
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: report_id is required");
    }

    /// Answers 200 and then fails while the body is streamed.
    #[derive(Debug)]
    struct BrokenBodyTransport;

    #[async_trait::async_trait]
    impl Transport for BrokenBodyTransport {
        async fn send(
            &self,
            _request: ServiceRequest,
            _ctx: &RequestContext,
        ) -> ResultsResult<TransportResponse> {
            let mut headers = HeaderMap::new();
            headers.insert("x-correlation-id", HeaderValue::from_static("corr-body"));
            let chunks = vec![
                Ok(bytes::Bytes::from_static(b"{\"id\":")),
                Err(ResultsError::Transport {
                    message: "connection reset".to_string(),
                    source: None,
                    response: None,
                }),
            ];
            Ok(TransportResponse {
                status: reqwest::StatusCode::OK,
                headers,
                body: ByteStream::new(futures_util::stream::iter(chunks)),
            })
        }
    }

    #[tokio::test]
    async fn test_body_read_failure_keeps_response() {
        let client = ResultsClient::builder()
            .authenticator(NoAuthAuthenticator)
            .transport(Arc::new(BrokenBodyTransport))
            .build()
            .unwrap();

        let err = client
            .reports()
            .get_report(&GetReportOptions::new("r1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ResultsError::Transport { .. }));
        assert_eq!(err.status_code(), Some(200));
        assert_eq!(err.correlation_id(), Some("corr-body"));
    }
}
