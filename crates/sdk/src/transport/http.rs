//! HTTP transport backed by reqwest.

use super::{Transport, TransportResponse};
use crate::codec::ByteStream;
use crate::context::RequestContext;
use crate::error::{ResultsError, ResultsResult};
use crate::request::ServiceRequest;
use async_trait::async_trait;
use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use futures_util::TryStreamExt;
use reqwest::header::{self, HeaderValue};
use reqwest::Client;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

/// Default transport: a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> ResultsResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResultsError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: ServiceRequest,
        ctx: &RequestContext,
    ) -> ResultsResult<TransportResponse> {
        debug!(method = %request.method, url = %request.url, "Sending request");

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            if request.compress_body {
                builder = builder
                    .header(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"))
                    .body(gzip(&body)?);
            } else {
                builder = builder.body(body);
            }
        }

        let response = ctx.run(builder.send()).await??;

        let status = response.status();
        let headers = response.headers().clone();
        let body = ByteStream::new(response.bytes_stream().map_err(ResultsError::from));

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn gzip(body: &[u8]) -> ResultsResult<Bytes> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(body)
        .and_then(|()| encoder.finish())
        .map(Bytes::from)
        .map_err(|e| ResultsError::Transport {
            message: format!("failed to compress request body: {e}"),
            source: None,
            response: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestBuilder;
    use flate2::read::GzDecoder;
    use reqwest::Method;
    use std::io::Read;
    use wiremock::matchers::{body_bytes, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(Duration::from_secs(30)).unwrap()
    }

    #[test]
    fn test_gzip_round_trip() {
        let compressed = gzip(b"{\"name\":\"x\"}").unwrap();
        let mut decoded = String::new();
        GzDecoder::new(&compressed[..])
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "{\"name\":\"x\"}");
    }

    #[tokio::test]
    async fn test_send_streams_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/reports/scopes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"scopes\":[]}"))
            .mount(&server)
            .await;

        let request = RequestBuilder::new(Method::GET, format!("{}/v3", server.uri()))
            .path("/reports/scopes")
            .build()
            .unwrap();

        let response = transport()
            .send(request, &RequestContext::default())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            response.body.collect().await.unwrap(),
            Bytes::from_static(b"{\"scopes\":[]}")
        );
    }

    #[tokio::test]
    async fn test_send_compresses_flagged_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/echo"))
            .and(header_eq("content-encoding", "gzip"))
            .and(body_bytes(gzip(b"{\"a\":1}").unwrap().to_vec()))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let request = RequestBuilder::new(Method::POST, format!("{}/v3", server.uri()))
            .path("/echo")
            .json_body(&serde_json::json!({"a": 1}))
            .unwrap()
            .gzip(true)
            .build()
            .unwrap();

        let response = transport()
            .send(request, &RequestContext::default())
            .await
            .unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let request = RequestBuilder::new(Method::GET, "http://127.0.0.1:9")
            .path("/reports")
            .build()
            .unwrap();

        let err = transport()
            .send(request, &RequestContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResultsError::Transport { .. }));
        assert!(err.is_retryable());
    }
}
