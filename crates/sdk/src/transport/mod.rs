//! Transport layer for the compliance results SDK.

pub mod http;
pub mod retry;

pub use http::ReqwestTransport;
pub use retry::RetryTransport;

use crate::codec::ByteStream;
use crate::context::RequestContext;
use crate::error::ResultsResult;
use crate::request::ServiceRequest;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::fmt;

/// Raw response handed back by a transport.
#[derive(Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

/// Sends a signed request and returns the raw response.
///
/// Implementations must be safe to share between concurrent callers and must
/// honour the context's deadline and cancellation.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(
        &self,
        request: ServiceRequest,
        ctx: &RequestContext,
    ) -> ResultsResult<TransportResponse>;
}
