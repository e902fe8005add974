//! Detailed response returned by every operation.

use bytes::Bytes;
use reqwest::header::HeaderMap;

/// Header the service uses to echo the correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Status, headers and decoded result of a call.
///
/// `result` is only populated for 2xx responses with a non-empty body.
#[derive(Debug, Clone)]
pub struct DetailedResponse<T> {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub result: Option<T>,
    pub raw_result: Option<Bytes>,
}

impl<T> DetailedResponse<T> {
    /// Get a response header as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Correlation id echoed by the service.
    pub fn correlation_id(&self) -> Option<&str> {
        self.header(CORRELATION_ID_HEADER)
    }

    /// Borrow the decoded result.
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Take the decoded result.
    pub fn into_result(self) -> Option<T> {
        self.result
    }
}
