//! Error types for the compliance results SDK.

use crate::response::DetailedResponse;
use serde::Deserialize;
use std::fmt;

/// Result type for SDK operations.
pub type ResultsResult<T> = Result<T, ResultsError>;

/// Why a request stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The context deadline passed.
    DeadlineExceeded,
    /// The context's cancellation token fired.
    Canceled,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeadlineExceeded => f.write_str("context deadline exceeded"),
            Self::Canceled => f.write_str("context canceled"),
        }
    }
}

/// Error types that can occur when using the SDK.
#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    /// Caller input was rejected before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The authenticator rejected the request or could not obtain credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network, TLS or connection failure.
    ///
    /// When a successful response's body could not be read, `response` holds
    /// its status and headers.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
        response: Option<Box<DetailedResponse<serde_json::Value>>>,
    },

    /// The service answered with a non-2xx status.
    #[error("Service error (status {status}): {message}")]
    Service {
        status: u16,
        message: String,
        correlation_id: Option<String>,
        response: Box<DetailedResponse<serde_json::Value>>,
    },

    /// The response body could not be decoded.
    #[error("Decode error at '{path}': {message}")]
    Decode {
        message: String,
        path: String,
        snippet: String,
        response: Option<Box<DetailedResponse<serde_json::Value>>>,
    },

    /// The caller canceled the request or its deadline expired.
    #[error("Request canceled: {0}")]
    Canceled(CancelReason),

    /// Pager misuse.
    #[error("Pager error: {0}")]
    State(String),
}

impl From<reqwest::Error> for ResultsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
            source: Some(err),
            response: None,
        }
    }
}

impl ResultsError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Service { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Response attached to the error, when the service answered.
    pub fn response(&self) -> Option<&DetailedResponse<serde_json::Value>> {
        match self {
            Self::Service { response, .. } => Some(response),
            Self::Decode { response, .. } | Self::Transport { response, .. } => {
                response.as_deref()
            }
            _ => None,
        }
    }

    /// HTTP status of the failed call, when the service answered.
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(|response| response.status_code)
    }

    /// Correlation id echoed by the service.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::Service { correlation_id, .. } => correlation_id.as_deref(),
            _ => self.response().and_then(|response| response.correlation_id()),
        }
    }

    /// Build a service error from a non-2xx response and its (bounded) body.
    pub(crate) fn from_response(response: DetailedResponse<serde_json::Value>) -> Self {
        let status = response.status_code;
        let body = response.raw_result.as_deref().unwrap_or_default();
        let decoded = serde_json::from_slice::<serde_json::Value>(body).ok();
        let envelope = decoded
            .as_ref()
            .and_then(|value| ErrorEnvelope::deserialize(value).ok());

        let message = envelope
            .as_ref()
            .and_then(ErrorEnvelope::message)
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (!text.is_empty()).then_some(text)
            })
            .unwrap_or_else(|| {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|code| code.canonical_reason())
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        let correlation_id = response
            .correlation_id()
            .map(str::to_string)
            .or_else(|| envelope.and_then(|envelope| envelope.trace));

        Self::Service {
            status,
            message,
            correlation_id,
            response: Box::new(DetailedResponse {
                result: decoded,
                ..response
            }),
        }
    }
}

/// Whether a status code is worth retrying: 429 and every 5xx except 501.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || ((500..600).contains(&status) && status != 501)
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorItem>,
    error: Option<String>,
    message: Option<String>,
    trace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    message: Option<String>,
}

impl ErrorEnvelope {
    fn message(&self) -> Option<String> {
        self.errors
            .iter()
            .find_map(|item| item.message.clone())
            .or_else(|| self.error.clone())
            .or_else(|| self.message.clone())
    }
}
