//! Retry policy applied around another transport.

use super::{Transport, TransportResponse};
use crate::config::RetryConfig;
use crate::context::RequestContext;
use crate::error::{ResultsError, ResultsResult};
use crate::request::ServiceRequest;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Transport that retries retryable failures of an inner transport.
///
/// Retryable responses (per [`RetryConfig::should_retry_status`]) and
/// transport errors are retried with capped exponential backoff. Once attempts
/// run out the last response or error is returned unchanged. Backoff waits
/// honour the context, so retries never outlive its deadline.
#[derive(Debug, Clone)]
pub struct RetryTransport {
    inner: Arc<dyn Transport>,
    config: RetryConfig,
}

impl RetryTransport {
    pub fn new(inner: Arc<dyn Transport>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl Transport for RetryTransport {
    async fn send(
        &self,
        request: ServiceRequest,
        ctx: &RequestContext,
    ) -> ResultsResult<TransportResponse> {
        let mut attempts = 0;

        loop {
            match self.inner.send(request.clone(), ctx).await {
                Ok(response) => {
                    let status = response.status.as_u16();

                    if response.status.is_success()
                        || attempts >= self.config.max_retries
                        || !self.config.should_retry_status(status)
                    {
                        return Ok(response);
                    }

                    let backoff = self
                        .config
                        .retry_after(&response.headers)
                        .unwrap_or_else(|| self.config.backoff_for_attempt(attempts));
                    warn!(
                        status = status,
                        attempt = attempts + 1,
                        backoff_ms = backoff.as_millis(),
                        "Request failed, retrying"
                    );
                    response.body.close();
                    ctx.sleep(backoff).await?;
                    attempts += 1;
                }
                Err(e @ ResultsError::Transport { .. }) if attempts < self.config.max_retries => {
                    let backoff = self.config.backoff_for_attempt(attempts);
                    warn!(
                        error = %e,
                        attempt = attempts + 1,
                        backoff_ms = backoff.as_millis(),
                        "Request could not be sent, retrying"
                    );
                    ctx.sleep(backoff).await?;
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
