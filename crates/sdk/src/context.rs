//! Cancellation and deadline handle threaded through every call.

use crate::error::{CancelReason, ResultsError, ResultsResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline handle for a call.
///
/// The default context never expires. A deadline bounds the whole call,
/// retries and backoff included.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl RequestContext {
    /// Create an unbounded context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context that expires after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attach a cancellation token.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Deadline of this context, if any.
    pub fn expires_at(&self) -> Option<Instant> {
        self.deadline
    }

    /// Reason the context is already done, if it is.
    pub fn done(&self) -> Option<CancelReason> {
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Some(CancelReason::Canceled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `future` until it completes or the context ends.
    pub async fn run<F: Future>(&self, future: F) -> ResultsResult<F::Output> {
        let canceled = async {
            match &self.cancellation {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            () = canceled => Err(ResultsError::Canceled(CancelReason::Canceled)),
            () = expired => Err(ResultsError::Canceled(CancelReason::DeadlineExceeded)),
            output = future => Ok(output),
        }
    }

    /// Sleep for `duration`, waking early if the context ends.
    pub async fn sleep(&self, duration: Duration) -> ResultsResult<()> {
        self.run(tokio::time::sleep(duration)).await
    }
}
