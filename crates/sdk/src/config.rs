//! Configuration types for the compliance results SDK.

pub mod external;

use crate::error::{is_retryable_status, ResultsError, ResultsResult};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;
use url::Url;

/// Configuration for the results client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service, including the instance and API version.
    pub base_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Headers sent with every request unless overridden.
    pub default_headers: HeaderMap,
    /// Compress request bodies with gzip.
    pub enable_gzip: bool,
    /// Retry configuration.
    pub retry_config: RetryConfig,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(60),
            default_headers: HeaderMap::new(),
            enable_gzip: false,
            retry_config: RetryConfig::no_retry(),
        }
    }
}

/// Parse and validate a service URL.
pub fn parse_service_url(url: &str) -> ResultsResult<Url> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ResultsError::Config("service URL is required".to_string()));
    }
    if trimmed.contains('{') || trimmed.contains('}') || trimmed.contains('"') {
        return Err(ResultsError::Config(format!(
            "service URL contains invalid characters: {trimmed}"
        )));
    }

    let parsed = Url::parse(trimmed)?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
        return Err(ResultsError::Config(format!(
            "service URL must be an absolute http(s) URL: {trimmed}"
        )));
    }
    Ok(parsed)
}

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries. Zero disables retries.
    pub max_retries: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub backoff_multiplier: f64,
    /// HTTP status codes to retry on.
    pub retry_on_status_codes: Vec<u16>,
}

/// Retries used when `enable_retries` is given zero.
pub const DEFAULT_MAX_RETRIES: u32 = 4;
/// Backoff cap used when `enable_retries` is given zero.
pub const DEFAULT_MAX_RETRY_INTERVAL: Duration = Duration::from_secs(30);

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(1),
            max_backoff: DEFAULT_MAX_RETRY_INTERVAL,
            backoff_multiplier: 2.0,
            retry_on_status_codes: (429..600).filter(|s| is_retryable_status(*s)).collect(),
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Retry up to `max_retries` times with backoff capped at `max_interval`.
    /// A zero argument selects the default for that setting.
    pub fn with_limits(max_retries: u32, max_interval: Duration) -> Self {
        let defaults = Self::default();
        Self {
            max_retries: if max_retries == 0 {
                defaults.max_retries
            } else {
                max_retries
            },
            max_backoff: if max_interval.is_zero() {
                defaults.max_backoff
            } else {
                max_interval
            },
            ..defaults
        }
    }

    /// Whether retries are enabled.
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// Calculate backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_ms = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let backoff = Duration::from_millis(backoff_ms.min(u64::MAX as f64) as u64);
        std::cmp::min(backoff, self.max_backoff)
    }

    /// Check if a status code should trigger a retry.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status_codes.contains(&status)
    }

    /// Delay requested by a `Retry-After` header, capped at the max backoff.
    ///
    /// Accepts delta-seconds and HTTP dates.
    pub fn retry_after(&self, headers: &HeaderMap) -> Option<Duration> {
        let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

        let delay = match value.parse::<u64>() {
            Ok(seconds) => Duration::from_secs(seconds),
            Err(_) => {
                let at = chrono::DateTime::parse_from_rfc2822(value).ok()?;
                (at.with_timezone(&chrono::Utc) - chrono::Utc::now())
                    .to_std()
                    .unwrap_or_default()
            }
        };
        Some(std::cmp::min(delay, self.max_backoff))
    }
}
