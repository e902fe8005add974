//! IAM API-key authenticator with a cached access token.

use super::{set_authorization, Authenticator, AUTH_TYPE_IAM};
use crate::error::{ResultsError, ResultsResult};
use crate::request::ServiceRequest;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// IAM token service used when no URL is configured.
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";

const TOKEN_PATH: &str = "/identity/token";
const GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Refresh tokens this long before they expire.
const REFRESH_WINDOW_SECS: i64 = 60;

/// Exchanges an API key for an access token and sends it as a bearer token.
///
/// The token is cached and shared by every clone; it is refreshed once it is
/// within a minute of expiring.
#[derive(Clone)]
pub struct IamAuthenticator {
    api_key: String,
    url: String,
    http: HttpClient,
    token: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.expires_at
            .checked_sub_signed(ChronoDuration::seconds(REFRESH_WINDOW_SECS))
            .is_some_and(|refresh_at| refresh_at > Utc::now())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expiration: Option<i64>,
    expires_in: Option<i64>,
}

impl IamAuthenticator {
    /// Create an authenticator for `api_key` against the default IAM URL.
    pub fn new(api_key: impl Into<String>) -> ResultsResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ResultsError::Config("apikey is required".to_string()));
        }

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ResultsError::Config(format!("failed to build IAM client: {e}")))?;

        Ok(Self {
            api_key,
            url: DEFAULT_IAM_URL.to_string(),
            http,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Use a different IAM token service.
    pub fn with_url(mut self, url: impl Into<String>) -> ResultsResult<Self> {
        let url = url.into();
        crate::config::parse_service_url(&url)?;
        self.url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Current access token, fetching a new one if needed.
    pub async fn access_token(&self) -> ResultsResult<String> {
        {
            let state = self.token.read().await;
            if let Some(token) = state.as_ref().filter(|token| token.is_fresh()) {
                return Ok(token.access_token.clone());
            }
        }

        let mut state = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = state.as_ref().filter(|token| token.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *state = Some(token);
        Ok(access_token)
    }

    async fn request_token(&self) -> ResultsResult<CachedToken> {
        let url = format!("{}{}", self.url, TOKEN_PATH);
        debug!(url = %url, "Requesting IAM access token");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", GRANT_TYPE),
                ("apikey", self.api_key.as_str()),
                ("response_type", "cloud_iam"),
            ])
            .send()
            .await
            .map_err(|e| ResultsError::Auth(format!("IAM token request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ResultsError::Auth(format!("failed to read IAM response: {e}")))?;

        if status != StatusCode::OK {
            return Err(ResultsError::Auth(format!(
                "IAM token request returned {status}: {body}"
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ResultsError::Auth(format!("failed to parse IAM response: {e}")))?;

        if token.expiration.is_none() && token.expires_in.is_none() {
            return Err(ResultsError::Auth("IAM response has no expiration".to_string()));
        }
        let expires_at = token
            .expiration
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
            .or_else(|| {
                token
                    .expires_in
                    .and_then(ChronoDuration::try_seconds)
                    .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            })
            .ok_or_else(|| ResultsError::Auth("IAM token expiration is out of range".to_string()))?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

impl fmt::Debug for IamAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamAuthenticator")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Authenticator for IamAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_IAM
    }

    async fn authenticate(&self, request: &mut ServiceRequest) -> ResultsResult<()> {
        let token = self.access_token().await?;
        set_authorization(request, &format!("Bearer {token}"))
    }
}
