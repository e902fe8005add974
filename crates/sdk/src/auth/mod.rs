//! Authenticators that sign outgoing requests.

mod iam;

pub use iam::{IamAuthenticator, DEFAULT_IAM_URL};

use crate::config::external::ServiceProperties;
use crate::error::{ResultsError, ResultsResult};
use crate::request::ServiceRequest;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::fmt;
use std::sync::Arc;

/// `noauth` authentication type.
pub const AUTH_TYPE_NOAUTH: &str = "noauth";
/// `bearertoken` authentication type.
pub const AUTH_TYPE_BEARER_TOKEN: &str = "bearertoken";
/// `basic` authentication type.
pub const AUTH_TYPE_BASIC: &str = "basic";
/// `iam` authentication type.
pub const AUTH_TYPE_IAM: &str = "iam";

/// Adds credentials to a request before it is sent.
///
/// Shared by every clone of a client, so implementations must be internally
/// thread-safe (token caches included).
#[async_trait]
pub trait Authenticator: Send + Sync + fmt::Debug {
    /// Authentication type name, as used in external configuration.
    fn authentication_type(&self) -> &'static str;

    /// Check the authenticator's own configuration.
    fn validate(&self) -> ResultsResult<()> {
        Ok(())
    }

    /// Sign the request.
    async fn authenticate(&self, request: &mut ServiceRequest) -> ResultsResult<()>;
}

/// Sends requests without credentials.
#[derive(Debug, Clone, Default)]
pub struct NoAuthAuthenticator;

#[async_trait]
impl Authenticator for NoAuthAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_NOAUTH
    }

    async fn authenticate(&self, _request: &mut ServiceRequest) -> ResultsResult<()> {
        Ok(())
    }
}

/// Sends a caller-managed bearer token.
#[derive(Clone)]
pub struct BearerTokenAuthenticator {
    token: String,
}

impl BearerTokenAuthenticator {
    pub fn new(token: impl Into<String>) -> ResultsResult<Self> {
        let authenticator = Self {
            token: token.into(),
        };
        authenticator.validate()?;
        Ok(authenticator)
    }
}

impl fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenAuthenticator")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_BEARER_TOKEN
    }

    fn validate(&self) -> ResultsResult<()> {
        if self.token.trim().is_empty() {
            return Err(ResultsError::Config("bearer token is required".to_string()));
        }
        Ok(())
    }

    async fn authenticate(&self, request: &mut ServiceRequest) -> ResultsResult<()> {
        set_authorization(request, &format!("Bearer {}", self.token))
    }
}

/// Sends HTTP basic credentials.
#[derive(Clone)]
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> ResultsResult<Self> {
        let authenticator = Self {
            username: username.into(),
            password: password.into(),
        };
        authenticator.validate()?;
        Ok(authenticator)
    }
}

impl fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_BASIC
    }

    fn validate(&self) -> ResultsResult<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ResultsError::Config(
                "username and password are required".to_string(),
            ));
        }
        Ok(())
    }

    async fn authenticate(&self, request: &mut ServiceRequest) -> ResultsResult<()> {
        let credentials =
            general_purpose::STANDARD.encode(format!("{}:{}", self.username, self.password));
        set_authorization(request, &format!("Basic {credentials}"))
    }
}

pub(crate) fn set_authorization(request: &mut ServiceRequest, value: &str) -> ResultsResult<()> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| ResultsError::Auth("credentials contain invalid header characters".to_string()))?;
    value.set_sensitive(true);
    request.headers.insert(AUTHORIZATION, value);
    Ok(())
}

/// Build the authenticator described by external configuration.
pub fn authenticator_from_properties(
    properties: &ServiceProperties,
) -> ResultsResult<Arc<dyn Authenticator>> {
    let auth_type = properties.auth_type().ok_or_else(|| {
        ResultsError::Config(format!(
            "authentication type is not configured for service {}",
            properties.service_name()
        ))
    })?;

    let required = |key: &str| {
        properties.get(key).map(str::to_string).ok_or_else(|| {
            ResultsError::Config(format!(
                "{key} is required for {auth_type} authentication of service {}",
                properties.service_name()
            ))
        })
    };

    let authenticator: Arc<dyn Authenticator> = match auth_type.to_ascii_lowercase().as_str() {
        AUTH_TYPE_NOAUTH => Arc::new(NoAuthAuthenticator),
        AUTH_TYPE_BEARER_TOKEN => Arc::new(BearerTokenAuthenticator::new(required("bearer_token")?)?),
        AUTH_TYPE_BASIC => Arc::new(BasicAuthenticator::new(
            required("username")?,
            required("password")?,
        )?),
        AUTH_TYPE_IAM => {
            let mut iam = IamAuthenticator::new(required("apikey")?)?;
            if let Some(url) = properties.get("auth_url") {
                iam = iam.with_url(url)?;
            }
            Arc::new(iam)
        }
        other => {
            return Err(ResultsError::Config(format!(
                "unsupported authentication type: {other}"
            )))
        }
    };

    Ok(authenticator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestBuilder;
    use reqwest::Method;
    use std::collections::HashMap;

    fn request() -> ServiceRequest {
        RequestBuilder::new(Method::GET, "https://example.com/v3")
            .build()
            .unwrap()
    }

    fn properties(pairs: &[(&str, &str)]) -> ServiceProperties {
        ServiceProperties::new(
            "compliance_results",
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[tokio::test]
    async fn test_bearer_token() {
        let mut request = request();
        BearerTokenAuthenticator::new("tok")
            .unwrap()
            .authenticate(&mut request)
            .await
            .unwrap();
        assert_eq!(request.headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
    }

    #[tokio::test]
    async fn test_basic() {
        let mut request = request();
        BasicAuthenticator::new("user", "pass")
            .unwrap()
            .authenticate(&mut request)
            .await
            .unwrap();
        assert_eq!(
            request.headers.get(AUTHORIZATION).unwrap(),
            "Basic dXNlcjpwYXNz"
        );
    }

    #[test]
    fn test_invalid_credentials_rejected() {
        assert!(BearerTokenAuthenticator::new("  ").is_err());
        assert!(BasicAuthenticator::new("user", "").is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", BasicAuthenticator::new("user", "hunter2").unwrap());
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_from_properties() {
        let auth = authenticator_from_properties(&properties(&[("auth_type", "NOAUTH")])).unwrap();
        assert_eq!(auth.authentication_type(), AUTH_TYPE_NOAUTH);

        let auth = authenticator_from_properties(&properties(&[
            ("auth_type", "bearerToken"),
            ("bearer_token", "tok"),
        ]))
        .unwrap();
        assert_eq!(auth.authentication_type(), AUTH_TYPE_BEARER_TOKEN);

        let auth = authenticator_from_properties(&properties(&[
            ("auth_type", "iam"),
            ("apikey", "key"),
            ("auth_url", "https://iam.test.cloud.ibm.com"),
        ]))
        .unwrap();
        assert_eq!(auth.authentication_type(), AUTH_TYPE_IAM);
    }

    #[test]
    fn test_from_properties_errors() {
        let err = authenticator_from_properties(&properties(&[])).unwrap_err();
        assert!(matches!(err, ResultsError::Config(_)));

        let err = authenticator_from_properties(&properties(&[("auth_type", "basic")])).unwrap_err();
        assert!(err.to_string().contains("username is required"));

        let err = authenticator_from_properties(&properties(&[("auth_type", "magic")])).unwrap_err();
        assert!(err.to_string().contains("unsupported authentication type"));
    }
}
