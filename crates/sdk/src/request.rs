//! Request construction: path templates, query parameters, headers, body.

use crate::error::{ResultsError, ResultsResult};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use std::sync::LazyLock;
use url::Url;

/// Matches `{name}` placeholders in path and URL templates.
pub(crate) static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>\w+)\}").expect("a valid regex"));

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A fully resolved request, ready to be signed and sent.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// The transport must gzip the body and set `Content-Encoding: gzip`.
    pub compress_body: bool,
}

impl ServiceRequest {
    /// Query parameters in emission order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect()
    }

    /// Value of the `Accept` header.
    pub fn accept(&self) -> Option<&str> {
        self.headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
    }
}

/// Builder for [`ServiceRequest`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    base_url: String,
    path: String,
    path_params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Bytes>,
    gzip: bool,
}

impl RequestBuilder {
    /// Start a request against `base_url`.
    pub fn new(method: Method, base_url: impl Into<String>) -> Self {
        Self {
            method,
            base_url: base_url.into(),
            path: String::new(),
            path_params: Vec::new(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            gzip: false,
        }
    }

    /// Set the path template, e.g. `/reports/{report_id}`.
    pub fn path(mut self, template: impl Into<String>) -> Self {
        self.path = template.into();
        self
    }

    /// Provide a value for a path placeholder.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    /// Append a query parameter. Repeated names are kept.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Append a query parameter when a value is present.
    pub fn query_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Append a header value, keeping earlier values of the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Append every entry of `headers` in iteration order.
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (name, value) in headers {
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    /// Set a raw body with its content type.
    pub fn body(mut self, body: impl Into<Bytes>, content_type: &'static str) -> Self {
        self.body = Some(body.into());
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type),
        );
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json_body<T: Serialize + ?Sized>(self, value: &T) -> ResultsResult<Self> {
        let body = crate::codec::encode_json(value)?;
        Ok(self.body(body, "application/json"))
    }

    /// Ask the transport to gzip the body.
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    /// Resolve the path and query and produce the request.
    pub fn build(self) -> ResultsResult<ServiceRequest> {
        let path = resolve_path(&self.path, &self.path_params)?;
        let mut url = Url::parse(&format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            path
        ))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }

        let compress_body = self.gzip && self.body.is_some();

        Ok(ServiceRequest {
            method: self.method,
            url,
            headers: self.headers,
            body: self.body,
            compress_body,
        })
    }
}

/// Substitute `{name}` placeholders with percent-encoded values.
pub fn resolve_path(template: &str, params: &[(String, String)]) -> ResultsResult<String> {
    let mut resolved = String::with_capacity(template.len());
    let mut last = 0;

    for captures in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.name("name")) else {
            continue;
        };
        let value = params
            .iter()
            .find(|(param, _)| param == name.as_str())
            .map(|(_, value)| value)
            .ok_or_else(|| {
                ResultsError::Config(format!("missing path parameter {}", name.as_str()))
            })?;

        // URL parsing collapses `.` and `..` segments, encoded or not.
        if matches!(value.as_str(), "." | "..") {
            return Err(ResultsError::Validation(format!(
                "{} must not be a dot segment",
                name.as_str()
            )));
        }

        resolved.push_str(&template[last..whole.start()]);
        resolved.extend(utf8_percent_encode(value, PATH_SEGMENT));
        last = whole.end();
    }
    resolved.push_str(&template[last..]);

    Ok(resolved)
}
