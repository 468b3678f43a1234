//! HTTP transport abstraction.
//!
//! The submission service talks to SharePoint only through [`HttpTransport`],
//! which lets tests substitute a recording fake. [`ReqwestTransport`] is the
//! production implementation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::HttpConfig;
use crate::error::{Error, Result};

/// Header carrying the SharePoint form digest for write requests.
const REQUEST_DIGEST_HEADER: &str = "x-requestdigest";

/// Client configuration version, selecting the default request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientConfiguration {
    /// The v1 configuration: JSON with minimal OData metadata.
    #[default]
    V1,
}

impl ClientConfiguration {
    /// Headers sent unless the request options override them.
    #[must_use]
    pub fn default_headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::V1 => &[
                ("Accept", "application/json;odata.metadata=minimal"),
                (
                    "Content-Type",
                    "application/json;odata.metadata=minimal;charset=utf-8",
                ),
                ("OData-Version", "4.0"),
            ],
        }
    }
}

/// Per-request headers and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpClientOptions {
    /// Request headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Option<String>,
}

impl HttpClientOptions {
    /// Look up a header value, ignoring name case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The configuration defaults overlaid with these options' headers.
    ///
    /// An option header replaces any default with the same name, ignoring case.
    #[must_use]
    pub fn merged_headers(&self, configuration: ClientConfiguration) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = configuration
            .default_headers()
            .iter()
            .filter(|(name, _)| self.header(name).is_none())
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        merged.extend(self.headers.iter().cloned());
        merged
    }
}

/// A completed HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase for the status.
    pub status_text: String,
    /// Raw response body.
    pub body: String,
}

impl TransportResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// A request that failed before a response could be read.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{description}")]
pub struct TransportFailure {
    /// HTTP status code, if the failure carried one.
    pub status: Option<u16>,
    /// Reason phrase, if the failure carried one.
    pub status_text: Option<String>,
    /// Transport-level message, such as "timeout".
    pub status_message: Option<String>,
    /// Full description of the failure.
    pub description: String,
}

impl TransportFailure {
    /// A failure described only by a message.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status_message: Some(message.clone()),
            description: message,
            ..Self::default()
        }
    }

    /// A failure with only a description.
    #[must_use]
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        let status_message = if err.is_timeout() {
            "timeout".to_string()
        } else {
            err.to_string()
        };
        Self {
            status: err.status().map(|s| s.as_u16()),
            status_text: err
                .status()
                .and_then(|s| s.canonical_reason())
                .map(ToString::to_string),
            status_message: Some(status_message),
            description: err.to_string(),
        }
    }
}

/// An HTTP client capable of POST requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a POST request.
    ///
    /// Non-success statuses are returned as `Ok` responses; `Err` is reserved
    /// for failures where no response was received.
    async fn post(
        &self,
        url: &str,
        configuration: ClientConfiguration,
        options: HttpClientOptions,
    ) -> std::result::Result<TransportResponse, TransportFailure>;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    access_token: Option<String>,
    request_digest: Option<String>,
}

impl ReqwestTransport {
    /// Build a transport from HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::http_client(e.to_string()))?;

        Ok(Self {
            client,
            access_token: config.access_token.clone(),
            request_digest: config.request_digest.clone(),
        })
    }

    fn header_map(
        &self,
        configuration: ClientConfiguration,
        options: &HttpClientOptions,
    ) -> std::result::Result<HeaderMap, TransportFailure> {
        let mut headers = HeaderMap::new();
        for (name, value) in options.merged_headers(configuration) {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TransportFailure::described(format!("invalid header name '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(&value).map_err(|e| {
                TransportFailure::described(format!("invalid value for header '{name}': {e}"))
            })?;
            headers.insert(name, value);
        }

        if let Some(token) = &self.access_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| TransportFailure::described(format!("invalid access token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        if let Some(digest) = &self.request_digest {
            let value = HeaderValue::from_str(digest)
                .map_err(|e| TransportFailure::described(format!("invalid request digest: {e}")))?;
            headers.insert(REQUEST_DIGEST_HEADER, value);
        }

        Ok(headers)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        configuration: ClientConfiguration,
        options: HttpClientOptions,
    ) -> std::result::Result<TransportResponse, TransportFailure> {
        let headers = self.header_map(configuration, &options)?;

        let mut request = self.client.post(url).headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "received response");

        let body = response.text().await?;
        trace!(bytes = body.len(), "read response body");

        Ok(TransportResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body,
        ))
    }
}
