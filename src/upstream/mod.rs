//! Typed client for the upstream school-platform API.
//!
//! Every call goes through one shared `reqwest::Client`. Non-2xx answers are
//! normalized into [`UpstreamError`]; the raw upstream body never travels further
//! than this module.

pub mod admin;
pub mod auth;
pub mod platform;
pub mod school;
pub mod types;

use crate::APP_USER_AGENT;
use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{CONTENT_LENGTH, SET_COOKIE},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{
    Deserialize, Serialize,
    de::{DeserializeOwned, IgnoredAny},
};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

pub const UNKNOWN_ERROR_CODE: &str = "unknown_error";

/// Normalized non-2xx answer from the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("upstream returned {status_code} ({error_code}): {message}")]
pub struct UpstreamError {
    pub status_code: u16,
    pub error_code: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl UpstreamError {
    /// Build from a status and whatever body came back with it.
    #[must_use]
    pub fn from_response_body(status: StatusCode, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let error_code = parsed
            .error
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_string());
        let message = parsed
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown Status").to_string());

        Self {
            status_code: status.as_u16(),
            error_code,
            message,
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("upstream unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("failed to decode upstream response: {0}")]
    Decode(String),
    #[error("invalid upstream URL: {0}")]
    Url(String),
}

impl GatewayError {
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Short code for log lines; never contains upstream body text.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Upstream(err) => &err.error_code,
            Self::Network(_) => "network_error",
            Self::Decode(_) => "decode_error",
            Self::Url(_) => "url_error",
        }
    }

    #[must_use]
    pub fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            Self::Upstream(err) => Some(err),
            _ => None,
        }
    }
}

/// Payload for endpoints whose body is ignored (204, `{}` or `{"ok":true}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Empty;

impl<'de> Deserialize<'de> for Empty {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer).map(|_| Self)
    }
}

/// Result of an auth call whose `Set-Cookie` must reach the browser.
#[derive(Debug, Clone)]
pub struct WithSessionCookie<T> {
    pub data: T,
    pub set_cookie: Option<String>,
}

#[derive(Clone, Debug)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
}

impl GatewayClient {
    /// # Errors
    /// Returns an error if the base URL cannot carry a path or the client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, GatewayError> {
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Url(base_url.to_string()));
        }
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, bearer: Option<&SecretString>) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match bearer {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send and return the response only when it is 2xx.
    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response, GatewayError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // An unreadable error body still yields a normalized error.
        let body = response.bytes().await.unwrap_or_default();
        let err = UpstreamError::from_response_body(status, &body);
        debug!(status = err.status_code, code = %err.error_code, "Upstream rejected request");
        Err(err.into())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let no_content = response.status() == StatusCode::NO_CONTENT
            || response
                .headers()
                .get(CONTENT_LENGTH)
                .is_some_and(|len| len.as_bytes() == b"0");
        let body = response.bytes().await?;
        let body: &[u8] = if no_content || body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &body
        };
        serde_json::from_slice(body).map_err(|err| GatewayError::Decode(err.to_string()))
    }

    #[instrument(skip(self, bearer))]
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        bearer: Option<&SecretString>,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(segments)?;
        let response = self.dispatch(self.request(method, url, bearer)).await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, bearer, body))]
    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        bearer: Option<&SecretString>,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(segments)?;
        let response = self
            .dispatch(self.request(method, url, bearer).json(body))
            .await?;
        Self::decode(response).await
    }

    /// Like [`Self::send_json`] but keeps the upstream `Set-Cookie` header.
    pub(crate) async fn send_json_with_cookie<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
        bearer: Option<&SecretString>,
    ) -> Result<WithSessionCookie<T>, GatewayError> {
        let url = self.endpoint(segments)?;
        let response = self
            .dispatch(self.request(Method::POST, url, bearer).json(body))
            .await?;
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let data = Self::decode(response).await?;
        Ok(WithSessionCookie { data, set_cookie })
    }

    /// GET with a query string; empty filter values are left out.
    pub(crate) async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, Option<&str>)],
        bearer: Option<&SecretString>,
    ) -> Result<T, GatewayError> {
        let mut url = self.endpoint(segments)?;
        let present: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|&(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
            .collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }
        let response = self
            .dispatch(self.request(Method::GET, url, bearer))
            .await?;
        Self::decode(response).await
    }
}
