//! Page handlers. Each returns the JSON page data a UI renders, or a redirect.

pub mod admin;
pub mod dashboard;
pub mod health;
pub mod login;
pub mod logout;
pub mod register;
pub mod student;
pub mod super_admin;
pub mod teacher;
pub mod verify;

// common functions for the handlers
use crate::{relay, upstream::GatewayError};
use axum::{
    Json,
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::{Value, json};
use tracing::warn;

/// Failure of the resource a page cannot render without.
#[derive(Debug)]
pub enum PageError {
    NotFound(&'static str),
    Unavailable,
}

impl PageError {
    /// Log the cause and map it; upstream body text is never forwarded.
    pub fn primary(resource: &'static str, err: &GatewayError) -> Self {
        warn!(resource, code = err.code(), "Primary upstream fetch failed");
        if err.is_network() {
            Self::Unavailable
        } else {
            Self::NotFound(resource)
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": format!("{resource} not found")})),
            )
                .into_response(),
            Self::Unavailable => (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "upstream_unavailable"})),
            )
                .into_response(),
        }
    }
}

/// Fall back to `T::default()` for a non-primary section of a page.
pub fn degrade<T: Default>(section: &'static str, result: Result<T, GatewayError>) -> T {
    result.unwrap_or_else(|err| {
        warn!(section, code = err.code(), "Upstream fetch degraded to default");
        T::default()
    })
}

/// Form failure with a JSON body, the way the UI expects it.
pub fn fail(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// 303 redirect that re-issues the upstream session cookie, if any.
pub fn redirect_with_cookie(target: &str, upstream_cookie: Option<&str>) -> Response {
    let mut response = Redirect::to(target).into_response();
    if let Some(cookie) = relay::relay(upstream_cookie) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}

/// Message for a failed form action: the upstream message, or `fallback`.
pub fn upstream_message(err: &GatewayError, fallback: &str) -> String {
    err.upstream()
        .map_or_else(|| fallback.to_string(), |upstream| upstream.message.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamError;

    fn upstream(status: u16, code: &str) -> GatewayError {
        GatewayError::Upstream(UpstreamError {
            status_code: status,
            error_code: code.to_string(),
            message: "nope".to_string(),
        })
    }

    #[test]
    fn degrade_returns_default_on_error() {
        let value: Vec<u8> = degrade("section", Err(upstream(500, "boom")));
        assert!(value.is_empty());
        assert_eq!(degrade("section", Ok(vec![1u8])), vec![1u8]);
    }

    #[test]
    fn primary_upstream_failure_is_not_found() {
        let response = PageError::primary("course", &upstream(403, "forbidden")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn redirect_relays_cookie_policy() {
        let response = redirect_with_cookie("/admin", Some("session=t; SameSite=None; Max-Age=5"));
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert_eq!(
            cookie,
            "session=t; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=5"
        );
    }

    #[test]
    fn upstream_message_prefers_upstream_text() {
        assert_eq!(upstream_message(&upstream(400, "x"), "fallback"), "nope");
        assert_eq!(
            upstream_message(&GatewayError::Decode("raw".to_string()), "fallback"),
            "fallback"
        );
    }
}
