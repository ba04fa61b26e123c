//! Outermost middleware: session decoding, security headers, request log.

use crate::{
    api::state::AppState,
    relay::clear_session_cookie,
    session::{Identity, SessionContext, SessionToken, TokenState, inspect, session_cookie},
};
use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, SET_COOKIE, STRICT_TRANSPORT_SECURITY,
            X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use std::{sync::Arc, time::Instant};
use tracing::{debug, info, warn};

const PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");

pub const SECURITY_HEADERS: [(HeaderName, &str); 6] = [
    (X_FRAME_OPTIONS, "DENY"),
    (X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (REFERRER_POLICY, "strict-origin-when-cross-origin"),
    (
        PERMISSIONS_POLICY,
        "camera=(), microphone=(), geolocation=()",
    ),
    (
        STRICT_TRANSPORT_SECURITY,
        "max-age=31536000; includeSubDomains",
    ),
    (
        CONTENT_SECURITY_POLICY,
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; frame-ancestors 'none'",
    ),
];

/// Decode the session cookie into a [`SessionContext`] for the rest of the stack.
///
/// Expired tokens are dropped and the browser is told to delete them. Malformed
/// tokens are dropped silently.
pub async fn intercept(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut expired = false;
    let context = match session_cookie(request.headers()) {
        None => SessionContext::Unauthenticated,
        Some(token) => match inspect(&token, state.now()) {
            TokenState::Live(claims) => {
                request.extensions_mut().insert(SessionToken::new(token));
                SessionContext::Identity(Identity::from(claims))
            }
            TokenState::Expired => {
                expired = true;
                SessionContext::Unauthenticated
            }
            TokenState::Malformed(err) => {
                debug!("Ignoring malformed session token: {err}");
                SessionContext::Unauthenticated
            }
        },
    };
    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    if expired {
        // The deletion goes first so a cookie the handler relayed still wins.
        let relayed: Vec<HeaderValue> = headers.get_all(SET_COOKIE).iter().cloned().collect();
        headers.remove(SET_COOKIE);
        headers.append(SET_COOKIE, clear_session_cookie());
        for cookie in relayed {
            headers.append(SET_COOKIE, cookie);
        }
    }
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis();
    if status >= 500 {
        warn!(method = %method, path = %path, status, latency_ms, "Request failed (5xx)");
    } else {
        info!(method = %method, path = %path, status, latency_ms, "Request completed");
    }

    response
}
