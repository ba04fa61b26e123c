//! # Gatehouse (session relay for the school platform)
//!
//! `gatehouse` is the backend-for-frontend that sits between browsers and the
//! upstream school-platform API. Browsers never talk to the upstream directly.
//!
//! ## Session handling
//!
//! The upstream issues a three-segment session token in a `session` cookie.
//! Gatehouse decodes the payload of that token to make display and routing
//! decisions only; it never checks the signature. Every state-changing call is
//! forwarded to the upstream with the token as a bearer credential, and the
//! upstream remains the only authority on identity and authorization.
//!
//! - **Interceptor:** decodes the cookie once per request, drops expired tokens
//!   (and tells the browser to delete them), and stamps security headers.
//! - **Guard:** redirects anonymous callers to `/login` and privileged roles
//!   (`super_admin`, `admin`, `teacher`) that have not finished MFA to `/login/mfa`.
//! - **Relay:** session cookies returned by the upstream on login and MFA
//!   verification are re-issued as `HttpOnly; Secure; SameSite=Strict; Path=/`
//!   regardless of what the upstream asked for.
//!
//! ## Credentials
//!
//! Login credentials are sealed with AES-256-GCM before they leave this process.
//! The key is loaded once at start-up; a missing or malformed key stops the
//! process before it binds a port.

pub mod api;
pub mod cipher;
pub mod cli;
pub mod relay;
pub mod session;
pub mod upstream;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
