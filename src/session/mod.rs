//! Per-request session state derived from the `session` cookie.
//!
//! Nothing here verifies a signature. The decoded identity drives display and
//! routing decisions only; the upstream re-authorizes every call it receives.

pub mod claims;

pub use self::claims::{TokenClaims, TokenError, TokenState, decode_claims, inspect};

use axum::http::{HeaderMap, header::COOKIE};
use secrecy::SecretString;
use std::time::{SystemTime, UNIX_EPOCH};

pub const SESSION_COOKIE_NAME: &str = "session";

/// Roles that must finish MFA before reaching any dashboard.
pub const MFA_REQUIRED_ROLES: [&str; 3] = ["super_admin", "admin", "teacher"];

/// Identity decoded from a live session token, mirrored field for field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub school_id: String,
    pub role: String,
    pub email: String,
    pub mfa_done: bool,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            id: claims.uid,
            school_id: claims.sid,
            role: claims.role,
            email: claims.email,
            mfa_done: claims.mfa_done,
        }
    }
}

impl Identity {
    #[must_use]
    pub fn requires_mfa(&self) -> bool {
        MFA_REQUIRED_ROLES.contains(&self.role.as_str())
    }
}

/// Request-scoped view of who is calling. Never shared across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionContext {
    #[default]
    Unauthenticated,
    Identity(Identity),
}

impl SessionContext {
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Identity(identity) => Some(identity),
            Self::Unauthenticated => None,
        }
    }

    /// True once the caller holds a token that needs no further MFA step.
    #[must_use]
    pub fn is_fully_authenticated(&self) -> bool {
        self.identity().is_some_and(|identity| identity.mfa_done)
    }
}

/// Raw token of a live session, forwarded upstream as a bearer credential.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self(SecretString::from(token))
    }

    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
            })
    }
}

/// Find the session cookie across every `Cookie` header on the request.
#[must_use]
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == SESSION_COOKIE_NAME).then(|| val.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn identity(role: &str, mfa_done: bool) -> Identity {
        Identity {
            id: "u-1".to_string(),
            school_id: "s-1".to_string(),
            role: role.to_string(),
            email: "user@school.test".to_string(),
            mfa_done,
        }
    }

    #[test]
    fn session_cookie_reads_named_pair() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session=a.b.c; other=1"),
        );
        assert_eq!(session_cookie(&headers), Some("a.b.c".to_string()));
    }

    #[test]
    fn session_cookie_scans_every_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("session=x.y.z"));
        assert_eq!(session_cookie(&headers), Some("x.y.z".to_string()));
    }

    #[test]
    fn session_cookie_absent_or_empty_is_none() {
        assert_eq!(session_cookie(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("session=; theme=dark"));
        assert_eq!(session_cookie(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("sessionid=abc"));
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn mfa_roles_are_fixed() {
        for role in ["super_admin", "admin", "teacher"] {
            assert!(identity(role, false).requires_mfa(), "{role}");
        }
        for role in ["student", "parent", "janitor", ""] {
            assert!(!identity(role, false).requires_mfa(), "{role}");
        }
    }

    #[test]
    fn fully_authenticated_needs_mfa_done() {
        assert!(!SessionContext::Unauthenticated.is_fully_authenticated());
        assert!(!SessionContext::Identity(identity("teacher", false)).is_fully_authenticated());
        assert!(SessionContext::Identity(identity("teacher", true)).is_fully_authenticated());
    }

    #[test]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("a.b.c".to_string());
        assert_eq!(format!("{token:?}"), "SessionToken(***)");
    }
}
