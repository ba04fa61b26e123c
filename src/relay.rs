//! Re-issue upstream session cookies under a fixed attribute policy.
//!
//! Whatever `Domain`, `SameSite` or `Expires` the upstream asked for is dropped;
//! only the name, the value and an optional `Max-Age` survive.

use crate::session::SESSION_COOKIE_NAME;
use axum::http::header::{HeaderValue, InvalidHeaderValue};
use regex::Regex;
use std::sync::LazyLock;

const COOKIE_POLICY: &str = "Path=/; HttpOnly; Secure; SameSite=Strict";

// A comma only starts a new cookie when a `name=` follows it. Cookie values
// cannot hold a comma, so `a,b=c` is read as two cookies.
const NEXT_COOKIE_PATTERN: &str = r",\s*[^\s;,=]+=";

// Constant pattern, compiled once; `next_cookie_pattern_compiles` pins it.
static NEXT_COOKIE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(NEXT_COOKIE_PATTERN).ok());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayCookie {
    pub name: String,
    pub value: String,
    pub max_age_seconds: Option<i64>,
}

impl RelayCookie {
    /// Parse the first cookie of a raw `Set-Cookie` value.
    ///
    /// Returns `None` when there is no `name=value` pair to relay.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let first = first_cookie(raw);
        let mut directives = first.split(';');

        let (name, value) = directives.next()?.trim().split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let max_age_seconds = directives.find_map(|directive| {
            let (key, val) = directive.trim().split_once('=')?;
            if key.trim().eq_ignore_ascii_case("max-age") {
                val.trim().parse::<i64>().ok()
            } else {
                None
            }
        });

        Some(Self {
            name: name.to_string(),
            value: value.trim().to_string(),
            max_age_seconds,
        })
    }

    #[must_use]
    pub fn to_header_string(&self) -> String {
        let mut cookie = format!("{}={}; {COOKIE_POLICY}", self.name, self.value);
        if let Some(max_age) = self.max_age_seconds {
            cookie.push_str(&format!("; Max-Age={max_age}"));
        }
        cookie
    }

    /// # Errors
    /// Returns an error if the cookie contains bytes not allowed in a header.
    pub fn to_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.to_header_string())
    }
}

/// Deletion cookie for the session, sent on logout and on expired tokens.
#[must_use]
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("session=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0")
}

fn first_cookie(raw: &str) -> &str {
    match NEXT_COOKIE.as_ref().and_then(|re| re.find(raw)) {
        Some(found) => &raw[..found.start()],
        None => raw,
    }
}

/// Turn an optional upstream `Set-Cookie` value into the header to send back.
///
/// Cookies other than the session are relayed too, under the same policy.
#[must_use]
pub fn relay(raw: Option<&str>) -> Option<HeaderValue> {
    let cookie = RelayCookie::parse(raw?)?;
    if cookie.name != SESSION_COOKIE_NAME {
        tracing::debug!(cookie = %cookie.name, "Relaying non-session cookie from upstream");
    }
    cookie.to_header_value().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_replaces_upstream_attributes() {
        let cookie = RelayCookie::parse("sid=abc123; Max-Age=3600; Path=/; SameSite=Lax").unwrap();
        assert_eq!(
            cookie,
            RelayCookie {
                name: "sid".to_string(),
                value: "abc123".to_string(),
                max_age_seconds: Some(3600),
            }
        );
        assert_eq!(
            cookie.to_header_string(),
            "sid=abc123; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=3600"
        );
    }

    #[test]
    fn max_age_is_optional() {
        let cookie = RelayCookie::parse("session=a.b.c; Domain=api.school.test").unwrap();
        assert_eq!(cookie.max_age_seconds, None);
        assert_eq!(
            cookie.to_header_string(),
            "session=a.b.c; Path=/; HttpOnly; Secure; SameSite=Strict"
        );
    }

    #[test]
    fn attribute_names_are_case_insensitive() {
        let cookie = RelayCookie::parse("session=x; max-age=60; HTTPONLY").unwrap();
        assert_eq!(cookie.max_age_seconds, Some(60));
        let cookie = RelayCookie::parse("session=x; MAX-AGE = 90").unwrap();
        assert_eq!(cookie.max_age_seconds, Some(90));
    }

    #[test]
    fn expires_commas_do_not_split() {
        let raw = "session=tok; Expires=Wed, 21 Oct 2026 07:28:00 GMT; Max-Age=120; Path=/";
        let cookie = RelayCookie::parse(raw).unwrap();
        assert_eq!(cookie.value, "tok");
        assert_eq!(cookie.max_age_seconds, Some(120));
    }

    #[test]
    fn only_first_of_combined_cookies_is_used() {
        let raw = "session=first; Max-Age=10, other=second; Max-Age=20";
        let cookie = RelayCookie::parse(raw).unwrap();
        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "first");
        assert_eq!(cookie.max_age_seconds, Some(10));
    }

    #[test]
    fn next_cookie_pattern_compiles() {
        assert!(Regex::new(NEXT_COOKIE_PATTERN).is_ok());
        assert!(NEXT_COOKIE.is_some());
    }

    #[test]
    fn comma_followed_by_pair_ends_the_cookie() {
        let cookie = RelayCookie::parse("session=a,b=c; Max-Age=5").unwrap();
        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "a");
        assert_eq!(cookie.max_age_seconds, None);

        // A comma without a following `name=` stays in the value.
        let cookie = RelayCookie::parse("session=a,b; Max-Age=5").unwrap();
        assert_eq!(cookie.value, "a,b");
        assert_eq!(cookie.max_age_seconds, Some(5));
    }

    #[test]
    fn value_may_contain_equals() {
        let cookie = RelayCookie::parse("session=abc==; Path=/").unwrap();
        assert_eq!(cookie.value, "abc==");
    }

    #[test]
    fn unparseable_input_yields_none() {
        assert!(RelayCookie::parse("").is_none());
        assert!(RelayCookie::parse("novalue").is_none());
        assert!(RelayCookie::parse("=value").is_none());
        assert!(relay(None).is_none());
    }

    #[test]
    fn bad_max_age_is_dropped() {
        let cookie = RelayCookie::parse("session=x; Max-Age=soon").unwrap();
        assert_eq!(cookie.max_age_seconds, None);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let value = clear_session_cookie();
        assert_eq!(
            value.to_str().unwrap(),
            "session=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0"
        );
    }

    #[test]
    fn relay_builds_header_value() {
        let value = relay(Some("session=a.b.c; Max-Age=900; SameSite=None")).unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "session=a.b.c; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=900"
        );
    }
}
