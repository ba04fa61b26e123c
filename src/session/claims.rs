//! Unverified decoding of the session token payload.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token must have exactly three segments")]
    Segments,
    #[error("token payload is not base64url")]
    Encoding,
    #[error("token payload is not valid JSON claims: {0}")]
    Claims(String),
}

/// Payload of a session token. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub uid: String,
    pub sid: String,
    pub role: String,
    pub email: String,
    #[serde(default)]
    pub mfa_done: bool,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    Live(TokenClaims),
    Expired,
    Malformed(TokenError),
}

/// Decode the middle segment of `header.payload.signature`.
///
/// # Errors
/// Returns an error when the token is not three segments, the payload is not
/// base64url, or the JSON lacks a required claim.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(TokenError::Segments),
    };

    // Padding is optional on the wire.
    let bytes = Base64UrlUnpadded::decode_vec(payload.trim_end_matches('='))
        .map_err(|_| TokenError::Encoding)?;

    serde_json::from_slice(&bytes).map_err(|err| TokenError::Claims(err.to_string()))
}

/// Classify a token against `now` (seconds since the epoch).
///
/// A token whose `exp` is at or before `now` is expired.
#[must_use]
pub fn inspect(token: &str, now: i64) -> TokenState {
    match decode_claims(token) {
        Ok(claims) if claims.exp <= now => TokenState::Expired,
        Ok(claims) => TokenState::Live(claims),
        Err(err) => TokenState::Malformed(err),
    }
}
