//! Route authorization for the dashboard area.
//!
//! Decisions are based on the unverified session only; the upstream still
//! authorizes every call a handler makes.

use crate::session::{Identity, SessionContext};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

pub const LOGIN_PATH: &str = "/login";
pub const MFA_PATH: &str = "/login/mfa";
pub const NEUTRAL_PATH: &str = "/";

/// Identity a handler may rely on once the guard lets the request through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub role: String,
    pub school_id: String,
}

impl From<&Identity> for AuthenticatedUser {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            role: identity.role.clone(),
            school_id: identity.school_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow(AuthenticatedUser),
    RedirectTo(&'static str),
}

#[must_use]
pub fn authorize(context: &SessionContext) -> GuardOutcome {
    let Some(identity) = context.identity() else {
        return GuardOutcome::RedirectTo(LOGIN_PATH);
    };
    if identity.requires_mfa() && !identity.mfa_done {
        return GuardOutcome::RedirectTo(MFA_PATH);
    }
    GuardOutcome::Allow(AuthenticatedUser::from(identity))
}

/// Per-area role check; a mismatch sends the caller to the neutral landing page.
#[must_use]
pub fn require_role(user: &AuthenticatedUser, role: &str) -> GuardOutcome {
    if user.role == role {
        GuardOutcome::Allow(user.clone())
    } else {
        GuardOutcome::RedirectTo(NEUTRAL_PATH)
    }
}

/// Dashboard a role lands on after login.
#[must_use]
pub fn landing_path(role: &str) -> &'static str {
    match role {
        "super_admin" => "/super-admin",
        "admin" => "/admin",
        "teacher" => "/teacher",
        "parent" => "/parent",
        _ => "/student",
    }
}

/// Middleware for every dashboard route. Redirects short-circuit before the
/// handler runs, so no upstream call is made for them.
pub async fn require_session(mut request: Request, next: Next) -> Response {
    let context = request
        .extensions()
        .get::<SessionContext>()
        .cloned()
        .unwrap_or_default();

    match authorize(&context) {
        GuardOutcome::Allow(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        GuardOutcome::RedirectTo(path) => Redirect::to(path).into_response(),
    }
}
