//! Login and MFA verification.

use super::{fail, redirect_with_cookie, upstream_message};
use crate::{
    api::{
        guard::{LOGIN_PATH, MFA_PATH, landing_path},
        state::AppState,
    },
    session::{SessionContext, SessionToken},
};
use axum::{
    Form, Json,
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

const DEFAULT_LOGIN_ERROR: &str = "Invalid email or password";
const DEFAULT_MFA_ERROR: &str = "Invalid verification code";

// No Debug: the password must never reach a log line.
#[derive(Default, Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[schema(format = Password)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MfaForm {
    #[serde(default)]
    pub code: String,
}

/// Plaintext sealed by the credential cipher.
#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login page data"),
        (status = 303, description = "Already signed in, sent to the role landing page")
    ),
    tag = "auth"
)]
pub async fn login_page(Extension(context): Extension<SessionContext>) -> Response {
    match context.identity() {
        Some(identity) if identity.mfa_done => {
            Redirect::to(landing_path(&identity.role)).into_response()
        }
        _ => Json(json!({})).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed in; session cookie relayed"),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Upstream rejected the credentials")
    ),
    tag = "auth"
)]
pub async fn login(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    let LoginForm { email, password } = form;
    if email.is_empty() || password.is_empty() {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({"error": "Email and password are required", "email": email}),
        );
    }

    let sealed = serde_json::to_string(&Credentials {
        email: &email,
        password: &password,
    })
    .map_err(|err| err.to_string())
    .and_then(|plaintext| state.cipher().encrypt(&plaintext).map_err(|err| err.to_string()));
    let sealed = match sealed {
        Ok(sealed) => sealed,
        Err(err) => {
            error!("Failed to seal login credentials: {err}");
            return fail(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Login is temporarily unavailable", "email": email}),
            );
        }
    };

    match state.gateway().auth_login(&sealed).await {
        Ok(result) => {
            let target = if result.data.mfa_required {
                MFA_PATH
            } else {
                landing_path(
                    result
                        .data
                        .user
                        .as_ref()
                        .map_or("student", |user| user.role.as_str()),
                )
            };
            info!(mfa_required = result.data.mfa_required, "Login accepted upstream");
            redirect_with_cookie(target, result.set_cookie.as_deref())
        }
        Err(err) => fail(
            StatusCode::UNAUTHORIZED,
            json!({"error": upstream_message(&err, DEFAULT_LOGIN_ERROR), "email": email}),
        ),
    }
}

#[utoipa::path(
    get,
    path = "/login/mfa",
    responses(
        (status = 200, description = "MFA page data"),
        (status = 303, description = "No pending session, or MFA already done")
    ),
    tag = "auth"
)]
pub async fn mfa_page(Extension(context): Extension<SessionContext>) -> Response {
    match context.identity() {
        None => Redirect::to(LOGIN_PATH).into_response(),
        Some(identity) if identity.mfa_done => {
            Redirect::to(landing_path(&identity.role)).into_response()
        }
        Some(identity) => Json(json!({"email": identity.email})).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/login/mfa",
    request_body(content = MfaForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "MFA verified; upgraded session cookie relayed"),
        (status = 400, description = "Missing code"),
        (status = 401, description = "Upstream rejected the code")
    ),
    tag = "auth"
)]
pub async fn verify_mfa(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    token: Option<Extension<SessionToken>>,
    Form(form): Form<MfaForm>,
) -> Response {
    let (Some(Extension(token)), Some(identity)) = (token, context.identity()) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };
    let code = form.code.trim();
    if code.is_empty() {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({"error": "Verification code is required"}),
        );
    }

    match state.gateway().auth_verify_mfa(code, token.secret()).await {
        Ok(result) => redirect_with_cookie(
            landing_path(&identity.role),
            result.set_cookie.as_deref(),
        ),
        Err(err) => fail(
            StatusCode::UNAUTHORIZED,
            json!({"error": upstream_message(&err, DEFAULT_MFA_ERROR)}),
        ),
    }
}
