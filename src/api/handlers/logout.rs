use crate::{
    api::{guard::LOGIN_PATH, state::AppState},
    relay::clear_session_cookie,
    session::SessionToken,
};
use axum::{
    extract::{Extension, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 303, description = "Session cookie deleted, sent to the login page")
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    token: Option<Extension<SessionToken>>,
) -> Response {
    if let Some(Extension(token)) = token {
        // Best effort: the cookie is deleted whatever the upstream says.
        if let Err(err) = state.gateway().auth_logout(token.secret()).await {
            debug!(code = err.code(), "Upstream logout failed");
        }
    }

    let mut response = Redirect::to(LOGIN_PATH).into_response();
    response.headers_mut().append(SET_COOKIE, clear_session_cookie());
    response
}
