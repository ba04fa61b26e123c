//! Role landing pages backed by the upstream dashboard summary.

use super::{PageError, degrade};
use crate::{
    api::{
        guard::{AuthenticatedUser, GuardOutcome, authorize, landing_path},
        state::AppState,
    },
    session::{SessionContext, SessionToken},
    upstream::types::DashboardData,
};
use axum::{
    Json,
    extract::{Extension, State},
    response::Redirect,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardPage {
    pub user: AuthenticatedUser,
    pub dashboard: DashboardData,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 303, description = "Sent to the role landing page, the MFA step or the login page")
    ),
    tag = "dashboard"
)]
pub async fn root(Extension(context): Extension<SessionContext>) -> Redirect {
    match authorize(&context) {
        GuardOutcome::Allow(user) => Redirect::to(landing_path(&user.role)),
        GuardOutcome::RedirectTo(path) => Redirect::to(path),
    }
}

#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "School admin dashboard", body = DashboardPage),
        (status = 303, description = "Not signed in or MFA pending"),
        (status = 404, description = "Dashboard unavailable upstream")
    ),
    tag = "dashboard"
)]
pub async fn admin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
) -> Result<Json<DashboardPage>, PageError> {
    role_dashboard(&state, user, &token).await
}

#[utoipa::path(
    get,
    path = "/teacher",
    responses(
        (status = 200, description = "Teacher dashboard", body = DashboardPage),
        (status = 303, description = "Not signed in or MFA pending")
    ),
    tag = "dashboard"
)]
pub async fn teacher(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
) -> Result<Json<DashboardPage>, PageError> {
    role_dashboard(&state, user, &token).await
}

#[utoipa::path(
    get,
    path = "/student",
    responses(
        (status = 200, description = "Student dashboard", body = DashboardPage),
        (status = 303, description = "Not signed in")
    ),
    tag = "dashboard"
)]
pub async fn student(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
) -> Result<Json<DashboardPage>, PageError> {
    role_dashboard(&state, user, &token).await
}

#[utoipa::path(
    get,
    path = "/parent",
    responses(
        (status = 200, description = "Parent dashboard; empty child list when upstream fails", body = DashboardPage),
        (status = 303, description = "Not signed in")
    ),
    tag = "dashboard"
)]
pub async fn parent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
) -> Json<DashboardPage> {
    let dashboard = degrade(
        "parent dashboard",
        state
            .gateway()
            .dashboard(token.secret())
            .await
            .map(Some),
    )
    .unwrap_or_else(|| DashboardData {
        role: "parent".to_string(),
        children: Some(Vec::new()),
        ..DashboardData::default()
    });
    Json(DashboardPage { user, dashboard })
}

async fn role_dashboard(
    state: &AppState,
    user: AuthenticatedUser,
    token: &SessionToken,
) -> Result<Json<DashboardPage>, PageError> {
    let dashboard = state
        .gateway()
        .dashboard(token.secret())
        .await
        .map_err(|err| PageError::primary("dashboard", &err))?;
    Ok(Json(DashboardPage { user, dashboard }))
}
