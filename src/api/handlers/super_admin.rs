//! Platform administration pages, restricted to `super_admin`.
//!
//! Page loads by other roles are sent to the neutral landing page; form
//! actions by other roles get a 403.

use super::{PageError, degrade, fail, upstream_message};
use crate::{
    api::{
        guard::{AuthenticatedUser, GuardOutcome, require_role},
        state::AppState,
    },
    session::SessionToken,
    upstream::{
        platform::AuditLogFilter,
        types::{DashboardData, SchoolData, SchoolList, SchoolUserData},
    },
};
use axum::{
    Form, Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

const SUPER_ADMIN: &str = "super_admin";

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewPage {
    pub dashboard: DashboardData,
    #[schema(value_type = Vec<Object>)]
    pub schools: Vec<Value>,
    pub total_schools: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolsPage {
    #[schema(value_type = Vec<Object>)]
    pub schools: Vec<Value>,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogPage {
    #[schema(value_type = Vec<Object>)]
    pub audit_logs: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub schools: Vec<Value>,
    pub filters: AuditLogQuery,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditLogQuery {
    pub school_id: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SchoolForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl SchoolForm {
    fn into_data(self) -> SchoolData {
        let trimmed = |value: String| Some(value.trim().to_string()).filter(|v| !v.is_empty());
        SchoolData {
            name: trimmed(self.name),
            address: trimmed(self.address),
        }
    }
}

#[derive(Default, Deserialize, ToSchema)]
pub struct SchoolUserForm {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[schema(format = Password)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Page-load role check.
fn page_access(user: &AuthenticatedUser) -> Result<(), Response> {
    match require_role(user, SUPER_ADMIN) {
        GuardOutcome::Allow(_) => Ok(()),
        GuardOutcome::RedirectTo(path) => Err(Redirect::to(path).into_response()),
    }
}

/// Form-action role check.
fn action_access(user: &AuthenticatedUser) -> Result<(), Response> {
    match require_role(user, SUPER_ADMIN) {
        GuardOutcome::Allow(_) => Ok(()),
        GuardOutcome::RedirectTo(_) => Err(fail(
            StatusCode::FORBIDDEN,
            json!({"error": "Forbidden"}),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/super-admin",
    responses(
        (status = 200, description = "Platform overview", body = OverviewPage),
        (status = 303, description = "Not a super admin")
    ),
    tag = "super-admin"
)]
pub async fn overview(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
) -> Response {
    if let Err(redirect) = page_access(&user) {
        return redirect;
    }
    let gateway = state.gateway();
    let (dashboard, schools) = tokio::join!(
        gateway.dashboard(token.secret()),
        gateway.platform_schools(token.secret()),
    );
    let dashboard = match dashboard {
        Ok(dashboard) => dashboard,
        Err(err) => return PageError::primary("dashboard", &err).into_response(),
    };
    let schools = degrade("schools", schools);
    Json(OverviewPage {
        dashboard,
        schools: schools.schools,
        total_schools: schools.total,
    })
    .into_response()
}

#[utoipa::path(
    get,
    path = "/super-admin/schools",
    responses(
        (status = 200, description = "All schools", body = SchoolsPage),
        (status = 303, description = "Not a super admin")
    ),
    tag = "super-admin"
)]
pub async fn schools(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
) -> Response {
    if let Err(redirect) = page_access(&user) {
        return redirect;
    }
    match state.gateway().platform_schools(token.secret()).await {
        Ok(SchoolList { schools, total }) => Json(SchoolsPage { schools, total }).into_response(),
        Err(err) => PageError::primary("schools", &err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/super-admin/schools",
    request_body(content = SchoolForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "School created"),
        (status = 400, description = "Name is required"),
        (status = 403, description = "Not a super admin")
    ),
    tag = "super-admin"
)]
pub async fn create_school(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
    Form(form): Form<SchoolForm>,
) -> Response {
    if let Err(forbidden) = action_access(&user) {
        return forbidden;
    }
    let data = form.into_data();
    if data.name.is_none() {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({"error": "School name is required"}),
        );
    }
    match state
        .gateway()
        .platform_create_school(&data, token.secret())
        .await
    {
        Ok(created) => {
            Json(json!({"success": true, "school_id": created.school_id})).into_response()
        }
        Err(_) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Failed to create school"}),
        ),
    }
}

#[utoipa::path(
    get,
    path = "/super-admin/schools/{school_id}",
    params(("school_id" = String, Path, description = "School id")),
    responses(
        (status = 200, description = "School detail with its users"),
        (status = 303, description = "Not a super admin"),
        (status = 404, description = "School not found")
    ),
    tag = "super-admin"
)]
pub async fn school_detail(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
    Path(school_id): Path<String>,
) -> Response {
    if let Err(redirect) = page_access(&user) {
        return redirect;
    }
    let gateway = state.gateway();
    let (school, users) = tokio::join!(
        gateway.platform_school(&school_id, token.secret()),
        gateway.platform_school_users(&school_id, token.secret()),
    );
    let mut school = match school {
        Ok(school) => school,
        Err(err) => return PageError::primary("school", &err).into_response(),
    };
    let users = degrade("school users", users).users;
    if let Some(object) = school.as_object_mut() {
        object.insert("users".to_string(), Value::Array(users));
        return Json(school).into_response();
    }
    Json(json!({"school": school, "users": users})).into_response()
}

#[utoipa::path(
    post,
    path = "/super-admin/schools/{school_id}/update",
    params(("school_id" = String, Path, description = "School id")),
    request_body(content = SchoolForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "School updated"),
        (status = 403, description = "Not a super admin")
    ),
    tag = "super-admin"
)]
pub async fn update_school(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
    Path(school_id): Path<String>,
    Form(form): Form<SchoolForm>,
) -> Response {
    if let Err(forbidden) = action_access(&user) {
        return forbidden;
    }
    match state
        .gateway()
        .platform_update_school(&school_id, &form.into_data(), token.secret())
        .await
    {
        Ok(_) => Json(json!({"success": true, "action": "update"})).into_response(),
        Err(_) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Failed to update school"}),
        ),
    }
}

#[utoipa::path(
    post,
    path = "/super-admin/schools/{school_id}/users",
    params(("school_id" = String, Path, description = "School id")),
    request_body(content = SchoolUserForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "User created"),
        (status = 400, description = "Missing fields"),
        (status = 403, description = "Not a super admin"),
        (status = 409, description = "Email already in use")
    ),
    tag = "super-admin"
)]
pub async fn create_school_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
    Path(school_id): Path<String>,
    Form(form): Form<SchoolUserForm>,
) -> Response {
    if let Err(forbidden) = action_access(&user) {
        return forbidden;
    }
    let required = [
        &form.email,
        &form.password,
        &form.first_name,
        &form.last_name,
        &form.role,
    ];
    if required.iter().any(|field| field.is_empty()) {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({"error": "All fields are required"}),
        );
    }
    let data = SchoolUserData {
        role: form.role,
        email: form.email.trim().to_string(),
        password: form.password,
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
    };
    match state
        .gateway()
        .platform_create_school_user(&school_id, &data, token.secret())
        .await
    {
        Ok(_) => Json(json!({"success": true, "action": "createUser"})).into_response(),
        Err(err) => {
            let status = if err.upstream().is_some_and(|e| e.status_code == 409) {
                StatusCode::CONFLICT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            fail(
                status,
                json!({"error": upstream_message(&err, "Failed to create user")}),
            )
        }
    }
}

#[utoipa::path(
    post,
    path = "/super-admin/schools/{school_id}/deactivate",
    params(("school_id" = String, Path, description = "School id")),
    responses(
        (status = 200, description = "School and its users deactivated"),
        (status = 403, description = "Not a super admin")
    ),
    tag = "super-admin"
)]
pub async fn deactivate_school(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
    Path(school_id): Path<String>,
) -> Response {
    if let Err(forbidden) = action_access(&user) {
        return forbidden;
    }
    match state
        .gateway()
        .platform_delete_school(&school_id, token.secret())
        .await
    {
        Ok(result) => Json(json!({
            "success": true,
            "action": "deactivate",
            "users_deactivated": result.users_deactivated,
        }))
        .into_response(),
        Err(_) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Failed to deactivate school"}),
        ),
    }
}

#[utoipa::path(
    get,
    path = "/super-admin/audit-logs",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Audit log with the school list for filtering", body = AuditLogPage),
        (status = 303, description = "Not a super admin")
    ),
    tag = "super-admin"
)]
pub async fn audit_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(token): Extension<SessionToken>,
    Query(filters): Query<AuditLogQuery>,
) -> Response {
    if let Err(redirect) = page_access(&user) {
        return redirect;
    }
    let filter = AuditLogFilter {
        school_id: filters.school_id.clone(),
        action: filters.action.clone(),
    };
    let gateway = state.gateway();
    let (logs, schools) = tokio::join!(
        gateway.platform_audit_logs(&filter, token.secret()),
        gateway.platform_schools(token.secret()),
    );
    let logs = match logs {
        Ok(logs) => logs,
        Err(err) => return PageError::primary("audit logs", &err).into_response(),
    };
    Json(AuditLogPage {
        audit_logs: logs.audit_logs,
        schools: degrade("schools", schools).schools,
        filters,
    })
    .into_response()
}
