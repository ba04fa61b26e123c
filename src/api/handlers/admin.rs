//! School admin pages: grade locks and official documents.

use super::{PageError, fail, upstream_message};
use crate::{
    api::state::AppState,
    session::SessionToken,
    upstream::types::{DocumentType, GenerateDocumentData, StudentRow},
};
use axum::{
    Form, Json,
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeLocksPage {
    pub students: Vec<StudentRow>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LockForm {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BulkLockForm {
    /// Comma separated student ids.
    #[serde(default)]
    pub student_ids: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DocumentForm {
    #[serde(default)]
    pub student_id: String,
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub document_type: DocumentType,
}

#[utoipa::path(
    get,
    path = "/admin/grade-locks",
    responses(
        (status = 200, description = "Students with their lock state", body = GradeLocksPage),
        (status = 404, description = "Roster unavailable upstream")
    ),
    tag = "admin"
)]
pub async fn grade_locks(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
) -> Result<Json<GradeLocksPage>, PageError> {
    let list = state
        .gateway()
        .admin_students(token.secret())
        .await
        .map_err(|err| PageError::primary("students", &err))?;
    Ok(Json(GradeLocksPage {
        students: list.students.unwrap_or_default(),
    }))
}

#[utoipa::path(
    post,
    path = "/admin/grade-locks/lock",
    request_body(content = LockForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Locked"),
        (status = 400, description = "Student and reason are required"),
        (status = 500, description = "Upstream refused the lock")
    ),
    tag = "admin"
)]
pub async fn lock(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Form(form): Form<LockForm>,
) -> Response {
    if form.student_id.is_empty() || form.reason.is_empty() {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({"error": "Student and reason are required"}),
        );
    }
    match state
        .gateway()
        .admin_lock_grade(&form.student_id, &form.reason, token.secret())
        .await
    {
        Ok(created) => {
            Json(json!({"success": true, "action": "locked", "lock_id": created.lock_id}))
                .into_response()
        }
        Err(err) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": upstream_message(&err, "Failed to lock grades")}),
        ),
    }
}

#[utoipa::path(
    post,
    path = "/admin/grade-locks/unlock",
    request_body(content = LockForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Unlocked"),
        (status = 400, description = "Student is required"),
        (status = 500, description = "Upstream refused the unlock")
    ),
    tag = "admin"
)]
pub async fn unlock(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Form(form): Form<LockForm>,
) -> Response {
    if form.student_id.is_empty() {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({"error": "Student is required"}),
        );
    }
    match state
        .gateway()
        .admin_unlock_grade(&form.student_id, token.secret())
        .await
    {
        Ok(_) => Json(json!({"success": true, "action": "unlocked"})).into_response(),
        Err(err) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": upstream_message(&err, "Failed to unlock grades")}),
        ),
    }
}

#[utoipa::path(
    post,
    path = "/admin/grade-locks/bulk",
    request_body(content = BulkLockForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Number of students locked"),
        (status = 400, description = "Students and reason are required")
    ),
    tag = "admin"
)]
pub async fn bulk_lock(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Form(form): Form<BulkLockForm>,
) -> Response {
    let student_ids = split_ids(&form.student_ids);
    if student_ids.is_empty() || form.reason.is_empty() {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({"error": "Students and reason are required"}),
        );
    }
    match state
        .gateway()
        .admin_bulk_lock(&student_ids, &form.reason, token.secret())
        .await
    {
        Ok(result) => {
            Json(json!({"success": true, "action": "locked", "locked": result.locked}))
                .into_response()
        }
        Err(err) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": upstream_message(&err, "Failed to lock grades")}),
        ),
    }
}

#[utoipa::path(
    post,
    path = "/admin/documents",
    request_body(content = DocumentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Document generated with its verification code"),
        (status = 400, description = "Student is required"),
        (status = 500, description = "Upstream refused the document")
    ),
    tag = "admin"
)]
pub async fn generate_document(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Form(form): Form<DocumentForm>,
) -> Response {
    if form.student_id.is_empty() {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({"error": "Student is required"}),
        );
    }
    let data = GenerateDocumentData {
        student_id: form.student_id,
        document_type: form.document_type,
    };
    match state.gateway().document_generate(&data, token.secret()).await {
        Ok(document) => Json(document).into_response(),
        Err(err) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": upstream_message(&err, "Failed to generate document")}),
        ),
    }
}

fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
