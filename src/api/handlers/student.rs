use super::degrade;
use crate::{api::state::AppState, session::SessionToken, upstream::types::Grade};
use axum::{
    Json,
    extract::{Extension, State},
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct IdCardPage {
    #[schema(value_type = Option<Object>)]
    pub digital_id: Option<Value>,
    pub error: Option<String>,
}

impl IdCardPage {
    fn missing(error: &str) -> Self {
        Self {
            digital_id: None,
            error: Some(error.to_string()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/student/id-card",
    responses((status = 200, description = "Digital ID card, or a message explaining why it is missing", body = IdCardPage)),
    tag = "student"
)]
/// The digital ID is keyed by the student record id, so the two calls are sequential.
pub async fn id_card(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
) -> Json<IdCardPage> {
    let gateway = state.gateway();
    let student = match gateway.student_me(token.secret()).await {
        Ok(student) => student,
        Err(err) => {
            warn!(code = err.code(), "Student record unavailable");
            let message = if err.is_network() {
                "Failed to load digital ID"
            } else {
                "Could not load student data"
            };
            return Json(IdCardPage::missing(message));
        }
    };

    match gateway.student_digital_id(&student.id, token.secret()).await {
        Ok(digital_id) => Json(IdCardPage {
            digital_id: Some(digital_id),
            error: None,
        }),
        Err(err) if err.is_network() => Json(IdCardPage::missing("Failed to load digital ID")),
        Err(err) => {
            warn!(code = err.code(), "Digital ID unavailable");
            Json(IdCardPage::missing(
                "No digital ID found. Contact your school administrator.",
            ))
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentGradesPage {
    pub student_id: Option<String>,
    pub grades: Vec<Grade>,
}

#[utoipa::path(
    get,
    path = "/student/grades",
    responses((status = 200, description = "The caller's own grades; empty when unavailable", body = StudentGradesPage)),
    tag = "student"
)]
pub async fn grades(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
) -> Json<StudentGradesPage> {
    let gateway = state.gateway();
    let Some(student) = degrade(
        "student record",
        gateway.student_me(token.secret()).await.map(Some),
    ) else {
        return Json(StudentGradesPage {
            student_id: None,
            grades: Vec::new(),
        });
    };

    let list = degrade(
        "student grades",
        gateway.student_grades(&student.id, token.secret()).await,
    );
    Json(StudentGradesPage {
        student_id: Some(student.id),
        grades: list.grades,
    })
}
