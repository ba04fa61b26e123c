//! Teacher pages: assignments and the course gradebook.

use super::{PageError, degrade, fail, upstream_message};
use crate::{
    api::state::AppState,
    session::SessionToken,
    upstream::types::{
        Assignment, Attachment, Course, CourseStudent, CreateAssignmentData, Grade,
        UploadUrlRequest, UpsertGradeData,
    },
};
use axum::{
    Form, Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentsPage {
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CoursesPage {
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradebookPage {
    pub course: Course,
    pub students: Vec<CourseStudent>,
    pub assignments: Vec<Assignment>,
    pub grades: Vec<Grade>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NewAssignmentForm {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub max_points: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub is_published: String,
}

impl NewAssignmentForm {
    fn into_request(self) -> Option<CreateAssignmentData> {
        let max_points = self.max_points.trim().parse::<f64>().unwrap_or(0.0);
        if self.course_id.is_empty()
            || self.title.is_empty()
            || !(max_points.is_finite() && max_points > 0.0)
        {
            return None;
        }
        let non_empty = |value: String| Some(value).filter(|v| !v.trim().is_empty());
        let category = non_empty(self.category).unwrap_or_else(|| "other".to_string());
        let weight = self.weight.trim().parse::<f64>().unwrap_or(1.0);

        Some(CreateAssignmentData {
            course_id: self.course_id,
            title: self.title,
            description: non_empty(self.description),
            due_date: non_empty(self.due_date),
            max_points,
            category,
            weight: Some(weight),
            is_published: Some(self.is_published == "on"),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GradeForm {
    #[serde(default)]
    pub assignment_id: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub points_earned: String,
    #[serde(default)]
    pub is_excused: String,
    #[serde(default)]
    pub is_missing: String,
    #[serde(default)]
    pub is_late: String,
}

impl GradeForm {
    fn into_request(self) -> UpsertGradeData {
        let points = self.points_earned.trim();
        UpsertGradeData {
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            points_earned: if points.is_empty() {
                None
            } else {
                points.parse::<f64>().ok()
            },
            comment: None,
            is_excused: self.is_excused == "true",
            is_missing: self.is_missing == "true",
            is_late: self.is_late == "true",
            ai_accepted: None,
        }
    }
}

#[utoipa::path(
    get,
    path = "/teacher/assignments",
    responses((status = 200, description = "Assignments across the teacher's courses", body = AssignmentsPage)),
    tag = "teacher"
)]
pub async fn assignments(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
) -> Json<AssignmentsPage> {
    let list = degrade(
        "assignments",
        state.gateway().assignments_list(token.secret()).await,
    );
    Json(AssignmentsPage {
        assignments: list.assignments,
    })
}

#[utoipa::path(
    get,
    path = "/teacher/assignments/new",
    responses((status = 200, description = "Course selector for a new assignment", body = CoursesPage)),
    tag = "teacher"
)]
pub async fn new_assignment_page(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
) -> Json<CoursesPage> {
    my_courses(&state, &token).await
}

#[utoipa::path(
    post,
    path = "/teacher/assignments/new",
    request_body(content = NewAssignmentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, sent to the assignment page"),
        (status = 400, description = "Missing course, title or max points"),
        (status = 500, description = "Upstream rejected the assignment")
    ),
    tag = "teacher"
)]
pub async fn create_assignment(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Form(form): Form<NewAssignmentForm>,
) -> Response {
    let Some(data) = form.into_request() else {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({"error": "Course, title, and max points are required"}),
        );
    };
    match state.gateway().assignment_create(&data, token.secret()).await {
        Ok(created) => Redirect::to(&format!("/teacher/assignments/{}", created.assignment_id))
            .into_response(),
        Err(err) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": upstream_message(&err, "Failed to create assignment")}),
        ),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttachmentsPage {
    pub assignment_id: String,
    #[schema(value_type = Vec<Object>)]
    pub attachments: Vec<Attachment>,
}

#[utoipa::path(
    get,
    path = "/teacher/assignments/{assignment_id}",
    params(("assignment_id" = String, Path, description = "Assignment id")),
    responses((status = 200, description = "Assignment attachments", body = AttachmentsPage)),
    tag = "teacher"
)]
pub async fn assignment_detail(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path(assignment_id): Path<String>,
) -> Json<AttachmentsPage> {
    let list = degrade(
        "attachments",
        state
            .gateway()
            .assignment_attachments(&assignment_id, token.secret())
            .await,
    );
    Json(AttachmentsPage {
        assignment_id,
        attachments: list.attachments,
    })
}

#[utoipa::path(
    post,
    path = "/teacher/assignments/{assignment_id}/upload-url",
    params(("assignment_id" = String, Path, description = "Assignment id")),
    responses(
        (status = 200, description = "Pre-signed upload URL"),
        (status = 500, description = "Upstream refused the upload")
    ),
    tag = "teacher"
)]
pub async fn upload_url(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path(assignment_id): Path<String>,
    Json(request): Json<UploadUrlRequest>,
) -> Response {
    match state
        .gateway()
        .assignment_upload_url(&assignment_id, &request, token.secret())
        .await
    {
        Ok(upload) => Json(upload).into_response(),
        Err(err) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": upstream_message(&err, "Failed to prepare upload")}),
        ),
    }
}

#[utoipa::path(
    get,
    path = "/teacher/grades",
    responses((status = 200, description = "Courses taught by the caller", body = CoursesPage)),
    tag = "teacher"
)]
pub async fn grades(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
) -> Json<CoursesPage> {
    my_courses(&state, &token).await
}

#[utoipa::path(
    get,
    path = "/teacher/grades/{course_id}",
    params(("course_id" = String, Path, description = "Course UUID or 8 character short id")),
    responses(
        (status = 200, description = "Gradebook for the course", body = GradebookPage),
        (status = 404, description = "Course not found")
    ),
    tag = "teacher"
)]
/// The course is the primary resource; roster, assignments and grades degrade.
pub async fn gradebook(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path(course_id): Path<String>,
) -> Result<Json<GradebookPage>, PageError> {
    let gateway = state.gateway();
    let bearer = token.secret();
    let (course, students, assignments, grades) = tokio::join!(
        gateway.course(&course_id, bearer),
        gateway.course_students(&course_id, bearer),
        gateway.course_assignments(&course_id, bearer),
        gateway.course_grades(&course_id, bearer),
    );

    let course = course.map_err(|err| PageError::primary("course", &err))?;
    Ok(Json(GradebookPage {
        course,
        students: degrade("course students", students).students,
        assignments: degrade("course assignments", assignments).assignments,
        grades: degrade("course grades", grades).grades,
    }))
}

#[utoipa::path(
    post,
    path = "/teacher/grades/{course_id}",
    params(("course_id" = String, Path, description = "Course UUID or 8 character short id")),
    request_body(content = GradeForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "Outcome of the save")),
    tag = "teacher"
)]
pub async fn save_grade(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path(course_id): Path<String>,
    Form(form): Form<GradeForm>,
) -> Response {
    let data = form.into_request();
    match state
        .gateway()
        .upsert_grade(&course_id, &data, token.secret())
        .await
    {
        Ok(saved) => Json(json!({"success": true, "grade_id": saved.grade_id})).into_response(),
        Err(err) => {
            warn!(code = err.code(), "Failed to save grade");
            Json(json!({"success": false, "error": "Failed to save grade"})).into_response()
        }
    }
}

async fn my_courses(state: &AppState, token: &SessionToken) -> Json<CoursesPage> {
    let list = degrade("courses", state.gateway().courses_mine(token.secret()).await);
    Json(CoursesPage {
        courses: list.courses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_assignment_requires_course_title_and_points() {
        let form = NewAssignmentForm {
            course_id: "c-1".to_string(),
            title: "Essay".to_string(),
            max_points: "0".to_string(),
            ..NewAssignmentForm::default()
        };
        assert!(form.into_request().is_none());

        let form = NewAssignmentForm {
            course_id: "c-1".to_string(),
            title: "Essay".to_string(),
            max_points: "NaN".to_string(),
            ..NewAssignmentForm::default()
        };
        assert!(form.into_request().is_none());
    }

    #[test]
    fn new_assignment_defaults() {
        let form = NewAssignmentForm {
            course_id: "c-1".to_string(),
            title: "Essay".to_string(),
            max_points: "20".to_string(),
            is_published: "on".to_string(),
            ..NewAssignmentForm::default()
        };
        let data = form.into_request().unwrap();
        assert_eq!(data.category, "other");
        assert_eq!(data.weight, Some(1.0));
        assert_eq!(data.is_published, Some(true));
        assert_eq!(data.description, None);
    }

    #[test]
    fn grade_form_parses_points_and_flags() {
        let form = GradeForm {
            assignment_id: "a-1".to_string(),
            student_id: "s-1".to_string(),
            points_earned: String::new(),
            is_excused: "true".to_string(),
            is_missing: "false".to_string(),
            is_late: String::new(),
        };
        let data = form.into_request();
        assert_eq!(data.points_earned, None);
        assert!(data.is_excused);
        assert!(!data.is_missing);
        assert!(!data.is_late);

        let form = GradeForm {
            points_earned: "8.5".to_string(),
            ..GradeForm::default()
        };
        assert_eq!(form.into_request().points_earned, Some(8.5));
    }
}
