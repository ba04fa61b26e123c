use super::{
    guard::AuthenticatedUser,
    handlers::{
        admin, dashboard, health, login, logout, register, student, super_admin, teacher, verify,
    },
};
use crate::upstream::types::{
    Assignment, Course, CourseStudent, DashboardData, Grade, StudentRow, UploadUrlRequest,
    VerificationResult,
};
use utoipa::OpenApi;

/// Document of every page route. Title, version, contact and license come from Cargo.toml.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        login::login_page,
        login::login,
        login::mfa_page,
        login::verify_mfa,
        logout::logout,
        register::register_page,
        register::register,
        verify::verify_document,
        dashboard::root,
        dashboard::admin,
        dashboard::teacher,
        dashboard::student,
        dashboard::parent,
        teacher::assignments,
        teacher::new_assignment_page,
        teacher::create_assignment,
        teacher::assignment_detail,
        teacher::upload_url,
        teacher::grades,
        teacher::gradebook,
        teacher::save_grade,
        student::id_card,
        student::grades,
        admin::grade_locks,
        admin::lock,
        admin::unlock,
        admin::bulk_lock,
        admin::generate_document,
        super_admin::overview,
        super_admin::schools,
        super_admin::create_school,
        super_admin::school_detail,
        super_admin::update_school,
        super_admin::create_school_user,
        super_admin::deactivate_school,
        super_admin::audit_logs,
    ),
    components(schemas(
        AuthenticatedUser,
        Assignment,
        Course,
        CourseStudent,
        DashboardData,
        Grade,
        StudentRow,
        UploadUrlRequest,
        VerificationResult,
        health::Health,
    )),
    tags(
        (name = "health", description = "Liveness and build information"),
        (name = "auth", description = "Login, MFA, logout and registration"),
        (name = "documents", description = "Public document verification"),
        (name = "dashboard", description = "Role landing pages"),
        (name = "teacher", description = "Assignments and gradebook"),
        (name = "student", description = "Student self-service"),
        (name = "admin", description = "Grade locks and documents"),
        (name = "super-admin", description = "Platform administration"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
