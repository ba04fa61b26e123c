//! Wire types shared with the upstream API.
//!
//! Shapes whose content is only passed through to the browser stay as
//! `serde_json::Value`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// The upstream writes an empty list as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub school_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub user: Option<User>,
    #[serde(default)]
    pub mfa_required: bool,
    pub user_id: Option<String>,
}

/// Body of the login call; the plaintext never leaves the process unsealed.
#[derive(Debug, Serialize)]
pub struct EncryptedLogin<'a> {
    pub encrypted: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MfaCode<'a> {
    pub code: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterData {
    pub school_id: String,
    pub role: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registered {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DashboardData {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub today_schedule: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ungraded_assignments: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub recent_grade_activity: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub children: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_grade_locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_students: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_teachers: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_students: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: String,
    pub short_id: String,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub academic_year: String,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseStudent {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub student_number: String,
    #[serde(default)]
    pub grade_level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseStudentList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub students: Vec<CourseStudent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Assignment {
    pub id: String,
    pub short_id: String,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub max_points: f64,
    pub category: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAssignmentData {
    pub course_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub max_points: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentCreated {
    pub assignment_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadUrlRequest {
    pub file_name: String,
    pub mime_type: String,
    pub file_size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadUrl {
    pub upload_url: String,
    pub attachment_id: String,
    pub file_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub version: i64,
    pub download_url: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Grade {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    pub points_earned: Option<f64>,
    #[serde(default)]
    pub letter_grade: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_excused: bool,
    #[serde(default)]
    pub is_missing: bool,
    #[serde(default)]
    pub is_late: bool,
    #[serde(default)]
    pub ai_suggested: Option<f64>,
    #[serde(default)]
    pub ai_accepted: Option<bool>,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub grades: Vec<Grade>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpsertGradeData {
    pub assignment_id: String,
    pub student_id: String,
    pub points_earned: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub is_excused: bool,
    pub is_missing: bool,
    pub is_late: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_accepted: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeSaved {
    pub grade_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyStudentRecord {
    pub id: String,
    pub student_number: String,
    pub grade_level: String,
    pub enrollment_status: String,
    pub is_grade_locked: bool,
    pub enrollment_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentRow {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub student_number: String,
    pub grade_level: String,
    pub enrollment_status: String,
    pub is_grade_locked: bool,
    pub lock_reason: Option<String>,
    pub enrollment_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentRowList {
    #[serde(default)]
    pub students: Option<Vec<StudentRow>>,
}

#[derive(Debug, Serialize)]
pub struct LockRequest<'a> {
    pub reason: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BulkLockRequest<'a> {
    pub student_ids: &'a [String],
    pub reason: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LockCreated {
    pub lock_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkLocked {
    pub locked: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    EnrollmentCertificate,
    AttendanceLetter,
    AcademicStanding,
    TuitionConfirmation,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateDocumentData {
    pub student_id: String,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub document_id: String,
    pub verification_code: String,
    pub download_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct VerificationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub schools: Vec<Value>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolUserList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub audit_logs: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchoolData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchoolCreated {
    pub school_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolUserData {
    pub role: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolDeactivated {
    #[serde(default)]
    pub users_deactivated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_lists_read_as_empty() {
        let logs: AuditLogList = serde_json::from_value(json!({"audit_logs": null})).unwrap();
        assert!(logs.audit_logs.is_empty());

        let schools: SchoolList =
            serde_json::from_value(json!({"schools": null, "total": 0})).unwrap();
        assert!(schools.schools.is_empty());

        let courses: CourseList = serde_json::from_value(json!({"courses": null})).unwrap();
        assert!(courses.courses.is_empty());
        let students: CourseStudentList =
            serde_json::from_value(json!({"students": null})).unwrap();
        assert!(students.students.is_empty());
        let assignments: AssignmentList =
            serde_json::from_value(json!({"assignments": null})).unwrap();
        assert!(assignments.assignments.is_empty());
        let grades: GradeList = serde_json::from_value(json!({"grades": null})).unwrap();
        assert!(grades.grades.is_empty());
        let attachments: AttachmentList =
            serde_json::from_value(json!({"attachments": null})).unwrap();
        assert!(attachments.attachments.is_empty());
        let users: SchoolUserList = serde_json::from_value(json!({"users": null})).unwrap();
        assert!(users.users.is_empty());
    }

    #[test]
    fn missing_and_present_lists_still_decode() {
        let logs: AuditLogList = serde_json::from_value(json!({})).unwrap();
        assert!(logs.audit_logs.is_empty());

        let schools: SchoolList =
            serde_json::from_value(json!({"schools": [{"id": "s-1"}], "total": 1})).unwrap();
        assert_eq!(schools.schools, vec![json!({"id": "s-1"})]);
        assert_eq!(schools.total, 1);
    }
}
