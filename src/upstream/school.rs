//! Dashboard, courses, students, grades, assignments and documents.

use super::{
    GatewayClient, GatewayError,
    types::{
        AssignmentCreated, AssignmentList, AttachmentList, Course, CourseList, CourseStudentList,
        CreateAssignmentData, DashboardData, GenerateDocumentData, GeneratedDocument, GradeList,
        GradeSaved, MyStudentRecord, UploadUrl, UploadUrlRequest, UpsertGradeData,
        VerificationResult,
    },
};
use reqwest::Method;
use secrecy::SecretString;
use serde_json::Value;

// Every call here fails with the normalized upstream error or a transport failure.
impl GatewayClient {
    pub async fn dashboard(&self, token: &SecretString) -> Result<DashboardData, GatewayError> {
        self.call(Method::GET, &["dashboard"], Some(token)).await
    }

    pub async fn courses_mine(&self, token: &SecretString) -> Result<CourseList, GatewayError> {
        self.call(Method::GET, &["courses", "mine"], Some(token)).await
    }

    /// `course_id` may be the UUID or the 8 character short id.
    pub async fn course(
        &self,
        course_id: &str,
        token: &SecretString,
    ) -> Result<Course, GatewayError> {
        self.call(Method::GET, &["courses", course_id], Some(token))
            .await
    }

    pub async fn course_students(
        &self,
        course_id: &str,
        token: &SecretString,
    ) -> Result<CourseStudentList, GatewayError> {
        self.call(Method::GET, &["courses", course_id, "students"], Some(token))
            .await
    }

    pub async fn course_assignments(
        &self,
        course_id: &str,
        token: &SecretString,
    ) -> Result<AssignmentList, GatewayError> {
        self.call(Method::GET, &["courses", course_id, "assignments"], Some(token))
            .await
    }

    pub async fn course_grades(
        &self,
        course_id: &str,
        token: &SecretString,
    ) -> Result<GradeList, GatewayError> {
        self.call(Method::GET, &["courses", course_id, "grades"], Some(token))
            .await
    }

    pub async fn upsert_grade(
        &self,
        course_id: &str,
        data: &UpsertGradeData,
        token: &SecretString,
    ) -> Result<GradeSaved, GatewayError> {
        self.send_json(Method::POST, &["courses", course_id, "grades"], data, Some(token))
            .await
    }

    pub async fn student_grades(
        &self,
        student_id: &str,
        token: &SecretString,
    ) -> Result<GradeList, GatewayError> {
        self.call(Method::GET, &["students", student_id, "grades"], Some(token))
            .await
    }

    pub async fn student_me(&self, token: &SecretString) -> Result<MyStudentRecord, GatewayError> {
        self.call(Method::GET, &["students", "me"], Some(token)).await
    }

    pub async fn student_digital_id(
        &self,
        student_id: &str,
        token: &SecretString,
    ) -> Result<Value, GatewayError> {
        self.call(Method::GET, &["students", student_id, "digital-id"], Some(token))
            .await
    }

    pub async fn assignments_list(
        &self,
        token: &SecretString,
    ) -> Result<AssignmentList, GatewayError> {
        self.call(Method::GET, &["assignments"], Some(token)).await
    }

    pub async fn assignment_create(
        &self,
        data: &CreateAssignmentData,
        token: &SecretString,
    ) -> Result<AssignmentCreated, GatewayError> {
        self.send_json(Method::POST, &["assignments"], data, Some(token))
            .await
    }

    pub async fn assignment_upload_url(
        &self,
        assignment_id: &str,
        data: &UploadUrlRequest,
        token: &SecretString,
    ) -> Result<UploadUrl, GatewayError> {
        self.send_json(
            Method::POST,
            &["assignments", assignment_id, "attachments", "upload-url"],
            data,
            Some(token),
        )
        .await
    }

    pub async fn assignment_attachments(
        &self,
        assignment_id: &str,
        token: &SecretString,
    ) -> Result<AttachmentList, GatewayError> {
        self.call(
            Method::GET,
            &["assignments", assignment_id, "attachments"],
            Some(token),
        )
        .await
    }

    pub async fn document_generate(
        &self,
        data: &GenerateDocumentData,
        token: &SecretString,
    ) -> Result<GeneratedDocument, GatewayError> {
        self.send_json(Method::POST, &["documents"], data, Some(token))
            .await
    }

    /// Public verification; no bearer is sent.
    pub async fn document_verify(&self, code: &str) -> Result<VerificationResult, GatewayError> {
        self.call(Method::GET, &["verify", code], None).await
    }
}
