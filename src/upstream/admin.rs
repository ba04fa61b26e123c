//! School administration: student roster and grade locks.

use super::{
    Empty, GatewayClient, GatewayError,
    types::{BulkLockRequest, BulkLocked, LockCreated, LockRequest, StudentRowList},
};
use reqwest::Method;
use secrecy::SecretString;

impl GatewayClient {
    /// # Errors
    /// Returns the normalized upstream error or a transport failure.
    pub async fn admin_students(&self, token: &SecretString) -> Result<StudentRowList, GatewayError> {
        self.call(Method::GET, &["admin", "students"], Some(token))
            .await
    }

    /// # Errors
    /// Returns the normalized upstream error or a transport failure.
    pub async fn admin_lock_grade(
        &self,
        student_id: &str,
        reason: &str,
        token: &SecretString,
    ) -> Result<LockCreated, GatewayError> {
        self.send_json(
            Method::POST,
            &["admin", "students", student_id, "lock"],
            &LockRequest { reason },
            Some(token),
        )
        .await
    }

    /// # Errors
    /// Returns the normalized upstream error or a transport failure.
    pub async fn admin_unlock_grade(
        &self,
        student_id: &str,
        token: &SecretString,
    ) -> Result<Empty, GatewayError> {
        self.call(
            Method::DELETE,
            &["admin", "students", student_id, "lock"],
            Some(token),
        )
        .await
    }

    /// # Errors
    /// Returns the normalized upstream error or a transport failure.
    pub async fn admin_bulk_lock(
        &self,
        student_ids: &[String],
        reason: &str,
        token: &SecretString,
    ) -> Result<BulkLocked, GatewayError> {
        self.send_json(
            Method::POST,
            &["admin", "grade-locks", "bulk"],
            &BulkLockRequest {
                student_ids,
                reason,
            },
            Some(token),
        )
        .await
    }
}
