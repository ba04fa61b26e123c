//! Platform-wide administration, only honoured upstream for `super_admin`.

use super::{
    GatewayClient, GatewayError,
    types::{
        AuditLogList, SchoolCreated, SchoolData, SchoolDeactivated, SchoolList, SchoolUserData,
        SchoolUserList,
    },
};
use reqwest::Method;
use secrecy::SecretString;
use serde_json::Value;

/// Optional filters for the audit log listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogFilter {
    pub school_id: Option<String>,
    pub action: Option<String>,
}

// Every call here fails with the normalized upstream error or a transport failure.
impl GatewayClient {
    pub async fn platform_schools(&self, token: &SecretString) -> Result<SchoolList, GatewayError> {
        self.call(Method::GET, &["platform", "schools"], Some(token))
            .await
    }

    pub async fn platform_school(
        &self,
        school_id: &str,
        token: &SecretString,
    ) -> Result<Value, GatewayError> {
        self.call(Method::GET, &["platform", "schools", school_id], Some(token))
            .await
    }

    pub async fn platform_school_users(
        &self,
        school_id: &str,
        token: &SecretString,
    ) -> Result<SchoolUserList, GatewayError> {
        self.call(
            Method::GET,
            &["platform", "schools", school_id, "users"],
            Some(token),
        )
        .await
    }

    pub async fn platform_create_school(
        &self,
        data: &SchoolData,
        token: &SecretString,
    ) -> Result<SchoolCreated, GatewayError> {
        self.send_json(Method::POST, &["platform", "schools"], data, Some(token))
            .await
    }

    pub async fn platform_update_school(
        &self,
        school_id: &str,
        data: &SchoolData,
        token: &SecretString,
    ) -> Result<Value, GatewayError> {
        self.send_json(
            Method::PATCH,
            &["platform", "schools", school_id],
            data,
            Some(token),
        )
        .await
    }

    pub async fn platform_create_school_user(
        &self,
        school_id: &str,
        data: &SchoolUserData,
        token: &SecretString,
    ) -> Result<Value, GatewayError> {
        self.send_json(
            Method::POST,
            &["platform", "schools", school_id, "users"],
            data,
            Some(token),
        )
        .await
    }

    /// Deactivates the school and all of its users.
    pub async fn platform_delete_school(
        &self,
        school_id: &str,
        token: &SecretString,
    ) -> Result<SchoolDeactivated, GatewayError> {
        self.call(Method::DELETE, &["platform", "schools", school_id], Some(token))
            .await
    }

    pub async fn platform_audit_logs(
        &self,
        filter: &AuditLogFilter,
        token: &SecretString,
    ) -> Result<AuditLogList, GatewayError> {
        self.get_json_with_query(
            &["platform", "audit-logs"],
            &[
                ("school_id", filter.school_id.as_deref()),
                ("action", filter.action.as_deref()),
            ],
            Some(token),
        )
        .await
    }
}
