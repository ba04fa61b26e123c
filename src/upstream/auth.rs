//! Authentication endpoints.

use super::{
    Empty, GatewayClient, GatewayError, WithSessionCookie,
    types::{EncryptedLogin, LoginResponse, MfaCode, RegisterData, Registered},
};
use reqwest::Method;
use secrecy::SecretString;

impl GatewayClient {
    /// `POST /auth/login` with an already sealed credential payload.
    ///
    /// # Errors
    /// Returns the normalized upstream error or a transport failure.
    pub async fn auth_login(
        &self,
        encrypted: &str,
    ) -> Result<WithSessionCookie<LoginResponse>, GatewayError> {
        self.send_json_with_cookie(&["auth", "login"], &EncryptedLogin { encrypted }, None)
            .await
    }

    /// `POST /auth/mfa/verify`; the answer carries the upgraded session cookie.
    ///
    /// # Errors
    /// Returns the normalized upstream error or a transport failure.
    pub async fn auth_verify_mfa(
        &self,
        code: &str,
        token: &SecretString,
    ) -> Result<WithSessionCookie<Empty>, GatewayError> {
        self.send_json_with_cookie(&["auth", "mfa", "verify"], &MfaCode { code }, Some(token))
            .await
    }

    /// # Errors
    /// Returns the normalized upstream error or a transport failure.
    pub async fn auth_logout(&self, token: &SecretString) -> Result<Empty, GatewayError> {
        self.call(Method::POST, &["auth", "logout"], Some(token)).await
    }

    /// Public endpoint, called without a bearer token.
    ///
    /// # Errors
    /// Returns the normalized upstream error or a transport failure.
    pub async fn auth_register(&self, data: &RegisterData) -> Result<Registered, GatewayError> {
        self.send_json(Method::POST, &["auth", "register"], data, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::tests::{can_bind_localhost, client_for};
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, header_exists, method, path},
    };

    #[tokio::test]
    async fn login_sends_sealed_payload_and_captures_cookie() {
        if !can_bind_localhost() {
            eprintln!("Skipping login test: cannot bind to localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"encrypted": "c2VhbGVk"})))
            .and(header("content-type", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=a.b.c; Max-Age=900; SameSite=Lax")
                    .set_body_json(json!({
                        "user": {"id": "u1", "email": "t@school.test", "role": "teacher",
                                 "first_name": "T", "last_name": "S", "school_id": "s1"},
                        "mfa_required": true,
                    })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = client.auth_login("c2VhbGVk").await.unwrap();
        assert!(result.data.mfa_required);
        assert_eq!(result.data.user.map(|user| user.role).as_deref(), Some("teacher"));
        assert_eq!(
            result.set_cookie.as_deref(),
            Some("session=a.b.c; Max-Age=900; SameSite=Lax")
        );
    }

    #[tokio::test]
    async fn login_failure_is_normalized() {
        if !can_bind_localhost() {
            eprintln!("Skipping login failure test: cannot bind to localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_credentials",
                "message": "Invalid email or password",
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let err = client.auth_login("x").await.unwrap_err();
        let upstream = err.upstream().unwrap();
        assert_eq!(upstream.status_code, 401);
        assert_eq!(upstream.error_code, "invalid_credentials");
        assert_eq!(upstream.message, "Invalid email or password");
    }

    #[tokio::test]
    async fn mfa_verify_forwards_bearer() {
        if !can_bind_localhost() {
            eprintln!("Skipping MFA test: cannot bind to localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/mfa/verify"))
            .and(header("authorization", "Bearer partial.token.sig"))
            .and(body_json(json!({"code": "123456"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=full.token.sig; Max-Age=3600")
                    .set_body_json(json!({"ok": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let token = SecretString::from("partial.token.sig".to_string());
        let result = client.auth_verify_mfa("123456", &token).await.unwrap();
        assert_eq!(
            result.set_cookie.as_deref(),
            Some("session=full.token.sig; Max-Age=3600")
        );
    }

    #[tokio::test]
    async fn logout_accepts_no_content() {
        if !can_bind_localhost() {
            eprintln!("Skipping logout test: cannot bind to localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let token = SecretString::from("a.b.c".to_string());
        assert_eq!(client.auth_logout(&token).await.unwrap(), Empty);
    }

    #[tokio::test]
    async fn register_conflict_keeps_error_code() {
        if !can_bind_localhost() {
            eprintln!("Skipping register test: cannot bind to localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "error": "email_exists",
                "message": "Email taken",
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let data = RegisterData {
            school_id: "a1b2c3d4-e5f6-7890-abcd-ef1234567890".to_string(),
            role: "parent".to_string(),
            email: "p@school.test".to_string(),
            password: "correct horse battery".to_string(),
            first_name: "P".to_string(),
            last_name: "Q".to_string(),
            phone: None,
        };
        let err = client.auth_register(&data).await.unwrap_err();
        assert_eq!(err.code(), "email_exists");
        assert_eq!(err.upstream().map(|e| e.status_code), Some(409));

        let requests = server.received_requests().await.unwrap();
        assert!(requests
            .iter()
            .all(|request| !request.headers.contains_key("authorization")));
    }
}
