//! Self-service registration against the public upstream endpoint.

use super::fail;
use crate::{
    api::{guard::landing_path, state::AppState},
    session::SessionContext,
    upstream::{GatewayError, types::RegisterData},
};
use axum::{
    Form, Json,
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 12;
const REGISTERED_PATH: &str = "/login?registered=1";

#[derive(Default, Deserialize, ToSchema)]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[schema(format = Password)]
    pub password: String,
    #[serde(default)]
    #[schema(format = Password)]
    pub confirm_password: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub school_id: String,
    #[serde(default)]
    pub phone: String,
}

impl RegisterForm {
    /// Trim the free-text fields; passwords are kept byte for byte.
    fn normalized(mut self) -> Self {
        for field in [
            &mut self.first_name,
            &mut self.last_name,
            &mut self.email,
            &mut self.school_id,
            &mut self.phone,
        ] {
            *field = field.trim().to_string();
        }
        self
    }

    /// Fields echoed back on failure so the form can be refilled.
    fn echo(&self) -> Value {
        json!({
            "first_name": self.first_name,
            "last_name": self.last_name,
            "email": self.email,
            "role": self.role,
            "school_id": self.school_id,
            "phone": self.phone,
        })
    }

    fn validate(&self) -> Result<(), &'static str> {
        let required = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.role,
            &self.school_id,
        ];
        if required.iter().any(|field| field.is_empty()) {
            return Err("All required fields must be filled in.");
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match.");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 12 characters.");
        }
        if !valid_school_id(&self.school_id) {
            return Err(
                "School ID must be a valid UUID (e.g. a1b2c3d4-e5f6-7890-abcd-ef1234567890).",
            );
        }
        Ok(())
    }
}

/// Hyphenated UUID, any case.
#[must_use]
pub fn valid_school_id(school_id: &str) -> bool {
    school_id.len() == 36 && Uuid::try_parse(school_id).is_ok()
}

/// User-facing text for an upstream registration failure.
#[must_use]
pub fn registration_message(err: &GatewayError) -> String {
    let Some(upstream) = err.upstream() else {
        return "Registration failed. Please try again.".to_string();
    };
    match upstream.error_code.as_str() {
        "email_exists" => "An account with this email already exists at this school.".to_string(),
        "breached_password" => {
            "This password has appeared in a known data breach. Please choose a different one."
                .to_string()
        }
        "weak_password" => "Password must be at least 12 characters.".to_string(),
        "validation_error" => "Please check all fields and try again.".to_string(),
        _ => upstream.message.clone(),
    }
}

fn failure(message: &str, form: &RegisterForm) -> Response {
    let mut body = form.echo();
    if let Some(object) = body.as_object_mut() {
        object.insert("error".to_string(), Value::from(message));
    }
    fail(StatusCode::BAD_REQUEST, body)
}

#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 200, description = "Registration page data"),
        (status = 303, description = "Already signed in")
    ),
    tag = "auth"
)]
pub async fn register_page(Extension(context): Extension<SessionContext>) -> Response {
    match context.identity() {
        Some(identity) if identity.mfa_done => {
            Redirect::to(landing_path(&identity.role)).into_response()
        }
        _ => Json(json!({})).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered, sent to the login page"),
        (status = 400, description = "Validation or upstream failure")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let form = form.normalized();
    if let Err(message) = form.validate() {
        return failure(message, &form);
    }

    let data = RegisterData {
        school_id: form.school_id.clone(),
        role: form.role.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        phone: Some(form.phone.clone()).filter(|phone| !phone.is_empty()),
    };

    match state.gateway().auth_register(&data).await {
        Ok(registered) => {
            info!(user_id = %registered.user_id, "Registration accepted upstream");
            Redirect::to(REGISTERED_PATH).into_response()
        }
        Err(err) => failure(&registration_message(&err), &form),
    }
}
