use crate::GIT_COMMIT_HASH;
use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Method},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Build identity of the running relay. The upstream is not contacted.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
}

impl Health {
    fn current() -> Self {
        Self {
            commit: GIT_COMMIT_HASH.to_string(),
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// `name:version:short-commit`, short commit empty when unknown.
    fn app_header(&self) -> HeaderMap {
        let short_hash = if self.commit.len() > 7 {
            self.commit.get(..7).unwrap_or_default()
        } else {
            ""
        };
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&format!("{}:{}:{short_hash}", self.name, self.version)) {
            Ok(value) => {
                headers.insert("X-App", value);
            }
            Err(err) => error!("Failed to build X-App header: {err}"),
        }
        headers
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Relay is up", body = Health)
    ),
    tag = "health"
)]
pub async fn health(method: Method) -> impl IntoResponse {
    let health = Health::current();
    let headers = health.app_header();

    // HEAD and OPTIONS get the header only.
    if method == Method::GET {
        (headers, Json(health)).into_response()
    } else {
        (headers, Body::empty()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::to_bytes, http::Request, routing::get};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_build_info() {
        let app = Router::new().route("/health", get(health).head(health));

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("X-App"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: Health = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.name, env!("CARGO_PKG_NAME"));
        assert_eq!(parsed.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(parsed.commit, GIT_COMMIT_HASH);

        let response = app
            .oneshot(Request::head("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }
}
