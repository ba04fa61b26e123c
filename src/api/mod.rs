use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;

pub mod guard;
pub mod handlers;
pub mod interceptor;
mod openapi;
pub mod state;

pub use openapi::{ApiDoc, openapi};
pub use state::{AppState, ConfigError, ProcessConfig};

use handlers::{
    admin, dashboard, health, login, logout, register, student, super_admin, teacher, verify,
};

const REQUEST_ID: &str = "x-request-id";

/// Build the page router.
///
/// The interceptor wraps every route; the guard only wraps the dashboard area.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let guarded = Router::new()
        .route("/admin", get(dashboard::admin))
        .route("/teacher", get(dashboard::teacher))
        .route("/student", get(dashboard::student))
        .route("/parent", get(dashboard::parent))
        .route("/teacher/assignments", get(teacher::assignments))
        .route(
            "/teacher/assignments/new",
            get(teacher::new_assignment_page).post(teacher::create_assignment),
        )
        .route(
            "/teacher/assignments/:assignment_id",
            get(teacher::assignment_detail),
        )
        .route(
            "/teacher/assignments/:assignment_id/upload-url",
            post(teacher::upload_url),
        )
        .route("/teacher/grades", get(teacher::grades))
        .route(
            "/teacher/grades/:course_id",
            get(teacher::gradebook).post(teacher::save_grade),
        )
        .route("/student/id-card", get(student::id_card))
        .route("/student/grades", get(student::grades))
        .route("/admin/grade-locks", get(admin::grade_locks))
        .route("/admin/grade-locks/lock", post(admin::lock))
        .route("/admin/grade-locks/unlock", post(admin::unlock))
        .route("/admin/grade-locks/bulk", post(admin::bulk_lock))
        .route("/admin/documents", post(admin::generate_document))
        .route("/super-admin", get(super_admin::overview))
        .route(
            "/super-admin/schools",
            get(super_admin::schools).post(super_admin::create_school),
        )
        .route(
            "/super-admin/schools/:school_id",
            get(super_admin::school_detail),
        )
        .route(
            "/super-admin/schools/:school_id/update",
            post(super_admin::update_school),
        )
        .route(
            "/super-admin/schools/:school_id/users",
            post(super_admin::create_school_user),
        )
        .route(
            "/super-admin/schools/:school_id/deactivate",
            post(super_admin::deactivate_school),
        )
        .route(
            "/super-admin/audit-logs",
            get(super_admin::audit_logs),
        )
        .route_layer(middleware::from_fn(guard::require_session));

    Router::new()
        .route("/", get(dashboard::root))
        .route("/health", get(health::health).head(health::health).options(health::health))
        .route("/login", get(login::login_page).post(login::login))
        .route("/login/mfa", get(login::mfa_page).post(login::verify_mfa))
        .route("/logout", post(logout::logout))
        .route("/register", get(register::register_page).post(register::register))
        .route("/verify/:code", get(verify::verify_document))
        .merge(guarded)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            interceptor::intercept,
        ))
        .with_state(state)
}

/// Start the server
/// # Errors
/// Return error if the configuration is unusable or the port cannot be bound
pub async fn new(port: u16, config: &ProcessConfig) -> Result<()> {
    // Key and upstream problems stop the process before it binds.
    let state = Arc::new(
        AppState::from_config(config).context("Invalid gatehouse configuration")?,
    );

    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static(REQUEST_ID),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                REQUEST_ID,
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!(
        "Listening on [::]:{}, upstream {}",
        port,
        config.upstream_base_url()
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
