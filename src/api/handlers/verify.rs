use crate::{api::state::AppState, upstream::types::VerificationResult};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationPage {
    pub verification: VerificationResult,
    pub code: String,
}

#[utoipa::path(
    get,
    path = "/verify/{code}",
    params(("code" = String, Path, description = "Verification code printed on the document")),
    responses(
        (status = 200, description = "Verification outcome; any failure reads as invalid", body = VerificationPage)
    ),
    tag = "documents"
)]
/// Public document check. Only validity, document type and holder name are shown.
pub async fn verify_document(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Json<VerificationPage> {
    let verification = match state.gateway().document_verify(&code).await {
        Ok(result) => result,
        Err(err) => {
            debug!(code = err.code(), "Document verification failed upstream");
            VerificationResult::default()
        }
    };
    Json(VerificationPage { verification, code })
}
