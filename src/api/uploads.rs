//! Object storage upload signing boundary.
//!
//! The storefront never proxies file bytes. It asks the external signer for a
//! one-time upload slot and hands the slot back; the browser then PUTs the
//! bytes directly to `uploadUrl` and serves the image from `publicUrl`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::AppState;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUploadRequest {
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
    #[validate(length(min = 1, max = 100))]
    pub file_type: String,
    #[validate(length(min = 1, max = 100))]
    pub folder: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUpload {
    pub upload_url: String,
    pub public_url: String,
    pub object_key: String,
}

pub async fn sign_upload(
    State(s): State<AppState>,
    Json(r): Json<SignUploadRequest>,
) -> Result<Json<SignedUpload>, (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let upstream = s
        .http
        .post(&s.config.upload_signer_url)
        .json(&r)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, folder = %r.folder, "upload signer unreachable");
            (StatusCode::BAD_GATEWAY, "Upload signing failed".to_string())
        })?;

    if !upstream.status().is_success() {
        tracing::error!(status = %upstream.status(), folder = %r.folder, "upload signer rejected the request");
        return Err((StatusCode::BAD_GATEWAY, "Upload signing failed".to_string()));
    }

    let slot: SignedUpload = upstream.json().await.map_err(|e| {
        tracing::error!(error = %e, "upload signer returned an unexpected payload");
        (StatusCode::BAD_GATEWAY, "Upload signing failed".to_string())
    })?;

    Ok(Json(slot))
}
