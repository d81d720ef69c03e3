//! Machine-translation proxy.
//!
//! Stateless pass-through to an external public translation endpoint; the
//! storefront never stores or post-processes translations.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub target_lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_text: String,
}

pub async fn translate(
    State(s): State<AppState>,
    Json(r): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, (StatusCode, String)> {
    let text = r.text.filter(|t| !t.trim().is_empty());
    let target = r.target_lang.filter(|t| !t.trim().is_empty());
    let (Some(text), Some(target)) = (text, target) else {
        return Err((
            StatusCode::BAD_REQUEST,
            "text and targetLang are required".to_string(),
        ));
    };

    let upstream = s
        .http
        .post(&s.config.translate_api_url)
        .json(&json!({ "q": text, "source": "auto", "target": target, "format": "text" }))
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "translation upstream unreachable");
            (StatusCode::INTERNAL_SERVER_ERROR, "Translation failed".to_string())
        })?;

    if !upstream.status().is_success() {
        tracing::error!(status = %upstream.status(), "translation upstream returned an error");
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "Translation failed".to_string()));
    }

    let body: TranslateResponse = upstream.json().await.map_err(|e| {
        tracing::error!(error = %e, "translation upstream returned an unexpected payload");
        (StatusCode::INTERNAL_SERVER_ERROR, "Translation failed".to_string())
    })?;

    Ok(Json(body))
}
