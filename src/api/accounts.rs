//! Visitor address book and profile endpoints.
//!
//! Unlike the catalog, these are direct writes owned by this service.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Address, Profile};

use super::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SaveAddressRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(length(min = 7, max = 15))]
    pub phone: String,
    #[validate(length(min = 1, max = 500))]
    pub address_line: String,
    pub city: Option<String>,
    pub pincode: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveProfileRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(length(min = 7, max = 15))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
}

pub async fn list_addresses(
    State(s): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Address>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, Address>(
        "SELECT * FROM addresses WHERE user_id = $1 ORDER BY is_default DESC, created_at DESC",
    )
    .bind(&user_id)
    .fetch_all(&s.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(rows))
}

pub async fn create_address(
    State(s): State<AppState>,
    Path(user_id): Path<String>,
    Json(r): Json<SaveAddressRequest>,
) -> Result<(StatusCode, Json<Address>), (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    if r.is_default {
        sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1")
            .bind(&user_id)
            .execute(&s.db)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    }
    let address = sqlx::query_as::<_, Address>(
        "INSERT INTO addresses (id, user_id, full_name, phone, address_line, city, pincode, is_default, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&user_id)
    .bind(&r.full_name)
    .bind(&r.phone)
    .bind(&r.address_line)
    .bind(&r.city)
    .bind(&r.pincode)
    .bind(r.is_default)
    .fetch_one(&s.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((StatusCode::CREATED, Json(address)))
}

pub async fn update_address(
    State(s): State<AppState>,
    Path((user_id, id)): Path<(String, Uuid)>,
    Json(r): Json<SaveAddressRequest>,
) -> Result<Json<Address>, (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    if r.is_default {
        sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1 AND id <> $2")
            .bind(&user_id)
            .bind(id)
            .execute(&s.db)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    }
    let address = sqlx::query_as::<_, Address>(
        "UPDATE addresses SET full_name = $3, phone = $4, address_line = $5, city = $6, pincode = $7, is_default = $8 \
         WHERE id = $2 AND user_id = $1 RETURNING *",
    )
    .bind(&user_id)
    .bind(id)
    .bind(&r.full_name)
    .bind(&r.phone)
    .bind(&r.address_line)
    .bind(&r.city)
    .bind(&r.pincode)
    .bind(r.is_default)
    .fetch_optional(&s.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))?;
    Ok(Json(address))
}

pub async fn delete_address(
    State(s): State<AppState>,
    Path((user_id, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, (StatusCode, String)> {
    sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(&user_id)
        .execute(&s.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_profile(
    State(s): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, (StatusCode, String)> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(&user_id)
        .fetch_optional(&s.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

pub async fn upsert_profile(
    State(s): State<AppState>,
    Path(user_id): Path<String>,
    Json(r): Json<SaveProfileRequest>,
) -> Result<Json<Profile>, (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let profile = sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (user_id, full_name, phone, email, updated_at) \
         VALUES ($1, $2, $3, $4, NOW()) \
         ON CONFLICT (user_id) DO UPDATE SET \
             full_name = EXCLUDED.full_name, phone = EXCLUDED.phone, \
             email = EXCLUDED.email, updated_at = NOW() \
         RETURNING *",
    )
    .bind(&user_id)
    .bind(&r.full_name)
    .bind(&r.phone)
    .bind(&r.email)
    .fetch_one(&s.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(profile))
}
