//! Catalog read endpoints.
//!
//! Handlers only see the assemblers' already-absorbed results: `None` maps to
//! 404 and listings are always 200, possibly empty.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Order, Product, Service, Shop};
use crate::page::{Page, PaginatedResponse};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub shop_id: Option<Uuid>,
}

pub async fn get_shop(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Shop>, (StatusCode, String)> {
    s.catalog
        .shop(id)
        .await
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

pub async fn list_shops(
    State(s): State<AppState>,
    Query(p): Query<ListParams>,
) -> Json<PaginatedResponse<Shop>> {
    Json(s.catalog.shops(Page::new(p.page, p.limit)).await)
}

pub async fn get_product(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, (StatusCode, String)> {
    s.catalog
        .product(id)
        .await
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

pub async fn list_products(
    State(s): State<AppState>,
    Query(p): Query<ListParams>,
) -> Json<PaginatedResponse<Product>> {
    Json(s.catalog.products(p.shop_id, Page::new(p.page, p.limit)).await)
}

pub async fn get_service(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, (StatusCode, String)> {
    s.catalog
        .service(id)
        .await
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

pub async fn list_services(
    State(s): State<AppState>,
    Query(p): Query<ListParams>,
) -> Json<PaginatedResponse<Service>> {
    Json(s.catalog.services(p.shop_id, Page::new(p.page, p.limit)).await)
}

pub async fn get_order(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, (StatusCode, String)> {
    s.catalog
        .order(id)
        .await
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

pub async fn list_user_orders(
    State(s): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<Order>> {
    Json(s.catalog.orders_for_user(&user_id).await)
}
