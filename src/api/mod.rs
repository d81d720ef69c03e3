//! HTTP surface.

pub mod accounts;
pub mod catalog;
pub mod translate;
pub mod uploads;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::PgBackend;
use crate::catalog::Catalog;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog<PgBackend>,
    pub db: PgPool,
    pub http: reqwest::Client,
    pub config: Config,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront"})) }))
        .route("/api/v1/shops", get(catalog::list_shops))
        .route("/api/v1/shops/:id", get(catalog::get_shop))
        .route("/api/v1/products", get(catalog::list_products))
        .route("/api/v1/products/:id", get(catalog::get_product))
        .route("/api/v1/services", get(catalog::list_services))
        .route("/api/v1/services/:id", get(catalog::get_service))
        .route("/api/v1/orders/:id", get(catalog::get_order))
        .route("/api/v1/users/:user_id/orders", get(catalog::list_user_orders))
        .route(
            "/api/v1/users/:user_id/addresses",
            get(accounts::list_addresses).post(accounts::create_address),
        )
        .route(
            "/api/v1/users/:user_id/addresses/:id",
            put(accounts::update_address).delete(accounts::delete_address),
        )
        .route(
            "/api/v1/users/:user_id/profile",
            get(accounts::get_profile).put(accounts::upsert_profile),
        )
        .route("/api/v1/translate", post(translate::translate))
        .route("/api/v1/uploads/sign", post(uploads::sign_upload))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
