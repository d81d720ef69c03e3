//! Marketplace storefront service.

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::api::{self, AppState};
use storefront::backend::PgBackend;
use storefront::catalog::Catalog;
use storefront::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let http = reqwest::Client::builder().timeout(config.http_timeout).build()?;
    let state = AppState {
        catalog: Catalog::new(PgBackend::new(db.clone())),
        db,
        http,
        config: config.clone(),
    };

    let app = api::router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🚀 Storefront listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
