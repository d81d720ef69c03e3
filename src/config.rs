//! Environment-driven service configuration.

use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub translate_api_url: String,
    pub upload_signer_url: String,
    pub http_timeout: Duration,
}

impl Config {
    /// Reads configuration from the environment, failing fast with context
    /// when a required value is missing or malformed.
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a number")?,
            Err(_) => 8086,
        };
        let translate_api_url = std::env::var("TRANSLATE_API_URL")
            .unwrap_or_else(|_| "https://libretranslate.com/translate".to_string());
        let upload_signer_url =
            std::env::var("UPLOAD_SIGNER_URL").context("UPLOAD_SIGNER_URL is not set")?;
        let http_timeout = match std::env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse().context("HTTP_TIMEOUT_SECS must be a number")?),
            Err(_) => Duration::from_secs(10),
        };

        Ok(Self {
            database_url,
            port,
            translate_api_url,
            upload_signer_url,
            http_timeout,
        })
    }
}
