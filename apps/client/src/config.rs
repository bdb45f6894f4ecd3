use anyhow::Result;

use crate::api_client::DEFAULT_API_URL;

/// Client configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    /// Bearer token issued by the identity provider. Absent means signed out.
    pub token: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: std::env::var("AUTOFILL_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token: optional_env("AUTOFILL_TOKEN")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Result<Option<String>> {
    match std::env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(anyhow::anyhow!("Environment variable '{key}' is unreadable: {e}")),
    }
}
