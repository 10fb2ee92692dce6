use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the builder API (text extraction, AI extraction, DOCX
    /// generation).
    pub builder_api_url: String,
    /// Base URL of the managed storage service.
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            builder_api_url: require_env("BUILDER_API_URL")?,
            supabase_url: require_env("SUPABASE_URL")?,
            supabase_service_key: require_env("SUPABASE_SERVICE_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            builder_api_url: "http://localhost:8000".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
