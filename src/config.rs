//! Configuration module

use std::env;
use std::net::IpAddr;

use anyhow::Context;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the model artifact
    pub model_path: String,

    /// Expected hex SHA-256 of the artifact, checked at load when set
    pub model_sha256: Option<String>,

    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let host = match env::var("HOST") {
            Ok(h) => h.parse().with_context(|| format!("HOST '{}' is not an IP address", h))?,
            Err(_) => IpAddr::from([0, 0, 0, 0]),
        };

        Ok(Self {
            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "artifacts/best_climate_accident_model.json".to_string()),

            model_sha256: env::var("MODEL_SHA256")
                .ok()
                .filter(|s| !s.trim().is_empty()),

            host,

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
