//! # tg-config
//!
//! Layered configuration for the Tangle binary: built-in defaults, an
//! optional `tangle.toml` next to the working directory, then `TANGLE_*`
//! environment variables (`TANGLE_SERVER__PORT=8080` style). A `.env`
//! file is honored before the environment layer is read.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. Never logged, never serialized.
    pub jwt_secret: SecretString,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_ok() {
            tracing::debug!("loaded environment from .env");
        }
        let cfg = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite:tangle.db")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.jwt_secret", "change-me-in-production")?
            .set_default("auth.token_ttl_hours", 24 * 7)?
            .add_source(File::with_name("tangle").required(false))
            .add_source(Environment::with_prefix("TANGLE").separator("__"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_environment() {
        let cfg = AppConfig::load().expect("defaults");
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.auth.token_ttl_hours, 168);
        assert!(cfg.bind_addr().ends_with(":8080"));
    }
}
