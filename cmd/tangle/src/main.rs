//! # Tangle Binary
//!
//! The entry point that assembles the application based on compile-time
//! features: configuration first, then the store and auth plugins, then
//! the axum router.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use tg_api::AppState;
use tg_config::AppConfig;

#[cfg(feature = "auth-jwt")]
use tg_auth_jwt::{Argon2Hasher, JwtTokenService};

#[cfg(feature = "db-sqlite")]
use tg_db_sqlite::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    // 1. Store implementation
    #[cfg(feature = "db-sqlite")]
    let store = Arc::new(
        SqliteStore::connect(&config.database.url, config.database.max_connections)
            .await
            .context("connecting to the database")?,
    );

    // 2. Auth implementation
    #[cfg(feature = "auth-jwt")]
    let hasher = Arc::new(Argon2Hasher::default());
    #[cfg(feature = "auth-jwt")]
    let tokens = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_hours,
    ));

    // 3. Wire the ports into shared state
    let state = AppState {
        users: store.clone(),
        communities: store.clone(),
        posts: store.clone(),
        comments: store.clone(),
        reports: store,
        hasher,
        tokens,
    };

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "Tangle API listening");

    axum::serve(listener, tg_api::router(state)).await.context("serving")?;
    Ok(())
}
