//! # tg-db-sqlite
//!
//! SQLite implementation of the tg-core repository ports, one module per
//! entity. The soft-delete discipline lives here: every read path adds
//! `is_active = 1`, and the page/count queries of each listing are built
//! from a single shared filter function so their predicates cannot drift.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use tg_core::error::{AppError, Result};

mod schema;

mod comments;
mod communities;
mod posts;
mod reports;
mod users;

/// A bounded connection pool over one SQLite database. Constructed once
/// at startup and handed to each component; cloning shares the pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) and bootstrap the schema.
    ///
    /// In-memory databases exist per connection, so tests passing
    /// `sqlite::memory:` should use `max_connections = 1`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await
            .map_err(db_err)?;
        schema::init(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Store failures carry no caller-visible detail; the cause is logged
/// here and the caller sees a generic internal error.
pub(crate) fn db_err(e: sqlx::Error) -> AppError {
    tracing::error!(error = %e, "database error");
    AppError::internal(format!("database error: {e}"))
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Ids are stored as hyphenated TEXT; rows written by this crate always
/// parse, so a corrupt value degrades to the nil uuid instead of tearing
/// down the request.
pub(crate) fn text_to_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap_or_default()
}

#[cfg(test)]
mod tests;
