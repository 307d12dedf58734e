//! Schema bootstrap. Executed once at connect time; every statement is
//! idempotent so restarting against an existing file is safe.
//!
//! Uniqueness that the application also checks (email, phone, community
//! code, one report per reporter per post) is enforced here with unique
//! indexes so two racing writers cannot both pass the check and both
//! insert. The identity indexes are partial: uniqueness holds among
//! active rows only.

use sqlx::SqlitePool;

use tg_core::error::Result;

use crate::db_err;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS communities (
    id             TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    community_code TEXT NOT NULL,
    location       TEXT NOT NULL,
    city           TEXT NOT NULL,
    state          TEXT NOT NULL,
    pincode        TEXT NOT NULL,
    description    TEXT,
    is_active      INTEGER NOT NULL DEFAULT 1,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS uq_communities_code
    ON communities (community_code) WHERE is_active = 1;

CREATE TABLE IF NOT EXISTS users (
    id              TEXT PRIMARY KEY,
    full_name       TEXT NOT NULL,
    email           TEXT,
    phone_number    TEXT,
    password_hash   TEXT NOT NULL,
    address         TEXT NOT NULL,
    locality        TEXT NOT NULL,
    pincode         TEXT NOT NULL,
    role            TEXT NOT NULL,
    community_id    TEXT NOT NULL REFERENCES communities (id),
    is_active       INTEGER NOT NULL DEFAULT 1,
    is_verified     INTEGER NOT NULL DEFAULT 0,
    profile_picture TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    CHECK (email IS NOT NULL OR phone_number IS NOT NULL)
);
CREATE UNIQUE INDEX IF NOT EXISTS uq_users_email
    ON users (email) WHERE is_active = 1 AND email IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS uq_users_phone
    ON users (phone_number) WHERE is_active = 1 AND phone_number IS NOT NULL;

CREATE TABLE IF NOT EXISTS posts (
    id           TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    description  TEXT NOT NULL,
    category     TEXT NOT NULL,
    type         TEXT NOT NULL,
    contact_info TEXT,
    price        REAL,
    location     TEXT,
    images       TEXT NOT NULL DEFAULT '[]',
    view_count   INTEGER NOT NULL DEFAULT 0,
    user_id      TEXT NOT NULL REFERENCES users (id),
    community_id TEXT NOT NULL REFERENCES communities (id),
    is_active    INTEGER NOT NULL DEFAULT 1,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS ix_posts_community ON posts (community_id);
CREATE INDEX IF NOT EXISTS ix_posts_owner     ON posts (user_id);
CREATE INDEX IF NOT EXISTS ix_posts_created   ON posts (created_at);

CREATE TABLE IF NOT EXISTS comments (
    id         TEXT PRIMARY KEY,
    content    TEXT NOT NULL,
    user_id    TEXT NOT NULL REFERENCES users (id),
    post_id    TEXT NOT NULL REFERENCES posts (id),
    is_active  INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS ix_comments_post ON comments (post_id);

CREATE TABLE IF NOT EXISTS reports (
    id          TEXT PRIMARY KEY,
    post_id     TEXT NOT NULL REFERENCES posts (id),
    reporter_id TEXT NOT NULL REFERENCES users (id),
    reason      TEXT NOT NULL,
    type        TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'PENDING',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS uq_reports_post_reporter
    ON reports (post_id, reporter_id);
"#;

pub(crate) async fn init(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await.map_err(db_err)?;
    Ok(())
}
