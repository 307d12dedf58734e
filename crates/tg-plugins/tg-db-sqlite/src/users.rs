//! User persistence: registration inserts, credential lookups for login,
//! the joined profile projection, and dashboard stats.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use tg_core::error::{AppError, Result};
use tg_core::models::{NewUser, ProfileUpdate, Role, UserProfile, UserStats};
use tg_core::policy::Identity;
use tg_core::traits::{Credentials, UserRepo};

use crate::{db_err, is_unique_violation, text_to_uuid, SqliteStore};

const PROFILE_SELECT: &str = "
    SELECT u.*,
           c.name AS community_name, c.community_code,
           c.location AS community_location, c.city, c.state,
           c.pincode AS community_pincode
    FROM users u
    JOIN communities c ON u.community_id = c.id";

fn map_profile(row: &SqliteRow) -> Result<UserProfile> {
    let role: String = row.get("role");
    Ok(UserProfile {
        id: text_to_uuid(&row.get::<String, _>("id")),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone_number: row.get("phone_number"),
        address: row.get("address"),
        locality: row.get("locality"),
        pincode: row.get("pincode"),
        role: Role::parse(&role)
            .ok_or_else(|| AppError::internal(format!("unknown role in store: {role}")))?,
        community_id: text_to_uuid(&row.get::<String, _>("community_id")),
        is_active: row.get("is_active"),
        is_verified: row.get("is_verified"),
        profile_picture: row.get("profile_picture"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        community_name: row.get("community_name"),
        community_code: row.get("community_code"),
        community_location: row.get("community_location"),
        city: row.get("city"),
        state: row.get("state"),
        community_pincode: row.get("community_pincode"),
    })
}

#[async_trait]
impl UserRepo for SqliteStore {
    async fn insert(&self, user: NewUser) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let res = sqlx::query(
            "INSERT INTO users (id, full_name, email, phone_number, password_hash, address, \
             locality, pincode, role, community_id, is_active, is_verified, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 1, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(&user.address)
        .bind(&user.locality)
        .bind(&user.pincode)
        .bind(user.role.as_str())
        .bind(user.community_id.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(id),
            // A racing registration can slip past identity_exists; the
            // partial unique indexes catch it here.
            Err(e) if is_unique_violation(&e) => Err(AppError::bad_request(
                "User with this email or phone number already exists",
            )),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn identity_exists(&self, email: &str, phone: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM users WHERE (email = ? OR phone_number = ?) AND is_active = 1 LIMIT 1",
        )
        .bind(email)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.is_some())
    }

    async fn find_credentials(&self, email_or_phone: &str) -> Result<Option<Credentials>> {
        let row = sqlx::query(
            "SELECT id, password_hash FROM users \
             WHERE (email = ? OR phone_number = ?) AND is_active = 1",
        )
        .bind(email_or_phone)
        .bind(email_or_phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(|r| Credentials {
            user_id: text_to_uuid(&r.get::<String, _>("id")),
            password_hash: r.get("password_hash"),
        }))
    }

    async fn identity(&self, id: Uuid) -> Result<Option<Identity>> {
        let row = sqlx::query(
            "SELECT id, community_id, role FROM users WHERE id = ? AND is_active = 1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(|r| {
            let role: String = r.get("role");
            Ok(Identity {
                id: text_to_uuid(&r.get::<String, _>("id")),
                community_id: text_to_uuid(&r.get::<String, _>("community_id")),
                role: Role::parse(&role)
                    .ok_or_else(|| AppError::internal(format!("unknown role in store: {role}")))?,
            })
        })
        .transpose()
    }

    async fn profile(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let row = sqlx::query(&format!("{PROFILE_SELECT} WHERE u.id = ? AND u.is_active = 1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(map_profile).transpose()
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE users SET full_name = ?, address = ?, locality = ?, pincode = ?, \
             profile_picture = ?, updated_at = ? WHERE id = ? AND is_active = 1",
        )
        .bind(&update.full_name)
        .bind(&update.address)
        .bind(&update.locality)
        .bind(&update.pincode)
        .bind(&update.profile_picture)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(res.rows_affected() > 0)
    }

    async fn stats(&self, id: Uuid) -> Result<UserStats> {
        let id = id.to_string();
        let posts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts WHERE user_id = ? AND is_active = 1",
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        let comments: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE user_id = ? AND is_active = 1",
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        let total_views: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(view_count), 0) FROM posts WHERE user_id = ? AND is_active = 1",
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        // Likes are not implemented; the shape stays stable regardless.
        Ok(UserStats { posts, comments, total_views, total_likes: 0 })
    }
}
