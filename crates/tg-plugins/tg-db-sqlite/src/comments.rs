//! Comment persistence. Listings run oldest-first so a thread reads as a
//! conversation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use tg_core::error::Result;
use tg_core::models::{CommentView, NewComment};
use tg_core::pagination::{Page, PageRequest};
use tg_core::policy::ResourceMeta;
use tg_core::traits::CommentRepo;

use crate::{db_err, text_to_uuid, SqliteStore};

const VIEW_SELECT: &str = "
    SELECT c.*,
           u.full_name AS author_name, u.profile_picture AS author_picture
    FROM comments c
    JOIN users u ON c.user_id = u.id";

// Shared by the page and count queries below.
const FOR_POST: &str = "c.post_id = ? AND c.is_active = 1";

fn map_view(row: &SqliteRow) -> CommentView {
    CommentView {
        id: text_to_uuid(&row.get::<String, _>("id")),
        content: row.get("content"),
        user_id: text_to_uuid(&row.get::<String, _>("user_id")),
        post_id: text_to_uuid(&row.get::<String, _>("post_id")),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        author_name: row.get("author_name"),
        author_picture: row.get("author_picture"),
    }
}

#[async_trait]
impl CommentRepo for SqliteStore {
    async fn list_for_post(&self, post_id: Uuid, page: &PageRequest) -> Result<Page<CommentView>> {
        let rows = sqlx::query(&format!(
            "{VIEW_SELECT} WHERE {FOR_POST} ORDER BY c.created_at ASC LIMIT ? OFFSET ?"
        ))
        .bind(post_id.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        let items = rows.iter().map(map_view).collect();

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM comments c WHERE {FOR_POST}"))
                .bind(post_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(Page::assemble(items, total as u64, page))
    }

    async fn view(&self, id: Uuid) -> Result<Option<CommentView>> {
        let row = sqlx::query(&format!("{VIEW_SELECT} WHERE c.id = ? AND c.is_active = 1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(map_view))
    }

    async fn ownership(&self, id: Uuid) -> Result<Option<ResourceMeta>> {
        let row = sqlx::query("SELECT user_id, is_active FROM comments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(|r| ResourceMeta {
            owner_id: text_to_uuid(&r.get::<String, _>("user_id")),
            is_active: r.get("is_active"),
        }))
    }

    async fn insert(&self, comment: NewComment) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO comments (id, content, user_id, post_id, is_active, created_at, updated_at) \
             VALUES (?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&comment.content)
        .bind(comment.user_id.to_string())
        .bind(comment.post_id.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(id)
    }

    async fn update_owned(&self, id: Uuid, owner_id: Uuid, content: &str) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE comments SET content = ?, updated_at = ? \
             WHERE id = ? AND user_id = ? AND is_active = 1",
        )
        .bind(content)
        .bind(Utc::now())
        .bind(id.to_string())
        .bind(owner_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(res.rows_affected() > 0)
    }

    async fn soft_delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE comments SET is_active = 0, updated_at = ? \
             WHERE id = ? AND user_id = ? AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .bind(owner_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(res.rows_affected() > 0)
    }
}
