//! Post persistence. Every read projects the same author/community join;
//! ownership mutations are single conditional statements so a concurrent
//! delete simply matches zero rows.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use tg_core::error::{AppError, Result};
use tg_core::models::{NewPost, PostCategory, PostStats, PostType, PostUpdate, PostView};
use tg_core::pagination::{Page, PageRequest, PostFilter};
use tg_core::policy::ResourceMeta;
use tg_core::traits::PostRepo;

use crate::{db_err, text_to_uuid, SqliteStore};

const VIEW_SELECT: &str = "
    SELECT p.*,
           u.full_name AS author_name, u.profile_picture AS author_picture,
           c.name AS community_name, c.community_code
    FROM posts p
    JOIN users u ON p.user_id = u.id
    JOIN communities c ON p.community_id = c.id";

fn map_view(row: &SqliteRow) -> Result<PostView> {
    let category: String = row.get("category");
    let post_type: String = row.get("type");
    let images: String = row.get("images");
    Ok(PostView {
        id: text_to_uuid(&row.get::<String, _>("id")),
        title: row.get("title"),
        description: row.get("description"),
        category: PostCategory::parse(&category)
            .ok_or_else(|| AppError::internal(format!("unknown category in store: {category}")))?,
        post_type: PostType::parse(&post_type)
            .ok_or_else(|| AppError::internal(format!("unknown type in store: {post_type}")))?,
        contact_info: row.get("contact_info"),
        price: row.get("price"),
        location: row.get("location"),
        images: serde_json::from_str(&images).unwrap_or_default(),
        view_count: row.get("view_count"),
        user_id: text_to_uuid(&row.get::<String, _>("user_id")),
        community_id: text_to_uuid(&row.get::<String, _>("community_id")),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        author_name: row.get("author_name"),
        author_picture: row.get("author_picture"),
        community_name: row.get("community_name"),
        community_code: row.get("community_code"),
    })
}

/// The one place the listing predicate is spelled out. Both the page
/// query and the count query call this, so they cannot disagree.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PostFilter) {
    qb.push(" WHERE p.is_active = 1");
    if let Some(category) = filter.category {
        qb.push(" AND p.category = ").push_bind(category.as_str());
    }
    if let Some(community_id) = filter.community_id {
        qb.push(" AND p.community_id = ").push_bind(community_id.to_string());
    }
    if let Some(owner_id) = filter.owner_id {
        qb.push(" AND p.user_id = ").push_bind(owner_id.to_string());
    }
    if let Some(term) = &filter.search {
        let pattern = format!("%{term}%");
        qb.push(" AND (p.title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl PostRepo for SqliteStore {
    async fn list(&self, filter: &PostFilter, page: &PageRequest) -> Result<Page<PostView>> {
        let mut qb = QueryBuilder::new(VIEW_SELECT);
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY p.created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = qb.build().fetch_all(&self.pool).await.map_err(db_err)?;
        let items = rows.iter().map(map_view).collect::<Result<Vec<_>>>()?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM posts p");
        push_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(Page::assemble(items, total as u64, page))
    }

    async fn view(&self, id: Uuid) -> Result<Option<PostView>> {
        let row = sqlx::query(&format!("{VIEW_SELECT} WHERE p.id = ? AND p.is_active = 1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(map_view).transpose()
    }

    async fn record_view(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn ownership(&self, id: Uuid) -> Result<Option<ResourceMeta>> {
        let row = sqlx::query("SELECT user_id, is_active FROM posts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(|r| ResourceMeta {
            owner_id: text_to_uuid(&r.get::<String, _>("user_id")),
            is_active: r.get("is_active"),
        }))
    }

    async fn insert(&self, post: NewPost) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let images = serde_json::to_string(&post.images)
            .map_err(|e| AppError::internal(format!("image list serialization failed: {e}")))?;
        sqlx::query(
            "INSERT INTO posts (id, title, description, category, type, contact_info, price, \
             location, images, view_count, user_id, community_id, is_active, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, 1, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.category.as_str())
        .bind(post.post_type.as_str())
        .bind(&post.contact_info)
        .bind(post.price)
        .bind(&post.location)
        .bind(images)
        .bind(post.user_id.to_string())
        .bind(post.community_id.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(id)
    }

    async fn update_owned(&self, id: Uuid, owner_id: Uuid, update: PostUpdate) -> Result<bool> {
        let images = serde_json::to_string(&update.images)
            .map_err(|e| AppError::internal(format!("image list serialization failed: {e}")))?;
        let res = sqlx::query(
            "UPDATE posts SET title = ?, description = ?, category = ?, type = ?, \
             contact_info = ?, price = ?, location = ?, images = ?, updated_at = ? \
             WHERE id = ? AND user_id = ? AND is_active = 1",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.category.as_str())
        .bind(update.post_type.as_str())
        .bind(&update.contact_info)
        .bind(update.price)
        .bind(&update.location)
        .bind(images)
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
            "UPDATE posts SET is_active = 0, updated_at = ? \
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

    async fn stats(&self) -> Result<PostStats> {
        let now = Utc::now();
        let week_ago = now - Duration::days(7);
        let month_ago = now - Duration::days(30);
        let row = sqlx::query(
            "SELECT COUNT(*) AS total_posts, \
                    COALESCE(SUM(view_count), 0) AS total_views, \
                    COALESCE(SUM(CASE WHEN created_at >= ? THEN 1 ELSE 0 END), 0) AS posts_this_week, \
                    COALESCE(SUM(CASE WHEN created_at >= ? THEN 1 ELSE 0 END), 0) AS posts_this_month \
             FROM posts WHERE is_active = 1",
        )
        .bind(week_ago)
        .bind(month_ago)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(PostStats {
            total_posts: row.get("total_posts"),
            total_views: row.get("total_views"),
            posts_this_week: row.get("posts_this_week"),
            posts_this_month: row.get("posts_this_month"),
        })
    }
}
