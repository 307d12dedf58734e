//! Community persistence. Listings are alphabetical by name; the page
//! query and the count query share one filter function.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use tg_core::error::{AppError, Result};
use tg_core::models::{Community, CommunityUpdate, NewCommunity};
use tg_core::pagination::{CommunityFilter, Page, PageRequest};
use tg_core::traits::CommunityRepo;

use crate::{db_err, is_unique_violation, text_to_uuid, SqliteStore};

fn map_community(row: &SqliteRow) -> Community {
    Community {
        id: text_to_uuid(&row.get::<String, _>("id")),
        name: row.get("name"),
        community_code: row.get("community_code"),
        location: row.get("location"),
        city: row.get("city"),
        state: row.get("state"),
        pincode: row.get("pincode"),
        description: row.get("description"),
        is_active: row.get("is_active"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    }
}

/// The one place the listing predicate is spelled out. Both the page
/// query and the count query call this, so they cannot disagree.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &CommunityFilter) {
    qb.push(" WHERE is_active = 1");
    if let Some(term) = &filter.search {
        let pattern = format!("%{term}%");
        qb.push(" AND (name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR city LIKE ")
            .push_bind(pattern.clone())
            .push(" OR location LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl CommunityRepo for SqliteStore {
    async fn list(&self, filter: &CommunityFilter, page: &PageRequest) -> Result<Page<Community>> {
        let mut qb = QueryBuilder::new("SELECT * FROM communities");
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY name ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = qb.build().fetch_all(&self.pool).await.map_err(db_err)?;
        let items = rows.iter().map(map_community).collect();

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM communities");
        push_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(Page::assemble(items, total as u64, page))
    }

    async fn search(&self, term: &str, cap: u32) -> Result<Vec<Community>> {
        let pattern = format!("%{term}%");
        let rows = sqlx::query(
            "SELECT * FROM communities WHERE is_active = 1 \
             AND (name LIKE ? OR city LIKE ? OR location LIKE ? OR community_code LIKE ?) \
             ORDER BY name ASC LIMIT ?",
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(i64::from(cap))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.iter().map(map_community).collect())
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<Community>> {
        let row = sqlx::query("SELECT * FROM communities WHERE id = ? AND is_active = 1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(map_community))
    }

    async fn by_code(&self, code: &str) -> Result<Option<Community>> {
        let row =
            sqlx::query("SELECT * FROM communities WHERE community_code = ? AND is_active = 1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(row.as_ref().map(map_community))
    }

    async fn code_exists(&self, code: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM communities WHERE community_code = ? AND is_active = 1 LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.is_some())
    }

    async fn insert(&self, community: NewCommunity) -> Result<Community> {
        let now = Utc::now();
        let created = Community {
            id: Uuid::new_v4(),
            name: community.name,
            community_code: community.community_code,
            location: community.location,
            city: community.city,
            state: community.state,
            pincode: community.pincode,
            description: community.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let res = sqlx::query(
            "INSERT INTO communities (id, name, community_code, location, city, state, pincode, \
             description, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(created.id.to_string())
        .bind(&created.name)
        .bind(&created.community_code)
        .bind(&created.location)
        .bind(&created.city)
        .bind(&created.state)
        .bind(&created.pincode)
        .bind(&created.description)
        .bind(created.created_at)
        .bind(created.updated_at)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(created),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::bad_request("Community code already exists"))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn update(&self, id: Uuid, update: CommunityUpdate) -> Result<Option<Community>> {
        let res = sqlx::query(
            "UPDATE communities SET name = ?, location = ?, city = ?, state = ?, pincode = ?, \
             description = ?, updated_at = ? WHERE id = ? AND is_active = 1",
        )
        .bind(&update.name)
        .bind(&update.location)
        .bind(&update.city)
        .bind(&update.state)
        .bind(&update.pincode)
        .bind(&update.description)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.by_id(id).await
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE communities SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(res.rows_affected() > 0)
    }
}
