//! Report persistence. The (post, reporter) unique index makes the
//! dedup rule hold even when two reports race past the exists check.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use tg_core::error::{AppError, Result};
use tg_core::models::{NewReport, ReportStatus};
use tg_core::traits::ReportRepo;

use crate::{db_err, is_unique_violation, SqliteStore};

#[async_trait]
impl ReportRepo for SqliteStore {
    async fn exists(&self, post_id: Uuid, reporter_id: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM reports WHERE post_id = ? AND reporter_id = ? LIMIT 1")
            .bind(post_id.to_string())
            .bind(reporter_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.is_some())
    }

    async fn insert(&self, report: NewReport) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let res = sqlx::query(
            "INSERT INTO reports (id, post_id, reporter_id, reason, type, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(report.post_id.to_string())
        .bind(report.reporter_id.to_string())
        .bind(&report.reason)
        .bind(&report.report_type)
        .bind(ReportStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(id),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::bad_request("You have already reported this post"))
            }
            Err(e) => Err(db_err(e)),
        }
    }
}
