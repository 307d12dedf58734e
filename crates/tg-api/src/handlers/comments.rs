//! Comment endpoints. The `{id}` segment is the post id for list and
//! create, and the comment id for update and delete, mirroring the
//! route contract.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use tg_core::error::AppError;
use tg_core::models::NewComment;
use tg_core::pagination::PageRequest;
use tg_core::policy::{self, Action, Actor, Target};

use crate::dto::{CommentRequest, PageQuery, COMMENT_PAGE_SIZE};
use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(COMMENT_PAGE_SIZE),
    )?;
    let listed = state.comments.list_for_post(post_id, &page).await?;
    Ok(Json(json!({ "comments": listed.items, "pagination": listed.pagination })))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    req.validate()?;

    let post = state.posts.ownership(post_id).await?;
    let actor = Actor::Authenticated(user.clone());
    policy::authorize(&actor, &Target::CommentOn { post: post.as_ref() }, Action::Create)
        .require("Post not found")?;

    let comment_id = state
        .comments
        .insert(NewComment { content: req.content, user_id: user.id, post_id })
        .await?;
    let comment = state
        .comments
        .view(comment_id)
        .await?
        .ok_or_else(|| AppError::internal("created comment not readable"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Comment created successfully", "comment": comment })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<Value>, ApiError> {
    req.validate()?;

    let meta = state.comments.ownership(id).await?;
    let actor = Actor::Authenticated(user.clone());
    policy::authorize(&actor, &Target::Comment(meta.as_ref()), Action::Update)
        .require("Comment not found or unauthorized")?;

    if !state.comments.update_owned(id, user.id, &req.content).await? {
        return Err(AppError::not_found("Comment not found or unauthorized").into());
    }

    let comment = state
        .comments
        .view(id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment not found or unauthorized"))?;
    Ok(Json(json!({ "message": "Comment updated successfully", "comment": comment })))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let meta = state.comments.ownership(id).await?;
    let actor = Actor::Authenticated(user.clone());
    policy::authorize(&actor, &Target::Comment(meta.as_ref()), Action::Delete)
        .require("Comment not found or unauthorized")?;

    if !state.comments.soft_delete_owned(id, user.id).await? {
        return Err(AppError::not_found("Comment not found or unauthorized").into());
    }

    Ok(Json(json!({ "message": "Comment deleted successfully" })))
}
