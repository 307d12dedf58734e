//! Post endpoints: public listings and detail, owner-gated mutations,
//! abuse reports, and the aggregate stats.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use tg_core::error::AppError;
use tg_core::models::{NewPost, NewReport, PostCategory};
use tg_core::pagination::{Page, PageRequest, PostFilter};
use tg_core::policy::{self, Action, Actor, Target};

use crate::dto::{PageQuery, PostListQuery, PostRequest, ReportRequest, DEFAULT_PAGE_SIZE};
use crate::error::ApiError;
use crate::extract::{AuthUser, MaybeAuthUser};
use crate::AppState;

fn post_page(page: Page<tg_core::models::PostView>) -> Json<Value> {
    Json(json!({ "posts": page.items, "pagination": page.pagination }))
}

pub async fn list(
    State(state): State<AppState>,
    // Stale or missing tokens degrade to an anonymous read.
    MaybeAuthUser(_viewer): MaybeAuthUser,
    Query(query): Query<PostListQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    )?;

    // "ALL" disables the category filter; an unknown category matches
    // nothing rather than erroring, like any other unsatisfied filter.
    let category = match query.category.as_deref() {
        None | Some("ALL") => None,
        Some(raw) => match PostCategory::parse(raw) {
            Some(c) => Some(c),
            None => return Ok(post_page(Page::assemble(Vec::new(), 0, &page))),
        },
    };

    let filter = PostFilter {
        category,
        community_id: query.community_id,
        search: query.search,
        owner_id: None,
    };
    Ok(post_page(state.posts.list(&filter, &page).await?))
}

pub async fn detail(
    State(state): State<AppState>,
    MaybeAuthUser(_viewer): MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let view = state
        .posts
        .view(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    // Counted after the fetch; the response carries the pre-fetch count.
    state.posts.record_view(id).await?;

    Ok(Json(json!(view)))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<PostRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = req.validate()?;

    let actor = Actor::Authenticated(user.clone());
    policy::authorize(&actor, &Target::Post(None), Action::Create).require("Post not found")?;

    let post_id = state
        .posts
        .insert(NewPost {
            title: input.title,
            description: input.description,
            category: input.category,
            post_type: input.post_type,
            contact_info: input.contact_info,
            price: input.price,
            location: input.location,
            images: input.images,
            user_id: user.id,
            community_id: policy::community_for_new_post(&user),
        })
        .await?;

    let post = state
        .posts
        .view(post_id)
        .await?
        .ok_or_else(|| AppError::internal("created post not readable"))?;

    tracing::info!(%post_id, user_id = %user.id, "post created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post created successfully", "post": post })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<PostRequest>,
) -> Result<Json<Value>, ApiError> {
    let update = req.validate()?;

    let meta = state.posts.ownership(id).await?;
    let actor = Actor::Authenticated(user.clone());
    policy::authorize(&actor, &Target::Post(meta.as_ref()), Action::Update)
        .require("Post not found or unauthorized")?;

    // The statement re-checks ownership, so a delete racing in between
    // simply matches zero rows.
    if !state.posts.update_owned(id, user.id, update).await? {
        return Err(AppError::not_found("Post not found or unauthorized").into());
    }

    let post = state
        .posts
        .view(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found or unauthorized"))?;
    Ok(Json(json!({ "message": "Post updated successfully", "post": post })))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let meta = state.posts.ownership(id).await?;
    let actor = Actor::Authenticated(user.clone());
    policy::authorize(&actor, &Target::Post(meta.as_ref()), Action::Delete)
        .require("Post not found or unauthorized")?;

    if !state.posts.soft_delete_owned(id, user.id).await? {
        return Err(AppError::not_found("Post not found or unauthorized").into());
    }

    tracing::info!(post_id = %id, user_id = %user.id, "post deleted");
    Ok(Json(json!({ "message": "Post deleted successfully" })))
}

pub async fn report(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ReportRequest>,
) -> Result<Json<Value>, ApiError> {
    req.validate()?;

    let meta = state.posts.ownership(id).await?;
    let already_reported = state.reports.exists(id, user.id).await?;
    let actor = Actor::Authenticated(user.clone());
    policy::authorize(
        &actor,
        &Target::ReportOn { post: meta.as_ref(), already_reported },
        Action::Report,
    )
    .require("Post not found")?;

    state
        .reports
        .insert(NewReport {
            post_id: id,
            reporter_id: user.id,
            reason: req.reason,
            report_type: req.report_type,
        })
        .await?;

    tracing::info!(post_id = %id, reporter = %user.id, "post reported");
    Ok(Json(json!({ "message": "Post reported successfully" })))
}

pub async fn my_posts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    )?;
    let filter = PostFilter { owner_id: Some(user.id), ..Default::default() };
    Ok(post_page(state.posts.list(&filter, &page).await?))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stats = state.posts.stats().await?;
    Ok(Json(json!(stats)))
}
