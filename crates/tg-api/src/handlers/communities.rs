//! Community endpoints: public reads, admin-gated mutations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use tg_core::error::AppError;
use tg_core::pagination::{CommunityFilter, PageRequest};
use tg_core::policy::{self, Action, Actor, Target};

use crate::dto::{
    CommunityListQuery, CreateCommunityRequest, SearchQuery, UpdateCommunityRequest,
    COMMUNITY_SEARCH_CAP, DEFAULT_PAGE_SIZE,
};
use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CommunityListQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    )?;
    let filter = CommunityFilter { search: query.search };
    let listed = state.communities.list(&filter, &page).await?;
    Ok(Json(json!({ "communities": listed.items, "pagination": listed.pagination })))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_request("Search query is required"))?;
    let communities = state.communities.search(term, COMMUNITY_SEARCH_CAP).await?;
    Ok(Json(json!({ "communities": communities })))
}

pub async fn by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let community = state
        .communities
        .by_code(&code)
        .await?
        .ok_or_else(|| AppError::not_found("Community not found"))?;
    Ok(Json(json!(community)))
}

pub async fn by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let community = state
        .communities
        .by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Community not found"))?;
    Ok(Json(json!(community)))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateCommunityRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = req.validate()?;

    let actor = Actor::Authenticated(user);
    policy::authorize(&actor, &Target::Community, Action::Create)
        .require("Community not found or unauthorized")?;

    if state.communities.code_exists(&input.community_code).await? {
        return Err(AppError::bad_request("Community code already exists").into());
    }

    let community = state.communities.insert(input).await?;
    tracing::info!(code = %community.community_code, "community created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Community created successfully", "community": community })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCommunityRequest>,
) -> Result<Json<Value>, ApiError> {
    let input = req.validate()?;

    let actor = Actor::Authenticated(user);
    policy::authorize(&actor, &Target::Community, Action::Update)
        .require("Community not found or unauthorized")?;

    let community = state
        .communities
        .update(id, input)
        .await?
        .ok_or_else(|| AppError::not_found("Community not found"))?;
    Ok(Json(json!({ "message": "Community updated successfully", "community": community })))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let actor = Actor::Authenticated(user);
    policy::authorize(&actor, &Target::Community, Action::Delete)
        .require("Community not found or unauthorized")?;

    if !state.communities.soft_delete(id).await? {
        return Err(AppError::not_found("Community not found").into());
    }
    Ok(Json(json!({ "message": "Community deleted successfully" })))
}
