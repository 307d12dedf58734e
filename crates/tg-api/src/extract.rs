//! Bearer-token extractors. `AuthUser` rejects with 401; `MaybeAuthUser`
//! degrades to anonymous so public endpoints tolerate stale tokens.
//!
//! The token only proves a user id; the identity (community, role) is
//! re-read from the store on every request so a deactivated account
//! stops authenticating immediately.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use tg_core::error::AppError;
use tg_core::policy::Identity;

use crate::error::ApiError;
use crate::AppState;

pub struct AuthUser(pub Identity);

pub struct MaybeAuthUser(pub Option<Identity>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<Identity, AppError> {
    let token =
        bearer_token(parts).ok_or_else(|| AppError::unauthenticated("Access token required"))?;
    let user_id = state.tokens.verify(token)?;
    state
        .users
        .identity(user_id)
        .await?
        .ok_or_else(|| AppError::unauthenticated("Invalid or expired token"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(AuthUser(authenticate(parts, state).await?))
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(authenticate(parts, state).await.ok()))
    }
}
