//! Registration, login, and the profile endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use tg_core::error::AppError;
use tg_core::models::NewUser;

use crate::dto::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = req.validate()?;

    if state.users.identity_exists(&input.email, &input.phone_number).await? {
        return Err(AppError::bad_request(
            "User with this email or phone number already exists",
        )
        .into());
    }

    // Membership is resolved through the shared code, never an id.
    let community = state
        .communities
        .by_code(&input.community_code)
        .await?
        .ok_or_else(|| AppError::bad_request("Community not found with the provided code"))?;

    let password_hash = state.hasher.hash(&input.password)?;
    let user_id = state
        .users
        .insert(NewUser {
            full_name: input.full_name,
            email: Some(input.email),
            phone_number: Some(input.phone_number),
            password_hash,
            address: input.address,
            locality: input.locality,
            pincode: input.pincode,
            role: input.role,
            community_id: community.id,
        })
        .await?;

    let user = state
        .users
        .profile(user_id)
        .await?
        .ok_or_else(|| AppError::internal("registered user not readable"))?;
    let token = state.tokens.issue(user_id)?;

    tracing::info!(%user_id, community = %community.community_code, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "token": token,
            "user": user,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    req.validate()?;

    // Unknown identity and wrong password are indistinguishable.
    let creds = state
        .users
        .find_credentials(&req.email_or_phone)
        .await?
        .ok_or_else(|| AppError::unauthenticated("Invalid credentials"))?;
    if !state.hasher.verify(&req.password, &creds.password_hash) {
        return Err(AppError::unauthenticated("Invalid credentials").into());
    }

    let user = state
        .users
        .profile(creds.user_id)
        .await?
        .ok_or_else(|| AppError::unauthenticated("Invalid credentials"))?;
    let token = state.tokens.issue(creds.user_id)?;

    tracing::info!(user_id = %creds.user_id, "user logged in");
    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": user,
    })))
}

pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let profile = state
        .users
        .profile(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(json!(profile)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    let update = req.validate()?;

    if !state.users.update_profile(user.id, update).await? {
        return Err(AppError::not_found("User not found").into());
    }
    let profile = state
        .users
        .profile(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": profile,
    })))
}

pub async fn stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let stats = state.users.stats(user.id).await?;
    Ok(Json(json!(stats)))
}
