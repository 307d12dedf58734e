//! # tg-api
//!
//! The web routing and orchestration layer for Tangle. Handlers
//! coordinate the flow between HTTP requests and the core ports; every
//! authorization question goes through `tg_core::policy` rather than
//! being inlined next to a query.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use tg_core::traits::{
    CommentRepo, CommunityRepo, CredentialHasher, PostRepo, ReportRepo, TokenService, UserRepo,
};

/// State shared across all handlers. Plugins are injected once at
/// startup; handlers only ever see the ports.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub communities: Arc<dyn CommunityRepo>,
    pub posts: Arc<dyn PostRepo>,
    pub comments: Arc<dyn CommentRepo>,
    pub reports: Arc<dyn ReportRepo>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub tokens: Arc<dyn TokenService>,
}

/// Builds the full application router.
///
/// Literal segments (`/posts/stats`, `/posts/my-posts`) are registered
/// alongside the `{id}` routes; the router prefers the literal match.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/auth/profile",
            get(handlers::auth::profile).put(handlers::auth::update_profile),
        )
        .route("/auth/stats", get(handlers::auth::stats))
        .route(
            "/communities",
            get(handlers::communities::list).post(handlers::communities::create),
        )
        .route("/communities/search", get(handlers::communities::search))
        .route("/communities/code/{code}", get(handlers::communities::by_code))
        .route(
            "/communities/{id}",
            get(handlers::communities::by_id)
                .put(handlers::communities::update)
                .delete(handlers::communities::delete),
        )
        .route("/posts", get(handlers::posts::list).post(handlers::posts::create))
        .route("/posts/stats", get(handlers::posts::stats))
        .route("/posts/my-posts", get(handlers::posts::my_posts))
        .route(
            "/posts/{id}",
            get(handlers::posts::detail)
                .put(handlers::posts::update)
                .delete(handlers::posts::delete),
        )
        .route("/posts/{id}/report", post(handlers::posts::report))
        .route(
            "/comments/{id}",
            get(handlers::comments::list)
                .post(handlers::comments::create)
                .put(handlers::comments::update)
                .delete(handlers::comments::delete),
        )
        .layer(middleware::trace())
        .layer(middleware::cors())
        .with_state(state)
}
