//! HTTP handlers, one module per resource. Each handler validates its
//! input, consults the access policy, calls the ports, and shapes the
//! response envelope.

pub mod auth;
pub mod comments;
pub mod communities;
pub mod posts;

use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
