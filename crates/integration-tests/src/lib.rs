//! Test harness: a fully wired application over an in-memory store,
//! plus small helpers for driving it with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use tg_api::AppState;
use tg_auth_jwt::{Argon2Hasher, JwtTokenService};
use tg_core::models::{Community, NewCommunity};
use tg_core::traits::CommunityRepo;
use tg_db_sqlite::SqliteStore;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
}

/// A fresh app over a fresh in-memory database. The single-connection
/// pool keeps every query on the same in-memory store.
pub async fn test_app() -> TestApp {
    let store = Arc::new(
        SqliteStore::connect("sqlite::memory:", 1).await.expect("in-memory store"),
    );
    let state = AppState {
        users: store.clone(),
        communities: store.clone(),
        posts: store.clone(),
        comments: store.clone(),
        reports: store.clone(),
        hasher: Arc::new(Argon2Hasher::default()),
        tokens: Arc::new(JwtTokenService::new(
            &SecretString::from("integration-test-secret".to_owned()),
            24,
        )),
    };
    TestApp { router: tg_api::router(state), store }
}

impl TestApp {
    /// Communities are created by an administrative action; tests seed
    /// the first one directly through the port.
    pub async fn seed_community(&self, code: &str) -> Community {
        CommunityRepo::insert(
            self.store.as_ref(),
            NewCommunity {
                name: format!("{code} Gardens"),
                community_code: code.to_string(),
                location: "Anna Nagar West".into(),
                city: "Chennai".into(),
                state: "Tamil Nadu".into(),
                pincode: "600040".into(),
                description: None,
            },
        )
        .await
        .expect("seed community")
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        let response =
            self.router.clone().oneshot(request).await.expect("infallible router");
        let status = response.status().as_u16();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (u16, Value) {
        self.send("GET", uri, None, None).await
    }

    /// Register a user through the API and hand back (token, user).
    pub async fn register(
        &self,
        email: &str,
        phone: &str,
        role: &str,
        community_code: &str,
    ) -> (String, Value) {
        let (status, body) = self
            .send(
                "POST",
                "/auth/register",
                None,
                Some(serde_json::json!({
                    "fullName": "Asha Rao",
                    "email": email,
                    "phoneNumber": phone,
                    "password": "password123",
                    "address": "12 Lake View",
                    "locality": "Anna Nagar",
                    "pincode": "600040",
                    "role": role,
                    "communityCode": community_code,
                })),
            )
            .await;
        assert_eq!(status, 201, "registration failed: {body}");
        let token = body["token"].as_str().expect("token").to_string();
        (token, body["user"].clone())
    }
}
