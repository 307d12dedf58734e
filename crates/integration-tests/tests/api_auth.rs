//! Registration, login, and profile flows over the full HTTP surface.

use integration_tests::test_app;
use serde_json::json;

#[tokio::test]
async fn register_then_login_by_email_and_phone() {
    let app = test_app().await;
    app.seed_community("ANNA001").await;

    let (token, user) = app.register("asha@example.com", "9876543210", "RESIDENT", "ANNA001").await;
    assert!(!token.is_empty());
    assert_eq!(user["communityCode"], "ANNA001");
    assert_eq!(user["role"], "RESIDENT");
    assert!(user.get("passwordHash").is_none());

    for identity in ["asha@example.com", "9876543210"] {
        let (status, body) = app
            .send(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "emailOrPhone": identity, "password": "password123" })),
            )
            .await;
        assert_eq!(status, 200, "{body}");
        assert_eq!(body["message"], "Login successful");
        assert_eq!(body["user"]["email"], "asha@example.com");
    }
}

#[tokio::test]
async fn wrong_password_and_unknown_identity_look_the_same() {
    let app = test_app().await;
    app.seed_community("ANNA001").await;
    app.register("asha@example.com", "9876543210", "RESIDENT", "ANNA001").await;

    let (status, body) = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "emailOrPhone": "asha@example.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, body) = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "emailOrPhone": "nobody@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn unknown_community_code_creates_no_user() {
    let app = test_app().await;
    app.seed_community("ANNA001").await;

    let (status, body) = app
        .send(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "fullName": "Asha Rao",
                "email": "asha@example.com",
                "phoneNumber": "9876543210",
                "password": "password123",
                "address": "12 Lake View",
                "locality": "Anna Nagar",
                "pincode": "600040",
                "role": "RESIDENT",
                "communityCode": "NOPE999",
            })),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Community not found with the provided code");

    // The identity is still free, so no row was created.
    app.register("asha@example.com", "9876543210", "RESIDENT", "ANNA001").await;
}

#[tokio::test]
async fn duplicate_email_leaves_the_existing_user_intact() {
    let app = test_app().await;
    app.seed_community("ANNA001").await;
    app.register("asha@example.com", "9876543210", "RESIDENT", "ANNA001").await;

    let (status, body) = app
        .send(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "fullName": "Imposter",
                "email": "asha@example.com",
                "phoneNumber": "1111111111",
                "password": "different",
                "address": "1 Main",
                "locality": "Anna Nagar",
                "pincode": "600040",
                "role": "RESIDENT",
                "communityCode": "ANNA001",
            })),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "User with this email or phone number already exists");

    // The original credentials still log in.
    let (status, _) = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "emailOrPhone": "asha@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn register_validation_reports_field_errors() {
    let app = test_app().await;
    let (status, body) = app.send("POST", "/auth/register", None, Some(json!({}))).await;
    assert_eq!(status, 400);
    let errors = body["errors"].as_array().expect("errors array");
    assert!(errors.iter().any(|e| e["field"] == "fullName"));
    assert!(errors.iter().any(|e| e["field"] == "communityCode"));
}

#[tokio::test]
async fn profile_is_token_protected_and_updatable() {
    let app = test_app().await;
    app.seed_community("ANNA001").await;
    let (token, _) = app.register("asha@example.com", "9876543210", "RESIDENT", "ANNA001").await;

    let (status, body) = app.get("/auth/profile").await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Access token required");

    let (status, _) = app.send("GET", "/auth/profile", Some("garbage-token"), None).await;
    assert_eq!(status, 401);

    let (status, body) = app.send("GET", "/auth/profile", Some(&token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["fullName"], "Asha Rao");
    assert_eq!(body["city"], "Chennai");

    let (status, body) = app
        .send(
            "PUT",
            "/auth/profile",
            Some(&token),
            Some(json!({
                "fullName": "Asha R",
                "address": "14 Lake View",
                "locality": "Anna Nagar",
                "pincode": "600040",
            })),
        )
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["user"]["fullName"], "Asha R");
    assert_eq!(body["user"]["address"], "14 Lake View");
}

#[tokio::test]
async fn user_stats_reflect_live_content() {
    let app = test_app().await;
    app.seed_community("ANNA001").await;
    let (token, _) = app.register("asha@example.com", "9876543210", "RESIDENT", "ANNA001").await;

    let (status, body) = app
        .send(
            "POST",
            "/posts",
            Some(&token),
            Some(json!({
                "title": "Bookshelf",
                "description": "Solid wood",
                "category": "BUY_SELL",
                "type": "OFFER",
            })),
        )
        .await;
    assert_eq!(status, 201, "{body}");
    let post_id = body["post"]["id"].as_str().expect("post id").to_string();

    let (status, _) = app
        .send(
            "POST",
            &format!("/comments/{post_id}"),
            Some(&token),
            Some(json!({ "content": "bump" })),
        )
        .await;
    assert_eq!(status, 201);

    let (status, body) = app.send("GET", "/auth/stats", Some(&token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["posts"], 1);
    assert_eq!(body["comments"], 1);
    assert_eq!(body["totalLikes"], 0);
}
