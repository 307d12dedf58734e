use uuid::Uuid;

use tg_core::error::AppError;
use tg_core::models::*;
use tg_core::pagination::{PageRequest, PostFilter};
use tg_core::traits::{CommentRepo, CommunityRepo, PostRepo, ReportRepo, UserRepo};

use crate::SqliteStore;

// In-memory SQLite is per-connection; a single-connection pool keeps all
// queries on the same database.
async fn store() -> SqliteStore {
    SqliteStore::connect("sqlite::memory:", 1).await.expect("in-memory store")
}

async fn seed_community(store: &SqliteStore, code: &str) -> Community {
    CommunityRepo::insert(
        store,
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

async fn seed_user(store: &SqliteStore, community_id: Uuid, email: &str, phone: &str) -> Uuid {
    UserRepo::insert(
        store,
        NewUser {
            full_name: "Asha Rao".into(),
            email: Some(email.to_string()),
            phone_number: Some(phone.to_string()),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            address: "12 Lake View".into(),
            locality: "Anna Nagar".into(),
            pincode: "600040".into(),
            role: Role::Resident,
            community_id,
        },
    )
    .await
    .expect("seed user")
}

fn new_post(user_id: Uuid, community_id: Uuid, title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        description: "Lightly used, pick up only".into(),
        category: PostCategory::BuySell,
        post_type: PostType::Offer,
        contact_info: None,
        price: Some(500.0),
        location: None,
        images: vec![],
        user_id,
        community_id,
    }
}

fn page(page_no: u32, limit: u32) -> PageRequest {
    PageRequest::new(page_no, limit).unwrap()
}

#[tokio::test]
async fn duplicate_identity_is_rejected_by_the_index() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    seed_user(&store, community.id, "asha@example.com", "9876543210").await;

    assert!(store.identity_exists("asha@example.com", "0000000000").await.unwrap());
    assert!(store.identity_exists("other@example.com", "9876543210").await.unwrap());
    assert!(!store.identity_exists("other@example.com", "0000000000").await.unwrap());

    // Same email, fresh phone: the partial unique index still rejects it.
    let err = UserRepo::insert(
        &store,
        NewUser {
            full_name: "Imposter".into(),
            email: Some("asha@example.com".into()),
            phone_number: Some("1111111111".into()),
            password_hash: "x".into(),
            address: "1 Main".into(),
            locality: "Anna Nagar".into(),
            pincode: "600040".into(),
            role: Role::Resident,
            community_id: community.id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn credentials_resolve_by_email_or_phone() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let user_id = seed_user(&store, community.id, "asha@example.com", "9876543210").await;

    let by_email = store.find_credentials("asha@example.com").await.unwrap().unwrap();
    let by_phone = store.find_credentials("9876543210").await.unwrap().unwrap();
    assert_eq!(by_email.user_id, user_id);
    assert_eq!(by_phone.user_id, user_id);
    assert!(store.find_credentials("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn profile_projects_the_community_join() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let user_id = seed_user(&store, community.id, "asha@example.com", "9876543210").await;

    let profile = store.profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.community_code, "ANNA001");
    assert_eq!(profile.community_name, community.name);
    assert_eq!(profile.city, "Chennai");
    assert_eq!(profile.role, Role::Resident);
}

#[tokio::test]
async fn soft_deleted_posts_vanish_from_every_read_path() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let user_id = seed_user(&store, community.id, "asha@example.com", "9876543210").await;

    let keep = PostRepo::insert(&store, new_post(user_id, community.id, "Bookshelf")).await.unwrap();
    let gone = PostRepo::insert(&store, new_post(user_id, community.id, "Table")).await.unwrap();

    assert!(PostRepo::soft_delete_owned(&store, gone, user_id).await.unwrap());

    let listed = PostRepo::list(&store, &PostFilter::default(), &page(1, 10)).await.unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].id, keep);
    assert!(PostRepo::view(&store, gone).await.unwrap().is_none());

    // Ownership still sees the row; the policy needs its liveness.
    let meta = PostRepo::ownership(&store, gone).await.unwrap().unwrap();
    assert!(!meta.is_active);
}

#[tokio::test]
async fn listing_metadata_agrees_with_the_count_query() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let user_id = seed_user(&store, community.id, "asha@example.com", "9876543210").await;
    for i in 0..5 {
        PostRepo::insert(&store, new_post(user_id, community.id, &format!("Chair {i}")))
            .await
            .unwrap();
    }

    let listed = PostRepo::list(&store, &PostFilter::default(), &page(2, 2)).await.unwrap();
    assert_eq!(listed.items.len(), 2);
    assert_eq!(listed.pagination.current, 2);
    assert_eq!(listed.pagination.total_pages, 3);
    assert!(listed.pagination.has_next);
    assert!(listed.pagination.has_prev);

    // The same filter feeds both queries, search included.
    let filter = PostFilter { search: Some("chair".into()), ..Default::default() };
    let searched = PostRepo::list(&store, &filter, &page(1, 2)).await.unwrap();
    assert_eq!(searched.items.len(), 2);
    assert_eq!(searched.pagination.total_pages, 3);
}

#[tokio::test]
async fn posts_list_newest_first() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let user_id = seed_user(&store, community.id, "asha@example.com", "9876543210").await;
    let first = PostRepo::insert(&store, new_post(user_id, community.id, "First")).await.unwrap();
    let second = PostRepo::insert(&store, new_post(user_id, community.id, "Second")).await.unwrap();

    let listed = PostRepo::list(&store, &PostFilter::default(), &page(1, 10)).await.unwrap();
    assert_eq!(listed.items[0].id, second);
    assert_eq!(listed.items[1].id, first);
}

#[tokio::test]
async fn non_owner_update_matches_zero_rows() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let owner = seed_user(&store, community.id, "asha@example.com", "9876543210").await;
    let other = seed_user(&store, community.id, "ravi@example.com", "9876500000").await;
    let post_id = PostRepo::insert(&store, new_post(owner, community.id, "Bookshelf")).await.unwrap();

    let update = PostUpdate {
        title: "Hijacked".into(),
        description: "x".into(),
        category: PostCategory::BuySell,
        post_type: PostType::Offer,
        contact_info: None,
        price: None,
        location: None,
        images: vec![],
    };
    assert!(!PostRepo::update_owned(&store, post_id, other, update).await.unwrap());

    let view = PostRepo::view(&store, post_id).await.unwrap().unwrap();
    assert_eq!(view.title, "Bookshelf");
}

#[tokio::test]
async fn soft_delete_is_not_repeatable() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let user_id = seed_user(&store, community.id, "asha@example.com", "9876543210").await;
    let post_id = PostRepo::insert(&store, new_post(user_id, community.id, "Bookshelf")).await.unwrap();

    assert!(PostRepo::soft_delete_owned(&store, post_id, user_id).await.unwrap());
    // Second delete matches zero rows even for the owner.
    assert!(!PostRepo::soft_delete_owned(&store, post_id, user_id).await.unwrap());
}

#[tokio::test]
async fn view_counter_increments_per_fetch() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let user_id = seed_user(&store, community.id, "asha@example.com", "9876543210").await;
    let post_id = PostRepo::insert(&store, new_post(user_id, community.id, "Bookshelf")).await.unwrap();

    for _ in 0..3 {
        store.record_view(post_id).await.unwrap();
    }
    let view = PostRepo::view(&store, post_id).await.unwrap().unwrap();
    assert_eq!(view.view_count, 3);
}

#[tokio::test]
async fn comments_read_in_conversational_order() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let user_id = seed_user(&store, community.id, "asha@example.com", "9876543210").await;
    let post_id = PostRepo::insert(&store, new_post(user_id, community.id, "Bookshelf")).await.unwrap();

    let first = CommentRepo::insert(
        &store,
        NewComment { content: "Is it still available?".into(), user_id, post_id },
    )
    .await
    .unwrap();
    let second = CommentRepo::insert(
        &store,
        NewComment { content: "Yes, it is".into(), user_id, post_id },
    )
    .await
    .unwrap();

    let listed = store.list_for_post(post_id, &page(1, 20)).await.unwrap();
    assert_eq!(listed.items[0].id, first);
    assert_eq!(listed.items[1].id, second);
    assert_eq!(listed.items[0].author_name, "Asha Rao");
}

#[tokio::test]
async fn report_dedup_holds_at_the_index() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let reporter = seed_user(&store, community.id, "asha@example.com", "9876543210").await;
    let owner = seed_user(&store, community.id, "ravi@example.com", "9876500000").await;
    let post_id = PostRepo::insert(&store, new_post(owner, community.id, "Spam post")).await.unwrap();

    let report = NewReport {
        post_id,
        reporter_id: reporter,
        reason: "Spam advertising repeated daily".into(),
        report_type: "INAPPROPRIATE_CONTENT".into(),
    };
    ReportRepo::insert(&store, report.clone()).await.unwrap();
    assert!(store.exists(post_id, reporter).await.unwrap());

    let err = ReportRepo::insert(&store, report).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn community_lookup_ignores_soft_deleted_rows() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;

    assert!(store.by_code("ANNA001").await.unwrap().is_some());
    assert!(store.code_exists("ANNA001").await.unwrap());

    assert!(store.soft_delete(community.id).await.unwrap());
    assert!(store.by_code("ANNA001").await.unwrap().is_none());
    assert!(store.by_id(community.id).await.unwrap().is_none());
    assert!(!store.code_exists("ANNA001").await.unwrap());

    // The code is free for reuse once the old community is gone.
    seed_community(&store, "ANNA001").await;
}

#[tokio::test]
async fn community_search_matches_the_code_too() {
    let store = store().await;
    seed_community(&store, "ANNA001").await;
    seed_community(&store, "VELA002").await;

    let hits = store.search("VELA", 20).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].community_code, "VELA002");
}

#[tokio::test]
async fn user_stats_count_only_live_rows() {
    let store = store().await;
    let community = seed_community(&store, "ANNA001").await;
    let user_id = seed_user(&store, community.id, "asha@example.com", "9876543210").await;

    let live = PostRepo::insert(&store, new_post(user_id, community.id, "Live")).await.unwrap();
    let dead = PostRepo::insert(&store, new_post(user_id, community.id, "Dead")).await.unwrap();
    store.record_view(live).await.unwrap();
    store.record_view(live).await.unwrap();
    PostRepo::soft_delete_owned(&store, dead, user_id).await.unwrap();
    CommentRepo::insert(
        &store,
        NewComment { content: "hello".into(), user_id, post_id: live },
    )
    .await
    .unwrap();

    let stats = UserRepo::stats(&store, user_id).await.unwrap();
    assert_eq!(stats.posts, 1);
    assert_eq!(stats.comments, 1);
    assert_eq!(stats.total_views, 2);
    assert_eq!(stats.total_likes, 0);
}
