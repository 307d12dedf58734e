//! Seeds a demo community with a handful of residents, posts, and
//! comments so a fresh checkout has something to browse. Safe to run
//! against an existing database: codes that already exist are skipped.

use anyhow::Context;
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::name::en::Name;
use fake::Fake;

use tg_core::models::{NewComment, NewCommunity, NewPost, NewUser, PostCategory, PostType, Role};
use tg_core::traits::{CommentRepo, CommunityRepo, CredentialHasher, PostRepo, UserRepo};
use tg_auth_jwt::Argon2Hasher;
use tg_config::AppConfig;
use tg_db_sqlite::SqliteStore;

const DEMO_PASSWORD: &str = "password123";

const CATEGORIES: &[(PostCategory, PostType, &str)] = &[
    (PostCategory::BuySell, PostType::Offer, "Bookshelf for sale"),
    (PostCategory::HelpRequest, PostType::Request, "Need a ladder for the weekend"),
    (PostCategory::Event, PostType::Announcement, "Sunday park cleanup"),
    (PostCategory::Service, PostType::Offer, "Math tuition, grades 6-10"),
    (PostCategory::LostFound, PostType::Announcement, "Found a set of keys near gate 2"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let config = AppConfig::load().context("loading configuration")?;
    let store = SqliteStore::connect(&config.database.url, config.database.max_connections)
        .await
        .context("connecting to the database")?;
    let hasher = Argon2Hasher::default();
    let password_hash = hasher.hash(DEMO_PASSWORD)?;

    let communities = [("ANNA001", "Anna Nagar Gardens"), ("VELA002", "Velachery Lake View")];
    for (ci, (code, name)) in communities.into_iter().enumerate() {
        if store.code_exists(code).await? {
            tracing::info!(code, "community already seeded, skipping");
            continue;
        }
        let community = CommunityRepo::insert(
            &store,
            NewCommunity {
                name: name.to_string(),
                community_code: code.to_string(),
                location: StreetName().fake(),
                city: CityName().fake(),
                state: "Tamil Nadu".into(),
                pincode: "600040".into(),
                description: Some(format!("The {name} residents' network")),
            },
        )
        .await?;
        tracing::info!(code, "community created");

        let mut residents = Vec::new();
        for i in 0..3 {
            let user_id = UserRepo::insert(
                &store,
                NewUser {
                    full_name: Name().fake(),
                    // Identities are unique-indexed; keep them deterministic.
                    email: Some(format!("{}.{i}@example.com", code.to_lowercase())),
                    phone_number: Some(format!("98765{:03}{:02}", ci, i)),
                    password_hash: password_hash.clone(),
                    address: format!("{} {}", i + 1, StreetName().fake::<String>()),
                    locality: name.to_string(),
                    pincode: "600040".into(),
                    role: if i == 0 { Role::Admin } else { Role::Resident },
                    community_id: community.id,
                },
            )
            .await?;
            residents.push(user_id);
        }

        for (i, (category, post_type, title)) in CATEGORIES.iter().enumerate() {
            let author = residents[i % residents.len()];
            let post_id = PostRepo::insert(
                &store,
                NewPost {
                    title: (*title).to_string(),
                    description: format!("{title}. Reply here or ping me directly."),
                    category: *category,
                    post_type: *post_type,
                    contact_info: None,
                    price: matches!(category, PostCategory::BuySell).then_some(500.0),
                    location: None,
                    images: vec![],
                    user_id: author,
                    community_id: community.id,
                },
            )
            .await?;
            CommentRepo::insert(
                &store,
                NewComment {
                    content: "Interested, is this still on?".into(),
                    user_id: residents[(i + 1) % residents.len()],
                    post_id,
                },
            )
            .await?;
        }
        tracing::info!(code, posts = CATEGORIES.len(), "demo content created");
    }

    tracing::info!(password = DEMO_PASSWORD, "seed complete; all demo users share one password");
    Ok(())
}
