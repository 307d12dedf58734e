//! # Domain Models
//!
//! These structs represent the core entities of Tangle: users registered
//! into a community, the posts and comments they publish, and abuse
//! reports filed against posts. Rows are soft-deleted via `is_active`;
//! nothing is ever physically removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Resident,
    BusinessOwner,
    ServiceProvider,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Resident => "RESIDENT",
            Role::BusinessOwner => "BUSINESS_OWNER",
            Role::ServiceProvider => "SERVICE_PROVIDER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "RESIDENT" => Some(Role::Resident),
            "BUSINESS_OWNER" => Some(Role::BusinessOwner),
            "SERVICE_PROVIDER" => Some(Role::ServiceProvider),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Closed set of post categories shown in the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostCategory {
    HelpRequest,
    HelpOffer,
    BuySell,
    Business,
    Service,
    JobGig,
    Event,
    Announcement,
    LostFound,
    Volunteer,
}

impl PostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostCategory::HelpRequest => "HELP_REQUEST",
            PostCategory::HelpOffer => "HELP_OFFER",
            PostCategory::BuySell => "BUY_SELL",
            PostCategory::Business => "BUSINESS",
            PostCategory::Service => "SERVICE",
            PostCategory::JobGig => "JOB_GIG",
            PostCategory::Event => "EVENT",
            PostCategory::Announcement => "ANNOUNCEMENT",
            PostCategory::LostFound => "LOST_FOUND",
            PostCategory::Volunteer => "VOLUNTEER",
        }
    }

    pub fn parse(s: &str) -> Option<PostCategory> {
        match s {
            "HELP_REQUEST" => Some(PostCategory::HelpRequest),
            "HELP_OFFER" => Some(PostCategory::HelpOffer),
            "BUY_SELL" => Some(PostCategory::BuySell),
            "BUSINESS" => Some(PostCategory::Business),
            "SERVICE" => Some(PostCategory::Service),
            "JOB_GIG" => Some(PostCategory::JobGig),
            "EVENT" => Some(PostCategory::Event),
            "ANNOUNCEMENT" => Some(PostCategory::Announcement),
            "LOST_FOUND" => Some(PostCategory::LostFound),
            "VOLUNTEER" => Some(PostCategory::Volunteer),
            _ => None,
        }
    }
}

/// Whether a post asks for something, offers something, or announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostType {
    Request,
    Offer,
    Announcement,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Request => "REQUEST",
            PostType::Offer => "OFFER",
            PostType::Announcement => "ANNOUNCEMENT",
        }
    }

    pub fn parse(s: &str) -> Option<PostType> {
        match s {
            "REQUEST" => Some(PostType::Request),
            "OFFER" => Some(PostType::Offer),
            "ANNOUNCEMENT" => Some(PostType::Announcement),
            _ => None,
        }
    }
}

/// Moderation state of a report. Every report starts out `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "PENDING",
            ReportStatus::Reviewed => "REVIEWED",
            ReportStatus::Resolved => "RESOLVED",
            ReportStatus::Dismissed => "DISMISSED",
        }
    }

    pub fn parse(s: &str) -> Option<ReportStatus> {
        match s {
            "PENDING" => Some(ReportStatus::Pending),
            "REVIEWED" => Some(ReportStatus::Reviewed),
            "RESOLVED" => Some(ReportStatus::Resolved),
            "DISMISSED" => Some(ReportStatus::Dismissed),
            _ => None,
        }
    }
}

/// A registered resident. At least one of `email`/`phone_number` is set,
/// and each is unique among active users.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub address: String,
    pub locality: String,
    pub pincode: String,
    pub role: Role,
    pub community_id: Uuid,
    pub is_active: bool,
    pub is_verified: bool,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A neighborhood. Users join it at registration by quoting its code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    /// Short human-shared string used at registration instead of the id.
    pub community_code: String,
    pub location: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A categorized post scoped to the author's community.
///
/// `user_id` and `community_id` are immutable after creation; the
/// community is copied from the author at creation time, never re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: PostCategory,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub contact_info: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub images: Vec<String>,
    /// Incremented on every detail fetch, never decremented.
    pub view_count: i64,
    pub user_id: Uuid,
    pub community_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An abuse report against a post. At most one per (post, reporter).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
    #[serde(rename = "type")]
    pub report_type: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Denormalized projections ────────────────────────────────────────────────
// Listings and single-item fetches always project the same joined shape.

/// A post joined with its author and community, as returned by every
/// post read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: PostCategory,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub contact_info: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub images: Vec<String>,
    pub view_count: i64,
    pub user_id: Uuid,
    pub community_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub author_picture: Option<String>,
    pub community_name: String,
    pub community_code: String,
}

/// A comment joined with its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub author_picture: Option<String>,
}

/// A user joined with their community, minus the secret hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: String,
    pub locality: String,
    pub pincode: String,
    pub role: Role,
    pub community_id: Uuid,
    pub is_active: bool,
    pub is_verified: bool,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub community_name: String,
    pub community_code: String,
    pub community_location: String,
    pub city: String,
    pub state: String,
    pub community_pincode: String,
}

// ── Write inputs ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub address: String,
    pub locality: String,
    pub pincode: String,
    pub role: Role,
    pub community_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewCommunity {
    pub name: String,
    pub community_code: String,
    pub location: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub category: PostCategory,
    pub post_type: PostType,
    pub contact_info: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub images: Vec<String>,
    pub user_id: Uuid,
    /// Always the author's community, assigned by the access policy.
    pub community_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub user_id: Uuid,
    pub post_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub post_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: String,
    pub report_type: String,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub address: String,
    pub locality: String,
    pub pincode: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: String,
    pub description: String,
    pub category: PostCategory,
    pub post_type: PostType,
    pub contact_info: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CommunityUpdate {
    pub name: String,
    pub location: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub description: Option<String>,
}

// ── Aggregates ──────────────────────────────────────────────────────────────

/// Dashboard numbers for one user. Likes are not implemented; the field
/// is fixed at zero to keep the response shape stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub posts: i64,
    pub comments: i64,
    pub total_views: i64,
    pub total_likes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStats {
    pub total_posts: i64,
    pub total_views: i64,
    pub posts_this_week: i64,
    pub posts_this_month: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_round_trips() {
        for c in [
            "HELP_REQUEST",
            "HELP_OFFER",
            "BUY_SELL",
            "BUSINESS",
            "SERVICE",
            "JOB_GIG",
            "EVENT",
            "ANNOUNCEMENT",
            "LOST_FOUND",
            "VOLUNTEER",
        ] {
            assert_eq!(PostCategory::parse(c).unwrap().as_str(), c);
        }
        assert!(PostCategory::parse("GARAGE_SALE").is_none());
        assert_eq!(Role::parse("BUSINESS_OWNER").unwrap().as_str(), "BUSINESS_OWNER");
        assert_eq!(PostType::parse("OFFER"), Some(PostType::Offer));
        assert_eq!(ReportStatus::Pending.as_str(), "PENDING");
    }

    #[test]
    fn post_type_serializes_as_type() {
        let post = Post {
            id: Uuid::new_v4(),
            title: "Ladder to borrow".into(),
            description: "6ft aluminium".into(),
            category: PostCategory::HelpOffer,
            post_type: PostType::Offer,
            contact_info: None,
            price: None,
            location: None,
            images: vec![],
            view_count: 0,
            user_id: Uuid::new_v4(),
            community_id: Uuid::new_v4(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let v = serde_json::to_value(&post).unwrap();
        assert_eq!(v["type"], "OFFER");
        assert_eq!(v["category"], "HELP_OFFER");
        assert_eq!(v["viewCount"], 0);
    }

    #[test]
    fn user_never_serializes_secret() {
        let user = User {
            id: Uuid::new_v4(),
            full_name: "Asha Rao".into(),
            email: Some("asha@example.com".into()),
            phone_number: Some("9876543210".into()),
            password_hash: "$argon2id$v=19$...".into(),
            address: "12 Lake View".into(),
            locality: "Anna Nagar".into(),
            pincode: "600040".into(),
            role: Role::Resident,
            community_id: Uuid::new_v4(),
            is_active: true,
            is_verified: true,
            profile_picture: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let v = serde_json::to_value(&user).unwrap();
        assert!(v.get("passwordHash").is_none());
        assert!(v.get("password_hash").is_none());
    }
}
