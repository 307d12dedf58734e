//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.
//! Store implementations own the soft-delete discipline: every read path
//! behind these ports filters `active = true`, and the page/count queries
//! for a listing are built from one shared predicate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Community, CommentView, CommunityUpdate, NewComment, NewCommunity, NewPost, NewReport,
    NewUser, PostStats, PostUpdate, PostView, ProfileUpdate, UserProfile, UserStats,
};
use crate::pagination::{CommunityFilter, Page, PageRequest, PostFilter};
use crate::policy::{Identity, ResourceMeta};

/// What the login path needs back from the credential store.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
}

/// Persistence contract for user records.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a new user. Unique-index collisions on email or phone
    /// surface as a duplicate-identity error, not as success.
    async fn insert(&self, user: NewUser) -> Result<Uuid>;

    /// True if an active user already holds this email or phone number.
    async fn identity_exists(&self, email: &str, phone: &str) -> Result<bool>;

    /// Look up the stored secret by email or phone, active users only.
    async fn find_credentials(&self, email_or_phone: &str) -> Result<Option<Credentials>>;

    /// Resolve a token subject into a policy identity, active users only.
    async fn identity(&self, id: Uuid) -> Result<Option<Identity>>;

    /// The denormalized profile projection (user joined with community).
    async fn profile(&self, id: Uuid) -> Result<Option<UserProfile>>;

    /// Returns false when no active row matched.
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<bool>;

    async fn stats(&self, id: Uuid) -> Result<UserStats>;
}

/// Persistence contract for communities.
#[async_trait]
pub trait CommunityRepo: Send + Sync {
    async fn list(&self, filter: &CommunityFilter, page: &PageRequest) -> Result<Page<Community>>;

    /// Free-text lookup over name, city, location and code, capped.
    async fn search(&self, term: &str, cap: u32) -> Result<Vec<Community>>;

    async fn by_id(&self, id: Uuid) -> Result<Option<Community>>;

    /// Code lookup used at registration time.
    async fn by_code(&self, code: &str) -> Result<Option<Community>>;

    async fn code_exists(&self, code: &str) -> Result<bool>;

    async fn insert(&self, community: NewCommunity) -> Result<Community>;

    /// Returns false when no active row matched.
    async fn update(&self, id: Uuid, update: CommunityUpdate) -> Result<Option<Community>>;

    /// Soft delete. Returns false when no active row matched.
    async fn soft_delete(&self, id: Uuid) -> Result<bool>;
}

/// Persistence contract for posts.
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn list(&self, filter: &PostFilter, page: &PageRequest) -> Result<Page<PostView>>;

    /// The denormalized projection of one active post.
    async fn view(&self, id: Uuid) -> Result<Option<PostView>>;

    /// Unconditional view-count increment, one per detail fetch.
    async fn record_view(&self, id: Uuid) -> Result<()>;

    /// Ownership and liveness for the access policy. Unlike [`view`],
    /// this sees inactive rows.
    async fn ownership(&self, id: Uuid) -> Result<Option<ResourceMeta>>;

    async fn insert(&self, post: NewPost) -> Result<Uuid>;

    /// Conditional update: matches only `id` + owner + active in a single
    /// statement, so a concurrent delete leaves it matching zero rows.
    async fn update_owned(&self, id: Uuid, owner_id: Uuid, update: PostUpdate) -> Result<bool>;

    /// Conditional soft delete with the same single-statement shape.
    async fn soft_delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<bool>;

    async fn stats(&self) -> Result<PostStats>;
}

/// Persistence contract for comments.
#[async_trait]
pub trait CommentRepo: Send + Sync {
    /// Comments in conversational order (oldest first).
    async fn list_for_post(&self, post_id: Uuid, page: &PageRequest) -> Result<Page<CommentView>>;

    async fn view(&self, id: Uuid) -> Result<Option<CommentView>>;

    async fn ownership(&self, id: Uuid) -> Result<Option<ResourceMeta>>;

    async fn insert(&self, comment: NewComment) -> Result<Uuid>;

    async fn update_owned(&self, id: Uuid, owner_id: Uuid, content: &str) -> Result<bool>;

    async fn soft_delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<bool>;
}

/// Persistence contract for abuse reports.
#[async_trait]
pub trait ReportRepo: Send + Sync {
    async fn exists(&self, post_id: Uuid, reporter_id: Uuid) -> Result<bool>;

    /// Insert a report. A unique-index collision on (post, reporter)
    /// surfaces as the duplicate-report error.
    async fn insert(&self, report: NewReport) -> Result<Uuid>;
}

/// Password hashing contract.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext secret into a self-describing PHC string.
    fn hash(&self, plain: &str) -> Result<String>;

    /// Constant-result verification; malformed hashes verify as false.
    fn verify(&self, plain: &str, hash: &str) -> bool;
}

/// Bearer token contract. Tokens are opaque to everything but the
/// identity service; they decode to a user id or nothing.
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<String>;

    /// Returns the subject for a valid, unexpired token.
    fn verify(&self, token: &str) -> Result<Uuid>;
}
