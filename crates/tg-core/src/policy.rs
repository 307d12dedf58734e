//! # Access Control Policy
//!
//! The single rule set deciding who may read, write, delete, or report
//! which resource. Every handler consults [`authorize`] instead of
//! inlining ownership checks next to its queries; the rules are evaluated
//! in order and the first match wins.
//!
//! Denials carry a reason, but ownership failures are surfaced to callers
//! with the same not-found framing as missing rows so that a non-owner
//! cannot confirm a resource exists.

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Role;

/// The authenticated subject behind a request, loaded from the bearer
/// token on each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub community_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub enum Actor {
    Anonymous,
    Authenticated(Identity),
}

impl Actor {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Report,
}

impl Action {
    fn is_mutating(self) -> bool {
        !matches!(self, Action::Read)
    }
}

/// What the policy needs to know about an existing row: who owns it and
/// whether it is still live. `None` at the call site means no such row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceMeta {
    pub owner_id: Uuid,
    pub is_active: bool,
}

/// The resource an action is aimed at.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// An existing post (or its absence).
    Post(Option<&'a ResourceMeta>),
    /// An existing comment (or its absence).
    Comment(Option<&'a ResourceMeta>),
    /// The community collection or a member of it.
    Community,
    /// Creating a comment under the given post.
    CommentOn { post: Option<&'a ResourceMeta> },
    /// Filing a report against the given post.
    ReportOn { post: Option<&'a ResourceMeta>, already_reported: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    NotFound,
    /// Ownership or role mismatch. Surfaced to callers as not-found.
    Forbidden,
    DuplicateReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Deny(DenyReason),
}

impl Decision {
    /// Convert the decision into a `Result`, collapsing `Forbidden` and
    /// `NotFound` into the same not-found error so denials never confirm
    /// that a row exists under another owner.
    pub fn require(self, not_found_msg: &str) -> Result<()> {
        match self {
            Decision::Permit => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => {
                Err(AppError::unauthenticated("Authentication required"))
            }
            Decision::Deny(DenyReason::NotFound) | Decision::Deny(DenyReason::Forbidden) => {
                Err(AppError::not_found(not_found_msg))
            }
            Decision::Deny(DenyReason::DuplicateReport) => {
                Err(AppError::bad_request("You have already reported this post"))
            }
        }
    }
}

/// Evaluate `(actor, target, action)` against the ordered rules.
pub fn authorize(actor: &Actor, target: &Target<'_>, action: Action) -> Decision {
    // Rule 1: anonymous actors may not mutate anything.
    if action.is_mutating() && actor.identity().is_none() {
        return Decision::Deny(DenyReason::Unauthenticated);
    }

    match (target, action) {
        // Rule 2: reads are open to everyone, but a deactivated row is
        // indistinguishable from a missing one.
        (Target::Post(meta) | Target::Comment(meta), Action::Read) => match meta {
            Some(m) if m.is_active => Decision::Permit,
            _ => Decision::Deny(DenyReason::NotFound),
        },
        (Target::Community, Action::Read) => Decision::Permit,

        // Rule 3: only the owner may update or delete a post or comment,
        // and only while it is live.
        (Target::Post(meta) | Target::Comment(meta), Action::Update | Action::Delete) => {
            let actor_id = match actor.identity() {
                Some(id) => id.id,
                None => return Decision::Deny(DenyReason::Unauthenticated),
            };
            match meta {
                Some(m) if !m.is_active => Decision::Deny(DenyReason::NotFound),
                Some(m) if m.owner_id == actor_id => Decision::Permit,
                Some(_) => Decision::Deny(DenyReason::Forbidden),
                None => Decision::Deny(DenyReason::NotFound),
            }
        }

        // Rule 4: commenting requires a live target post.
        (Target::CommentOn { post }, Action::Create) => match post {
            Some(p) if p.is_active => Decision::Permit,
            _ => Decision::Deny(DenyReason::NotFound),
        },

        // Rule 5: any authenticated user may create a post. The post's
        // community is forced to the actor's own community; see
        // [`community_for_new_post`].
        (Target::Post(None), Action::Create) => Decision::Permit,

        // Rule 6: reporting requires a live post and no prior report by
        // this actor.
        (Target::ReportOn { post, already_reported }, Action::Report) => match post {
            Some(p) if p.is_active => {
                if *already_reported {
                    Decision::Deny(DenyReason::DuplicateReport)
                } else {
                    Decision::Permit
                }
            }
            _ => Decision::Deny(DenyReason::NotFound),
        },

        // Rule 7: community mutation is an administrative action.
        (Target::Community, Action::Create | Action::Update | Action::Delete) => {
            match actor.identity() {
                Some(id) if id.role == Role::Admin => Decision::Permit,
                Some(_) => Decision::Deny(DenyReason::Forbidden),
                None => Decision::Deny(DenyReason::Unauthenticated),
            }
        }

        // Anything else was not asked for by any endpoint; deny rather
        // than guess.
        _ => Decision::Deny(DenyReason::Forbidden),
    }
}

/// Rule 5's side effect: a new post always lands in its author's
/// community, never one supplied by the client.
pub fn community_for_new_post(author: &Identity) -> Uuid {
    author.community_id
}
