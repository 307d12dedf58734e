//! Request bodies and their validation. Every check runs before any
//! store access and failures come back as a 400 with field-level
//! messages. Missing JSON fields deserialize to empty strings so they
//! fall through the same "is required" checks as blank ones; unknown
//! fields are ignored.

use serde::Deserialize;
use uuid::Uuid;

use tg_core::error::{AppError, FieldError, Result};
use tg_core::models::{
    CommunityUpdate, NewCommunity, PostCategory, PostType, PostUpdate, ProfileUpdate, Role,
};

fn require(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(errors))
    }
}

// Deliberately shallow: enough to catch blank or clearly broken input,
// the way the source validated it. Deliverability is not our problem.
fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !s.contains(char::is_whitespace)
        }
        None => false,
    }
}

// ── Auth ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub address: String,
    pub locality: String,
    pub pincode: String,
    pub role: String,
    pub community_code: String,
}

#[derive(Debug)]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub address: String,
    pub locality: String,
    pub pincode: String,
    pub role: Role,
    pub community_code: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<RegisterInput> {
        let mut errors = Vec::new();
        require(&mut errors, "fullName", &self.full_name, "Full name is required");
        if !looks_like_email(&self.email) {
            errors.push(FieldError::new("email", "Valid email is required"));
        }
        require(&mut errors, "phoneNumber", &self.phone_number, "Phone number is required");
        if self.password.len() < 6 {
            errors.push(FieldError::new("password", "Password must be at least 6 characters"));
        }
        require(&mut errors, "address", &self.address, "Address is required");
        require(&mut errors, "locality", &self.locality, "Locality is required");
        require(&mut errors, "pincode", &self.pincode, "Pincode is required");
        let role = Role::parse(&self.role);
        if role.is_none() {
            errors.push(FieldError::new("role", "Invalid role"));
        }
        require(&mut errors, "communityCode", &self.community_code, "Community code is required");
        finish(errors)?;
        Ok(RegisterInput {
            full_name: self.full_name,
            email: self.email,
            phone_number: self.phone_number,
            password: self.password,
            address: self.address,
            locality: self.locality,
            pincode: self.pincode,
            // Checked above; unreachable fallback keeps this total.
            role: role.unwrap_or(Role::Resident),
            community_code: self.community_code,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email_or_phone: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "emailOrPhone", &self.email_or_phone, "Email or phone is required");
        require(&mut errors, "password", &self.password, "Password is required");
        finish(errors)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub address: String,
    pub locality: String,
    pub pincode: String,
    pub profile_picture: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(self) -> Result<ProfileUpdate> {
        let mut errors = Vec::new();
        require(&mut errors, "fullName", &self.full_name, "Full name is required");
        require(&mut errors, "address", &self.address, "Address is required");
        require(&mut errors, "locality", &self.locality, "Locality is required");
        require(&mut errors, "pincode", &self.pincode, "Pincode is required");
        finish(errors)?;
        Ok(ProfileUpdate {
            full_name: self.full_name,
            address: self.address,
            locality: self.locality,
            pincode: self.pincode,
            profile_picture: self.profile_picture,
        })
    }
}

// ── Posts ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub post_type: String,
    pub contact_info: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub images: Vec<String>,
}

impl PostRequest {
    pub fn validate(self) -> Result<PostUpdate> {
        let mut errors = Vec::new();
        require(&mut errors, "title", &self.title, "Title is required");
        require(&mut errors, "description", &self.description, "Description is required");
        let category = PostCategory::parse(&self.category);
        if category.is_none() {
            errors.push(FieldError::new("category", "Invalid category"));
        }
        let post_type = PostType::parse(&self.post_type);
        if post_type.is_none() {
            errors.push(FieldError::new("type", "Invalid type"));
        }
        finish(errors)?;
        Ok(PostUpdate {
            title: self.title,
            description: self.description,
            category: category.unwrap_or(PostCategory::Announcement),
            post_type: post_type.unwrap_or(PostType::Announcement),
            contact_info: self.contact_info,
            price: self.price,
            location: self.location,
            images: self.images,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRequest {
    pub reason: String,
    #[serde(rename = "type")]
    pub report_type: String,
}

impl ReportRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        let len = self.reason.trim().chars().count();
        if !(10..=500).contains(&len) {
            errors.push(FieldError::new(
                "reason",
                "Report reason must be between 10 and 500 characters",
            ));
        }
        require(&mut errors, "type", &self.report_type, "Report type is required");
        finish(errors)
    }
}

// ── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentRequest {
    pub content: String,
}

impl CommentRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "content", &self.content, "Comment content is required");
        finish(errors)
    }
}

// ── Communities ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCommunityRequest {
    pub name: String,
    pub community_code: String,
    pub location: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub description: Option<String>,
}

impl CreateCommunityRequest {
    pub fn validate(self) -> Result<NewCommunity> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name, "Community name is required");
        require(&mut errors, "communityCode", &self.community_code, "Community code is required");
        require(&mut errors, "location", &self.location, "Location is required");
        require(&mut errors, "city", &self.city, "City is required");
        require(&mut errors, "state", &self.state, "State is required");
        require(&mut errors, "pincode", &self.pincode, "Pincode is required");
        finish(errors)?;
        Ok(NewCommunity {
            name: self.name,
            community_code: self.community_code,
            location: self.location,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            description: self.description,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCommunityRequest {
    pub name: String,
    pub location: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub description: Option<String>,
}

impl UpdateCommunityRequest {
    pub fn validate(self) -> Result<CommunityUpdate> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name, "Community name is required");
        require(&mut errors, "location", &self.location, "Location is required");
        require(&mut errors, "city", &self.city, "City is required");
        require(&mut errors, "state", &self.state, "State is required");
        require(&mut errors, "pincode", &self.pincode, "Pincode is required");
        finish(errors)?;
        Ok(CommunityUpdate {
            name: self.name,
            location: self.location,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            description: self.description,
        })
    }
}

// ── List queries ────────────────────────────────────────────────────────────
// Unrecognized query keys are ignored, not rejected.

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const COMMENT_PAGE_SIZE: u32 = 20;
pub const COMMUNITY_SEARCH_CAP: u32 = 20;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostListQuery {
    pub category: Option<String>,
    pub community_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommunityListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_register_reports_every_missing_field() {
        let err = RegisterRequest::default().validate().unwrap_err();
        match err {
            AppError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                for f in [
                    "fullName",
                    "email",
                    "phoneNumber",
                    "password",
                    "address",
                    "locality",
                    "pincode",
                    "role",
                    "communityCode",
                ] {
                    assert!(fields.contains(&f), "missing error for {f}");
                }
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn short_password_and_bad_role_are_flagged() {
        let req = RegisterRequest {
            full_name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone_number: "9876543210".into(),
            password: "12345".into(),
            address: "12 Lake View".into(),
            locality: "Anna Nagar".into(),
            pincode: "600040".into(),
            role: "SUPERUSER".into(),
            community_code: "ANNA001".into(),
        };
        match req.validate().unwrap_err() {
            AppError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().any(|e| e.message.contains("at least 6")));
                assert!(errors.iter().any(|e| e.message == "Invalid role"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn email_shape_check_rejects_the_obviously_broken() {
        assert!(looks_like_email("asha@example.com"));
        assert!(!looks_like_email("asha"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("asha@nodot"));
        assert!(!looks_like_email("a sha@example.com"));
    }

    #[test]
    fn post_request_parses_enums() {
        let req = PostRequest {
            title: "Bookshelf".into(),
            description: "Solid wood".into(),
            category: "BUY_SELL".into(),
            post_type: "OFFER".into(),
            ..Default::default()
        };
        let update = req.validate().unwrap();
        assert_eq!(update.category, PostCategory::BuySell);
        assert_eq!(update.post_type, PostType::Offer);

        let bad = PostRequest {
            title: "x".into(),
            description: "y".into(),
            category: "GARAGE_SALE".into(),
            post_type: "OFFER".into(),
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn report_reason_length_is_bounded() {
        let short = ReportRequest { reason: "too short".into(), report_type: "SPAM".into() };
        assert!(short.validate().is_err());

        let ok = ReportRequest {
            reason: "Repeated spam advertising posted daily".into(),
            report_type: "SPAM".into(),
        };
        assert!(ok.validate().is_ok());

        let long = ReportRequest { reason: "x".repeat(501), report_type: "SPAM".into() };
        assert!(long.validate().is_err());
    }
}
