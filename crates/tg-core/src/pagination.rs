//! # Listing & Pagination
//!
//! The one shared contract for turning (filters, page, limit) into a
//! bounded result set plus page metadata. Every list endpoint goes
//! through this module so the arithmetic can never drift between
//! endpoints. Store implementations must derive the data query and the
//! count query from the same filter predicate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, FieldError, Result};
use crate::models::PostCategory;

/// A validated, 1-indexed page request. `limit = 0` and `page = 0` are
/// rejected up front rather than producing divide-by-zero metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self> {
        let mut errors = Vec::new();
        if page == 0 {
            errors.push(FieldError::new("page", "Page must be at least 1"));
        }
        if limit == 0 {
            errors.push(FieldError::new("limit", "Limit must be at least 1"));
        }
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

/// Page metadata returned alongside every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current: u32,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    /// `total` is the count produced by the filter-identical count query.
    pub fn compute(req: &PageRequest, total: u64) -> Self {
        let limit = u64::from(req.limit);
        PageMeta {
            current: req.page,
            total_pages: total.div_ceil(limit),
            has_next: u64::from(req.page) * limit < total,
            has_prev: req.page > 1,
        }
    }
}

/// One page of items plus its metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageMeta,
}

impl<T> Page<T> {
    pub fn assemble(items: Vec<T>, total: u64, req: &PageRequest) -> Self {
        Page { items, pagination: PageMeta::compute(req, total) }
    }
}

/// Recognized post-listing predicates. `active = true` is always ANDed
/// in by the store regardless of what is set here.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub category: Option<PostCategory>,
    pub community_id: Option<Uuid>,
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
    pub owner_id: Option<Uuid>,
}

/// Recognized community-listing predicates.
#[derive(Debug, Clone, Default)]
pub struct CommunityFilter {
    /// Case-insensitive substring match over name, city and location.
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(page: u32, limit: u32) -> PageRequest {
        PageRequest::new(page, limit).unwrap()
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(req(1, 10).offset(), 0);
        assert_eq!(req(2, 10).offset(), 10);
        assert_eq!(req(7, 3).offset(), 18);
    }

    #[test]
    fn zero_limit_and_zero_page_are_rejected() {
        assert!(matches!(PageRequest::new(1, 0), Err(AppError::Validation(_))));
        assert!(matches!(PageRequest::new(0, 10), Err(AppError::Validation(_))));
        match PageRequest::new(0, 0) {
            Err(AppError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn metadata_matches_the_contract() {
        // hasNext == page*limit < total, hasPrev == page > 1,
        // totalPages == ceil(total/limit), for every (page, limit > 0).
        for (page, limit, total) in [
            (1u32, 10u32, 0u64),
            (1, 10, 10),
            (1, 10, 11),
            (2, 10, 11),
            (3, 10, 21),
            (5, 7, 33),
        ] {
            let meta = PageMeta::compute(&req(page, limit), total);
            assert_eq!(meta.current, page);
            assert_eq!(meta.total_pages, total.div_ceil(u64::from(limit)));
            assert_eq!(meta.has_next, u64::from(page) * u64::from(limit) < total);
            assert_eq!(meta.has_prev, page > 1);
        }
    }

    #[test]
    fn empty_listing_has_zero_pages() {
        let page = Page::assemble(Vec::<u32>::new(), 0, &req(1, 10));
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_next);
        assert!(!page.pagination.has_prev);
    }

    #[test]
    fn meta_serializes_camel_case() {
        let meta = PageMeta::compute(&req(2, 10), 25);
        let v = serde_json::to_value(meta).unwrap();
        assert_eq!(v["current"], 2);
        assert_eq!(v["totalPages"], 3);
        assert_eq!(v["hasNext"], true);
        assert_eq!(v["hasPrev"], true);
    }
}
