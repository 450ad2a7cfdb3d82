//! Public full-text search over published posts.
//!
//! The predicate is `published AND (text match) AND (category membership)`.
//! Text match is a case-insensitive substring test against the title, the
//! excerpt, the content and the names of attached categories and tags.

use crate::domain::entities::PostDetail;

pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// The category value that disables category narrowing.
const ALL_CATEGORIES: &str = "all";

/// Validated search criteria shared by the SQL and in-memory implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub term: String,
    pub category: Option<String>,
}

impl SearchFilter {
    /// Reference semantics for the SQL predicate.
    pub fn matches(&self, detail: &PostDetail) -> bool {
        detail.post.published && self.matches_text(detail) && self.matches_category(detail)
    }

    fn matches_text(&self, detail: &PostDetail) -> bool {
        let needle = self.term.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&detail.post.title)
            || detail.post.excerpt.as_deref().is_some_and(contains)
            || contains(&detail.post.content)
            || detail.categories.iter().any(|c| contains(&c.name))
            || detail.tags.iter().any(|t| contains(&t.name))
    }

    fn matches_category(&self, detail: &PostDetail) -> bool {
        match self.category.as_deref() {
            Some(slug) => detail.categories.iter().any(|c| c.slug == slug),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchQueryError {
    #[error("Search query is required")]
    MissingQuery,
    #[error("offset must not be negative")]
    NegativeOffset,
}

/// A parsed `/api/blog/search` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub filter: SearchFilter,
    pub limit: u32,
    pub offset: u64,
    /// The `category` parameter exactly as supplied, echoed in the response.
    pub requested_category: Option<String>,
}

impl SearchQuery {
    pub fn parse(
        q: Option<&str>,
        category: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Self, SearchQueryError> {
        // Blank terms are rejected; anything else is matched and echoed as sent.
        let term = q
            .filter(|value| !value.trim().is_empty())
            .ok_or(SearchQueryError::MissingQuery)?;

        let offset = match offset {
            Some(value) if value < 0 => return Err(SearchQueryError::NegativeOffset),
            Some(value) => value.unsigned_abs(),
            None => 0,
        };

        let limit = limit
            .map(|value| value.clamp(1, i64::from(MAX_SEARCH_LIMIT)))
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(DEFAULT_SEARCH_LIMIT);

        let narrowed = category
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != ALL_CATEGORIES)
            .map(str::to_string);

        Ok(Self {
            filter: SearchFilter {
                term: term.to_string(),
                category: narrowed,
            },
            limit,
            offset,
            requested_category: category.map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
    pub has_more: bool,
}

impl Pagination {
    pub fn new(total: u64, limit: u32, offset: u64) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset.saturating_add(u64::from(limit)) < total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResults {
    pub posts: Vec<PostDetail>,
    pub pagination: Pagination,
    pub query: String,
    pub category: Option<String>,
}
