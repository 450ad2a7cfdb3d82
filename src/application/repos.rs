//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::search::SearchFilter;
use crate::domain::entities::{
    CategoryRecord, CategoryWithCount, PostDetail, PostRecord, PostSummary, TagRecord,
    TagWithCount, UserRecord,
};
use crate::domain::types::Role;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

// ----- Users -----

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;
}

#[async_trait]
pub trait UsersWriteRepo: Send + Sync {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError>;
}

// ----- Categories -----

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryParams {
    pub id: Uuid,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    /// Every category ordered by name, counting all referencing posts.
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;
    /// Every category ordered by name, counting only published posts.
    async fn list_with_published_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryWithCount>, RepoError>;
    /// Public lookup; the count covers published posts only.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryWithCount>, RepoError>;
    /// First category whose name or slug equals one of the supplied values,
    /// ignoring `exclude`.
    async fn find_conflict(
        &self,
        name: Option<&str>,
        slug: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<Option<CategoryRecord>, RepoError>;
}

#[async_trait]
pub trait CategoriesWriteRepo: Send + Sync {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;
    /// Fails with `RepoError::NotFound` when the id does not exist.
    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;
    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError>;
}

// ----- Tags -----

#[derive(Debug, Clone)]
pub struct CreateTagParams {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTagParams {
    pub id: Uuid,
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[async_trait]
pub trait TagsRepo: Send + Sync {
    async fn list_with_counts(&self) -> Result<Vec<TagWithCount>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TagWithCount>, RepoError>;
    async fn find_conflict(
        &self,
        name: Option<&str>,
        slug: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<Option<TagRecord>, RepoError>;
}

#[async_trait]
pub trait TagsWriteRepo: Send + Sync {
    async fn create_tag(&self, params: CreateTagParams) -> Result<TagRecord, RepoError>;
    async fn update_tag(&self, params: UpdateTagParams) -> Result<TagRecord, RepoError>;
    async fn delete_tag(&self, id: Uuid) -> Result<(), RepoError>;
}

// ----- Posts -----

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub published_at: Option<OffsetDateTime>,
    pub author_id: Uuid,
    pub category_ids: Vec<Uuid>,
    pub tag_ids: Vec<Uuid>,
}

/// Partial post update. `None` leaves a column or relation untouched; a
/// present id list replaces the whole relation set.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub published: Option<bool>,
    pub published_at: Option<OffsetDateTime>,
    pub category_ids: Option<Vec<Uuid>>,
    pub tag_ids: Option<Vec<Uuid>>,
}

/// One page of search hits plus the size of the whole match set.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub posts: Vec<PostDetail>,
    pub total: u64,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Admin table rows, newest first.
    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError>;
    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;
    /// Published posts ordered by publish date, newest first.
    async fn list_published(&self) -> Result<Vec<PostDetail>, RepoError>;
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostDetail>, RepoError>;
    async fn list_published_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<PostDetail>, RepoError>;
    async fn search_published(
        &self,
        filter: &SearchFilter,
        limit: u32,
        offset: u64,
    ) -> Result<SearchPage, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;
    /// Fails with `RepoError::NotFound` when the id does not exist.
    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;
    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;
}

// ----- Dashboard -----

/// Row counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentCounts {
    pub posts: u64,
    pub published_posts: u64,
    pub categories: u64,
    pub tags: u64,
}

#[async_trait]
pub trait DashboardRepo: Send + Sync {
    async fn content_counts(&self) -> Result<ContentCounts, RepoError>;
    /// Admin table rows for the most recently created posts.
    async fn recent_posts(&self, limit: u32) -> Result<Vec<PostSummary>, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn health_check(&self) -> Result<(), RepoError>;
}
