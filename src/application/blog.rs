//! Unauthenticated read side: published posts, categories and search.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::debug;

use crate::application::repos::{CategoriesRepo, PostsRepo, RepoError};
use crate::application::search::{Pagination, SearchQuery, SearchQueryError, SearchResults};
use crate::domain::entities::{CategoryWithCount, PostDetail};

pub(crate) const METRIC_SEARCH_TOTAL: &str = "quill_search_requests_total";

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    InvalidQuery(#[from] SearchQueryError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Category page: the category, its published posts and the sidebar list.
#[derive(Debug, Clone)]
pub struct CategoryPage {
    pub category: CategoryWithCount,
    pub posts: Vec<PostDetail>,
    pub all_categories: Vec<CategoryWithCount>,
}

#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostsRepo>,
    categories: Arc<dyn CategoriesRepo>,
}

impl BlogService {
    pub fn new(posts: Arc<dyn PostsRepo>, categories: Arc<dyn CategoriesRepo>) -> Self {
        Self { posts, categories }
    }

    pub async fn list_posts(&self) -> Result<Vec<PostDetail>, BlogError> {
        Ok(self.posts.list_published().await?)
    }

    /// Drafts are indistinguishable from missing slugs.
    pub async fn post(&self, slug: &str) -> Result<PostDetail, BlogError> {
        self.posts
            .find_published_by_slug(slug)
            .await?
            .ok_or(BlogError::NotFound("post"))
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, BlogError> {
        Ok(self.categories.list_with_published_counts().await?)
    }

    pub async fn category_page(&self, slug: &str) -> Result<CategoryPage, BlogError> {
        let (category, all_categories) = tokio::try_join!(
            self.categories.find_by_slug(slug),
            self.categories.list_with_published_counts(),
        )?;
        let category = category.ok_or(BlogError::NotFound("category"))?;

        let posts = self
            .posts
            .list_published_in_category(category.category.id)
            .await?;

        Ok(CategoryPage {
            category,
            posts,
            all_categories,
        })
    }

    /// Runs the query once; storage failures are returned, not retried.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResults, BlogError> {
        counter!(METRIC_SEARCH_TOTAL).increment(1);

        let page = self
            .posts
            .search_published(&query.filter, query.limit, query.offset)
            .await?;

        debug!(
            target = "quill::blog::search",
            term = %query.filter.term,
            category = ?query.filter.category,
            total = page.total,
            "search executed"
        );

        Ok(SearchResults {
            posts: page.posts,
            pagination: Pagination::new(page.total, query.limit, query.offset),
            query: query.filter.term,
            category: query.requested_category,
        })
    }
}
