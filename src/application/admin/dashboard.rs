use std::sync::Arc;

use crate::application::repos::{DashboardRepo, RepoError};
use crate::domain::entities::PostSummary;

pub const RECENT_POSTS_LIMIT: u32 = 5;

#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub total_posts: u64,
    pub published_posts: u64,
    pub draft_posts: u64,
    pub total_categories: u64,
    pub total_tags: u64,
    pub recent_posts: Vec<PostSummary>,
}

#[derive(Clone)]
pub struct AdminDashboardService {
    repo: Arc<dyn DashboardRepo>,
}

impl AdminDashboardService {
    pub fn new(repo: Arc<dyn DashboardRepo>) -> Self {
        Self { repo }
    }

    pub async fn overview(&self) -> Result<DashboardStats, RepoError> {
        let (counts, recent_posts) = tokio::try_join!(
            self.repo.content_counts(),
            self.repo.recent_posts(RECENT_POSTS_LIMIT),
        )?;

        Ok(DashboardStats {
            total_posts: counts.posts,
            published_posts: counts.published_posts,
            draft_posts: counts.posts.saturating_sub(counts.published_posts),
            total_categories: counts.categories,
            total_tags: counts.tags,
            recent_posts,
        })
    }
}
