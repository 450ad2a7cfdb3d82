use async_trait::async_trait;
use tokio::try_join;

use crate::application::repos::{ContentCounts, DashboardRepo, RepoError};
use crate::domain::entities::PostSummary;

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl DashboardRepo for PostgresRepositories {
    async fn content_counts(&self) -> Result<ContentCounts, RepoError> {
        let posts = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts").fetch_one(self.pool());
        let published =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE published")
                .fetch_one(self.pool());
        let categories =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories").fetch_one(self.pool());
        let tags = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags").fetch_one(self.pool());

        let (posts, published, categories, tags) =
            try_join!(posts, published, categories, tags).map_err(map_sqlx_error)?;

        Ok(ContentCounts {
            posts: Self::convert_count(posts)?,
            published_posts: Self::convert_count(published)?,
            categories: Self::convert_count(categories)?,
            tags: Self::convert_count(tags)?,
        })
    }

    async fn recent_posts(&self, limit: u32) -> Result<Vec<PostSummary>, RepoError> {
        self.fetch_summaries(Some(limit)).await
    }
}
