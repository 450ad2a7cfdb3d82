use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tokio::try_join;
use uuid::Uuid;

use crate::application::repos::{PostsRepo, RepoError, SearchPage};
use crate::application::search::SearchFilter;
use crate::domain::entities::{PostDetail, PostRecord, PostSummary};
use crate::infra::db::map_sqlx_error;

use super::PostgresRepositories;
use super::types::{
    LinkRow, Links, NEWEST_FIRST_ORDER, POST_COLUMNS, POST_WITH_AUTHOR_COLUMNS, PUBLISHED_ORDER,
    PostRecordRow, PostRow, PostSummaryRow,
};

impl PostgresRepositories {
    fn post_detail_query<'q>() -> QueryBuilder<'q, Postgres> {
        QueryBuilder::new(format!(
            "SELECT {POST_WITH_AUTHOR_COLUMNS} \
             FROM posts p \
             INNER JOIN users u ON u.id = p.author_id \
             WHERE 1=1 "
        ))
    }

    async fn load_links(&self, post_ids: &[Uuid]) -> Result<Links, RepoError> {
        if post_ids.is_empty() {
            return Ok(Links::default());
        }

        let categories = sqlx::query_as::<_, LinkRow>(
            "SELECT pc.post_id, c.id, c.name, c.slug \
             FROM post_categories pc \
             INNER JOIN categories c ON c.id = pc.category_id \
             WHERE pc.post_id = ANY($1) \
             ORDER BY c.name ASC",
        )
        .bind(post_ids)
        .fetch_all(self.pool());

        let tags = sqlx::query_as::<_, LinkRow>(
            "SELECT pt.post_id, t.id, t.name, t.slug \
             FROM post_tags pt \
             INNER JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.post_id = ANY($1) \
             ORDER BY t.name ASC",
        )
        .bind(post_ids)
        .fetch_all(self.pool());

        let (categories, tags) = try_join!(categories, tags).map_err(map_sqlx_error)?;
        Ok(Links::new(categories, tags))
    }

    async fn fetch_details(
        &self,
        mut qb: QueryBuilder<'_, Postgres>,
    ) -> Result<Vec<PostDetail>, RepoError> {
        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.post.id).collect();
        let mut links = self.load_links(&ids).await?;
        Ok(rows.into_iter().map(|row| links.detail(row)).collect())
    }

    /// Admin table rows, newest first, optionally capped at `limit`.
    pub(crate) async fn fetch_summaries(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<PostSummary>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {POST_WITH_AUTHOR_COLUMNS}, \
                    (SELECT COUNT(*) FROM post_tags pt WHERE pt.post_id = p.id) AS tag_count \
             FROM posts p \
             INNER JOIN users u ON u.id = p.author_id"
        ));
        qb.push(NEWEST_FIRST_ORDER);
        if let Some(limit) = limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }

        let rows = qb
            .build_query_as::<PostSummaryRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.row.post.id).collect();
        let mut links = self.load_links(&ids).await?;
        Ok(rows.into_iter().map(|row| links.summary(row)).collect())
    }

    async fn count_search_matches(&self, filter: &SearchFilter) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p WHERE 1=1 ");
        Self::push_search_filter(&mut qb, filter);

        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Self::convert_count(total)
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
        self.fetch_summaries(None).await
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let mut qb = Self::post_detail_query();
        qb.push(" AND p.id = ");
        qb.push_bind(id);
        Ok(self.fetch_details(qb).await?.into_iter().next())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.slug = $1");
        let row = sqlx::query_as::<_, PostRecordRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn list_published(&self) -> Result<Vec<PostDetail>, RepoError> {
        let mut qb = Self::post_detail_query();
        qb.push(" AND p.published");
        qb.push(PUBLISHED_ORDER);
        self.fetch_details(qb).await
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostDetail>, RepoError> {
        let mut qb = Self::post_detail_query();
        qb.push(" AND p.published AND p.slug = ");
        qb.push_bind(slug.to_string());
        Ok(self.fetch_details(qb).await?.into_iter().next())
    }

    async fn list_published_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<PostDetail>, RepoError> {
        let mut qb = Self::post_detail_query();
        qb.push(
            " AND p.published AND EXISTS (SELECT 1 FROM post_categories pc \
             WHERE pc.post_id = p.id AND pc.category_id = ",
        );
        qb.push_bind(category_id);
        qb.push(")");
        qb.push(PUBLISHED_ORDER);
        self.fetch_details(qb).await
    }

    async fn search_published(
        &self,
        filter: &SearchFilter,
        limit: u32,
        offset: u64,
    ) -> Result<SearchPage, RepoError> {
        let total = self.count_search_matches(filter).await?;

        let mut qb = Self::post_detail_query();
        Self::push_search_filter(&mut qb, filter);
        qb.push(PUBLISHED_ORDER);
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let posts = self.fetch_details(qb).await?;
        Ok(SearchPage { posts, total })
    }
}
