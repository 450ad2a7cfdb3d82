use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateTagParams, RepoError, TagsRepo, TagsWriteRepo, UpdateTagParams,
};
use crate::domain::entities::{TagRecord, TagWithCount};

use super::{PostgresRepositories, map_sqlx_error};

const TAG_RETURNING: &str = " RETURNING id, name, slug, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct TagRow {
    id: Uuid,
    name: String,
    slug: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<TagRow> for TagRecord {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TagCountRow {
    #[sqlx(flatten)]
    tag: TagRow,
    post_count: i64,
}

impl From<TagCountRow> for TagWithCount {
    fn from(row: TagCountRow) -> Self {
        Self {
            tag: row.tag.into(),
            post_count: row.post_count,
        }
    }
}

impl PostgresRepositories {
    fn tag_counts_query<'q>() -> QueryBuilder<'q, Postgres> {
        QueryBuilder::new(
            "SELECT t.id, t.name, t.slug, t.created_at, t.updated_at, \
                    COUNT(pt.post_id) AS post_count \
             FROM tags t \
             LEFT JOIN post_tags pt ON pt.tag_id = t.id \
             WHERE 1=1 ",
        )
    }
}

#[async_trait]
impl TagsRepo for PostgresRepositories {
    async fn list_with_counts(&self) -> Result<Vec<TagWithCount>, RepoError> {
        let mut qb = Self::tag_counts_query();
        qb.push(" GROUP BY t.id ORDER BY t.name ASC");

        let rows = qb
            .build_query_as::<TagCountRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TagWithCount::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TagWithCount>, RepoError> {
        let mut qb = Self::tag_counts_query();
        qb.push(" AND t.id = ");
        qb.push_bind(id);
        qb.push(" GROUP BY t.id");

        let row = qb
            .build_query_as::<TagCountRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(TagWithCount::from))
    }

    async fn find_conflict(
        &self,
        name: Option<&str>,
        slug: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<Option<TagRecord>, RepoError> {
        let row = sqlx::query_as::<_, TagRow>(
            "SELECT id, name, slug, created_at, updated_at FROM tags \
             WHERE (name = $1 OR slug = $2) \
               AND ($3::uuid IS NULL OR id <> $3) \
             LIMIT 1",
        )
        .bind(name)
        .bind(slug)
        .bind(exclude)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(TagRecord::from))
    }
}

#[async_trait]
impl TagsWriteRepo for PostgresRepositories {
    async fn create_tag(&self, params: CreateTagParams) -> Result<TagRecord, RepoError> {
        let CreateTagParams { name, slug } = params;

        let sql = format!(
            "INSERT INTO tags (id, name, slug, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4){TAG_RETURNING}"
        );
        let row = sqlx::query_as::<_, TagRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(slug)
            .bind(OffsetDateTime::now_utc())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(TagRecord::from(row))
    }

    async fn update_tag(&self, params: UpdateTagParams) -> Result<TagRecord, RepoError> {
        let UpdateTagParams { id, name, slug } = params;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE tags SET updated_at = now()");
        if let Some(name) = name {
            qb.push(", name = ");
            qb.push_bind(name);
        }
        if let Some(slug) = slug {
            qb.push(", slug = ");
            qb.push_bind(slug);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(TAG_RETURNING);

        qb.build_query_as::<TagRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .map(TagRecord::from)
            .ok_or(RepoError::NotFound)
    }

    async fn delete_tag(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
