use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, RepoError, UpdateCategoryParams,
};
use crate::domain::entities::{CategoryRecord, CategoryWithCount};

use super::{PostgresRepositories, map_sqlx_error};

const CATEGORY_COLUMNS: &str = "c.id, c.name, c.slug, c.description, c.created_at, c.updated_at";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryCountRow {
    #[sqlx(flatten)]
    category: CategoryRow,
    post_count: i64,
}

impl From<CategoryCountRow> for CategoryWithCount {
    fn from(row: CategoryCountRow) -> Self {
        Self {
            category: row.category.into(),
            post_count: row.post_count,
        }
    }
}

/// Which referencing posts contribute to `post_count`.
#[derive(Clone, Copy)]
enum CountScope {
    AllPosts,
    Published,
}

impl PostgresRepositories {
    fn category_counts_query<'q>(scope: CountScope) -> QueryBuilder<'q, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {CATEGORY_COLUMNS}, "));
        match scope {
            CountScope::AllPosts => {
                qb.push(
                    "COUNT(pc.post_id) AS post_count \
                     FROM categories c \
                     LEFT JOIN post_categories pc ON pc.category_id = c.id ",
                );
            }
            CountScope::Published => {
                qb.push(
                    "COUNT(p.id) AS post_count \
                     FROM categories c \
                     LEFT JOIN post_categories pc ON pc.category_id = c.id \
                     LEFT JOIN posts p ON p.id = pc.post_id AND p.published ",
                );
            }
        }
        qb.push(" WHERE 1=1 ");
        qb
    }

    async fn fetch_category_counts(
        &self,
        mut qb: QueryBuilder<'_, Postgres>,
    ) -> Result<Vec<CategoryWithCount>, RepoError> {
        qb.push(" GROUP BY c.id ORDER BY c.name ASC");
        let rows = qb
            .build_query_as::<CategoryCountRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CategoryWithCount::from).collect())
    }
}

#[async_trait]
impl CategoriesRepo for PostgresRepositories {
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        self.fetch_category_counts(Self::category_counts_query(CountScope::AllPosts))
            .await
    }

    async fn list_with_published_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        self.fetch_category_counts(Self::category_counts_query(CountScope::Published))
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryWithCount>, RepoError> {
        let mut qb = Self::category_counts_query(CountScope::AllPosts);
        qb.push(" AND c.id = ");
        qb.push_bind(id);
        Ok(self.fetch_category_counts(qb).await?.into_iter().next())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryWithCount>, RepoError> {
        let mut qb = Self::category_counts_query(CountScope::Published);
        qb.push(" AND c.slug = ");
        qb.push_bind(slug.to_string());
        Ok(self.fetch_category_counts(qb).await?.into_iter().next())
    }

    async fn find_conflict(
        &self,
        name: Option<&str>,
        slug: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<Option<CategoryRecord>, RepoError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories c \
             WHERE (c.name = $1 OR c.slug = $2) \
               AND ($3::uuid IS NULL OR c.id <> $3) \
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(name)
            .bind(slug)
            .bind(exclude)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRecord::from))
    }
}

#[async_trait]
impl CategoriesWriteRepo for PostgresRepositories {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let CreateCategoryParams {
            name,
            slug,
            description,
        } = params;

        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO categories (id, name, slug, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) \
             RETURNING id, name, slug, description, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CategoryRecord::from(row))
    }

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let UpdateCategoryParams {
            id,
            name,
            slug,
            description,
        } = params;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE categories SET updated_at = now()");
        if let Some(name) = name {
            qb.push(", name = ");
            qb.push_bind(name);
        }
        if let Some(slug) = slug {
            qb.push(", slug = ");
            qb.push_bind(slug);
        }
        if let Some(description) = description {
            qb.push(", description = ");
            qb.push_bind(description);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING id, name, slug, description, created_at, updated_at");

        qb.build_query_as::<CategoryRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .map(CategoryRecord::from)
            .ok_or(RepoError::NotFound)
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
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
