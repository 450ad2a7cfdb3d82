use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::infra::db::map_sqlx_error;

use super::PostgresRepositories;
use super::types::{POST_COLUMNS, PostRecordRow};

/// Join tables owned by a post.
#[derive(Clone, Copy)]
enum Relation {
    Categories,
    Tags,
}

impl Relation {
    fn delete_sql(self) -> &'static str {
        match self {
            Relation::Categories => "DELETE FROM post_categories WHERE post_id = $1",
            Relation::Tags => "DELETE FROM post_tags WHERE post_id = $1",
        }
    }

    fn insert_sql(self) -> &'static str {
        match self {
            Relation::Categories => {
                "INSERT INTO post_categories (post_id, category_id) \
                 SELECT DISTINCT $1::uuid, linked FROM UNNEST($2::uuid[]) AS linked"
            }
            Relation::Tags => {
                "INSERT INTO post_tags (post_id, tag_id) \
                 SELECT DISTINCT $1::uuid, linked FROM UNNEST($2::uuid[]) AS linked"
            }
        }
    }
}

/// Clear-then-reconnect: afterwards the relation holds exactly `ids`.
async fn replace_links(
    conn: &mut PgConnection,
    relation: Relation,
    post_id: Uuid,
    ids: &[Uuid],
) -> Result<(), RepoError> {
    sqlx::query(relation.delete_sql())
        .bind(post_id)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(relation.insert_sql())
        .bind(post_id)
        .bind(ids)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    Ok(())
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            title,
            slug,
            content,
            excerpt,
            published,
            published_at,
            author_id,
            category_ids,
            tag_ids,
        } = params;

        let mut tx = self.begin().await?;
        let sql = format!(
            "INSERT INTO posts AS p (\
                 id, title, slug, content, excerpt, published, published_at, \
                 created_at, updated_at, author_id\
             ) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, $9) \
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRecordRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(title)
            .bind(slug)
            .bind(content)
            .bind(excerpt)
            .bind(published)
            .bind(published_at)
            .bind(OffsetDateTime::now_utc())
            .bind(author_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        replace_links(&mut tx, Relation::Categories, row.id, &category_ids).await?;
        replace_links(&mut tx, Relation::Tags, row.id, &tag_ids).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            id,
            title,
            slug,
            content,
            excerpt,
            published,
            published_at,
            category_ids,
            tag_ids,
        } = params;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE posts AS p SET updated_at = now()");
        if let Some(title) = title {
            qb.push(", title = ");
            qb.push_bind(title);
        }
        if let Some(slug) = slug {
            qb.push(", slug = ");
            qb.push_bind(slug);
        }
        if let Some(content) = content {
            qb.push(", content = ");
            qb.push_bind(content);
        }
        if let Some(excerpt) = excerpt {
            qb.push(", excerpt = ");
            qb.push_bind(excerpt);
        }
        if let Some(published) = published {
            qb.push(", published = ");
            qb.push_bind(published);
        }
        if let Some(published_at) = published_at {
            qb.push(", published_at = ");
            qb.push_bind(published_at);
        }
        qb.push(" WHERE p.id = ");
        qb.push_bind(id);
        qb.push(" RETURNING ");
        qb.push(POST_COLUMNS);

        let mut tx = self.begin().await?;
        let row = qb
            .build_query_as::<PostRecordRow>()
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        if let Some(ids) = category_ids {
            replace_links(&mut tx, Relation::Categories, id, &ids).await?;
        }
        if let Some(ids) = tag_ids {
            replace_links(&mut tx, Relation::Tags, id, &ids).await?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
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
