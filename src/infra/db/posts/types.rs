use std::collections::HashMap;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{
    AuthorSummary, CategoryRef, PostDetail, PostRecord, PostSummary, TagRef,
};

/// Post columns qualified with the `p` alias.
pub(crate) const POST_COLUMNS: &str = "p.id, p.title, p.slug, p.content, p.excerpt, p.published, \
     p.published_at, p.created_at, p.updated_at, p.author_id";

/// Post columns plus the author projection; expects `users u` joined on `p.author_id`.
pub(crate) const POST_WITH_AUTHOR_COLUMNS: &str = "p.id, p.title, p.slug, p.content, p.excerpt, \
     p.published, p.published_at, p.created_at, p.updated_at, p.author_id, \
     u.name AS author_name, u.email AS author_email, u.image AS author_image";

/// `p.id` breaks ties so `LIMIT`/`OFFSET` pages never overlap.
pub(crate) const PUBLISHED_ORDER: &str =
    " ORDER BY p.published_at DESC NULLS LAST, p.created_at DESC, p.id DESC";

pub(crate) const NEWEST_FIRST_ORDER: &str = " ORDER BY p.created_at DESC, p.id DESC";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRecordRow {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) content: String,
    pub(crate) excerpt: Option<String>,
    pub(crate) published: bool,
    pub(crate) published_at: Option<OffsetDateTime>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
    pub(crate) author_id: Uuid,
}

impl From<PostRecordRow> for PostRecord {
    fn from(row: PostRecordRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            content: row.content,
            excerpt: row.excerpt,
            published: row.published,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author_id: row.author_id,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    #[sqlx(flatten)]
    pub(crate) post: PostRecordRow,
    pub(crate) author_name: Option<String>,
    pub(crate) author_email: String,
    pub(crate) author_image: Option<String>,
}

impl PostRow {
    fn split(self) -> (PostRecord, AuthorSummary) {
        let author = AuthorSummary {
            name: self.author_name,
            email: self.author_email,
            image: self.author_image,
        };
        (self.post.into(), author)
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostSummaryRow {
    #[sqlx(flatten)]
    pub(crate) row: PostRow,
    pub(crate) tag_count: i64,
}

/// One relation edge: the post it belongs to plus the referenced row.
#[derive(sqlx::FromRow)]
pub(crate) struct LinkRow {
    pub(crate) post_id: Uuid,
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) slug: String,
}

/// Relation rows grouped by post id.
#[derive(Default)]
pub(crate) struct Links {
    categories: HashMap<Uuid, Vec<CategoryRef>>,
    tags: HashMap<Uuid, Vec<TagRef>>,
}

impl Links {
    pub(crate) fn new(categories: Vec<LinkRow>, tags: Vec<LinkRow>) -> Self {
        let mut links = Self::default();
        for row in categories {
            links.categories.entry(row.post_id).or_default().push(CategoryRef {
                id: row.id,
                name: row.name,
                slug: row.slug,
            });
        }
        for row in tags {
            links.tags.entry(row.post_id).or_default().push(TagRef {
                id: row.id,
                name: row.name,
                slug: row.slug,
            });
        }
        links
    }

    pub(crate) fn detail(&mut self, row: PostRow) -> PostDetail {
        let (post, author) = row.split();
        PostDetail {
            categories: self.categories.remove(&post.id).unwrap_or_default(),
            tags: self.tags.remove(&post.id).unwrap_or_default(),
            post,
            author,
        }
    }

    pub(crate) fn summary(&mut self, row: PostSummaryRow) -> PostSummary {
        let (post, author) = row.row.split();
        PostSummary {
            categories: self.categories.remove(&post.id).unwrap_or_default(),
            tag_count: row.tag_count,
            post,
            author,
        }
    }
}
