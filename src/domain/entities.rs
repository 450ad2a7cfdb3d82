//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::Role;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub role: Role,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Category paired with the number of posts that reference it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWithCount {
    pub category: CategoryRecord,
    pub post_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagWithCount {
    pub tag: TagRecord,
    pub post_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Admin list row: tags are only counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub post: PostRecord,
    pub author: AuthorSummary,
    pub categories: Vec<CategoryRef>,
    pub tag_count: i64,
}

/// A post with its author and both relation sets loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub post: PostRecord,
    pub author: AuthorSummary,
    pub categories: Vec<CategoryRef>,
    pub tags: Vec<TagRef>,
}
