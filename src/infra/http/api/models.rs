//! Conversions from domain entities to the wire types in `quill-api-types`.

pub use quill_api_types::*;

use crate::application::admin::dashboard::DashboardStats;
use crate::application::search::Pagination as SearchPagination;
use crate::domain::entities::{
    self, CategoryWithCount, PostDetail, PostSummary, TagWithCount, UserRecord,
};

pub fn category_response(value: CategoryWithCount) -> CategoryResponse {
    let CategoryWithCount {
        category,
        post_count,
    } = value;
    CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        created_at: category.created_at,
        updated_at: category.updated_at,
        count: PostCount { posts: post_count },
    }
}

pub fn tag_response(value: TagWithCount) -> TagResponse {
    let TagWithCount { tag, post_count } = value;
    TagResponse {
        id: tag.id,
        name: tag.name,
        slug: tag.slug,
        created_at: tag.created_at,
        updated_at: tag.updated_at,
        count: PostCount { posts: post_count },
    }
}

fn category_ref(value: entities::CategoryRef, with_slug: bool) -> CategoryRef {
    CategoryRef {
        id: value.id,
        name: value.name,
        slug: with_slug.then_some(value.slug),
    }
}

fn tag_ref(value: entities::TagRef) -> TagRef {
    TagRef {
        id: value.id,
        name: value.name,
        slug: value.slug,
    }
}

/// Which author fields a post view exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorView {
    /// Admin screens show who wrote it by email.
    Admin,
    /// Public pages show name and avatar, never the email.
    Public,
}

fn author_summary(author: entities::AuthorSummary, view: AuthorView) -> AuthorSummary {
    match view {
        AuthorView::Admin => AuthorSummary {
            name: author.name,
            email: Some(author.email),
            image: None,
        },
        AuthorView::Public => AuthorSummary {
            name: author.name,
            email: None,
            image: author.image,
        },
    }
}

pub fn post_response(detail: PostDetail, view: AuthorView) -> PostResponse {
    let PostDetail {
        post,
        author,
        categories,
        tags,
    } = detail;
    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        excerpt: post.excerpt,
        published: post.published,
        published_at: post.published_at,
        created_at: post.created_at,
        updated_at: post.updated_at,
        author_id: post.author_id,
        author: author_summary(author, view),
        categories: categories
            .into_iter()
            .map(|c| category_ref(c, true))
            .collect(),
        tags: tags.into_iter().map(tag_ref).collect(),
    }
}

pub fn public_posts(details: Vec<PostDetail>) -> Vec<PostResponse> {
    details
        .into_iter()
        .map(|detail| post_response(detail, AuthorView::Public))
        .collect()
}

pub fn post_list_item(summary: PostSummary) -> PostListItem {
    let PostSummary {
        post,
        author,
        categories,
        tag_count,
    } = summary;
    PostListItem {
        id: post.id,
        title: post.title,
        slug: post.slug,
        excerpt: post.excerpt,
        published: post.published,
        published_at: post.published_at,
        created_at: post.created_at,
        updated_at: post.updated_at,
        author_id: post.author_id,
        author: author_summary(author, AuthorView::Admin),
        categories: categories
            .into_iter()
            .map(|c| category_ref(c, false))
            .collect(),
        count: TagCount { tags: tag_count },
    }
}

pub fn dashboard_response(stats: DashboardStats) -> DashboardStatsResponse {
    DashboardStatsResponse {
        total_posts: stats.total_posts,
        published_posts: stats.published_posts,
        draft_posts: stats.draft_posts,
        total_categories: stats.total_categories,
        total_tags: stats.total_tags,
        recent_posts: stats.recent_posts.into_iter().map(post_list_item).collect(),
    }
}

pub fn user_response(user: UserRecord) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role.as_str().to_string(),
        image: user.image,
        created_at: user.created_at,
    }
}

pub fn pagination(value: SearchPagination) -> Pagination {
    Pagination {
        total: value.total,
        limit: value.limit,
        offset: value.offset,
        has_more: value.has_more,
    }
}
