//! Admin post handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::inputs::{NewPost, PostPatch};

use super::post_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::{AdminIdentity, ApiJson, parse_id};
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

const NOT_FOUND: &str = "Post not found";

pub async fn list_posts(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
) -> Result<impl IntoResponse, ApiError> {
    let posts = state.posts.list().await.map_err(post_to_api)?;
    Ok(Json(
        posts.into_iter().map(post_list_item).collect::<Vec<_>>(),
    ))
}

pub async fn get_post(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let post = state.posts.get(id).await.map_err(post_to_api)?;
    Ok(Json(post_response(post, AuthorView::Admin)))
}

/// The signed-in administrator becomes the author.
pub async fn create_post(
    State(state): State<ApiState>,
    AdminIdentity(author): AdminIdentity,
    ApiJson(payload): ApiJson<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = NewPost {
        title: payload.title,
        content: payload.content,
        excerpt: payload.excerpt,
        slug: payload.slug,
        published: payload.published,
        category_ids: payload.category_ids.unwrap_or_default(),
        tag_ids: payload.tag_ids.unwrap_or_default(),
    };
    let post = state
        .posts
        .create(author, input)
        .await
        .map_err(post_to_api)?;
    Ok((
        StatusCode::CREATED,
        Json(post_response(post, AuthorView::Admin)),
    ))
}

pub async fn update_post(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let patch = PostPatch {
        other_fields_present: payload.has_fields_besides_published(),
        title: payload.title.flatten(),
        content: payload.content.flatten(),
        excerpt: payload.excerpt.flatten(),
        slug: payload.slug.flatten(),
        published: payload.published.flatten(),
        category_ids: payload.category_ids.flatten(),
        tag_ids: payload.tag_ids.flatten(),
    };
    let post = state.posts.update(id, patch).await.map_err(post_to_api)?;
    Ok(Json(post_response(post, AuthorView::Admin)))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.posts.delete(id).await.map_err(post_to_api)?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
