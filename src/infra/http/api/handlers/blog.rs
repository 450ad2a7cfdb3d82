//! Public blog handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::application::search::SearchQuery;

use super::{SearchParams, blog_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::ApiQuery;
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

pub async fn list_published_posts(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = state.blog.list_posts().await.map_err(blog_to_api)?;
    Ok(Json(public_posts(posts)))
}

pub async fn get_published_post(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.blog.post(&slug).await.map_err(blog_to_api)?;
    Ok(Json(post_response(post, AuthorView::Public)))
}

pub async fn list_blog_categories(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.blog.list_categories().await.map_err(blog_to_api)?;
    Ok(Json(
        categories
            .into_iter()
            .map(category_response)
            .collect::<Vec<_>>(),
    ))
}

pub async fn get_category_posts(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.blog.category_page(&slug).await.map_err(blog_to_api)?;
    Ok(Json(CategoryPostsResponse {
        category: category_response(page.category),
        posts: public_posts(page.posts),
        all_categories: page
            .all_categories
            .into_iter()
            .map(category_response)
            .collect(),
    }))
}

pub async fn search_posts(
    State(state): State<ApiState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = SearchQuery::parse(
        params.q.as_deref(),
        params.category.as_deref(),
        params.limit,
        params.offset,
    )
    .map_err(|err| blog_to_api(err.into()))?;

    let results = state.blog.search(query).await.map_err(blog_to_api)?;
    Ok(Json(SearchResponse {
        posts: public_posts(results.posts),
        pagination: pagination(results.pagination),
        query: results.query,
        category: results.category,
    }))
}
