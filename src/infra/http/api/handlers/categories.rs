//! Admin category handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::inputs::{CategoryPatch, NewCategory};

use super::category_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::{AdminIdentity, ApiJson, parse_id};
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

const NOT_FOUND: &str = "Category not found";

pub async fn list_categories(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.categories.list().await.map_err(category_to_api)?;
    Ok(Json(
        categories
            .into_iter()
            .map(category_response)
            .collect::<Vec<_>>(),
    ))
}

pub async fn get_category(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let category = state.categories.get(id).await.map_err(category_to_api)?;
    Ok(Json(category_response(category)))
}

pub async fn create_category(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    ApiJson(payload): ApiJson<CategoryCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = NewCategory {
        name: payload.name,
        slug: payload.slug,
        description: payload.description,
    };
    let category = state
        .categories
        .create(input)
        .await
        .map_err(category_to_api)?;
    Ok((StatusCode::CREATED, Json(category_response(category))))
}

pub async fn update_category(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CategoryUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let patch = CategoryPatch {
        name: payload.name,
        slug: payload.slug,
        description: payload.description,
    };
    let category = state
        .categories
        .update(id, patch)
        .await
        .map_err(category_to_api)?;
    Ok(Json(category_response(category)))
}

pub async fn delete_category(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.categories.delete(id).await.map_err(category_to_api)?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
