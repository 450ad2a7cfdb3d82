//! Admin tag handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::inputs::{NewTag, TagPatch};

use super::tag_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::{AdminIdentity, ApiJson, parse_id};
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

const NOT_FOUND: &str = "Tag not found";

pub async fn list_tags(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
) -> Result<impl IntoResponse, ApiError> {
    let tags = state.tags.list().await.map_err(tag_to_api)?;
    Ok(Json(tags.into_iter().map(tag_response).collect::<Vec<_>>()))
}

pub async fn get_tag(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let tag = state.tags.get(id).await.map_err(tag_to_api)?;
    Ok(Json(tag_response(tag)))
}

pub async fn create_tag(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    ApiJson(payload): ApiJson<TagCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = NewTag {
        name: payload.name,
        slug: payload.slug,
    };
    let tag = state.tags.create(input).await.map_err(tag_to_api)?;
    Ok((StatusCode::CREATED, Json(tag_response(tag))))
}

pub async fn update_tag(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<TagUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let patch = TagPatch {
        name: payload.name,
        slug: payload.slug,
    };
    let tag = state.tags.update(id, patch).await.map_err(tag_to_api)?;
    Ok(Json(tag_response(tag)))
}

pub async fn delete_tag(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.tags.delete(id).await.map_err(tag_to_api)?;
    Ok(Json(MessageResponse::new("Tag deleted successfully")))
}
