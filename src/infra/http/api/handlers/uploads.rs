//! Image upload handler

use axum::Json;
use axum::extract::{Multipart, State, multipart::MultipartError};
use axum::response::IntoResponse;

use crate::application::uploads::UploadedImage;

use super::upload_to_api;
use crate::infra::http::api::error::{ApiError, codes};
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

const FILE_FIELD: &str = "file";

pub async fn upload_image(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;
        image = Some(UploadedImage {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let url = state.uploads.upload(image).await.map_err(upload_to_api)?;
    Ok(Json(UploadResponse { url }))
}

/// Keeps axum's status, so an oversized body stays a 413.
fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(
        err.status(),
        codes::BAD_REQUEST,
        "Invalid multipart body",
        Some(err.body_text()),
    )
}
