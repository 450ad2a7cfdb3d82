use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use super::repo_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::AdminIdentity;
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

pub async fn dashboard_stats(
    State(state): State<ApiState>,
    _admin: AdminIdentity,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.dashboard.overview().await.map_err(repo_to_api)?;
    Ok(Json(dashboard_response(stats)))
}
