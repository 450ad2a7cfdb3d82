//! Request extractors that reject with `ApiError` instead of axum's plain-text bodies.

use std::convert::Infallible;

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::application::auth::{AccessError, Identity, require_admin};

use super::error::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Session identity if one was resolved, never rejecting.
#[derive(Debug, Clone, Copy)]
pub struct MaybeIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Identity>().copied()))
    }
}

/// Caller holding the administrative role; 401 without a session, 403 otherwise.
#[derive(Debug, Clone, Copy)]
pub struct AdminIdentity(pub Identity);

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts.extensions.get::<Identity>().copied();
        require_admin(identity).map(Self).map_err(|err| match err {
            AccessError::Unauthenticated => ApiError::unauthorized("Authentication required"),
            AccessError::Forbidden(_) => ApiError::forbidden(),
        })
    }
}

/// Ids that are not UUIDs cannot exist, so they resolve to 404 like unknown ones.
pub fn parse_id(raw: &str, entity: &'static str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found(entity))
}
