//! API handlers organized by resource.
//!
//! Error conversions shared by the submodules live here.

mod auth;
mod blog;
mod categories;
mod dashboard;
mod health;
mod posts;
mod tags;
mod uploads;

pub use auth::*;
pub use blog::*;
pub use categories::*;
pub use dashboard::*;
pub use health::*;
pub use posts::*;
pub use tags::*;
pub use uploads::*;

// ----- Shared query structs -----

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ----- Shared error conversions -----

use axum::http::StatusCode;

use crate::application::admin::categories::AdminCategoryError;
use crate::application::admin::posts::AdminPostError;
use crate::application::admin::tags::AdminTagError;
use crate::application::auth::AuthError;
use crate::application::blog::BlogError;
use crate::application::repos::RepoError;
use crate::application::uploads::{MediaHostError, UploadError};
use crate::domain::error::DomainError;

use super::error::{ApiError, codes};

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::NotFound => ApiError::not_found("Resource not found"),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Integrity constraint violated",
            Some(message),
        ),
        err @ (RepoError::Timeout | RepoError::Persistence(_)) => {
            ApiError::internal("infra::http::api::repo", &err)
        }
    }
}

pub(crate) fn domain_to_api(err: DomainError) -> ApiError {
    match err {
        DomainError::Validation(fields) => ApiError::validation(fields),
    }
}

pub(crate) fn category_to_api(err: AdminCategoryError) -> ApiError {
    match err {
        AdminCategoryError::Validation(err) => domain_to_api(err),
        AdminCategoryError::NotFound => ApiError::not_found("Category not found"),
        AdminCategoryError::Duplicate => {
            ApiError::duplicate("Category with this name or slug already exists")
        }
        AdminCategoryError::InUse { count } => ApiError::in_use(
            "Cannot delete category with existing posts. Please reassign or delete the posts first.",
            count,
        ),
        AdminCategoryError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn tag_to_api(err: AdminTagError) -> ApiError {
    match err {
        AdminTagError::Validation(err) => domain_to_api(err),
        AdminTagError::NotFound => ApiError::not_found("Tag not found"),
        AdminTagError::Duplicate => ApiError::duplicate("Tag with this name or slug already exists"),
        AdminTagError::InUse { count } => ApiError::in_use(
            "Cannot delete tag with existing posts. Please remove the tag from posts first.",
            count,
        ),
        AdminTagError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn post_to_api(err: AdminPostError) -> ApiError {
    match err {
        AdminPostError::Validation(err) => domain_to_api(err),
        AdminPostError::NotFound => ApiError::not_found("Post not found"),
        AdminPostError::Duplicate => ApiError::duplicate("Post with this slug already exists"),
        AdminPostError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn auth_to_api(err: AuthError) -> ApiError {
    match err {
        AuthError::Validation(err) => domain_to_api(err),
        AuthError::InvalidCredentials => ApiError::unauthorized("Invalid email or password"),
        AuthError::DuplicateEmail => ApiError::duplicate("User with this email already exists"),
        AuthError::Repo(repo) => repo_to_api(repo),
        err @ (AuthError::Hash(_) | AuthError::Session(_)) => {
            ApiError::internal("infra::http::api::auth", &err)
        }
    }
}

pub(crate) fn blog_to_api(err: BlogError) -> ApiError {
    match err {
        BlogError::NotFound("category") => ApiError::not_found("Category not found"),
        BlogError::NotFound(_) => ApiError::not_found("Post not found"),
        BlogError::InvalidQuery(query) => ApiError::bad_request(query.to_string(), None),
        BlogError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn upload_to_api(err: UploadError) -> ApiError {
    match err {
        UploadError::Missing => ApiError::bad_request("No file uploaded", None),
        UploadError::Host(MediaHostError::Rejected(message)) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::UPLOAD,
            message,
            None,
        ),
        UploadError::Host(err) => ApiError::internal("infra::http::api::upload", &err),
    }
}
