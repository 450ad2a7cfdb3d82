use thiserror::Error;
use time::OffsetDateTime;

use crate::{application::repos::RepoError, domain::error::DomainError};

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("post not found")]
    NotFound,
    #[error("a post with this slug already exists")]
    Duplicate,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// New `published_at` when `published` is written, or `None` to keep the
/// stored value. Only the first publication stamps the time; unpublishing
/// keeps it.
pub fn publish_timestamp(
    current: Option<OffsetDateTime>,
    published: bool,
    now: OffsetDateTime,
) -> Option<OffsetDateTime> {
    if published && current.is_none() {
        Some(now)
    } else {
        None
    }
}

pub(super) fn map_write_error(err: RepoError) -> AdminPostError {
    match err {
        RepoError::Duplicate { .. } => AdminPostError::Duplicate,
        RepoError::NotFound => AdminPostError::NotFound,
        other => AdminPostError::Repo(other),
    }
}
