use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{
    CreateTagParams, RepoError, TagsRepo, TagsWriteRepo, UpdateTagParams,
};
use crate::domain::entities::TagWithCount;
use crate::domain::error::DomainError;
use crate::domain::inputs::{NewTag, TagPatch};

#[derive(Debug, Error)]
pub enum AdminTagError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("tag not found")]
    NotFound,
    #[error("a tag with this name or slug already exists")]
    Duplicate,
    #[error("tag is referenced by {count} posts")]
    InUse { count: u64 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AdminTagService {
    reader: Arc<dyn TagsRepo>,
    writer: Arc<dyn TagsWriteRepo>,
}

impl AdminTagService {
    pub fn new(reader: Arc<dyn TagsRepo>, writer: Arc<dyn TagsWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list(&self) -> Result<Vec<TagWithCount>, AdminTagError> {
        self.reader
            .list_with_counts()
            .await
            .map_err(AdminTagError::from)
    }

    pub async fn get(&self, id: Uuid) -> Result<TagWithCount, AdminTagError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(AdminTagError::NotFound)
    }

    pub async fn create(&self, input: NewTag) -> Result<TagWithCount, AdminTagError> {
        input.validate()?;

        if self
            .reader
            .find_conflict(Some(&input.name), Some(&input.slug), None)
            .await?
            .is_some()
        {
            return Err(AdminTagError::Duplicate);
        }

        let tag = self
            .writer
            .create_tag(CreateTagParams {
                name: input.name,
                slug: input.slug,
            })
            .await
            .map_err(map_write_error)?;

        info!(
            target = "quill::admin::tags",
            tag_id = %tag.id,
            slug = %tag.slug,
            "tag created"
        );
        Ok(TagWithCount { tag, post_count: 0 })
    }

    pub async fn update(&self, id: Uuid, patch: TagPatch) -> Result<TagWithCount, AdminTagError> {
        patch.validate()?;

        let existing = self.get(id).await?;
        if patch.is_empty() {
            return Ok(existing);
        }

        if self
            .reader
            .find_conflict(patch.name.as_deref(), patch.slug.as_deref(), Some(id))
            .await?
            .is_some()
        {
            return Err(AdminTagError::Duplicate);
        }

        let tag = self
            .writer
            .update_tag(UpdateTagParams {
                id,
                name: patch.name,
                slug: patch.slug,
            })
            .await
            .map_err(map_write_error)?;

        info!(target = "quill::admin::tags", tag_id = %tag.id, "tag updated");
        Ok(TagWithCount {
            tag,
            post_count: existing.post_count,
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AdminTagError> {
        let existing = self.get(id).await?;
        if existing.post_count > 0 {
            return Err(AdminTagError::InUse {
                count: existing.post_count.unsigned_abs(),
            });
        }

        match self.writer.delete_tag(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(AdminTagError::NotFound),
            Err(RepoError::InvalidInput { .. }) | Err(RepoError::Integrity { .. }) => {
                return Err(AdminTagError::InUse { count: 1 });
            }
            Err(other) => return Err(other.into()),
        }

        info!(target = "quill::admin::tags", tag_id = %id, "tag deleted");
        Ok(())
    }
}

fn map_write_error(err: RepoError) -> AdminTagError {
    match err {
        RepoError::Duplicate { .. } => AdminTagError::Duplicate,
        RepoError::NotFound => AdminTagError::NotFound,
        other => AdminTagError::Repo(other),
    }
}
