use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, RepoError, UpdateCategoryParams,
};
use crate::domain::entities::CategoryWithCount;
use crate::domain::error::DomainError;
use crate::domain::inputs::{CategoryPatch, NewCategory};

#[derive(Debug, Error)]
pub enum AdminCategoryError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("category not found")]
    NotFound,
    #[error("a category with this name or slug already exists")]
    Duplicate,
    #[error("category is referenced by {count} posts")]
    InUse { count: u64 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AdminCategoryService {
    reader: Arc<dyn CategoriesRepo>,
    writer: Arc<dyn CategoriesWriteRepo>,
}

impl AdminCategoryService {
    pub fn new(reader: Arc<dyn CategoriesRepo>, writer: Arc<dyn CategoriesWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list(&self) -> Result<Vec<CategoryWithCount>, AdminCategoryError> {
        self.reader
            .list_with_counts()
            .await
            .map_err(AdminCategoryError::from)
    }

    pub async fn get(&self, id: Uuid) -> Result<CategoryWithCount, AdminCategoryError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(AdminCategoryError::NotFound)
    }

    pub async fn create(
        &self,
        input: NewCategory,
    ) -> Result<CategoryWithCount, AdminCategoryError> {
        input.validate()?;

        if self
            .reader
            .find_conflict(Some(&input.name), Some(&input.slug), None)
            .await?
            .is_some()
        {
            return Err(AdminCategoryError::Duplicate);
        }

        let params = CreateCategoryParams {
            name: input.name,
            slug: input.slug,
            description: input.description,
        };
        let category = self
            .writer
            .create_category(params)
            .await
            .map_err(map_write_error)?;

        info!(
            target = "quill::admin::categories",
            category_id = %category.id,
            slug = %category.slug,
            "category created"
        );
        Ok(CategoryWithCount {
            category,
            post_count: 0,
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<CategoryWithCount, AdminCategoryError> {
        patch.validate()?;

        let existing = self.get(id).await?;
        if patch.is_empty() {
            return Ok(existing);
        }

        if (patch.name.is_some() || patch.slug.is_some())
            && self
                .reader
                .find_conflict(patch.name.as_deref(), patch.slug.as_deref(), Some(id))
                .await?
                .is_some()
        {
            return Err(AdminCategoryError::Duplicate);
        }

        let params = UpdateCategoryParams {
            id,
            name: patch.name,
            slug: patch.slug,
            description: patch.description,
        };
        let category = self
            .writer
            .update_category(params)
            .await
            .map_err(map_write_error)?;

        info!(
            target = "quill::admin::categories",
            category_id = %category.id,
            "category updated"
        );
        Ok(CategoryWithCount {
            category,
            post_count: existing.post_count,
        })
    }

    /// Refuses while any post references the category.
    pub async fn delete(&self, id: Uuid) -> Result<(), AdminCategoryError> {
        let existing = self.get(id).await?;
        if existing.post_count > 0 {
            return Err(AdminCategoryError::InUse {
                count: existing.post_count.unsigned_abs(),
            });
        }

        match self.writer.delete_category(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(AdminCategoryError::NotFound),
            // A post was linked between the count and the delete.
            Err(RepoError::InvalidInput { .. }) | Err(RepoError::Integrity { .. }) => {
                return Err(AdminCategoryError::InUse { count: 1 });
            }
            Err(other) => return Err(other.into()),
        }

        info!(
            target = "quill::admin::categories",
            category_id = %id,
            "category deleted"
        );
        Ok(())
    }
}

fn map_write_error(err: RepoError) -> AdminCategoryError {
    match err {
        RepoError::Duplicate { .. } => AdminCategoryError::Duplicate,
        RepoError::NotFound => AdminCategoryError::NotFound,
        other => AdminCategoryError::Repo(other),
    }
}
