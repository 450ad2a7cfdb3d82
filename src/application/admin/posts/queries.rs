use uuid::Uuid;

use crate::domain::entities::{PostDetail, PostSummary};

use super::service::AdminPostService;
use super::types::AdminPostError;

impl AdminPostService {
    pub async fn list(&self) -> Result<Vec<PostSummary>, AdminPostError> {
        self.reader
            .list_summaries()
            .await
            .map_err(AdminPostError::from)
    }

    pub async fn get(&self, id: Uuid) -> Result<PostDetail, AdminPostError> {
        self.reader
            .find_detail(id)
            .await?
            .ok_or(AdminPostError::NotFound)
    }
}
