//! Image upload pass-through to the external media host.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use metrics::counter;
use thiserror::Error;
use tracing::{info, warn};

pub(crate) const METRIC_UPLOADS_TOTAL: &str = "quill_media_uploads_total";

/// A single file taken from the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Error)]
pub enum MediaHostError {
    #[error("media host is not configured: {0}")]
    NotConfigured(&'static str),
    /// The host answered with an error; the message is the host's own.
    #[error("{0}")]
    Rejected(String),
    #[error("media host request failed: {0}")]
    Transport(String),
}

/// Stores an image and returns its public URL.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, image: UploadedImage) -> Result<String, MediaHostError>;
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    Missing,
    #[error(transparent)]
    Host(#[from] MediaHostError),
}

#[derive(Clone)]
pub struct ImageUploadService {
    host: Arc<dyn MediaHost>,
}

impl ImageUploadService {
    pub fn new(host: Arc<dyn MediaHost>) -> Self {
        Self { host }
    }

    /// Forwards the file unmodified. Type and size checks are left to the host.
    pub async fn upload(&self, image: Option<UploadedImage>) -> Result<String, UploadError> {
        let Some(image) = image else {
            counter!(METRIC_UPLOADS_TOTAL, "outcome" => "missing").increment(1);
            return Err(UploadError::Missing);
        };
        let size = image.bytes.len();

        match self.host.upload(image).await {
            Ok(url) => {
                counter!(METRIC_UPLOADS_TOTAL, "outcome" => "success").increment(1);
                info!(target = "quill::uploads", size, url = %url, "image uploaded");
                Ok(url)
            }
            Err(err) => {
                counter!(METRIC_UPLOADS_TOTAL, "outcome" => "failed").increment(1);
                warn!(target = "quill::uploads", size, error = %err, "image upload failed");
                Err(err.into())
            }
        }
    }
}
