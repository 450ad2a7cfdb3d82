//! Cloudinary-compatible unsigned upload client.

use async_trait::async_trait;
use reqwest::{
    Client, Url,
    multipart::{Form, Part},
};
use serde::Deserialize;

use crate::application::uploads::{MediaHost, MediaHostError, UploadedImage};
use crate::config::MediaSettings;
use crate::infra::error::InfraError;

const DEFAULT_FILE_NAME: &str = "upload";

/// Upload target resolved from settings; absent when the host is not configured.
#[derive(Debug, Clone)]
struct Target {
    endpoint: Url,
    upload_preset: String,
}

pub struct CloudinaryClient {
    client: Client,
    target: Result<Target, &'static str>,
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    secure_url: Option<String>,
    error: Option<ReplyError>,
}

#[derive(Debug, Deserialize)]
struct ReplyError {
    message: String,
}

impl CloudinaryClient {
    pub fn new(settings: &MediaSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;

        Ok(Self {
            client,
            target: resolve_target(settings),
        })
    }
}

fn resolve_target(settings: &MediaSettings) -> Result<Target, &'static str> {
    let cloud_name = settings
        .cloud_name
        .as_deref()
        .ok_or("media.cloud_name is not set")?;
    let upload_preset = settings
        .upload_preset
        .clone()
        .ok_or("media.upload_preset is not set")?;

    let base = settings.host.as_str().trim_end_matches('/');
    let endpoint = Url::parse(&format!("{base}/{cloud_name}/image/upload"))
        .map_err(|_| "media.cloud_name does not form a valid upload URL")?;

    Ok(Target {
        endpoint,
        upload_preset,
    })
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    async fn upload(&self, image: UploadedImage) -> Result<String, MediaHostError> {
        let target = self
            .target
            .as_ref()
            .map_err(|reason| MediaHostError::NotConfigured(*reason))?;

        let mut part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()));
        if let Some(content_type) = image.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|err| MediaHostError::Transport(err.to_string()))?;
        }
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", target.upload_preset.clone());

        let response = self
            .client
            .post(target.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| MediaHostError::Transport(err.to_string()))?;

        let status = response.status();
        let reply: UploadReply = response
            .json()
            .await
            .map_err(|err| MediaHostError::Transport(format!("status {status}: {err}")))?;

        interpret_reply(status.is_success(), reply)
    }
}

fn interpret_reply(success: bool, reply: UploadReply) -> Result<String, MediaHostError> {
    if !success {
        let message = reply
            .error
            .map(|error| error.message)
            .unwrap_or_else(|| "media host rejected the upload".to_string());
        return Err(MediaHostError::Rejected(message));
    }

    reply
        .secure_url
        .ok_or_else(|| MediaHostError::Rejected("media host returned no URL".to_string()))
}
