//! LinkedIn adapter (publishing).
//!
//! Text posts are one `ugcPosts` call. Image posts are three: register an
//! upload, send the bytes to the returned URL, then create a post that
//! references the registered asset.

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use tracing::{debug, info};

use lpb_core::{
    domain::PostId,
    errors::{diagnostic_body, Error},
    ports::Publisher,
    Result,
};

pub mod types;

use types::{RegisterUploadRequest, RegisterUploadResponse, UgcPost, UgcPostResponse};

const DEFAULT_BASE_URL: &str = "https://api.linkedin.com";
const RESTLI_ID_HEADER: &str = "x-restli-id";

/// Where to send image bytes, and the asset they become.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTarget {
    pub upload_url: String,
    pub asset: String,
}

#[derive(Clone, Debug)]
pub struct LinkedInClient {
    token: String,
    author_urn: String,
    base_url: String,
    http: reqwest::Client,
}

impl LinkedInClient {
    pub fn new(token: impl Into<String>, author_urn: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Config(format!("failed to build linkedin http client: {e}")))?;
        Ok(Self {
            token: token.into(),
            author_urn: author_urn.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Step 1 of an image post.
    pub async fn register_upload(&self) -> Result<UploadTarget> {
        let resp = self
            .http
            .post(format!("{}/v2/assets?action=registerUpload", self.base_url))
            .bearer_auth(&self.token)
            .json(&RegisterUploadRequest::feed_image(&self.author_urn))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::UploadRegistrationFailed {
                status: status.as_u16(),
                body: diagnostic_body(&body),
            });
        }

        let parsed: RegisterUploadResponse =
            serde_json::from_str(&body).map_err(|e| Error::UploadRegistrationFailed {
                status: status.as_u16(),
                body: format!("unexpected response ({e}): {}", diagnostic_body(&body)),
            })?;

        debug!(asset = %parsed.value.asset, "upload registered");
        Ok(UploadTarget {
            upload_url: parsed.value.upload_mechanism.http_request.upload_url,
            asset: parsed.value.asset,
        })
    }

    /// Step 2 of an image post: send the file bytes to the upload URL.
    pub async fn upload_image(&self, upload_url: &str, image: &Path) -> Result<()> {
        let bytes = tokio::fs::read(image).await?;
        let size = bytes.len();

        let resp = self
            .http
            .post(upload_url)
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, image_content_type(image))
            .body(bytes)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::UploadFailed {
                status: status.as_u16(),
                body: diagnostic_body(&body),
            });
        }

        debug!(bytes = size, "image uploaded");
        Ok(())
    }

    /// Create a post; returns its id (URN).
    pub async fn create_post(&self, post: &UgcPost) -> Result<PostId> {
        let resp = self
            .http
            .post(format!("{}/v2/ugcPosts", self.base_url))
            .bearer_auth(&self.token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .json(post)
            .send()
            .await?;

        let status = resp.status();
        let header_id = resp
            .headers()
            .get(RESTLI_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::PostCreationFailed {
                status: status.as_u16(),
                body: diagnostic_body(&body),
            });
        }

        let body_id = serde_json::from_str::<UgcPostResponse>(&body)
            .unwrap_or_default()
            .id;
        let id = body_id.or(header_id).ok_or_else(|| Error::PostCreationFailed {
            status: status.as_u16(),
            body: "response carries no post id".to_string(),
        })?;

        info!(post = %id, media = ?post.specific_content.share_content.share_media_category, "post created");
        Ok(PostId(id))
    }
}

#[async_trait]
impl Publisher for LinkedInClient {
    async fn create_text_post(&self, text: &str) -> Result<PostId> {
        self.create_post(&UgcPost::text(&self.author_urn, text)).await
    }

    async fn create_image_post(&self, text: &str, image: &Path) -> Result<PostId> {
        let target = self.register_upload().await?;
        self.upload_image(&target.upload_url, image).await?;
        self.create_post(&UgcPost::image(&self.author_urn, text, target.asset))
            .await
    }
}

fn image_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
