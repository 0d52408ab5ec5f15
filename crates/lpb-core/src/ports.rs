//! Outbound ports implemented by the adapter crates.

use std::path::Path;

use async_trait::async_trait;

use crate::{domain::PostId, Result};

/// Generative-text backend: one prompt in, one completion out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Fails with `Error::EmptyResponse` rather than returning empty text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Publishing backend. The author identity is fixed by the adapter's config.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn create_text_post(&self, text: &str) -> Result<PostId>;

    /// Register upload, upload the file bytes, then create a post referencing the asset.
    ///
    /// Each step's failure surfaces as its own error variant and aborts the rest.
    async fn create_image_post(&self, text: &str, image: &Path) -> Result<PostId>;
}

/// Short description of a generation query (e.g. a repository URL).
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    /// `None` when nothing usable could be fetched; callers fall back to a generic sentence.
    async fn describe(&self, query: &str) -> Option<String>;
}

/// Resolves a transport-level file id into a downloadable URL.
#[async_trait]
pub trait FileLocator: Send + Sync {
    async fn download_url(&self, file_id: &str) -> Result<String>;
}
