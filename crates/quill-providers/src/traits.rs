//! Provider trait definitions.

use crate::error::ProviderResult;
use crate::types::{CompletionRequest, ImageRequest};
use async_trait::async_trait;

/// Anything that can turn prompts into text or images.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Runs a chat completion and returns the trimmed reply text.
    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String>;

    /// Generates one image and returns its URL.
    async fn generate_image(&self, request: ImageRequest) -> ProviderResult<String>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
