//! OpenRouter chat completion client, used for the DeepSeek model.

use crate::error::{ProviderError, ProviderResult};
use crate::http::{ApiClient, ApiSettings, ChatBody, ChatResponse};
use crate::traits::CompletionProvider;
use crate::types::{CompletionRequest, ImageRequest};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for OpenRouter's OpenAI-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    api: ApiClient,
}

impl OpenRouterClient {
    /// Creates a client from connection settings.
    pub fn new(settings: ApiSettings) -> ProviderResult<Self> {
        Ok(Self {
            api: ApiClient::new(settings)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String> {
        let body = ChatBody::new(
            request.model.api_name(),
            &request.system_prompt,
            &request.prompt,
            request.temperature,
        );

        let response: ChatResponse = self.api.post_json("chat/completions", &body).await?;
        let text = response.into_text()?;
        debug!("Completion returned {} characters", text.chars().count());
        Ok(text)
    }

    async fn generate_image(&self, _request: ImageRequest) -> ProviderResult<String> {
        Err(ProviderError::NotConfigured(
            "image generation is not available through OpenRouter".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "openrouter"
    }
}
