//! OpenAI chat completion and image generation client.

use crate::error::{ProviderError, ProviderResult};
use crate::http::{ApiClient, ApiSettings, ChatBody, ChatResponse};
use crate::traits::CompletionProvider;
use crate::types::{CompletionRequest, ImageRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Client for the OpenAI REST API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    api: ApiClient,
}

impl OpenAiClient {
    /// Creates a client from connection settings.
    pub fn new(settings: ApiSettings) -> ProviderResult<Self> {
        Ok(Self {
            api: ApiClient::new(settings)?,
        })
    }
}

#[derive(Debug, Serialize)]
struct ImageBody<'a> {
    model: &'static str,
    prompt: &'a str,
    size: &'static str,
    n: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'static str>,
}

impl<'a> ImageBody<'a> {
    fn new(request: &'a ImageRequest) -> Self {
        let options = request.options;
        let extended = options.model.supports_quality_and_style();
        Self {
            model: options.model.as_str(),
            prompt: &request.prompt,
            size: options.size.as_str(),
            n: 1,
            quality: extended.then(|| options.quality.as_str()),
            style: extended.then(|| options.style.as_str()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String> {
        let mut body = ChatBody::new(
            request.model.api_name(),
            &request.system_prompt,
            &request.prompt,
            request.temperature,
        );
        body.top_p = Some(1.0);

        let response: ChatResponse = self.api.post_json("chat/completions", &body).await?;
        let text = response.into_text()?;
        debug!("Completion returned {} characters", text.chars().count());
        Ok(text)
    }

    #[instrument(skip(self, request), fields(model = %request.options.model, size = %request.options.size))]
    async fn generate_image(&self, request: ImageRequest) -> ProviderResult<String> {
        let options = request.options;
        options.validate()?;

        let body = ImageBody::new(&request);
        let response: ImageResponse = self
            .api
            .post_json("images/generations", &body)
            .await
            .map_err(|err| match err {
                ProviderError::InvalidSize { .. } => {
                    ProviderError::invalid_size(options.size, options.model)
                }
                other => other,
            })?;

        let url = response
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or_else(|| ProviderError::Malformed("response contained no image URL".into()))?;
        info!("Image generated");
        Ok(url)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
