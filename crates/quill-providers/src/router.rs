//! Picks the provider that serves a given model.

use crate::error::{ProviderError, ProviderResult};
use crate::http::ApiSettings;
use crate::openai::OpenAiClient;
use crate::openrouter::OpenRouterClient;
use crate::traits::CompletionProvider;
use crate::types::{CompletionRequest, ImageRequest};
use async_trait::async_trait;
use quill_config::ProvidersConfig;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Routes DeepSeek to OpenRouter and everything else to OpenAI.
#[derive(Clone, Default)]
pub struct ProviderRouter {
    openai: Option<Arc<dyn CompletionProvider>>,
    openrouter: Option<Arc<dyn CompletionProvider>>,
}

impl std::fmt::Debug for ProviderRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRouter")
            .field("openai", &self.openai.as_ref().map(|p| p.name()))
            .field("openrouter", &self.openrouter.as_ref().map(|p| p.name()))
            .finish()
    }
}

impl ProviderRouter {
    /// Builds a router from explicit providers.
    pub fn new(
        openai: Option<Arc<dyn CompletionProvider>>,
        openrouter: Option<Arc<dyn CompletionProvider>>,
    ) -> Self {
        Self { openai, openrouter }
    }

    /// Builds HTTP clients for every provider that has an API key.
    pub fn from_config(config: &ProvidersConfig) -> ProviderResult<Self> {
        let settings = |base_url: &str, key: &str| {
            ApiSettings::new(base_url, key)
                .with_timeout(config.request_timeout())
                .with_retry(config.retry_policy())
        };

        let openai = match &config.openai_api_key {
            Some(key) => {
                let client = OpenAiClient::new(settings(&config.openai_base_url, key))?;
                Some(Arc::new(client) as Arc<dyn CompletionProvider>)
            }
            None => {
                warn!("GPT_API_KEY not set; GPT models and image generation are disabled");
                None
            }
        };

        let openrouter = match &config.openrouter_api_key {
            Some(key) => {
                let client = OpenRouterClient::new(settings(&config.openrouter_base_url, key))?;
                Some(Arc::new(client) as Arc<dyn CompletionProvider>)
            }
            None => {
                warn!("DEEPSEEK_API_KEY not set; the deepseek model is disabled");
                None
            }
        };

        info!(
            openai = openai.is_some(),
            openrouter = openrouter.is_some(),
            "Provider router ready"
        );
        Ok(Self { openai, openrouter })
    }

    fn for_text(&self, request: &CompletionRequest) -> ProviderResult<&Arc<dyn CompletionProvider>> {
        if request.model.is_openrouter() {
            self.openrouter.as_ref().ok_or_else(|| {
                ProviderError::NotConfigured(format!(
                    "The {} model is not configured on this bot.",
                    request.model
                ))
            })
        } else {
            self.openai.as_ref().ok_or_else(|| {
                ProviderError::NotConfigured(format!(
                    "The {} model is not configured on this bot.",
                    request.model
                ))
            })
        }
    }
}

#[async_trait]
impl CompletionProvider for ProviderRouter {
    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String> {
        let provider = self.for_text(&request)?;
        debug!(provider = provider.name(), model = %request.model, "Routing completion");
        provider.complete(request).await
    }

    async fn generate_image(&self, request: ImageRequest) -> ProviderResult<String> {
        let provider = self.openai.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured("Image generation is not configured on this bot.".into())
        })?;
        provider.generate_image(request).await
    }

    fn name(&self) -> &'static str {
        "router"
    }
}
