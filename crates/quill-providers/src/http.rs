//! JSON-over-HTTPS transport shared by the OpenAI-compatible clients.

use crate::error::{ProviderError, ProviderResult};
use quill_common::RetryPolicy;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Connection settings for one upstream API.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

impl ApiSettings {
    /// Settings with the given endpoint and key, default timeout and retries.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Authenticated POST client for one API.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    retry: RetryPolicy,
}

impl ApiClient {
    pub(crate) fn new(settings: ApiSettings) -> ProviderResult<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        // A trailing slash keeps `join` from replacing the last path segment.
        let base = format!("{}/", settings.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|e| ProviderError::NotConfigured(format!("invalid base URL {base}: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key,
            retry: settings.retry,
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> ProviderResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::NotConfigured(format!("invalid endpoint {path}: {e}")))
    }

    /// POSTs `body` as JSON and decodes the response, retrying transient failures.
    #[instrument(skip(self, body))]
    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B) -> ProviderResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let client = &self.client;
        let api_key = self.api_key.as_str();
        let url = &url;

        self.retry
            .run(
                move || async move {
                    let response = client
                        .post(url.clone())
                        .bearer_auth(api_key)
                        .json(body)
                        .send()
                        .await?;

                    let status = response.status();
                    if status.is_success() {
                        debug!("Request successful: {}", status);
                        let text = response.text().await?;
                        serde_json::from_str::<R>(&text)
                            .map_err(|e| ProviderError::Malformed(e.to_string()))
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        Err(ProviderError::from_response(status.as_u16(), text))
                    }
                },
                ProviderError::is_transient,
            )
            .await
    }
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
pub(crate) struct ChatBody<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatBody<'a> {
    pub(crate) fn new(
        model: &'a str,
        system_prompt: &'a str,
        prompt: &'a str,
        temperature: f32,
    ) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
            top_p: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// Trimmed text of the first choice. A null content is an empty reply.
    pub(crate) fn into_text(self) -> ProviderResult<String> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("response contained no choices".into()))?;
        Ok(choice
            .message
            .content
            .map(|text| text.trim().to_string())
            .unwrap_or_default())
    }
}
