//! Configuration schema definitions.

use crate::prompts::PromptTemplates;
use quill_common::{GuildId, RetryPolicy, UserId};
use std::fmt;
use std::time::Duration;

/// Main configuration structure for Quill.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// Upstream provider configuration.
    pub providers: ProvidersConfig,
    /// System prompts keyed by command name.
    pub prompts: PromptTemplates,
    /// Help menu configuration.
    pub help: HelpConfig,
    /// Reply size and display limits.
    pub limits: LimitsConfig,
}

/// Discord bot configuration.
#[derive(Clone)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: String,
    /// The single user allowed to run owner-only commands.
    pub owner_id: UserId,
    /// Server that commands are registered on.
    pub primary_guild: GuildId,
    /// Optional second server that commands are registered on.
    pub secondary_guild: Option<GuildId>,
}

impl DiscordConfig {
    /// Every configured guild, primary first.
    pub fn guilds(&self) -> Vec<GuildId> {
        std::iter::once(self.primary_guild)
            .chain(self.secondary_guild)
            .collect()
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"<redacted>")
            .field("owner_id", &self.owner_id)
            .field("primary_guild", &self.primary_guild)
            .field("secondary_guild", &self.secondary_guild)
            .finish()
    }
}

/// Text and image provider configuration.
#[derive(Clone)]
pub struct ProvidersConfig {
    /// OpenAI API key, used for GPT models and images.
    pub openai_api_key: Option<String>,
    /// OpenRouter API key, used for the DeepSeek model.
    pub openrouter_api_key: Option<String>,
    /// OpenAI API base URL.
    pub openai_base_url: String,
    /// OpenRouter API base URL.
    pub openrouter_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_seconds: u64,
    /// Total attempts per request, including the first.
    pub max_attempts: usize,
    /// Fixed delay between attempts in milliseconds.
    pub retry_backoff_ms: u64,
}

impl ProvidersConfig {
    /// Per-request timeout.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Retry policy applied to every provider request.
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(
            self.max_attempts,
            Duration::from_millis(self.retry_backoff_ms),
        )
    }
}

impl fmt::Debug for ProvidersConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("ProvidersConfig")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openrouter_api_key", &redact(&self.openrouter_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("openrouter_base_url", &self.openrouter_base_url)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

/// Help menu configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpConfig {
    /// Commands shown per page.
    pub items_per_page: usize,
    /// Idle seconds before the page buttons are disabled.
    pub timeout_seconds: u64,
}

impl HelpConfig {
    /// Idle time before the page buttons are disabled.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Reply size and display limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitsConfig {
    /// Ceiling for generated text placed in a reply.
    pub max_reply_chars: usize,
    /// How long generated image links are advertised as valid, in minutes.
    pub image_validity_minutes: u64,
}

impl LimitsConfig {
    /// How long generated image links are advertised as valid.
    pub const fn image_validity(&self) -> Duration {
        Duration::from_secs(self.image_validity_minutes * 60)
    }
}
