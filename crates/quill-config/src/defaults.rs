//! Default values for every configuration section.

use crate::schema::{DiscordConfig, HelpConfig, LimitsConfig, ProvidersConfig};
use quill_common::{GuildId, UserId};

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Default OpenRouter API base URL.
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Default prompt template file.
pub const DEFAULT_PROMPTS_PATH: &str = "prompts.json";

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner_id: UserId(0),
            primary_guild: GuildId(0),
            secondary_guild: None,
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openrouter_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            request_timeout_seconds: 60,
            max_attempts: 3,
            retry_backoff_ms: 2000,
        }
    }
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            items_per_page: 5,
            timeout_seconds: 120,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_reply_chars: quill_common::EMBED_DESCRIPTION_LIMIT,
            image_validity_minutes: 60,
        }
    }
}
