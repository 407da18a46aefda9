//! Configuration loading from environment variables and the prompt file.
//!
//! Every problem found is collected before failing, so a broken deployment
//! is reported in one pass instead of one variable at a time.

use crate::defaults::DEFAULT_PROMPTS_PATH;
use crate::prompts::PromptTemplates;
use crate::schema::{Config, DiscordConfig, HelpConfig, LimitsConfig, ProvidersConfig};
use quill_common::{GuildId, QuillError, UserId};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigIssue {
    /// A required variable is absent or blank.
    #[error("{var} is not set")]
    Missing {
        /// Variable name.
        var: &'static str,
    },

    /// A variable does not parse.
    #[error("{var} must be {expected} (got '{value}')")]
    Malformed {
        /// Variable name.
        var: &'static str,
        /// Human description of the accepted format.
        expected: &'static str,
        /// The offending value.
        value: String,
    },

    /// Neither text provider key is set.
    #[error("no text-generation provider key set (need GPT_API_KEY or DEEPSEEK_API_KEY)")]
    NoProviderKey,

    /// The prompt file could not be read.
    #[error("failed to read prompt file '{path}': {reason}")]
    PromptFileUnreadable {
        /// File path.
        path: PathBuf,
        /// I/O error text.
        reason: String,
    },

    /// The prompt file is not a JSON object of prompts.
    #[error("failed to parse prompt file: {reason}")]
    PromptFileMalformed {
        /// Parser error text.
        reason: String,
    },

    /// A required prompt key is absent.
    #[error("prompt file has no entry for '{key}'")]
    MissingPrompt {
        /// Prompt key.
        key: &'static str,
    },

    /// A prompt's temperature override is out of range.
    #[error("prompt '{key}' has temperature {value}, expected 0.0 to 2.0")]
    InvalidTemperature {
        /// Prompt key.
        key: String,
        /// The offending value.
        value: f32,
    },
}

/// Configuration could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Every problem found, in discovery order.
    pub issues: Vec<ConfigIssue>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration ({} problem", self.issues.len())?;
        if self.issues.len() != 1 {
            write!(f, "s")?;
        }
        write!(f, ")")?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for QuillError {
    fn from(err: ConfigError) -> Self {
        QuillError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from the process environment.
    ///
    /// The prompt file is `prompts_path` if given, else `PROMPTS_PATH`, else
    /// `prompts.json` in the working directory.
    pub fn load(prompts_path: Option<&Path>) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();

        let path = prompts_path.map_or_else(
            || {
                PathBuf::from(
                    env.get("PROMPTS_PATH")
                        .map_or(DEFAULT_PROMPTS_PATH, String::as_str),
                )
            },
            Path::to_path_buf,
        );
        debug!("Reading prompt templates from {}", path.display());

        let prompts = std::fs::read_to_string(&path).map_err(|e| ConfigIssue::PromptFileUnreadable {
            path: path.clone(),
            reason: e.to_string(),
        });

        let config = Self::from_sources(&env, prompts)?;
        info!(
            "Configuration loaded: {} guild(s), {} prompt template(s)",
            config.discord.guilds().len(),
            config.prompts.len()
        );
        Ok(config)
    }

    /// Builds configuration from an environment map and the prompt file text.
    ///
    /// `prompts` carries the read failure, if any, so that it is reported
    /// alongside environment problems.
    pub fn from_sources(
        env: &HashMap<String, String>,
        prompts: Result<String, ConfigIssue>,
    ) -> Result<Config, ConfigError> {
        let mut issues = Vec::new();
        let mut reader = EnvReader { env, issues: &mut issues };

        let token = reader.required("BOT_TOKEN");
        let owner_id = reader.required_parsed::<u64>("OWNER_ID", "a numeric user id");
        let primary_guild = reader.required_parsed::<u64>("GUILD_ID", "a numeric server id");
        let secondary_guild = reader.lenient::<u64>("GUILD_ID_2");

        let openai_api_key = reader.optional("GPT_API_KEY");
        let openrouter_api_key = reader.optional("DEEPSEEK_API_KEY");
        if openai_api_key.is_none() && openrouter_api_key.is_none() {
            reader.issues.push(ConfigIssue::NoProviderKey);
        }

        let mut providers = ProvidersConfig {
            openai_api_key,
            openrouter_api_key,
            ..ProvidersConfig::default()
        };
        if let Some(url) = reader.url("OPENAI_BASE_URL") {
            providers.openai_base_url = url;
        }
        if let Some(url) = reader.url("OPENROUTER_BASE_URL") {
            providers.openrouter_base_url = url;
        }
        if let Some(secs) = reader.parsed::<u64>("PROVIDER_TIMEOUT_SECS", "a positive number of seconds") {
            if secs == 0 {
                reader.issues.push(ConfigIssue::Malformed {
                    var: "PROVIDER_TIMEOUT_SECS",
                    expected: "a positive number of seconds",
                    value: secs.to_string(),
                });
            } else {
                providers.request_timeout_seconds = secs;
            }
        }
        if let Some(attempts) = reader.parsed::<usize>("PROVIDER_MAX_ATTEMPTS", "a whole number of attempts") {
            providers.max_attempts = attempts;
        }
        if let Some(ms) = reader.parsed::<u64>("PROVIDER_RETRY_BACKOFF_MS", "a whole number of milliseconds") {
            providers.retry_backoff_ms = ms;
        }

        let mut help = HelpConfig::default();
        if let Some(size) = reader.parsed::<usize>("HELP_PAGE_SIZE", "a page size between 1 and 25") {
            if (1..=25).contains(&size) {
                help.items_per_page = size;
            } else {
                reader.issues.push(ConfigIssue::Malformed {
                    var: "HELP_PAGE_SIZE",
                    expected: "a page size between 1 and 25",
                    value: size.to_string(),
                });
            }
        }
        if let Some(secs) = reader.parsed::<u64>("HELP_TIMEOUT_SECS", "a whole number of seconds") {
            help.timeout_seconds = secs;
        }

        let prompts = match prompts {
            Ok(json) => match PromptTemplates::from_json(&json) {
                Ok(templates) => {
                    issues.extend(
                        templates
                            .missing_required()
                            .into_iter()
                            .map(|key| ConfigIssue::MissingPrompt { key }),
                    );
                    issues.extend(
                        templates
                            .invalid_temperatures()
                            .into_iter()
                            .map(|(key, value)| ConfigIssue::InvalidTemperature { key, value }),
                    );
                    templates
                }
                Err(e) => {
                    issues.push(ConfigIssue::PromptFileMalformed {
                        reason: e.to_string(),
                    });
                    PromptTemplates::default()
                }
            },
            Err(issue) => {
                issues.push(issue);
                PromptTemplates::default()
            }
        };

        let (Some(token), Some(owner_id), Some(primary_guild)) = (token, owner_id, primary_guild)
        else {
            return Err(ConfigError { issues });
        };
        if !issues.is_empty() {
            return Err(ConfigError { issues });
        }

        if token.split('.').count() != 3 {
            warn!("BOT_TOKEN does not look like a Discord bot token");
        }

        Ok(Config {
            discord: DiscordConfig {
                token,
                owner_id: UserId(owner_id),
                primary_guild: GuildId(primary_guild),
                secondary_guild: secondary_guild.map(GuildId),
            },
            providers,
            prompts,
            help,
            limits: LimitsConfig::default(),
        })
    }
}

/// Reads variables out of an environment map, recording problems as it goes.
struct EnvReader<'a> {
    env: &'a HashMap<String, String>,
    issues: &'a mut Vec<ConfigIssue>,
}

impl EnvReader<'_> {
    fn optional(&self, var: &str) -> Option<String> {
        self.env
            .get(var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&mut self, var: &'static str) -> Option<String> {
        let value = self.optional(var);
        if value.is_none() {
            self.issues.push(ConfigIssue::Missing { var });
        }
        value
    }

    fn required_parsed<T: FromStr>(&mut self, var: &'static str, expected: &'static str) -> Option<T> {
        let raw = self.required(var)?;
        self.parse(var, expected, raw)
    }

    fn parsed<T: FromStr>(&mut self, var: &'static str, expected: &'static str) -> Option<T> {
        let raw = self.optional(var)?;
        self.parse(var, expected, raw)
    }

    /// Malformed values degrade to absent with a warning.
    fn lenient<T: FromStr>(&self, var: &'static str) -> Option<T> {
        let raw = self.optional(var)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("{} is not a valid id ('{}'), ignoring it", var, raw);
                None
            }
        }
    }

    fn url(&mut self, var: &'static str) -> Option<String> {
        let raw = self.optional(var)?;
        match url::Url::parse(&raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                Some(raw.trim_end_matches('/').to_string())
            }
            _ => {
                self.issues.push(ConfigIssue::Malformed {
                    var,
                    expected: "an http(s) URL",
                    value: raw,
                });
                None
            }
        }
    }

    fn parse<T: FromStr>(&mut self, var: &'static str, expected: &'static str, raw: String) -> Option<T> {
        if let Ok(value) = raw.parse() {
            Some(value)
        } else {
            self.issues.push(ConfigIssue::Malformed {
                var,
                expected,
                value: raw,
            });
            None
        }
    }
}
