//! Application-wide error types using thiserror.

use poise::serenity_prelude as serenity;
use quill_config::ConfigError;
use quill_providers::ProviderError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider clients could not be built.
    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(String),
}

impl BotError {
    /// Process exit status for this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Logging(_) => 1,
            Self::Provider(_) | Self::Discord(_) => 2,
        }
    }
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_exit_with_one() {
        let err = BotError::from(ConfigError { issues: Vec::new() });
        assert_eq!(err.exit_code(), 1);
        assert_eq!(BotError::Logging("already set".into()).exit_code(), 1);
    }

    #[test]
    fn test_provider_error_message() {
        let err = BotError::from(ProviderError::NotConfigured("no keys".into()));
        assert_eq!(err.to_string(), "Provider setup failed: no keys");
        assert_eq!(err.exit_code(), 2);
    }
}
