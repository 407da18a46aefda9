//! Error types and utilities for Quill

use thiserror::Error;

/// Result type alias for Quill operations
pub type Result<T> = std::result::Result<T, QuillError>;

/// Main error type for Quill operations
#[derive(Error, Debug)]
pub enum QuillError {
    /// Missing or malformed configuration.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// User input exceeded a declared bound
    #[error("Validation error: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// Upstream text or image provider failed
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The chat platform rejected a send, edit or delete
    #[error("Discord API error: {message}")]
    Discord {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl QuillError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new provider error with source
    pub fn provider_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Provider {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new Discord API error with source
    pub fn discord_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Discord {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Text that is safe to show the caller.
    ///
    /// Only validation messages are echoed; everything else is replaced by a
    /// generic line so upstream detail never leaks.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Provider { .. } => {
                "The generation service failed to answer. Please try again later.".to_string()
            }
            _ => "An error occurred while processing the command.".to_string(),
        }
    }
}
