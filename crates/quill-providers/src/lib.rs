//! # Quill Providers
//!
//! Clients for the upstream services that answer Quill's generation commands:
//! OpenAI for chat completions and images, OpenRouter for DeepSeek.
//!
//! Everything is reached through the [`CompletionProvider`] trait so command
//! code can be exercised against a mock.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod http;
pub mod openai;
pub mod openrouter;
pub mod router;
pub mod traits;
pub mod types;

pub use error::{extract_detail, ProviderError, ProviderResult};
pub use http::ApiSettings;
pub use openai::OpenAiClient;
pub use openrouter::OpenRouterClient;
pub use router::ProviderRouter;
pub use traits::*;
pub use types::*;
