//! Request types shared by every provider.

use crate::error::{ProviderError, ProviderResult};
use std::fmt;

/// Chat model selectable for text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextModel {
    /// `gpt-4o`
    #[default]
    Gpt4o,
    /// `gpt-4o-mini`
    Gpt4oMini,
    /// `gpt-4-turbo`
    Gpt4Turbo,
    /// `gpt-3.5-turbo`
    Gpt35Turbo,
    /// DeepSeek, served through OpenRouter.
    DeepSeek,
}

impl TextModel {
    /// Every selectable model.
    pub const ALL: [Self; 5] = [
        Self::Gpt4o,
        Self::Gpt4oMini,
        Self::Gpt4Turbo,
        Self::Gpt35Turbo,
        Self::DeepSeek,
    ];

    /// Name shown to users and used to pick the provider.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt4Turbo => "gpt-4-turbo",
            Self::Gpt35Turbo => "gpt-3.5-turbo",
            Self::DeepSeek => "deepseek",
        }
    }

    /// Identifier sent on the wire.
    pub const fn api_name(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek/deepseek-chat",
            other => other.as_str(),
        }
    }

    /// Whether the model is served by OpenRouter rather than OpenAI.
    pub const fn is_openrouter(self) -> bool {
        matches!(self, Self::DeepSeek)
    }
}

impl fmt::Display for TextModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single system + user prompt completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model to run.
    pub model: TextModel,
    /// User-supplied text.
    pub prompt: String,
    /// System prompt resolved from the prompt file.
    pub system_prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Builds a request.
    pub fn new(
        model: TextModel,
        prompt: impl Into<String>,
        system_prompt: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            system_prompt: system_prompt.into(),
            temperature,
        }
    }
}

/// Image generation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageModel {
    /// `dall-e-2`
    DallE2,
    /// `dall-e-3`
    #[default]
    DallE3,
}

impl ImageModel {
    /// Identifier sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DallE2 => "dall-e-2",
            Self::DallE3 => "dall-e-3",
        }
    }

    /// Sizes the model accepts.
    pub const fn supported_sizes(self) -> &'static [ImageSize] {
        match self {
            Self::DallE2 => &[ImageSize::Square256, ImageSize::Square512, ImageSize::Square1024],
            Self::DallE3 => &[ImageSize::Square1024, ImageSize::Wide, ImageSize::Tall],
        }
    }

    /// Whether quality and style are sent with requests for this model.
    pub const fn supports_quality_and_style(self) -> bool {
        matches!(self, Self::DallE3)
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageSize {
    /// 256x256
    Square256,
    /// 512x512
    Square512,
    /// 1024x1024
    #[default]
    Square1024,
    /// 1792x1024
    Wide,
    /// 1024x1792
    Tall,
}

impl ImageSize {
    /// Identifier sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Square256 => "256x256",
            Self::Square512 => "512x512",
            Self::Square1024 => "1024x1024",
            Self::Wide => "1792x1024",
            Self::Tall => "1024x1792",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering quality (DALL·E 3 only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageQuality {
    /// `standard`
    #[default]
    Standard,
    /// `hd`
    Hd,
}

impl ImageQuality {
    /// Identifier sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Hd => "hd",
        }
    }
}

/// Rendering style (DALL·E 3 only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageStyle {
    /// `vivid`
    #[default]
    Vivid,
    /// `natural`
    Natural,
}

impl ImageStyle {
    /// Identifier sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vivid => "vivid",
            Self::Natural => "natural",
        }
    }
}

/// Image generation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageOptions {
    /// Model to run.
    pub model: ImageModel,
    /// Output dimensions.
    pub size: ImageSize,
    /// Rendering quality.
    pub quality: ImageQuality,
    /// Rendering style.
    pub style: ImageStyle,
}

impl ImageOptions {
    /// Rejects sizes the model does not offer.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.model.supported_sizes().contains(&self.size) {
            Ok(())
        } else {
            Err(ProviderError::invalid_size(self.size, self.model))
        }
    }
}

/// An image generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Description of the image.
    pub prompt: String,
    /// Model and rendering options.
    pub options: ImageOptions,
}

impl ImageRequest {
    /// Builds a request.
    pub fn new(prompt: impl Into<String>, options: ImageOptions) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }
}
