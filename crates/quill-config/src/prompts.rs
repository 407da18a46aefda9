//! System prompt templates keyed by command name.

use serde::Deserialize;
use std::collections::HashMap;

/// Prompt keys every deployment must provide.
pub const REQUIRED_PROMPTS: &[&str] = &[
    "ask_gpt",
    "blockletters",
    "debug",
    "emoji",
    "grammar",
    "story",
    "webpage",
];

/// One system prompt, optionally with its own sampling temperature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PromptTemplate {
    /// Bare system prompt.
    Plain(String),
    /// System prompt with overrides.
    Detailed {
        /// The system prompt sent ahead of the user's text.
        system_prompt: String,
        /// Sampling temperature for this command.
        #[serde(default)]
        temperature: Option<f32>,
    },
}

impl PromptTemplate {
    /// The system prompt text.
    pub fn system_prompt(&self) -> &str {
        match self {
            Self::Plain(prompt) | Self::Detailed { system_prompt: prompt, .. } => prompt,
        }
    }

    /// Temperature override, if any.
    pub const fn temperature(&self) -> Option<f32> {
        match self {
            Self::Plain(_) => None,
            Self::Detailed { temperature, .. } => *temperature,
        }
    }
}

/// All prompt templates from the prompt file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct PromptTemplates(HashMap<String, PromptTemplate>);

impl PromptTemplates {
    /// Parses the prompt file contents.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Template registered for `command`.
    pub fn get(&self, command: &str) -> Option<&PromptTemplate> {
        self.0.get(command)
    }

    /// Required keys that are absent or have a blank prompt, in sorted order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_PROMPTS
            .iter()
            .copied()
            .filter(|key| {
                self.get(key)
                    .map_or(true, |template| template.system_prompt().trim().is_empty())
            })
            .collect()
    }

    /// Keys whose temperature override is outside `0.0..=2.0`.
    pub fn invalid_temperatures(&self) -> Vec<(String, f32)> {
        let mut invalid: Vec<_> = self
            .0
            .iter()
            .filter_map(|(key, template)| {
                template
                    .temperature()
                    .filter(|t| !(0.0..=2.0).contains(t))
                    .map(|t| (key.clone(), t))
            })
            .collect();
        invalid.sort_by(|a, b| a.0.cmp(&b.0));
        invalid
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no templates.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PromptTemplate)> for PromptTemplates {
    fn from_iter<I: IntoIterator<Item = (String, PromptTemplate)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
