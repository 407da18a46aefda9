//! Outgoing message descriptions and the channel they are delivered through.
//!
//! Command logic builds [`Reply`] values and hands them to a [`ReplyChannel`].
//! The poise adapter turns them into Discord builders; tests substitute a
//! recording channel.

use crate::framework::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use quill_common::{format, QuillError, Result, EMBED_DESCRIPTION_LIMIT, EMBED_TITLE_LIMIT, FOOTER_LIMIT};

/// Accent colour for successful replies.
pub const SUCCESS_COLOUR: u32 = 0x0010_A37F;
/// Accent colour for failure replies.
pub const FAILURE_COLOUR: u32 = 0x00ED_4245;
/// Accent colour for informational replies.
pub const INFO_COLOUR: u32 = 0x0058_65F2;

/// One embed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    /// Heading.
    pub title: String,
    /// Body text.
    pub description: String,
    /// `(name, value)` pairs rendered below the body.
    pub fields: Vec<(String, String)>,
    /// Small text at the bottom.
    pub footer: Option<String>,
    /// Large image.
    pub image_url: Option<String>,
    /// Time shown next to the footer.
    pub timestamp: Option<DateTime<Utc>>,
    /// Accent colour.
    pub colour: Option<u32>,
}

impl Embed {
    /// An embed with a title and body, clipped to Discord's limits.
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: format(title, EMBED_TITLE_LIMIT),
            description: format(description, EMBED_DESCRIPTION_LIMIT),
            ..Self::default()
        }
    }

    /// Adds a field. Fields are pre-clipped by the caller.
    #[must_use]
    pub fn field(mut self, field: Option<(String, String)>) -> Self {
        self.fields.extend(field);
        self
    }

    /// Sets the footer.
    #[must_use]
    pub fn footer(mut self, footer: &str) -> Self {
        self.footer = Some(format(footer, FOOTER_LIMIT));
        self
    }

    /// Sets the image.
    #[must_use]
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the accent colour.
    #[must_use]
    pub const fn colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    fn into_create_embed(self) -> serenity::CreateEmbed {
        let mut embed = serenity::CreateEmbed::new()
            .title(self.title)
            .description(self.description);

        for (name, value) in self.fields {
            embed = embed.field(name, value, false);
        }
        if let Some(footer) = self.footer {
            embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
        }
        if let Some(url) = self.image_url {
            embed = embed.image(url);
        }
        if let Some(timestamp) = self
            .timestamp
            .and_then(|t| serenity::Timestamp::from_unix_timestamp(t.timestamp()).ok())
        {
            embed = embed.timestamp(timestamp);
        }
        if let Some(colour) = self.colour {
            embed = embed.colour(colour);
        }
        embed
    }
}

/// An interactive button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Identifier echoed back when pressed.
    pub custom_id: String,
    /// Visible label.
    pub label: String,
    /// Greyed out and unclickable.
    pub disabled: bool,
}

impl Button {
    fn into_create_button(self) -> serenity::CreateButton {
        serenity::CreateButton::new(self.custom_id)
            .label(self.label)
            .style(serenity::ButtonStyle::Secondary)
            .disabled(self.disabled)
    }
}

/// A platform-neutral outgoing message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Plain text content.
    pub content: Option<String>,
    /// Rich embed.
    pub embed: Option<Embed>,
    /// Only visible to the invoking user.
    pub ephemeral: bool,
    /// A single row of buttons.
    pub buttons: Vec<Button>,
}

impl Reply {
    /// A plain text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// A private plain text reply.
    pub fn private(content: impl Into<String>) -> Self {
        Self::text(content).ephemeral()
    }

    /// An embed reply.
    pub fn embed(embed: Embed) -> Self {
        Self {
            embed: Some(embed),
            ..Self::default()
        }
    }

    /// Marks the reply as visible only to the invoking user.
    #[must_use]
    pub const fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Attaches buttons.
    #[must_use]
    pub fn buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    /// Text visible to the reader, for logs and assertions.
    pub fn visible_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(content) = &self.content {
            parts.push(content);
        }
        if let Some(embed) = &self.embed {
            parts.push(&embed.title);
            parts.push(&embed.description);
            for (name, value) in &embed.fields {
                parts.push(name);
                parts.push(value);
            }
            if let Some(footer) = &embed.footer {
                parts.push(footer);
            }
        }
        parts.join("\n")
    }

    fn components(&self) -> Option<Vec<serenity::CreateActionRow>> {
        if self.buttons.is_empty() {
            return None;
        }
        let row = self
            .buttons
            .iter()
            .cloned()
            .map(Button::into_create_button)
            .collect();
        Some(vec![serenity::CreateActionRow::Buttons(row)])
    }
}

impl From<Reply> for CreateReply {
    fn from(reply: Reply) -> Self {
        let mut builder = Self::default()
            .ephemeral(reply.ephemeral)
            .allowed_mentions(serenity::CreateAllowedMentions::new());

        if let Some(components) = reply.components() {
            builder = builder.components(components);
        }
        if let Some(content) = reply.content {
            builder = builder.content(content);
        }
        if let Some(embed) = reply.embed {
            builder = builder.embed(embed.into_create_embed());
        }
        builder
    }
}

impl From<Reply> for serenity::CreateInteractionResponseMessage {
    fn from(reply: Reply) -> Self {
        let mut builder = Self::new()
            .ephemeral(reply.ephemeral)
            .allowed_mentions(serenity::CreateAllowedMentions::new());

        if let Some(components) = reply.components() {
            builder = builder.components(components);
        }
        if let Some(content) = reply.content {
            builder = builder.content(content);
        }
        if let Some(embed) = reply.embed {
            builder = builder.embed(embed.into_create_embed());
        }
        builder
    }
}

/// Where a command's replies go.
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    /// Acknowledges the interaction so the platform shows a pending state.
    async fn defer(&self) -> Result<()>;

    /// Delivers one message.
    async fn send(&self, reply: Reply) -> Result<()>;

    /// Display name of the user who invoked the command.
    fn requester(&self) -> String;
}

/// [`ReplyChannel`] backed by a poise invocation context.
#[derive(Clone, Copy)]
pub struct PoiseChannel<'a> {
    ctx: Context<'a>,
}

impl<'a> PoiseChannel<'a> {
    /// Wraps an invocation context.
    pub const fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ReplyChannel for PoiseChannel<'_> {
    async fn defer(&self) -> Result<()> {
        self.ctx
            .defer()
            .await
            .map_err(|e| QuillError::discord_with_source("failed to defer interaction", e))
    }

    async fn send(&self, reply: Reply) -> Result<()> {
        self.ctx
            .send(reply.into())
            .await
            .map(|_| ())
            .map_err(|e| QuillError::discord_with_source("failed to send reply", e))
    }

    fn requester(&self) -> String {
        self.ctx.author().name.clone()
    }
}

/// Sends a private notice through the poise context.
pub async fn send_private(ctx: Context<'_>, text: impl Into<String>) -> Result<()> {
    PoiseChannel::new(ctx).send(Reply::private(text)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_clips_title_and_description() {
        let embed = Embed::new(&"t".repeat(300), &"d".repeat(5000));
        assert_eq!(embed.title.chars().count(), EMBED_TITLE_LIMIT);
        assert_eq!(embed.description.chars().count(), EMBED_DESCRIPTION_LIMIT);
        assert!(embed.description.ends_with("..."));
    }

    #[test]
    fn test_field_none_is_skipped() {
        let embed = Embed::new("t", "d")
            .field(None)
            .field(Some(("Question".into(), "why".into())));
        assert_eq!(embed.fields, vec![("Question".to_string(), "why".to_string())]);
    }

    #[test]
    fn test_visible_text_collects_everything() {
        let reply = Reply::embed(
            Embed::new("Title", "Body")
                .field(Some(("Name".into(), "Value".into())))
                .footer("Footer"),
        );
        let text = reply.visible_text();
        for part in ["Title", "Body", "Name", "Value", "Footer"] {
            assert!(text.contains(part));
        }
    }

    #[test]
    fn test_private_is_ephemeral() {
        let reply = Reply::private("nope");
        assert!(reply.ephemeral);
        assert_eq!(reply.content.as_deref(), Some("nope"));
    }
}
