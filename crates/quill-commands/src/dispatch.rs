//! Deferred dispatch of slow provider calls.
//!
//! A dispatcher acknowledges the interaction, runs the provider call on its
//! own task, and turns whatever comes back into exactly one reply. Failures
//! are logged in full and shown to the user only in sanitised form.

use crate::reply::{Embed, Reply, ReplyChannel, FAILURE_COLOUR, SUCCESS_COLOUR};
use chrono::{DateTime, Utc};
use quill_common::{
    format, format_field, relative_timestamp, EMBED_DESCRIPTION_LIMIT, FIELD_NAME_LIMIT,
    FIELD_VALUE_LIMIT,
};
use quill_providers::{ProviderError, ProviderResult};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Clock used to stamp replies.
pub type Clock = fn() -> DateTime<Utc>;

/// Failure class shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider's safety system refused the prompt.
    ContentPolicy,
    /// The provider is throttling requests.
    RateLimited,
    /// The image size is not offered by the chosen model.
    InvalidSize,
    /// The model or provider is not configured on this bot.
    Unavailable,
    /// Anything else.
    Generic,
    /// The operation panicked or was cancelled.
    Internal,
}

/// What kind of terminal reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The result was shown; `truncated` if it had to be clipped.
    Success {
        /// Whether the result exceeded the reply ceiling.
        truncated: bool,
    },
    /// The provider answered with nothing.
    Empty,
    /// The operation failed.
    Failed(FailureKind),
}

/// Result of one dispatch, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Which reply was produced.
    pub kind: OutcomeKind,
    /// Whether the platform accepted the reply.
    pub delivered: bool,
}

/// Title and optional prompt echo for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Heading of the reply embed.
    pub title: String,
    /// `(label, user input)` shown under the result. Escaped by the caller.
    pub echo: Option<(String, String)>,
}

impl DispatchRequest {
    /// A request with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            echo: None,
        }
    }

    /// Shows `value` under the result, labelled `label`.
    #[must_use]
    pub fn echo(mut self, label: &str, value: &str) -> Self {
        self.echo = format_field(label, value, FIELD_NAME_LIMIT, FIELD_VALUE_LIMIT);
        self
    }
}

impl From<&str> for DispatchRequest {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

/// How a dispatcher renders results and classifies failures.
pub trait OutcomeFormatter: Send + Sync {
    /// Success embed for a non-empty result.
    fn success(&self, request: &DispatchRequest, value: &str, now: DateTime<Utc>) -> (Embed, bool);

    /// Maps a provider error to a failure class.
    fn classify(&self, err: &ProviderError) -> FailureKind;

    /// User-facing text for a failure.
    fn failure_message(&self, kind: FailureKind, err: Option<&ProviderError>) -> String;
}

const EMPTY_MESSAGE: &str = "The model returned an empty response. Please try again.";
const GENERIC_MESSAGE: &str =
    "Something went wrong while generating a response. Please try again later.";
const CONTENT_POLICY_MESSAGE: &str = "Your request was rejected by the provider's content filter.";

fn content_policy_message(err: Option<&ProviderError>) -> String {
    err.and_then(ProviderError::detail).map_or_else(
        || CONTENT_POLICY_MESSAGE.to_string(),
        |detail| format!("{CONTENT_POLICY_MESSAGE}\n> {detail}"),
    )
}

fn unavailable_message(err: Option<&ProviderError>) -> String {
    match err {
        Some(ProviderError::NotConfigured(message)) => message.clone(),
        _ => GENERIC_MESSAGE.to_string(),
    }
}

/// Text completions: content policy or generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOutcome {
    /// Ceiling for the result text.
    pub max_chars: usize,
}

impl Default for TextOutcome {
    fn default() -> Self {
        Self {
            max_chars: EMBED_DESCRIPTION_LIMIT,
        }
    }
}

impl OutcomeFormatter for TextOutcome {
    fn success(&self, request: &DispatchRequest, value: &str, now: DateTime<Utc>) -> (Embed, bool) {
        let limit = self.max_chars.min(EMBED_DESCRIPTION_LIMIT);
        let truncated = value.chars().count() > limit;
        let embed = Embed::new(&request.title, &format(value, limit))
            .field(request.echo.clone())
            .timestamp(now)
            .colour(SUCCESS_COLOUR);
        (embed, truncated)
    }

    fn classify(&self, err: &ProviderError) -> FailureKind {
        match err {
            ProviderError::ContentPolicy { .. } => FailureKind::ContentPolicy,
            ProviderError::NotConfigured(_) => FailureKind::Unavailable,
            _ => FailureKind::Generic,
        }
    }

    fn failure_message(&self, kind: FailureKind, err: Option<&ProviderError>) -> String {
        match kind {
            FailureKind::ContentPolicy => content_policy_message(err),
            FailureKind::Unavailable => unavailable_message(err),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }
}

/// Image generation: adds an expiry hint and size/rate-limit messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOutcome {
    /// How long the returned link is advertised as valid.
    pub validity: Duration,
}

impl Default for ImageOutcome {
    fn default() -> Self {
        Self {
            validity: Duration::from_secs(3600),
        }
    }
}

impl OutcomeFormatter for ImageOutcome {
    fn success(&self, request: &DispatchRequest, value: &str, now: DateTime<Utc>) -> (Embed, bool) {
        let validity = chrono::Duration::from_std(self.validity).unwrap_or(chrono::Duration::hours(1));
        let expires = now + validity;
        let embed = Embed::new(
            &request.title,
            &format!("Link expires {}", relative_timestamp(expires)),
        )
        .field(request.echo.clone())
        .image(value.trim())
        .timestamp(now)
        .colour(SUCCESS_COLOUR);
        (embed, false)
    }

    fn classify(&self, err: &ProviderError) -> FailureKind {
        match err {
            ProviderError::ContentPolicy { .. } => FailureKind::ContentPolicy,
            ProviderError::RateLimited { .. } => FailureKind::RateLimited,
            ProviderError::InvalidSize { .. } => FailureKind::InvalidSize,
            ProviderError::NotConfigured(_) => FailureKind::Unavailable,
            _ => FailureKind::Generic,
        }
    }

    fn failure_message(&self, kind: FailureKind, err: Option<&ProviderError>) -> String {
        match kind {
            FailureKind::ContentPolicy => content_policy_message(err),
            FailureKind::RateLimited => {
                "Image generation is rate limited right now. Please wait a minute and try again."
                    .to_string()
            }
            FailureKind::InvalidSize => invalid_size_message(err),
            FailureKind::Unavailable => unavailable_message(err),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }
}

fn invalid_size_message(err: Option<&ProviderError>) -> String {
    const SIZES: &str = "DALL·E 3 supports 1024x1024, 1792x1024 and 1024x1792; \
                         DALL·E 2 supports 256x256, 512x512 and 1024x1024.";
    match err {
        Some(ProviderError::InvalidSize { size, model }) if !size.is_empty() => {
            format!("Size {size} is not available for {model}. {SIZES}")
        }
        _ => format!("That size is not available for the selected model. {SIZES}"),
    }
}

/// Defers, runs, classifies and replies exactly once.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<F> {
    formatter: F,
    clock: Clock,
}

/// Dispatcher for text completions.
pub type ApiCommandDispatcher = Dispatcher<TextOutcome>;
/// Dispatcher for image generation.
pub type ImageCommandDispatcher = Dispatcher<ImageOutcome>;

impl<F: OutcomeFormatter + Default> Default for Dispatcher<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: OutcomeFormatter> Dispatcher<F> {
    /// Creates a dispatcher stamping replies with the system clock.
    pub fn new(formatter: F) -> Self {
        Self {
            formatter,
            clock: Utc::now,
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The formatter.
    pub const fn formatter(&self) -> &F {
        &self.formatter
    }

    /// Runs `operation` and delivers exactly one terminal reply on `channel`.
    ///
    /// The channel is deferred first. A failed defer or send is logged and
    /// reported through [`DispatchOutcome::delivered`], never returned.
    pub async fn dispatch<C, Fut>(
        &self,
        channel: &C,
        request: impl Into<DispatchRequest>,
        operation: Fut,
    ) -> DispatchOutcome
    where
        C: ReplyChannel + ?Sized,
        Fut: Future<Output = ProviderResult<String>> + Send + 'static,
    {
        let request = request.into();
        if let Err(e) = channel.defer().await {
            warn!(title = %request.title, "Failed to defer interaction: {}", e);
        }

        let result = tokio::spawn(operation).await;
        let (reply, kind) = match result {
            Ok(Ok(value)) => self.on_value(&request, &value, channel.requester()),
            Ok(Err(err)) => {
                let kind = self.formatter.classify(&err);
                error!(title = %request.title, ?kind, "Provider call failed: {:?}", err);
                (self.failure_reply(&request, kind, Some(&err)), OutcomeKind::Failed(kind))
            }
            Err(join_error) => {
                error!(title = %request.title, "Provider task did not complete: {}", join_error);
                let kind = FailureKind::Internal;
                (self.failure_reply(&request, kind, None), OutcomeKind::Failed(kind))
            }
        };

        let delivered = match channel.send(reply).await {
            Ok(()) => true,
            Err(e) => {
                warn!(title = %request.title, "Failed to deliver reply: {}", e);
                false
            }
        };

        DispatchOutcome { kind, delivered }
    }

    fn on_value(&self, request: &DispatchRequest, value: &str, requester: String) -> (Reply, OutcomeKind) {
        if value.trim().is_empty() {
            info!(title = %request.title, "Provider returned an empty response");
            let embed = Embed::new(&request.title, EMPTY_MESSAGE).colour(FAILURE_COLOUR);
            return (Reply::embed(embed), OutcomeKind::Empty);
        }

        let (embed, truncated) = self.formatter.success(request, value, (self.clock)());
        if truncated {
            debug!(title = %request.title, "Result clipped to the reply ceiling");
        }
        let embed = embed.footer(&format!("Requested by {requester}"));
        (Reply::embed(embed), OutcomeKind::Success { truncated })
    }

    fn failure_reply(&self, request: &DispatchRequest, kind: FailureKind, err: Option<&ProviderError>) -> Reply {
        let message = self.formatter.failure_message(kind, err);
        Reply::embed(Embed::new(&request.title, &message).colour(FAILURE_COLOUR))
    }
}
