//! Poise framework setup and command registration logic.

use crate::dispatch::{ApiCommandDispatcher, Dispatcher, ImageCommandDispatcher, ImageOutcome, TextOutcome};
use crate::registry::CommandRegistry;
use crate::reply::send_private;
use poise::serenity_prelude as serenity;
use quill_common::{GuildId, QuillError, UserId};
use quill_config::Config;
use quill_providers::CompletionProvider;
use std::collections::HashSet;
use std::num::NonZeroU64;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Application data accessible in all commands.
pub struct Data {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Text and image provider, routed by model.
    pub provider: Arc<dyn CompletionProvider>,
    /// Commands visible in the help menu.
    pub registry: CommandRegistry,
    /// Dispatcher for text completions.
    pub api: ApiCommandDispatcher,
    /// Dispatcher for image generation.
    pub images: ImageCommandDispatcher,
}

impl Data {
    /// Builds the shared state from configuration, a provider and the command table.
    pub fn new(
        config: Arc<Config>,
        provider: Arc<dyn CompletionProvider>,
        commands: &[poise::Command<Self, Error>],
    ) -> Self {
        let registry = CommandRegistry::from_commands(commands, config.discord.owner_id);
        let api = Dispatcher::new(TextOutcome {
            max_chars: config.limits.max_reply_chars,
        });
        let images = Dispatcher::new(ImageOutcome {
            validity: config.limits.image_validity(),
        });

        Self {
            config,
            provider,
            registry,
            api,
            images,
        }
    }
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("config", &"<Config>")
            .field("provider", &self.provider.name())
            .field("registry", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Every command the bot registers.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        crate::admin::sync(),
        crate::admin::shutdown(),
        crate::admin::clear(),
        crate::general::help(),
        crate::general::ping(),
        crate::general::say(),
        crate::generate::grammar(),
        crate::generate::webpage(),
        crate::generate::emoji(),
        crate::generate::blockletters(),
        crate::generate::debug(),
        crate::generate::story(),
        crate::generate::ask_gpt(),
        crate::generate::image(),
    ]
}

/// Converts a configured id to serenity's non-zero id.
pub fn to_serenity_guild(id: GuildId) -> Option<serenity::GuildId> {
    NonZeroU64::new(id.0).map(serenity::GuildId::from)
}

/// Converts a configured id to serenity's non-zero id.
pub fn to_serenity_user(id: UserId) -> Option<serenity::UserId> {
    NonZeroU64::new(id.0).map(serenity::UserId::from)
}

/// Registers `commands` on every configured guild. Failures are logged per
/// guild and reported in the returned list.
pub async fn register_in_guilds<U: Send + Sync + 'static, E>(
    http: impl AsRef<serenity::Http>,
    commands: &[poise::Command<U, E>],
    guilds: &[GuildId],
) -> Vec<(GuildId, Result<usize, String>)> {
    let mut results = Vec::with_capacity(guilds.len());
    for &guild in guilds {
        let Some(guild_id) = to_serenity_guild(guild) else {
            warn!(%guild, "Skipping invalid guild id");
            results.push((guild, Err("invalid guild id".to_string())));
            continue;
        };

        match poise::builtins::register_in_guild(http.as_ref(), commands, guild_id).await {
            Ok(()) => {
                info!(%guild, count = commands.len(), "Registered commands");
                results.push((guild, Ok(commands.len())));
            }
            Err(e) => {
                error!(%guild, "Failed to register commands: {}", e);
                results.push((guild, Err(e.to_string())));
            }
        }
    }
    results
}

/// Global error handler for the framework.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().name, "Command failed: {:?}", error);
            let message = error.downcast_ref::<QuillError>().map_or_else(
                || "An error occurred while processing the command.".to_string(),
                QuillError::user_message,
            );
            if let Err(e) = send_private(ctx, message).await {
                warn!("Failed to report command error: {}", e);
            }
        }
        poise::FrameworkError::NotAnOwner { ctx, .. } => {
            warn!(
                command = %ctx.command().name,
                user = %ctx.author().id,
                "Owner-only command invoked by another user"
            );
            if let Err(e) = send_private(ctx, "Only the bot owner can use this command.").await {
                warn!("Failed to send owner notice: {}", e);
            }
        }
        poise::FrameworkError::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            warn!(
                command = %ctx.command().name,
                user = %ctx.author().id,
                "Caller lacks permissions"
            );
            let message = missing_permissions.map_or_else(
                || "You do not have permission to use this command.".to_string(),
                |perms| format!("You need the {perms} permission to use this command."),
            );
            if let Err(e) = send_private(ctx, message).await {
                warn!("Failed to send permission notice: {}", e);
            }
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            if let Err(e) = send_private(ctx, "This command can only be used in a server.").await {
                warn!("Failed to send guild-only notice: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Creates a new Poise framework that registers commands on the configured
/// guilds once the gateway is ready.
pub fn create_framework(
    config: Arc<Config>,
    provider: Arc<dyn CompletionProvider>,
) -> poise::Framework<Data, Error> {
    let owners: HashSet<serenity::UserId> =
        to_serenity_user(config.discord.owner_id).into_iter().collect();

    poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands(),
            owners,
            initialize_owners: false,
            on_error: |error| Box::pin(on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        command = %ctx.command().qualified_name,
                        user = %ctx.author().id,
                        "Command invoked"
                    );
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {}", ready.user.name);
                info!("Connected to {} guilds", ready.guilds.len());

                let guilds = config.discord.guilds();
                register_in_guilds(ctx, &framework.options().commands, &guilds).await;

                Ok(Data::new(config, provider, &framework.options().commands))
            })
        })
        .build()
}
