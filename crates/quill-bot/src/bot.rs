//! Client lifecycle: provider wiring, gateway connection and shutdown.

use crate::error::BotResult;
use poise::serenity_prelude as serenity;
use quill_commands::create_framework;
use quill_config::Config;
use quill_providers::{CompletionProvider, ProviderRouter};
use std::sync::Arc;
use tracing::{error, info};

/// Main bot structure.
pub struct QuillBot {
    config: Arc<Config>,
    provider: Arc<dyn CompletionProvider>,
}

impl QuillBot {
    /// Builds the provider clients for `config`.
    pub fn new(config: Config) -> BotResult<Self> {
        let provider = ProviderRouter::from_config(&config.providers)?;
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Uses an already built provider.
    pub fn with_provider(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connects to the gateway and serves commands until the shards stop.
    ///
    /// Ctrl-C and `/shutdown` both stop every shard, which ends this call.
    pub async fn start(&self) -> BotResult<()> {
        let framework = create_framework(Arc::clone(&self.config), Arc::clone(&self.provider));

        let mut client = serenity::ClientBuilder::new(
            &self.config.discord.token,
            serenity::GatewayIntents::non_privileged(),
        )
        .framework(framework)
        .await?;

        let shard_manager = Arc::clone(&client.shard_manager);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, shutting down");
                    shard_manager.shutdown_all().await;
                }
                Err(e) => error!("Failed to listen for interrupt: {}", e),
            }
        });

        info!(
            guilds = self.config.discord.guilds().len(),
            provider = self.provider.name(),
            "Connecting to Discord"
        );
        client.start().await?;
        info!("All shards stopped");
        Ok(())
    }
}

impl std::fmt::Debug for QuillBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuillBot")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .finish()
    }
}
