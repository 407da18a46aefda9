//! Main entry point for Quill.

use clap::Parser;
use quill_bot::{Args, BotError, QuillBot};
use quill_common::init_logging;
use quill_config::ConfigLoader;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if let Err(e) = init_logging(args.logging()) {
        eprintln!("{}", BotError::Logging(e.to_string()));
        return Ok(ExitCode::from(1));
    }

    info!("Starting Quill v{}", env!("CARGO_PKG_VERSION"));

    let config = match ConfigLoader::load(args.prompts.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("{e}");
            return Ok(ExitCode::from(1));
        }
    };

    let bot = QuillBot::new(config)?;
    if let Err(e) = bot.start().await {
        error!("Bot stopped with an error: {}", e);
        return Ok(ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1)));
    }

    Ok(ExitCode::SUCCESS)
}
