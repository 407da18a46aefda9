//! Command line arguments.

use clap::Parser;
use quill_common::{LogFormat, LoggingConfig};
use std::path::PathBuf;

/// Discord bot relaying slash commands to text and image generation services.
#[derive(Debug, Clone, Parser)]
#[command(name = "quill-bot", version, about)]
pub struct Args {
    /// Prompt template file.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts: Option<PathBuf>,

    /// Log filter, e.g. `info` or `quill_commands=debug`.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output style: pretty, compact or json.
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty", value_parser = parse_log_format)]
    pub log_format: LogFormat,

    /// Also append logs to this file.
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<String>,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse()
}

impl Args {
    /// Logging settings derived from the flags.
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            file_path: self.log_file.clone(),
            ..LoggingConfig::default()
        }
    }
}
