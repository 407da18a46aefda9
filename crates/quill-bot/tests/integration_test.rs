//! Integration tests for quill-bot.
//!
//! These cover startup wiring that does not need a gateway connection.

use clap::Parser;
use quill_bot::{Args, BotError, QuillBot};
use quill_common::test_utils::init_test_logging;
use quill_config::{Config, ConfigLoader};
use std::collections::HashMap;
use std::io::Write;

const PROMPTS: &str = r#"{
    "grammar": "Fix the grammar.",
    "webpage": "Write a web page.",
    "emoji": "Answer in emoji.",
    "blockletters": "Spell in block letters.",
    "debug": "Find the bug.",
    "story": {"system_prompt": "Tell a story.", "temperature": 1.1},
    "ask_gpt": "Answer briefly."
}"#;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn test_bot_builds_from_loaded_configuration() {
    init_test_logging();
    let config = ConfigLoader::from_sources(
        &env(&[
            ("BOT_TOKEN", "token"),
            ("OWNER_ID", "1"),
            ("GUILD_ID", "2"),
            ("GPT_API_KEY", "sk-test"),
        ]),
        Ok(PROMPTS.to_string()),
    )
    .unwrap();

    let bot = QuillBot::new(config).unwrap();
    assert_eq!(bot.config().discord.guilds().len(), 1);
    assert!(bot.config().prompts.get("story").is_some());
}

#[test]
fn test_missing_settings_fail_before_connecting() {
    let err = ConfigLoader::from_sources(&env(&[]), Ok(PROMPTS.to_string())).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("BOT_TOKEN"));
    assert!(message.contains("OWNER_ID"));
    assert_eq!(BotError::from(err).exit_code(), 1);
}

#[test]
fn test_prompt_file_from_flag() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROMPTS.as_bytes()).unwrap();

    let path = file.path().to_string_lossy().into_owned();
    let args = Args::try_parse_from(["quill-bot", "--prompts", path.as_str()]).unwrap();
    assert_eq!(args.prompts.as_deref(), Some(file.path()));
}

#[test]
fn test_default_configuration_has_no_keys() {
    let config = Config::default();
    assert!(config.providers.openai_api_key.is_none());
    assert!(config.providers.openrouter_api_key.is_none());
}
