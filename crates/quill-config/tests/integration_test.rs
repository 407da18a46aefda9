//! Integration tests for quill-config crate.

use quill_config::{Config, ConfigLoader, DiscordConfig, ProvidersConfig};
use std::io::Write;
use std::time::Duration;

const PROMPTS: &str = r#"{
    "ask_gpt": "a", "blockletters": "b", "debug": "c", "emoji": "d",
    "grammar": "e", "story": "f", "webpage": "g"
}"#;

#[test]
fn test_default_config_shape() {
    let config = Config::default();

    assert_eq!(config.help.items_per_page, 5);
    assert_eq!(config.help.timeout(), Duration::from_secs(120));
    assert_eq!(config.limits.max_reply_chars, 4096);
    assert_eq!(config.limits.image_validity(), Duration::from_secs(3600));
    assert_eq!(config.providers.retry_policy().max_attempts, 3);
}

#[test]
fn test_debug_output_redacts_secrets() {
    let discord = DiscordConfig {
        token: "very.secret.token".to_string(),
        ..DiscordConfig::default()
    };
    let providers = ProvidersConfig {
        openai_api_key: Some("sk-live-123".to_string()),
        ..ProvidersConfig::default()
    };

    let rendered = format!("{discord:?} {providers:?}");
    assert!(!rendered.contains("very.secret.token"));
    assert!(!rendered.contains("sk-live-123"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn test_load_reads_prompt_file_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROMPTS.as_bytes()).unwrap();

    // The runner's environment decides whether the env half passes; the
    // prompt half must never be the problem.
    match ConfigLoader::load(Some(file.path())) {
        Ok(config) => assert_eq!(config.prompts.len(), 7),
        Err(err) => assert!(err
            .issues
            .iter()
            .all(|issue| !issue.to_string().contains("prompt"))),
    }
}

#[test]
fn test_load_reports_unreadable_prompt_file() {
    let err = ConfigLoader::load(Some(std::path::Path::new("/nonexistent/prompts.json")))
        .unwrap_err();
    assert!(err
        .issues
        .iter()
        .any(|issue| issue.to_string().contains("failed to read prompt file")));
}
