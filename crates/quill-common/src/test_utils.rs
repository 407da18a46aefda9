//! Test utilities and shared test helpers for Quill.
//!
//! Fixtures and helpers used across the workspace's unit and integration
//! tests. Enabled with the `testing` feature.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Discord-related test utilities.
pub mod discord_fixtures {
    use crate::UserId;

    /// The configured bot owner.
    pub fn owner_id() -> UserId {
        UserId(111_111_111_111_111_111)
    }

    /// A regular member of the server.
    pub fn member_id() -> UserId {
        UserId(987_654_321_098_765_432)
    }

}

/// Prompt fixtures.
pub mod prompt_fixtures {
    /// A question exactly at the `ask_gpt` bound.
    pub fn question_at_limit() -> String {
        "q".repeat(230)
    }

    /// A question one character over the `ask_gpt` bound.
    pub fn question_over_limit() -> String {
        "q".repeat(231)
    }

    /// An OpenAI-style content policy error as the HTTP layer reports it.
    pub fn content_policy_raw() -> &'static str {
        r#"Error code: 400 - {"error": {"code": "content_policy_violation", "message": "Your request was rejected as a result of our safety system.", "param": null, "type": "invalid_request_error"}}"#
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use crate::UserId;
    use proptest::prelude::*;

    /// Strategy for generating Discord user IDs.
    pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
        (100_000_000_000_000_000u64..=999_999_999_999_999_999u64).prop_map(UserId)
    }

    /// Strategy for slash command names.
    pub fn command_name_strategy() -> impl Strategy<Value = String> {
        r"[a-z][a-z0-9_]{1,31}".prop_map(|s| s)
    }

    /// Strategy for arbitrary user supplied text, including markup.
    pub fn prompt_strategy() -> impl Strategy<Value = String> {
        r"[\PC]{0,600}".prop_map(|s| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_fixtures_distinct() {
        assert_ne!(discord_fixtures::owner_id(), discord_fixtures::member_id());
    }

    #[test]
    fn test_question_fixtures() {
        assert_eq!(prompt_fixtures::question_at_limit().chars().count(), 230);
        assert_eq!(prompt_fixtures::question_over_limit().chars().count(), 231);
    }

    #[cfg(feature = "proptest")]
    mod property_tests {
        use super::super::property_testing;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_property_command_names(name in property_testing::command_name_strategy()) {
                prop_assert!(name.len() >= 2 && name.len() <= 32);
            }

            #[test]
            fn test_property_user_ids_are_snowflake_sized(id in property_testing::user_id_strategy()) {
                prop_assert_eq!(id.to_string().len(), 18);
            }
        }
    }
}
