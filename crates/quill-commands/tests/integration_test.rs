//! Integration tests for quill-commands.
//!
//! These exercise the help menu, input validation and dispatch through the
//! crate's public API without a gateway connection.

use async_trait::async_trait;
use quill_commands::admin::validate_clear_amount;
use quill_commands::general::help_reply;
use quill_commands::generate::{run_text_command, ASK_GPT};
use quill_commands::{
    commands, CommandDescriptor, CommandOutcome, CommandRegistry, Data, PaginationController,
    PaginationError, Reply, ReplyChannel, Visibility,
};
use quill_common::test_utils::discord_fixtures::{member_id, owner_id};
use quill_common::test_utils::{init_test_logging, prompt_fixtures};
use quill_config::Config;
use quill_providers::MockCompletionProvider;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inbox {
    replies: Mutex<Vec<Reply>>,
}

#[async_trait]
impl ReplyChannel for Inbox {
    async fn defer(&self) -> quill_common::Result<()> {
        Ok(())
    }

    async fn send(&self, reply: Reply) -> quill_common::Result<()> {
        self.replies.lock().unwrap().push(reply);
        Ok(())
    }

    fn requester(&self) -> String {
        "carol".to_string()
    }
}

fn twelve_commands() -> CommandRegistry {
    let mut descriptors: Vec<CommandDescriptor> = (1..=10)
        .map(|i| CommandDescriptor::public(format!("public{i:02}"), "Public command"))
        .collect();
    descriptors.push(CommandDescriptor::owner_only("shutdown", "Stop the bot"));
    descriptors.push(CommandDescriptor::owner_only("sync", "Register commands"));
    CommandRegistry::new(descriptors, owner_id())
}

#[test]
fn test_registered_command_table() {
    let registry = CommandRegistry::from_commands(&commands(), owner_id());

    let owner_view: Vec<&str> = registry
        .list_visible(owner_id())
        .into_iter()
        .map(|c| c.name.as_str())
        .collect();
    let member_view: Vec<&str> = registry
        .list_visible(member_id())
        .into_iter()
        .map(|c| c.name.as_str())
        .collect();

    assert_eq!(owner_view.len(), 14);
    assert_eq!(member_view.len(), 12);
    assert!(owner_view.contains(&"sync"));
    assert!(!member_view.contains(&"shutdown"));
    assert_eq!(
        registry.get("shutdown").map(|c| c.visibility),
        Some(Visibility::OwnerOnly)
    );
}

#[test]
fn test_help_menu_for_member() {
    init_test_logging();
    let registry = twelve_commands();
    let visible: Vec<CommandDescriptor> = registry
        .list_visible(member_id())
        .into_iter()
        .cloned()
        .collect();

    let mut session = PaginationController::open(visible, 5, member_id());
    let first = help_reply(&session.render(), "900", false);
    let embed = first.embed.as_ref().unwrap();
    assert_eq!(embed.footer.as_deref(), Some("Showing 1-5 of 10 · Page 1/2"));
    assert!(first.buttons[0].disabled, "Previous on the first page");
    assert!(!first.buttons[1].disabled, "Next on the first page");

    assert_eq!(session.next(owner_id()), Err(PaginationError::Unauthorized));
    assert_eq!(session.current_page(), Some(1));

    let second = session.next(member_id()).unwrap();
    assert_eq!(second.first_item, 6);
    assert!(!second.has_next());

    session.expire();
    assert_eq!(session.previous(member_id()), Err(PaginationError::Expired));
    let closed = help_reply(&session.render(), "900", true);
    assert!(closed.buttons.iter().all(|b| b.disabled));
}

#[tokio::test]
async fn test_over_long_question_is_refused() {
    let mut provider = MockCompletionProvider::new();
    provider.expect_complete().times(0);
    let data = Data::new(Arc::new(Config::default()), Arc::new(provider), &[]);
    let inbox = Inbox::default();

    let outcome = run_text_command(
        &inbox,
        &data,
        &ASK_GPT,
        prompt_fixtures::question_over_limit(),
        None,
    )
    .await;

    assert!(matches!(outcome, CommandOutcome::Rejected(_)));
    let replies = inbox.replies.lock().unwrap();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].ephemeral);
    assert!(replies[0].visible_text().contains("230"));
}

#[test]
fn test_clear_amount_out_of_range() {
    let err = validate_clear_amount(150).unwrap_err();
    assert!(err.to_string().contains("between 1 and 100"));
    assert_eq!(validate_clear_amount(25), Ok(25));
}
