//! Help menu, latency check and echo.

use crate::framework::{Context, Error};
use crate::pagination::{Page, PaginationController, PaginationError};
use crate::registry::CommandDescriptor;
use crate::reply::{send_private, Button, Embed, Reply, INFO_COLOUR};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use quill_common::{
    escape_markdown, format, reject_mass_mentions, validate_length, UserId, MESSAGE_CONTENT_LIMIT,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Renders one help page with its navigation buttons.
pub fn help_reply(
    page: &Page<'_, CommandDescriptor>,
    prefix: &str,
    expired: bool,
) -> Reply {
    let description = if page.items.is_empty() {
        "No commands are available to you.".to_string()
    } else {
        page.items
            .iter()
            .map(|command| {
                let description = command.description.as_deref().unwrap_or("No description");
                format!("**/{}**: {description}", command.name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let embed = Embed::new("Commands", &description)
        .footer(&page.footer())
        .colour(INFO_COLOUR);

    Reply::embed(embed).buttons(vec![
        Button {
            custom_id: format!("{prefix}:prev"),
            label: "Previous".to_string(),
            disabled: expired || !page.has_previous(),
        },
        Button {
            custom_id: format!("{prefix}:next"),
            label: "Next".to_string(),
            disabled: expired || !page.has_next(),
        },
    ])
}

/// Shows the commands you can use, a page at a time.
#[poise::command(slash_command, category = "General")]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let caller = UserId(ctx.author().id.get());
    let items: Vec<CommandDescriptor> = data
        .registry
        .list_visible(caller)
        .into_iter()
        .cloned()
        .collect();

    let mut session = PaginationController::open(items, data.config.help.items_per_page, caller)
        .with_idle_timeout(data.config.help.timeout());

    let owner = session.owner();
    let prefix = ctx.id().to_string();
    let prev_id = format!("{prefix}:prev");
    let handle = ctx
        .send(help_reply(&session.render(), &prefix, false).into())
        .await?;

    loop {
        let remaining = session.remaining(Instant::now());
        if remaining == Duration::ZERO {
            break;
        }

        let filter_prefix = format!("{prefix}:");
        let Some(press) = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
            .filter(move |press| press.data.custom_id.starts_with(&filter_prefix))
            .timeout(remaining)
            .await
        else {
            break;
        };

        let actor = UserId(press.user.id.get());
        let turned = if press.data.custom_id == prev_id {
            session.previous(actor)
        } else {
            session.next(actor)
        };

        let response = match turned {
            Ok(page) => {
                debug!(page = page.page_number, "Help page turned");
                serenity::CreateInteractionResponse::UpdateMessage(
                    help_reply(&page, &prefix, false).into(),
                )
            }
            Err(err @ (PaginationError::Unauthorized | PaginationError::Expired)) => {
                info!(user = %actor, %owner, "Refused help page turn: {}", err);
                serenity::CreateInteractionResponse::Message(Reply::private(err.to_string()).into())
            }
        };

        if let Err(e) = press.create_response(ctx.serenity_context(), response).await {
            warn!("Failed to answer help button: {}", e);
        }
    }

    session.expire();
    let closed: CreateReply = help_reply(&session.render(), &prefix, true).into();
    if let Err(e) = handle.edit(ctx, closed).await {
        warn!("Failed to disable help buttons: {}", e);
    }
    Ok(())
}

/// Formats the `/ping` answer. A zero gateway latency means no heartbeat yet.
pub fn ping_message(gateway: Duration, rest: Duration) -> String {
    let gateway = if gateway.is_zero() {
        "not measured yet".to_string()
    } else {
        format!("{}ms", gateway.as_millis())
    };
    format!(
        "Pong! Gateway latency: {gateway} · REST round trip: {}ms",
        rest.as_millis()
    )
}

/// Shows the bot's latency.
#[poise::command(slash_command, category = "General")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let gateway = ctx.ping().await;

    let started = Instant::now();
    let handle = ctx
        .send(Reply::private("Pinging...").into())
        .await?;
    let rest = started.elapsed();

    let message = ping_message(gateway, rest);
    info!(gateway_ms = gateway.as_millis(), rest_ms = rest.as_millis(), "Ping");
    handle
        .edit(ctx, Reply::private(message).into())
        .await?;
    Ok(())
}

/// Checks `/say` input and returns the text to post.
pub fn prepare_say(text: &str) -> Result<String, quill_common::ValidationError> {
    reject_mass_mentions("text", text)?;
    validate_length("text", text, MESSAGE_CONTENT_LIMIT)?;
    Ok(format(&escape_markdown(text), MESSAGE_CONTENT_LIMIT))
}

/// Sends text into this channel.
#[poise::command(slash_command, guild_only, category = "General")]
pub async fn say(
    ctx: Context<'_>,
    #[description = "Text to send in the current channel"] text: String,
) -> Result<(), Error> {
    match prepare_say(&text) {
        Ok(safe) => {
            ctx.send(Reply::text(safe).into()).await?;
        }
        Err(quill_common::ValidationError::MassMention { .. }) => {
            info!(user = %ctx.author().id, "Refused mass mention in /say");
            send_private(ctx, "Nice try 😉").await?;
        }
        Err(err) => {
            send_private(ctx, err.to_string()).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::render_page;
    use crate::registry::CommandRegistry;
    use proptest::prelude::*;
    use quill_common::test_utils::discord_fixtures::{member_id, owner_id};
    use quill_common::test_utils::property_testing::prompt_strategy;

    fn twelve_commands() -> CommandRegistry {
        let mut commands: Vec<CommandDescriptor> = (1..=10)
            .map(|i| CommandDescriptor::public(format!("cmd{i:02}"), format!("Command {i}")))
            .collect();
        commands.push(CommandDescriptor::owner_only("shutdown", "Stop"));
        commands.push(CommandDescriptor::owner_only("sync", "Sync"));
        CommandRegistry::new(commands, owner_id())
    }

    #[test]
    fn test_help_first_page_for_non_owner() {
        let registry = twelve_commands();
        let visible: Vec<CommandDescriptor> =
            registry.list_visible(member_id()).into_iter().cloned().collect();
        assert_eq!(visible.len(), 10);

        let session = PaginationController::open(visible, 5, member_id());
        let reply = help_reply(&session.render(), "42", false);

        let embed = reply.embed.as_ref().unwrap();
        assert_eq!(embed.footer.as_deref(), Some("Showing 1-5 of 10 · Page 1/2"));
        assert!(embed.description.contains("/cmd01"));
        assert!(embed.description.contains("/cmd05"));
        assert!(!embed.description.contains("/cmd06"));
        assert!(!embed.description.contains("shutdown"));

        assert_eq!(reply.buttons[0].custom_id, "42:prev");
        assert!(reply.buttons[0].disabled);
        assert_eq!(reply.buttons[1].custom_id, "42:next");
        assert!(!reply.buttons[1].disabled);
    }

    #[test]
    fn test_expired_help_disables_both_buttons() {
        let items = vec![CommandDescriptor::public("ping", "Latency")];
        let page = render_page(&items, 5, 1);
        let reply = help_reply(&page, "7", true);
        assert!(reply.buttons.iter().all(|b| b.disabled));
    }

    #[test]
    fn test_empty_help_page() {
        let items: Vec<CommandDescriptor> = Vec::new();
        let reply = help_reply(&render_page(&items, 5, 1), "1", false);
        let embed = reply.embed.unwrap();
        assert_eq!(embed.description, "No commands are available to you.");
        assert_eq!(embed.footer.as_deref(), Some("No items to show"));
    }

    #[test]
    fn test_ping_message() {
        assert_eq!(
            ping_message(Duration::from_millis(42), Duration::from_millis(120)),
            "Pong! Gateway latency: 42ms · REST round trip: 120ms"
        );
        assert!(ping_message(Duration::ZERO, Duration::from_millis(5)).contains("not measured yet"));
    }

    #[test]
    fn test_say_rejects_mass_mentions() {
        assert!(matches!(
            prepare_say("hello @everyone"),
            Err(quill_common::ValidationError::MassMention { .. })
        ));
        assert!(prepare_say("@here now").is_err());
    }

    #[test]
    fn test_say_escapes_markup() {
        assert_eq!(prepare_say("**bold** <@123>").unwrap(), "\\*\\*bold\\*\\* <\u{200B}@\u{200B}123\\>");
    }

    proptest! {
        #[test]
        fn prop_say_output_is_inert(text in prompt_strategy()) {
            if let Ok(safe) = prepare_say(&text) {
                prop_assert!(safe.chars().count() <= MESSAGE_CONTENT_LIMIT);
                prop_assert!(!safe.contains("<@"));
                prop_assert!(!safe.contains("<#"));
            }
        }
    }
}
