//! Owner and moderator commands.

use crate::framework::{register_in_guilds, Context, Error};
use crate::reply::{send_private, PoiseChannel, Reply, ReplyChannel};
use poise::serenity_prelude as serenity;
use quill_common::{validate_range, GuildId, ValidationError};
use tracing::{info, warn};

/// Fewest messages `/clear` deletes.
pub const CLEAR_MIN: i64 = 1;
/// Most messages `/clear` deletes; Discord's bulk delete ceiling.
pub const CLEAR_MAX: i64 = 100;
/// Bulk delete refuses messages older than this.
const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60;

/// Checks a `/clear` amount and converts it to a fetch limit.
pub fn validate_clear_amount(amount: i64) -> Result<u8, ValidationError> {
    validate_range("amount", amount, CLEAR_MIN, CLEAR_MAX)?;
    u8::try_from(amount).map_err(|_| ValidationError::OutOfRange {
        field: "amount".to_string(),
        min: CLEAR_MIN,
        max: CLEAR_MAX,
        actual: amount,
    })
}

/// One line per guild: registered count or the failure.
pub fn sync_summary(results: &[(GuildId, Result<usize, String>)]) -> String {
    if results.is_empty() {
        return "No guilds are configured.".to_string();
    }
    results
        .iter()
        .map(|(guild, result)| match result {
            Ok(count) => format!("✅ `{guild}`: registered {count} commands"),
            Err(reason) => format!("❌ `{guild}`: {reason}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Re-registers every command on the configured servers.
#[poise::command(slash_command, owners_only, category = "Admin")]
pub async fn sync(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let guilds = ctx.data().config.discord.guilds();
    let results = register_in_guilds(ctx.http(), &ctx.framework().options().commands, &guilds).await;
    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    info!(guilds = results.len(), failed, "Command sync finished");

    send_private(ctx, sync_summary(&results)).await?;
    Ok(())
}

/// Shuts the bot down.
#[poise::command(slash_command, owners_only, category = "Admin")]
pub async fn shutdown(ctx: Context<'_>) -> Result<(), Error> {
    info!(user = %ctx.author().id, "Shutdown requested");
    if let Err(e) = send_private(ctx, "Shutting down the bot...").await {
        warn!("Failed to acknowledge shutdown: {}", e);
    }
    ctx.framework().shard_manager().shutdown_all().await;
    Ok(())
}

/// Deletes recent messages from this channel.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    required_bot_permissions = "MANAGE_MESSAGES",
    category = "Moderation"
)]
pub async fn clear(
    ctx: Context<'_>,
    #[description = "Number of messages to delete (1-100)"] amount: i64,
) -> Result<(), Error> {
    let channel = PoiseChannel::new(ctx);
    let limit = match validate_clear_amount(amount) {
        Ok(limit) => limit,
        Err(err) => {
            info!(amount, "Rejected clear amount");
            channel.send(Reply::private(err.to_string())).await?;
            return Ok(());
        }
    };

    ctx.defer_ephemeral().await?;

    let messages = ctx
        .channel_id()
        .messages(ctx.http(), serenity::GetMessages::new().limit(limit))
        .await?;

    let cutoff = chrono::Utc::now().timestamp() - BULK_DELETE_MAX_AGE_SECS;
    let (recent, stale): (Vec<_>, Vec<_>) = messages
        .into_iter()
        .partition(|message| message.timestamp.unix_timestamp() > cutoff);

    match recent.as_slice() {
        [] => {}
        [single] => ctx.channel_id().delete_message(ctx.http(), single.id).await?,
        many => {
            let ids: Vec<serenity::MessageId> = many.iter().map(|message| message.id).collect();
            ctx.channel_id().delete_messages(ctx.http(), &ids).await?;
        }
    }
    info!(channel = %ctx.channel_id(), deleted = recent.len(), skipped = stale.len(), "Cleared messages");

    let mut summary = format!("Deleted {} message(s).", recent.len());
    if !stale.is_empty() {
        summary.push_str(&format!(
            " Skipped {} older than 14 days, which Discord does not allow bulk deleting.",
            stale.len()
        ));
    }
    channel.send(Reply::private(summary)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_amount_bounds() {
        assert_eq!(validate_clear_amount(1), Ok(1));
        assert_eq!(validate_clear_amount(100), Ok(100));
        assert!(validate_clear_amount(0).is_err());
        assert!(validate_clear_amount(-5).is_err());
    }

    #[test]
    fn test_clear_150_names_the_bound() {
        let err = validate_clear_amount(150).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`amount` must be between 1 and 100 (got 150)"
        );
    }

    #[test]
    fn test_sync_summary_lists_each_guild() {
        let summary = sync_summary(&[
            (GuildId(1), Ok(14)),
            (GuildId(2), Err("Missing Access".to_string())),
        ]);
        assert_eq!(
            summary,
            "✅ `1`: registered 14 commands\n❌ `2`: Missing Access"
        );
    }

    #[test]
    fn test_sync_summary_without_guilds() {
        assert_eq!(sync_summary(&[]), "No guilds are configured.");
    }
}
