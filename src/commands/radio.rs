use crate::{Context, Error};
use tracing::info;

/// Toggle bot-enforced text-only mode for this channel.
#[poise::command(
    slash_command,
    prefix_command,
    required_permissions = "MANAGE_MESSAGES",
    guild_only,
    hide_in_help
)]
pub async fn radio(ctx: Context<'_>) -> Result<(), Error> {
    info!("radio command invocation: channel {}", ctx.channel_id());

    let enabled = ctx.data().db.toggle_radio(ctx.channel_id().get())?;
    if enabled {
        ctx.say("📻 Radio mode is now on in this channel.").await?;
    } else {
        ctx.say("📻 Radio mode is now off in this channel.").await?;
    }

    Ok(())
}
