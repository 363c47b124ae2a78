use poise::serenity_prelude as serenity;
use std::collections::HashSet;
use tracing::{error, info, warn};
use vigil::commands::{dev, radio, roll, search, watchword};
use vigil::config::Config;
use vigil::notify::TriggerEvent;
use vigil::Data;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    let discord_token = config.discord_token.clone();
    let command_prefix = config.command_prefix.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                watchword::watchword(),
                watchword::delete_word(),
                watchword::watched(),
                radio::radio(),
                roll::roll(),
                search::search(),
                dev::dev(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(command_prefix),
                case_insensitive_commands: true,
                ..Default::default()
            },
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    match event {
                        serenity::FullEvent::Message { new_message } => {
                            handle_message(ctx, new_message, data).await;
                        }
                        serenity::FullEvent::ReactionAdd { add_reaction } => {
                            handle_reaction(ctx, add_reaction, data).await;
                        }
                        _ => {}
                    }
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!(
                    "{} is connected to {} server(s)",
                    ready.user.name,
                    ready.guilds.len()
                );
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                // Set bot status
                ctx.set_activity(Some(serenity::ActivityData::custom(&config.status_message)));

                let db = vigil::db::Database::new(&config).expect("Failed to open database");
                db.execute_init().expect("Failed to initialize database");

                let watch = vigil::services::watchword::WatchwordService::new(
                    db.clone(),
                    config.command_prefix.clone(),
                );
                // Must complete before the first message event is dispatched
                watch.rebuild_all()?;

                Ok(Data {
                    config,
                    http_client: reqwest::Client::new(),
                    db,
                    watch,
                    notifier: vigil::notify::Notifier::new(ctx.http.clone()),
                })
            })
        })
        .build();

    // GUILD_MEMBERS keeps the member cache warm for channel-membership checks
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS;

    let mut client = serenity::ClientBuilder::new(&discord_token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    info!("Starting bot...");
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    Ok(())
}

async fn handle_message(ctx: &serenity::Context, message: &serenity::Message, data: &Data) {
    if message.author.bot {
        return;
    }

    if let Err(err) = enforce_radio(ctx, message, data).await {
        warn!("Radio enforcement failed for message {}: {}", message.id, err);
    }

    let Some(guild_id) = message.guild_id else {
        return;
    };
    // Commands are not content
    if message.content.starts_with(&data.config.command_prefix) {
        return;
    }

    let Some((guild_name, channel)) = channel_context(ctx, guild_id, message.channel_id) else {
        return;
    };
    let members = channel_members(ctx, &channel);

    let recipients = data.watch.match_message(
        guild_id.get(),
        &message.content,
        message.author.id.get(),
        message.channel_id.get(),
        &members,
    );
    if recipients.is_empty() {
        return;
    }

    data.notifier.dispatch(TriggerEvent {
        guild_name,
        channel_name: channel.name.clone(),
        author_tag: message.author.tag(),
        content: message.content.clone(),
        link: message.link(),
        recipients,
    });
}

async fn enforce_radio(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &Data,
) -> anyhow::Result<()> {
    if !data.db.is_radio_channel(message.channel_id.get())? {
        return Ok(());
    }
    if vigil::radio::violates_text_only(!message.attachments.is_empty(), &message.content) {
        message.delete(&ctx.http).await?;
    }
    Ok(())
}

async fn handle_reaction(ctx: &serenity::Context, reaction: &serenity::Reaction, data: &Data) {
    if reaction.user_id == Some(ctx.cache.current_user().id) {
        return;
    }

    let is_radio = match data.db.is_radio_channel(reaction.channel_id.get()) {
        Ok(is_radio) => is_radio,
        Err(err) => {
            warn!("Radio lookup failed for channel {}: {}", reaction.channel_id, err);
            return;
        }
    };
    if !is_radio {
        return;
    }

    let cleared = async {
        let message = reaction.message(&ctx.http).await?;
        message
            .delete_reaction_emoji(&ctx.http, reaction.emoji.clone())
            .await
    }
    .await;
    if let Err(err) = cleared {
        warn!(
            "Could not clear reaction in radio channel {}: {}",
            reaction.channel_id, err
        );
    }
}

fn channel_context(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    channel_id: serenity::ChannelId,
) -> Option<(String, serenity::GuildChannel)> {
    let guild = ctx.cache.guild(guild_id)?;
    let channel = guild.channels.get(&channel_id)?.clone();
    Some((guild.name.clone(), channel))
}

fn channel_members(ctx: &serenity::Context, channel: &serenity::GuildChannel) -> HashSet<u64> {
    channel
        .members(&ctx.cache)
        .map(|members| members.iter().map(|member| member.user.id.get()).collect())
        .unwrap_or_default()
}
