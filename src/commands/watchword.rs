use crate::error::WatchwordError;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;
use tracing::info;

/// Start watching a word or phrase; you'll get a DM when it's used.
#[poise::command(slash_command, prefix_command, aliases("watch"), guild_only)]
pub async fn watchword(
    ctx: Context<'_>,
    #[description = "Words to watch; wrap a phrase in double quotes"]
    #[rest]
    words: String,
) -> Result<(), Error> {
    info!("watchword command invocation: {}", words);
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(format!("❌ {}", WatchwordError::InvalidContext))
            .await?;
        return Ok(());
    };

    let words = parse_word_args(&words);
    if words.is_empty() {
        ctx.say(usage(&ctx.data().config.command_prefix)).await?;
        return Ok(());
    }

    let mut lines = Vec::new();
    for word in words {
        let result =
            ctx.data()
                .watch
                .subscribe(guild_id.get(), ctx.author().id.get(), &word, None);
        match result {
            Ok(word) => lines.push(format!(
                "✅ You are now watching this server for \"{}\".",
                word
            )),
            Err(WatchwordError::DuplicateSubscription(word)) => {
                lines.push(format!("ℹ️ You are already watching \"{}\".", word));
            }
            Err(WatchwordError::InvalidWord(word)) => {
                lines.push(format!(
                    "❌ \"{}\" can never trigger, so it was not added.",
                    word
                ));
            }
            Err(err) => return Err(err.into()),
        }
    }
    ctx.say(lines.join("\n")).await?;

    Ok(())
}

/// Stop watching a word or phrase.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("del_watchword", "unwatch"),
    guild_only
)]
pub async fn delete_word(
    ctx: Context<'_>,
    #[description = "The word or phrase to stop watching"]
    #[rest]
    word: String,
) -> Result<(), Error> {
    info!("delete_word command invocation: {}", word);
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(format!("❌ {}", WatchwordError::InvalidContext))
            .await?;
        return Ok(());
    };

    let parsed = parse_word_args(&word);
    let [word] = parsed.as_slice() else {
        ctx.say(usage(&ctx.data().config.command_prefix)).await?;
        return Ok(());
    };

    let result = ctx
        .data()
        .watch
        .unsubscribe(guild_id.get(), ctx.author().id.get(), word);
    match result {
        Ok(word) => {
            ctx.say(format!("✅ You are no longer watching \"{}\".", word))
                .await?;
        }
        Err(WatchwordError::NotSubscribed(word)) => {
            ctx.say(format!(
                "ℹ️ You are not watching this server for \"{}\".",
                word
            ))
            .await?;
        }
        Err(WatchwordError::InvalidWord(_)) => {
            ctx.say(usage(&ctx.data().config.command_prefix)).await?;
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// List the words you are watching in this server.
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn watched(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(format!("❌ {}", WatchwordError::InvalidContext))
            .await?;
        return Ok(());
    };

    let words = ctx
        .data()
        .watch
        .watched_words(guild_id.get(), ctx.author().id.get())?;

    if words.is_empty() {
        ctx.say("📭 You are not watching any words in this server.")
            .await?;
        return Ok(());
    }

    let list = words
        .iter()
        .map(|word| format!("• `{}`", word))
        .collect::<Vec<_>>()
        .join("\n");
    let embed = serenity::CreateEmbed::new()
        .title("👀 Your watched words")
        .description(list)
        .color(0x5865F2);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

fn usage(prefix: &str) -> String {
    format!(
        "That command contains an error. The syntax is as follows:\n\
         `{p}watchword \"lorem ipsum\"`\n\
         `{p}watchword lorem`\n\
         Note that watchwords that can never trigger, such as those beginning \
         with a bot prefix, are automatically rejected.",
        p = prefix
    )
}

/// Splits raw command input into words; double-quoted runs form phrases.
fn parse_word_args(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => {
                if in_quotes && !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_words() {
        assert_eq!(parse_word_args("cookie"), vec!["cookie"]);
        assert_eq!(parse_word_args("cookie bun"), vec!["cookie", "bun"]);
        assert_eq!(parse_word_args("  cookie   bun "), vec!["cookie", "bun"]);
    }

    #[test]
    fn test_parse_quoted_phrases() {
        assert_eq!(parse_word_args("\"lorem ipsum\""), vec!["lorem ipsum"]);
        assert_eq!(
            parse_word_args("cookie \"lorem ipsum\" bun"),
            vec!["cookie", "lorem ipsum", "bun"]
        );
    }

    #[test]
    fn test_parse_unclosed_quote_keeps_phrase() {
        assert_eq!(parse_word_args("\"lorem ipsum"), vec!["lorem ipsum"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_word_args("").is_empty());
        assert!(parse_word_args("   ").is_empty());
        assert!(parse_word_args("\"\"").is_empty());
    }
}
