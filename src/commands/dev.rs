use crate::{Context, Error};
use serde_json::json;
use tracing::info;

/// File an issue for feature requests, bug reports, and other dev requests.
#[poise::command(
    slash_command,
    prefix_command,
    required_permissions = "MANAGE_GUILD",
    guild_only
)]
pub async fn dev(
    ctx: Context<'_>,
    #[description = "Issue title"]
    #[rest]
    issue: String,
) -> Result<(), Error> {
    info!("dev command invocation: {}", issue);

    let config = &ctx.data().config;
    let (Some(token), Some(owner), Some(repo)) = (
        config.github_token.as_deref(),
        config.github_repo_owner.as_deref(),
        config.github_repo_name.as_deref(),
    ) else {
        ctx.say("❌ Issue filing is not configured for this bot.")
            .await?;
        return Ok(());
    };

    let issue = issue.trim();
    if issue.is_empty() {
        ctx.say("❌ Please provide an issue title.").await?;
        return Ok(());
    }

    ctx.defer().await?;

    let url = format!("https://api.github.com/repos/{}/{}/issues", owner, repo);
    let payload = json!({
        "title": issue,
        "body": format!("Issue created by {}.", ctx.author().tag()),
    });
    let response = ctx
        .data()
        .http_client
        .post(&url)
        .header("Authorization", format!("token {}", token))
        .header("Accept", "application/vnd.github.v3+json")
        .header("User-Agent", "vigil-bot")
        .json(&payload)
        .send()
        .await?;

    if response.status() == reqwest::StatusCode::CREATED {
        let body: serde_json::Value = response.json().await?;
        let html_url = body
            .get("html_url")
            .and_then(|value| value.as_str())
            .unwrap_or_default();
        ctx.say(format!(
            "✅ Created issue: '{}'. You can add more detail here: {}",
            issue, html_url
        ))
        .await?;
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ctx.say(format!(
            "❌ Could not create issue: '{}'\nResponse ({}): {}",
            issue, status, body
        ))
        .await?;
    }

    Ok(())
}
