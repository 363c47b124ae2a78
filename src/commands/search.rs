use crate::{Context, Data, Error};
use rand::seq::SliceRandom;
use tracing::{info, warn};

/// Look up an article, or get a random one with no search terms.
#[poise::command(slash_command, prefix_command, aliases("scott"))]
pub async fn search(
    ctx: Context<'_>,
    #[description = "Search terms"]
    #[rest]
    query: Option<String>,
) -> Result<(), Error> {
    let query = query.unwrap_or_default();
    info!("search command invocation: {}", query);

    ctx.defer().await?;
    let reply = search_reply(ctx.data(), query.trim()).await;
    ctx.say(reply).await?;

    Ok(())
}

async fn search_reply(data: &Data, query: &str) -> String {
    if query.is_empty() {
        return random_link(&data.config.search_links_file)
            .unwrap_or_else(|| "No matches found.".to_string());
    }

    match lookup(data, query).await {
        Some(link) => link,
        None => "No matches found.".to_string(),
    }
}

/// First result link from the configured search engine, if any.
async fn lookup(data: &Data, query: &str) -> Option<String> {
    let key = data.config.google_api_key.as_deref()?;
    let engine = data.config.search_engine_id.as_deref()?;

    let response = data
        .http_client
        .get("https://www.googleapis.com/customsearch/v1")
        .query(&[("key", key), ("cx", engine), ("q", query)])
        .send()
        .await;
    let response = match response {
        Ok(response) => response,
        Err(err) => {
            warn!("Search request failed: {}", err);
            return None;
        }
    };

    let body: serde_json::Value = match response.json().await {
        Ok(body) => body,
        Err(err) => {
            warn!("Search response was not valid JSON: {}", err);
            return None;
        }
    };

    let link = body.get("items")?.get(0)?.get("link")?.as_str()?;
    Some(link.to_string())
}

fn random_link(path: &str) -> Option<String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!("Could not read links file {}: {}", path, err);
            return None;
        }
    };

    let links: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    links
        .choose(&mut rand::thread_rng())
        .map(|link| link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_link_picks_from_file() {
        let path = std::env::temp_dir().join("vigil_test_links.txt");
        std::fs::write(&path, "https://example.com/a\n\nhttps://example.com/b\n").unwrap();

        let link = random_link(path.to_str().unwrap()).unwrap();
        assert!(link == "https://example.com/a" || link == "https://example.com/b");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_random_link_missing_file() {
        assert_eq!(random_link("does_not_exist.txt"), None);
    }
}
