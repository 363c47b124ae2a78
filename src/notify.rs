use crate::error::WatchwordError;
use serenity::all::{CreateMessage, Http, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Room left for the header fields within Discord's 2000-character cap.
const MAX_CONTENT_CHARS: usize = 1500;

/// One matched message and the subscribers it resolved to. Lives only for
/// the duration of a single dispatch.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    pub guild_name: String,
    pub channel_name: String,
    pub author_tag: String,
    pub content: String,
    pub link: String,
    pub recipients: HashSet<u64>,
}

/// Best-effort direct-message fan-out for watchword hits.
pub struct Notifier {
    http: Arc<Http>,
}

impl Notifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Fire-and-forget: the fan-out runs on its own task so a slow send
    /// never holds up message ingestion. One DM per recipient, at most
    /// once; a recipient that cannot be reached (blocked the bot, no
    /// shared channel) is logged and skipped, never retried.
    pub fn dispatch(&self, event: TriggerEvent) {
        let http = Arc::clone(&self.http);
        tokio::spawn(async move {
            debug!(
                "Dispatching watchword notification to {} recipient(s) for {}",
                event.recipients.len(),
                event.link
            );
            let body = render_notification(&event);
            for &user_id in &event.recipients {
                if let Err(source) = send_direct(&http, user_id, &body).await {
                    let failure = WatchwordError::DeliveryFailure { user_id, source };
                    warn!("{}", failure);
                }
            }
        });
    }
}

async fn send_direct(http: &Arc<Http>, user_id: u64, body: &str) -> serenity::Result<()> {
    let channel = UserId::new(user_id).create_dm_channel(http).await?;
    channel
        .id
        .send_message(http, CreateMessage::new().content(body))
        .await?;
    Ok(())
}

fn render_notification(event: &TriggerEvent) -> String {
    let mut content: String = event.content.chars().take(MAX_CONTENT_CHARS).collect();
    if event.content.chars().count() > MAX_CONTENT_CHARS {
        content.push_str("...");
    }

    format!(
        "A watched word/phrase was detected!\n\
         Server: {}\n\
         Channel: #{}\n\
         Author: {}\n\
         Content: {}\n\
         Link: {}",
        event.guild_name, event.channel_name, event.author_tag, content, event.link
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(content: &str) -> TriggerEvent {
        TriggerEvent {
            guild_name: "Test Server".to_string(),
            channel_name: "general".to_string(),
            author_tag: "alice".to_string(),
            content: content.to_string(),
            link: "https://discord.com/channels/1/2/3".to_string(),
            recipients: HashSet::new(),
        }
    }

    #[test]
    fn test_render_notification() {
        let body = render_notification(&event("I ate a cookie today"));
        assert!(body.starts_with("A watched word/phrase was detected!"));
        assert!(body.contains("Server: Test Server"));
        assert!(body.contains("Channel: #general"));
        assert!(body.contains("Author: alice"));
        assert!(body.contains("Content: I ate a cookie today"));
        assert!(body.contains("Link: https://discord.com/channels/1/2/3"));
    }

    #[test]
    fn test_render_truncates_long_content() {
        let body = render_notification(&event(&"x".repeat(3000)));
        assert!(body.contains("..."));
        assert!(body.chars().count() < 2000);
    }
}
