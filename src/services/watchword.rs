use crate::db::Database;
use crate::error::WatchwordError;
use crate::normalize;
use crate::watch::{matcher, ChannelFilter, WatchIndex, Watchers};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Write-through coordinator for watchword subscriptions.
///
/// The store commits first, then the in-memory index is updated, so the
/// index never reflects a subscription the store lost. Subscribe and
/// unsubscribe serialize with each other and with rebuilds through the
/// index's write lock.
#[derive(Clone)]
pub struct WatchwordService {
    db: Database,
    index: Arc<WatchIndex>,
    command_prefix: String,
}

impl WatchwordService {
    pub fn new(db: Database, command_prefix: String) -> Self {
        Self {
            db,
            index: Arc::new(WatchIndex::new()),
            command_prefix,
        }
    }

    /// Validates and subscribes one raw word or phrase, returning the
    /// normalized form that was stored.
    pub fn subscribe(
        &self,
        guild_id: u64,
        user_id: u64,
        raw_word: &str,
        channels: ChannelFilter,
    ) -> Result<String, WatchwordError> {
        let word = self.validate(raw_word)?;
        let channels = channels.filter(|set| !set.is_empty());

        self.db
            .add_watchword(guild_id, user_id, &word, channels.as_ref())?;
        self.index.insert(guild_id, &word, user_id, channels);

        debug!(
            "User {} now watching \"{}\" in guild {}",
            user_id, word, guild_id
        );
        Ok(word)
    }

    /// Unsubscribes one raw word or phrase, returning the normalized form
    /// that was removed.
    pub fn unsubscribe(
        &self,
        guild_id: u64,
        user_id: u64,
        raw_word: &str,
    ) -> Result<String, WatchwordError> {
        let word = self.validate(raw_word)?;

        if !self.db.remove_watchword(guild_id, user_id, &word)? {
            return Err(WatchwordError::NotSubscribed(word));
        }
        self.index.delete(guild_id, &word, user_id);

        debug!(
            "User {} no longer watching \"{}\" in guild {}",
            user_id, word, guild_id
        );
        Ok(word)
    }

    pub fn watched_words(&self, guild_id: u64, user_id: u64) -> anyhow::Result<Vec<String>> {
        self.db.list_watchwords(guild_id, user_id)
    }

    /// Repopulates one guild's index from storage.
    pub fn rebuild_guild(&self, guild_id: u64) -> anyhow::Result<()> {
        let rows = self.db.load_guild_watchwords(guild_id)?;
        let count = rows.len();
        self.index.rebuild(
            guild_id,
            rows.into_iter().map(|row| (row.user_id, row.word, row.channels)),
        );
        debug!(
            "Rebuilt watch index for guild {} ({} subscriptions)",
            guild_id, count
        );
        Ok(())
    }

    /// Rebuilds every guild present in storage. Runs during startup,
    /// before the gateway delivers the first message event.
    pub fn rebuild_all(&self) -> anyhow::Result<()> {
        let guilds = self.db.load_watchword_guilds()?;
        for guild_id in &guilds {
            self.rebuild_guild(*guild_id)?;
        }
        info!("Watch index ready ({} guild(s))", guilds.len());
        Ok(())
    }

    /// A consistent snapshot of one guild's index entries.
    pub fn entries(&self, guild_id: u64) -> HashMap<String, Watchers> {
        self.index.guild_entries(guild_id)
    }

    /// Resolves the recipients for one incoming message.
    pub fn match_message(
        &self,
        guild_id: u64,
        text: &str,
        author_id: u64,
        channel_id: u64,
        channel_members: &HashSet<u64>,
    ) -> HashSet<u64> {
        let entries = self.index.guild_entries(guild_id);
        matcher::match_message(
            &entries,
            &self.command_prefix,
            text,
            author_id,
            channel_id,
            channel_members,
        )
    }

    /// Normalizes a raw word, rejecting input that could never trigger:
    /// anything leading with the command prefix, or text that normalizes
    /// to nothing.
    fn validate(&self, raw_word: &str) -> Result<String, WatchwordError> {
        let trimmed = raw_word.trim();
        if trimmed.is_empty() || trimmed.starts_with(self.command_prefix.trim_end()) {
            return Err(WatchwordError::InvalidWord(trimmed.to_string()));
        }

        let normalized = normalize::normalize(trimmed);
        let word = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        if word.is_empty() {
            return Err(WatchwordError::InvalidWord(trimmed.to_string()));
        }
        Ok(word)
    }
}
