pub mod matcher;

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Channel restriction for one subscriber. `None` means every channel
/// the subscriber can see.
pub type ChannelFilter = Option<HashSet<u64>>;

/// Subscribers of one watched word, keyed by user id.
pub type Watchers = HashMap<u64, ChannelFilter>;

/// In-memory projection of the watchword table: guild → word → watchers.
///
/// Rebuilt per guild from storage at startup and updated incrementally on
/// every subscribe/unsubscribe, so it always mirrors the live rows.
/// Mutations and rebuilds serialize on the write lock; matching reads a
/// cloned snapshot of a single guild's entries and never sees a partial
/// update.
pub struct WatchIndex {
    guilds: RwLock<HashMap<u64, HashMap<String, Watchers>>>,
}

impl WatchIndex {
    pub fn new() -> Self {
        Self {
            guilds: RwLock::new(HashMap::new()),
        }
    }

    /// Clears and repopulates one guild's entries.
    pub fn rebuild(
        &self,
        guild_id: u64,
        rows: impl IntoIterator<Item = (u64, String, ChannelFilter)>,
    ) {
        let mut fresh: HashMap<String, Watchers> = HashMap::new();
        for (user_id, word, channels) in rows {
            fresh.entry(word).or_default().insert(user_id, channels);
        }

        let mut guilds = self.guilds.write().unwrap();
        if fresh.is_empty() {
            guilds.remove(&guild_id);
        } else {
            guilds.insert(guild_id, fresh);
        }
    }

    pub fn insert(&self, guild_id: u64, word: &str, user_id: u64, channels: ChannelFilter) {
        let mut guilds = self.guilds.write().unwrap();
        guilds
            .entry(guild_id)
            .or_default()
            .entry(word.to_string())
            .or_default()
            .insert(user_id, channels);
    }

    /// Removes one subscriber from one word. Emptied word entries (and
    /// emptied guild slots) are dropped rather than left behind.
    pub fn delete(&self, guild_id: u64, word: &str, user_id: u64) {
        let mut guilds = self.guilds.write().unwrap();
        let Some(words) = guilds.get_mut(&guild_id) else {
            return;
        };
        if let Some(watchers) = words.get_mut(word) {
            watchers.remove(&user_id);
            if watchers.is_empty() {
                words.remove(word);
            }
        }
        if words.is_empty() {
            guilds.remove(&guild_id);
        }
    }

    /// A consistent snapshot of one guild's entries.
    pub fn guild_entries(&self, guild_id: u64) -> HashMap<String, Watchers> {
        let guilds = self.guilds.read().unwrap();
        guilds.get(&guild_id).cloned().unwrap_or_default()
    }
}
