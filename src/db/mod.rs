use crate::config::Config;
use crate::error::WatchwordError;
use rusqlite::{Connection, Result};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// One durable watchword subscription, as loaded for an index rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRow {
    pub user_id: u64,
    pub word: String,
    pub channels: Option<HashSet<u64>>,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(config: &Config) -> Result<Self> {
        let conn = Connection::open(&config.database_url)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn execute_init(&self) -> anyhow::Result<()> {
        info!("Database: Initializing schema...");
        let sql = "
            CREATE TABLE IF NOT EXISTS watchword (
                guild_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                word TEXT NOT NULL,
                channels TEXT,
                UNIQUE (guild_id, user_id, word)
            );
            CREATE INDEX IF NOT EXISTS idx_watchword_guild ON watchword (guild_id);

            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS radio (
                channel_id TEXT PRIMARY KEY
            );
        ";
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(sql)?;
        debug!("Database: Schema initialized successfully");
        Ok(())
    }

    /// Inserts a subscription row and records the subscriber as a known
    /// user. A uniqueness conflict on (guild, user, word) is reported as
    /// `DuplicateSubscription`, never as a raw storage error.
    pub fn add_watchword(
        &self,
        guild_id: u64,
        user_id: u64,
        word: &str,
        channels: Option<&HashSet<u64>>,
    ) -> std::result::Result<(), WatchwordError> {
        let channels_json = channels
            .filter(|set| !set.is_empty())
            .map(|set| {
                let mut ids: Vec<u64> = set.iter().copied().collect();
                ids.sort_unstable();
                serde_json::to_string(&ids)
            })
            .transpose()?;

        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT INTO watchword (guild_id, user_id, word, channels) VALUES (?1, ?2, ?3, ?4)",
            (
                guild_id.to_string(),
                user_id.to_string(),
                word,
                channels_json,
            ),
        );
        match inserted {
            Ok(_) => {
                conn.execute(
                    "INSERT OR IGNORE INTO users (user_id) VALUES (?1)",
                    (user_id.to_string(),),
                )?;
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => {
                Err(WatchwordError::DuplicateSubscription(word.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a subscription row, reporting whether one was present.
    pub fn remove_watchword(
        &self,
        guild_id: u64,
        user_id: u64,
        word: &str,
    ) -> std::result::Result<bool, WatchwordError> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM watchword WHERE guild_id = ?1 AND user_id = ?2 AND word = ?3",
            (guild_id.to_string(), user_id.to_string(), word),
        )?;
        Ok(deleted > 0)
    }

    pub fn list_watchwords(&self, guild_id: u64, user_id: u64) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT word FROM watchword WHERE guild_id = ?1 AND user_id = ?2 ORDER BY word",
        )?;
        let rows = stmt.query_map((guild_id.to_string(), user_id.to_string()), |row| {
            row.get(0)
        })?;

        let mut words = Vec::new();
        for row in rows {
            words.push(row?);
        }
        Ok(words)
    }

    /// The full subscription set for one guild, used for index rebuilds.
    pub fn load_guild_watchwords(&self, guild_id: u64) -> anyhow::Result<Vec<SubscriptionRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT user_id, word, channels FROM watchword WHERE guild_id = ?1")?;
        let rows = stmt.query_map([guild_id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut subscriptions = Vec::new();
        for row in rows {
            let (user_id, word, channels) = row?;
            subscriptions.push(SubscriptionRow {
                user_id: user_id.parse::<u64>()?,
                word,
                channels: channels.as_deref().map(parse_channels).transpose()?,
            });
        }
        Ok(subscriptions)
    }

    /// Every guild with at least one live subscription.
    pub fn load_watchword_guilds(&self) -> anyhow::Result<Vec<u64>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT DISTINCT guild_id FROM watchword")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut guilds = Vec::new();
        for row in rows {
            guilds.push(row?.parse::<u64>()?);
        }
        Ok(guilds)
    }

    // --- Radio mode ---

    /// Toggles radio mode for a channel, returning the new state.
    pub fn toggle_radio(&self, channel_id: u64) -> anyhow::Result<bool> {
        let conn = self.conn.lock().unwrap();
        let exists = conn
            .prepare("SELECT 1 FROM radio WHERE channel_id = ?1")?
            .exists([channel_id.to_string()])?;

        if exists {
            conn.execute(
                "DELETE FROM radio WHERE channel_id = ?1",
                [channel_id.to_string()],
            )?;
            Ok(false)
        } else {
            conn.execute(
                "INSERT INTO radio (channel_id) VALUES (?1)",
                [channel_id.to_string()],
            )?;
            Ok(true)
        }
    }

    pub fn is_radio_channel(&self, channel_id: u64) -> anyhow::Result<bool> {
        let conn = self.conn.lock().unwrap();
        let exists = conn
            .prepare("SELECT 1 FROM radio WHERE channel_id = ?1")?
            .exists([channel_id.to_string()])?;
        Ok(exists)
    }

    pub fn is_known_user(&self, user_id: u64) -> anyhow::Result<bool> {
        let conn = self.conn.lock().unwrap();
        let exists = conn
            .prepare("SELECT 1 FROM users WHERE user_id = ?1")?
            .exists([user_id.to_string()])?;
        Ok(exists)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn parse_channels(json: &str) -> serde_json::Result<HashSet<u64>> {
    let ids: Vec<u64> = serde_json::from_str(json)?;
    Ok(ids.into_iter().collect())
}
