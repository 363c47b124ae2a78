use super::Watchers;
use crate::normalize;
use std::collections::{HashMap, HashSet};

/// Resolves which subscribers an incoming message should notify.
///
/// Deterministic and side-effect free: it reads only the index snapshot
/// and the caller-supplied channel membership. Phrases (watched words
/// containing a space) match as substrings of the normalized text; single
/// words must equal a whole token, so "bun" does not fire inside
/// "ubuntu". Command invocations are never scanned, the author is never
/// notified about their own message, and a recipient must be able to see
/// the channel (and, with a channel filter, have it in the filter).
pub fn match_message(
    entries: &HashMap<String, Watchers>,
    command_prefix: &str,
    text: &str,
    author_id: u64,
    channel_id: u64,
    channel_members: &HashSet<u64>,
) -> HashSet<u64> {
    let mut recipients = HashSet::new();
    if text.starts_with(command_prefix) {
        return recipients;
    }

    let content = normalize::normalize(text);
    let tokens: HashSet<&str> = normalize::tokenize(&content).into_iter().collect();

    for (word, watchers) in entries {
        let hit = if word.contains(' ') {
            content.contains(word.as_str())
        } else {
            tokens.contains(word.as_str())
        };
        if !hit {
            continue;
        }

        for (&user_id, filter) in watchers {
            if user_id == author_id {
                continue;
            }
            if !channel_members.contains(&user_id) {
                continue;
            }
            if let Some(channels) = filter {
                if !channels.contains(&channel_id) {
                    continue;
                }
            }
            recipients.insert(user_id);
        }
    }

    recipients
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::{ChannelFilter, WatchIndex};

    const AUTHOR: u64 = 1;
    const WATCHER: u64 = 10;
    const CHANNEL: u64 = 500;
    const PREFIX: &str = "!v ";

    fn entries(words: &[(&str, u64, ChannelFilter)]) -> HashMap<String, Watchers> {
        let index = WatchIndex::new();
        for (word, user_id, channels) in words {
            index.insert(1, word, *user_id, channels.clone());
        }
        index.guild_entries(1)
    }

    fn members(ids: &[u64]) -> HashSet<u64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_exact_token_match() {
        let entries = entries(&[("cookie", WATCHER, None)]);

        let hits = match_message(
            &entries,
            PREFIX,
            "I ate a cookie today",
            AUTHOR,
            CHANNEL,
            &members(&[AUTHOR, WATCHER]),
        );
        assert_eq!(hits, members(&[WATCHER]));
    }

    #[test]
    fn test_token_boundary() {
        let entries = entries(&[("bun", WATCHER, None)]);
        let room = members(&[AUTHOR, WATCHER]);

        let hits = match_message(&entries, PREFIX, "ubuntu rocks", AUTHOR, CHANNEL, &room);
        assert!(hits.is_empty());

        let hits = match_message(&entries, PREFIX, "I baked a bun", AUTHOR, CHANNEL, &room);
        assert_eq!(hits, members(&[WATCHER]));
    }

    #[test]
    fn test_case_and_punctuation_folding() {
        let entries = entries(&[("cookie", WATCHER, None)]);

        let hits = match_message(
            &entries,
            PREFIX,
            "COOKIE!!! time",
            AUTHOR,
            CHANNEL,
            &members(&[AUTHOR, WATCHER]),
        );
        assert_eq!(hits, members(&[WATCHER]));
    }

    #[test]
    fn test_phrase_substring_match() {
        let entries = entries(&[("lorem ipsum", WATCHER, None)]);
        let room = members(&[AUTHOR, WATCHER]);

        let hits = match_message(
            &entries,
            PREFIX,
            "well, lorem ipsum dolor",
            AUTHOR,
            CHANNEL,
            &room,
        );
        assert_eq!(hits, members(&[WATCHER]));

        let hits = match_message(
            &entries,
            PREFIX,
            "lorem and ipsum separately",
            AUTHOR,
            CHANNEL,
            &room,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_commands_never_match() {
        let entries = entries(&[("cookie", WATCHER, None)]);

        let hits = match_message(
            &entries,
            PREFIX,
            "!v watchword cookie",
            AUTHOR,
            CHANNEL,
            &members(&[AUTHOR, WATCHER]),
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_author_excluded() {
        let entries = entries(&[("cookie", WATCHER, None), ("cookie", AUTHOR, None)]);

        let hits = match_message(
            &entries,
            PREFIX,
            "cookie time",
            AUTHOR,
            CHANNEL,
            &members(&[AUTHOR, WATCHER]),
        );
        assert_eq!(hits, members(&[WATCHER]));
    }

    #[test]
    fn test_non_members_excluded() {
        let entries = entries(&[("cookie", WATCHER, None)]);

        let hits = match_message(
            &entries,
            PREFIX,
            "cookie time",
            AUTHOR,
            CHANNEL,
            &members(&[AUTHOR]),
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_channel_filter_scopes_notification() {
        let general = CHANNEL;
        let random = CHANNEL + 1;
        let entries = entries(&[("cookie", WATCHER, Some(members(&[general])))]);
        let room = members(&[AUTHOR, WATCHER]);

        let hits = match_message(&entries, PREFIX, "cookie time", AUTHOR, general, &room);
        assert_eq!(hits, members(&[WATCHER]));

        let hits = match_message(&entries, PREFIX, "cookie time", AUTHOR, random, &room);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_multiple_matched_words_yield_one_entry_per_user() {
        let entries = entries(&[("cookie", WATCHER, None), ("bun", WATCHER, None)]);

        let hits = match_message(
            &entries,
            PREFIX,
            "a cookie and a bun",
            AUTHOR,
            CHANNEL,
            &members(&[AUTHOR, WATCHER]),
        );
        assert_eq!(hits.len(), 1);
    }
}
