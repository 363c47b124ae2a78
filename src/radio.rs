//! Content rules for radio-mode (text-only) channels.

/// True when a message breaks the text-only rule: attachments, custom
/// emoji tags, links, or unicode emoji.
pub fn violates_text_only(has_attachments: bool, content: &str) -> bool {
    has_attachments
        || content.chars().any(is_emoji)
        || has_custom_emoji(content)
        || has_link(content)
}

/// Covers the common emoji blocks, plus regional indicators and the
/// variation selector that turns text glyphs into emoji.
fn is_emoji(c: char) -> bool {
    matches!(
        c,
        '\u{1F300}'..='\u{1FAFF}' | '\u{2600}'..='\u{27BF}' | '\u{1F1E6}'..='\u{1F1FF}' | '\u{FE0F}'
    )
}

/// Detects Discord custom emoji tags: `<:name:123>` or `<a:name:123>`.
fn has_custom_emoji(content: &str) -> bool {
    for (idx, _) in content.match_indices('<') {
        let tail = &content[idx + 1..];
        let Some(tail) = tail.strip_prefix("a:").or_else(|| tail.strip_prefix(':')) else {
            continue;
        };
        let Some(end) = tail.find('>') else {
            continue;
        };
        let mut parts = tail[..end].splitn(2, ':');
        let (Some(name), Some(id)) = (parts.next(), parts.next()) else {
            continue;
        };
        if !name.is_empty() && !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
    }
    false
}

fn has_link(content: &str) -> bool {
    content.split_whitespace().any(|token| {
        token.starts_with("http://") || token.starts_with("https://") || token.starts_with("www.")
    })
}
