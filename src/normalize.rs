/// The fixed ASCII punctuation set removed during normalization.
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Canonicalizes raw text into matchable form: lowercased, punctuation
/// stripped. Applied identically when a word is subscribed, unsubscribed,
/// and matched, so `"Cookie!"` subscribes the same entry that `cookie`
/// in a message triggers.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !PUNCTUATION.contains(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whitespace-delimited tokens of an already-normalized string.
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_and_punctuation() {
        assert_eq!(normalize("Cookie!"), "cookie");
        assert_eq!(normalize("Hello, World."), "hello world");
        assert_eq!(normalize("it's-a_test"), "itsatest");
    }

    #[test]
    fn test_normalize_strips_entire_punctuation_set() {
        assert_eq!(normalize(PUNCTUATION), "");
    }

    #[test]
    fn test_normalize_preserves_whitespace() {
        assert_eq!(normalize("Lorem  Ipsum"), "lorem  ipsum");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_tokenize() {
        let content = normalize("I baked a bun, today!");
        assert_eq!(tokenize(&content), vec!["i", "baked", "a", "bun", "today"]);
        assert!(tokenize("").is_empty());
    }
}
