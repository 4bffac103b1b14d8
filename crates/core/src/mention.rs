//! Mention extraction from message content.

use once_cell::sync::Lazy;
use regex::Regex;

static MENTION_RE: Lazy<Regex> = Lazy::new(|| {
    // @name, where name may contain word characters, dots and dashes.
    // A leading word character disqualifies the match (e.g. mail@host).
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?:^|[^\w@])@([\w][\w.-]*)").unwrap()
});

/// Extract the set of mentioned names from message content, in order of
/// first appearance, without duplicates.
#[must_use]
pub fn extract_mentions(content: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for cap in MENTION_RE.captures_iter(content) {
        if let Some(name) = cap.get(1) {
            let name = name.as_str().to_string();
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_single_mention() {
        assert_eq!(extract_mentions("hey @jane, ping"), vec!["jane"]);
    }

    #[test]
    fn test_extracts_multiple_mentions() {
        assert_eq!(
            extract_mentions("@jane @bob please review"),
            vec!["jane", "bob"]
        );
    }

    #[test]
    fn test_deduplicates() {
        assert_eq!(extract_mentions("@jane and again @jane"), vec!["jane"]);
    }

    #[test]
    fn test_ignores_email_addresses() {
        assert!(extract_mentions("send to jane@example.com").is_empty());
    }

    #[test]
    fn test_no_mentions() {
        assert!(extract_mentions("no one here").is_empty());
    }
}
