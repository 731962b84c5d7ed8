//! Naive sponsorship detection over posting descriptions.
//!
//! Matching is a plain substring test on the lower-cased text, so a keyword
//! embedded in a longer word still counts.

/// Words taken as a signal that a posting talks about visa sponsorship.
pub const SPONSORSHIP_KEYWORDS: [&str; 3] = ["visa", "sponsorship", "authorization"];

/// Returns true if the text mentions any sponsorship keyword, in any case.
/// Missing text never matches.
pub fn mentions_sponsorship(text: Option<&str>) -> bool {
    match text {
        Some(text) => {
            let lower = text.to_lowercase();
            SPONSORSHIP_KEYWORDS.iter().any(|word| lower.contains(word))
        }
        None => false,
    }
}

/// Keywords found in the text, in keyword order.
pub fn matched_keywords(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    SPONSORSHIP_KEYWORDS
        .iter()
        .copied()
        .filter(|word| lower.contains(word))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_keyword_matches_in_any_case() {
        for text in [
            "We offer VISA support",
            "Sponsorship available for the right candidate",
            "Must have work AuThOrIzAtIoN in the US",
            "h1b visa",
        ] {
            assert!(mentions_sponsorship(Some(text)), "{text}");
        }
    }

    #[test]
    fn test_no_keyword_does_not_match() {
        assert!(!mentions_sponsorship(Some("Great team, hybrid schedule, 401k")));
        assert!(!mentions_sponsorship(Some("")));
    }

    #[test]
    fn test_missing_description_does_not_match() {
        assert!(!mentions_sponsorship(None));
    }

    #[test]
    fn test_substring_inside_word_matches() {
        // known weakness of plain substring matching
        assert!(mentions_sponsorship(Some("Visalia, CA office")));
    }

    #[test]
    fn test_matched_keywords() {
        assert_eq!(
            matched_keywords("No visa sponsorship offered"),
            vec!["visa", "sponsorship"]
        );
        assert!(matched_keywords("nothing here").is_empty());
    }
}
