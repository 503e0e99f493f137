//! Keyword extraction from claim text

use std::collections::HashSet;

/// Words never treated as keywords
pub const STOP_WORDS: &[&str] = &[
    "the", "is", "are", "was", "were", "a", "an", "in", "on", "at", "to", "for",
    "of", "and", "or", "but", "that", "this", "these", "those", "it", "be",
];

/// Tokens must be longer than this many characters
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Turns a claim into an ordered list of content-bearing terms
///
/// Tokens are lowercase alphanumeric runs. Order follows first occurrence and
/// repeated words are kept.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: HashSet<String>,
    min_chars: usize,
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self::with_stop_words(STOP_WORDS.iter().copied())
    }

    /// Build an extractor with a custom stop-word table
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            min_chars: MIN_KEYWORD_CHARS,
        }
    }

    pub fn extract(&self, claim: &str) -> Vec<String> {
        claim
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| token.chars().count() > self.min_chars)
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_flat_earth() {
        let extractor = KeywordExtractor::default();
        assert_eq!(extractor.extract("The Earth is flat"), vec!["earth", "flat"]);
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("Vaccines cause autism; autism rates, vaccines!");
        assert_eq!(keywords, vec!["vaccines", "cause", "autism", "autism", "rates", "vaccines"]);
    }

    #[test]
    fn test_stop_words_and_short_tokens_dropped() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("These are those that this was about the sun");
        assert_eq!(keywords, vec!["about"]);
    }

    #[test]
    fn test_empty_claim() {
        let extractor = KeywordExtractor::default();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("a an the").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let extractor = KeywordExtractor::default();
        let claim = "Coffee consumption increases longevity in adults";
        assert_eq!(extractor.extract(claim), extractor.extract(claim));
    }

    #[test]
    fn test_custom_stop_words() {
        let extractor = KeywordExtractor::with_stop_words(["EARTH"]);
        assert_eq!(extractor.extract("The earth is round"), vec!["round"]);
    }
}
