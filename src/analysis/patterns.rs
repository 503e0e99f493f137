//! Lexical pattern tables for stance scoring
//!
//! The tables are data, not logic: `StancePatterns::new` accepts any set of
//! expressions so the decision tree can be exercised with synthetic tables.

use regex::{Regex, RegexBuilder};

/// Phrases asserting truth or confirmation
pub const SUPPORT_PATTERNS: &[&str] = &[
    r"\b(is|are|was|were)\s+(true|correct|accurate|valid|confirmed|verified)\b",
    r"\b(proves?|shows?|demonstrates?|confirms?|validates?)\s+that\b",
    r"\b(evidence|research|studies|data)\s+(shows?|suggests?|indicates?|proves?)\b",
    r"\b(indeed|in fact|actually|truly)\b",
    r"\b(established|proven|documented)\s+(fact|truth)\b",
];

/// Phrases asserting falsity or debunking
///
/// The concessive entry matches a concessive word followed anywhere later by
/// a negation term, across clause boundaries.
pub const CONTRADICT_PATTERNS: &[&str] = &[
    r"\b(is|are|was|were)\s+(not|false|incorrect|inaccurate|untrue|wrong|fake)\b",
    r"\b(no evidence|lacks evidence|unproven|unverified|unfounded|baseless)\b",
    r"\b(myth|hoax|misconception|misinformation|disinformation)\b",
    r"\b(debunked|refuted|disproven|contradicted|disputed)\b",
    r"\b(however|but|although|despite)\b.*\b(not|false|incorrect)\b",
    r"\bnot\s+(true|accurate|correct|valid|proven)\b",
];

/// Hedging language
pub const UNCERTAIN_PATTERNS: &[&str] = &[
    r"\b(unclear|unknown|uncertain|disputed|controversial|debated)\b",
    r"\b(may|might|could|possibly|perhaps|potentially)\s+be\b",
    r"\b(some|many|few)\s+(believe|think|claim|argue)\b",
    r"\b(mixed|conflicting|varying)\s+(evidence|views|opinions)\b",
];

/// A family of case-insensitive expressions scored together
#[derive(Debug, Clone)]
pub struct PatternSet {
    expressions: Vec<Regex>,
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let expressions = patterns
            .iter()
            .map(|p| RegexBuilder::new(p.as_ref()).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { expressions })
    }

    /// Total non-overlapping matches of every expression in `text`
    pub fn count_matches(&self, text: &str) -> usize {
        self.expressions
            .iter()
            .map(|re| re.find_iter(text).count())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

/// The three pattern families used by the stance classifier
#[derive(Debug, Clone)]
pub struct StancePatterns {
    pub support: PatternSet,
    pub contradict: PatternSet,
    pub uncertain: PatternSet,
}

impl StancePatterns {
    pub fn new<S: AsRef<str>>(
        support: &[S],
        contradict: &[S],
        uncertain: &[S],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            support: PatternSet::new(support)?,
            contradict: PatternSet::new(contradict)?,
            uncertain: PatternSet::new(uncertain)?,
        })
    }

    /// Compile the built-in tables
    pub fn builtin() -> Result<Self, regex::Error> {
        Self::new(SUPPORT_PATTERNS, CONTRADICT_PATTERNS, UNCERTAIN_PATTERNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_compile() {
        let patterns = StancePatterns::builtin().unwrap();
        assert_eq!(patterns.support.len(), 5);
        assert_eq!(patterns.contradict.len(), 6);
        assert_eq!(patterns.uncertain.len(), 4);
    }

    #[test]
    fn test_support_matches() {
        let patterns = StancePatterns::builtin().unwrap();
        let text = "research shows the claim is true and in fact it is an established fact";
        assert_eq!(patterns.support.count_matches(text), 4);
    }

    #[test]
    fn test_contradict_concessive_spans_clauses() {
        let patterns = StancePatterns::builtin().unwrap();
        let text = "however critics spoke up and much later someone said false";
        assert_eq!(patterns.contradict.count_matches(text), 1);
    }

    #[test]
    fn test_contradict_matches() {
        let patterns = StancePatterns::builtin().unwrap();
        let text = "the idea was debunked as a hoax and is not true";
        // debunked, hoax, "is not", "not true"
        assert_eq!(patterns.contradict.count_matches(text), 4);
    }

    #[test]
    fn test_uncertain_case_insensitive() {
        let patterns = StancePatterns::builtin().unwrap();
        let text = "It Remains UNCLEAR and Some Believe it Might Be so";
        assert_eq!(patterns.uncertain.count_matches(text), 3);
    }

    #[test]
    fn test_word_boundaries_respected() {
        let patterns = StancePatterns::builtin().unwrap();
        assert_eq!(patterns.contradict.count_matches("mythology and hoaxes"), 0);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(PatternSet::new(&["(unclosed"]).is_err());
    }
}
