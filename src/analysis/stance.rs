//! Stance classification by weighted lexical signal scoring

use super::patterns::StancePatterns;
use crate::engine::models::Stance;
use serde::{Deserialize, Serialize};

/// Uncertainty matches at or above this make a source neutral outright
pub const UNCERTAINTY_THRESHOLD: usize = 2;

/// Margin one signal needs over the other to decide the stance
pub const DOMINANCE_RATIO: f64 = 1.5;

/// Contribution bonus per matched pattern for a decided stance
pub const PER_MATCH_BONUS: f64 = 0.2;

/// Raw match counts of the three pattern families
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanceScores {
    pub support: usize,
    pub contradict: usize,
    pub uncertain: usize,
}

/// Stance of one source and its weighted contribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub stance: Stance,
    pub contribution: f64,
    /// `None` when the source had no relevant sentences
    pub scores: Option<StanceScores>,
}

impl Classification {
    /// A source with nothing relevant to say
    pub fn irrelevant() -> Self {
        Self {
            stance: Stance::Neutral,
            contribution: 0.0,
            scores: None,
        }
    }
}

/// Decision tree over pattern scores; first matching rule wins
pub fn decide(scores: StanceScores, reliability: u8) -> (Stance, f64) {
    let weight = f64::from(reliability) / 10.0;
    let support = scores.support as f64;
    let contradict = scores.contradict as f64;

    if scores.uncertain >= UNCERTAINTY_THRESHOLD {
        (Stance::Neutral, weight)
    } else if contradict > support * DOMINANCE_RATIO {
        (Stance::Contradicting, weight * (1.0 + contradict * PER_MATCH_BONUS))
    } else if support > contradict * DOMINANCE_RATIO {
        (Stance::Supporting, weight * (1.0 + support * PER_MATCH_BONUS))
    } else if scores.support == 0 && scores.contradict == 0 {
        (Stance::Neutral, weight * 0.5)
    } else {
        // mixed signal
        (Stance::Neutral, weight * 0.7)
    }
}

/// Scores relevant sentences against the pattern families
#[derive(Debug, Clone)]
pub struct StanceClassifier {
    patterns: StancePatterns,
}

impl StanceClassifier {
    pub fn new(patterns: StancePatterns) -> Self {
        Self { patterns }
    }

    /// Classifier over the built-in pattern tables
    pub fn builtin() -> Result<Self, regex::Error> {
        Ok(Self::new(StancePatterns::builtin()?))
    }

    pub fn score(&self, text: &str) -> StanceScores {
        StanceScores {
            support: self.patterns.support.count_matches(text),
            contradict: self.patterns.contradict.count_matches(text),
            uncertain: self.patterns.uncertain.count_matches(text),
        }
    }

    /// Classify one source from its relevant sentences
    pub fn classify(&self, relevant_sentences: &[String], reliability: u8) -> Classification {
        if relevant_sentences.is_empty() {
            return Classification::irrelevant();
        }

        let joined = relevant_sentences.join(" ");
        let scores = self.score(&joined);
        let (stance, contribution) = decide(scores, reliability);

        Classification {
            stance,
            contribution,
            scores: Some(scores),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(support: usize, contradict: usize, uncertain: usize) -> StanceScores {
        StanceScores { support, contradict, uncertain }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_supporting_contribution() {
        let (stance, contribution) = decide(scores(3, 0, 0), 10);
        assert_eq!(stance, Stance::Supporting);
        assert!(approx(contribution, 1.6));
    }

    #[test]
    fn test_uncertainty_wins_first() {
        let (stance, contribution) = decide(scores(5, 0, 2), 8);
        assert_eq!(stance, Stance::Neutral);
        assert!(approx(contribution, 0.8));
    }

    #[test]
    fn test_contradicting_contribution() {
        let (stance, contribution) = decide(scores(1, 2, 1), 9);
        assert_eq!(stance, Stance::Contradicting);
        assert!(approx(contribution, 0.9 * 1.4));
    }

    #[test]
    fn test_no_signal_is_half_weight_neutral() {
        let (stance, contribution) = decide(scores(0, 0, 1), 8);
        assert_eq!(stance, Stance::Neutral);
        assert!(approx(contribution, 0.4));
    }

    #[test]
    fn test_mixed_signal() {
        // 3 > 2 * 1.5 is false and 2 > 3 * 1.5 is false
        let (stance, contribution) = decide(scores(3, 2, 0), 10);
        assert_eq!(stance, Stance::Neutral);
        assert!(approx(contribution, 0.7));
    }

    #[test]
    fn test_zero_reliability_contributes_nothing() {
        let (stance, contribution) = decide(scores(4, 0, 0), 0);
        assert_eq!(stance, Stance::Supporting);
        assert!(approx(contribution, 0.0));
    }

    #[test]
    fn test_no_relevant_sentences() {
        let classifier = StanceClassifier::builtin().unwrap();
        let result = classifier.classify(&[], 9);
        assert_eq!(result, Classification::irrelevant());
    }

    #[test]
    fn test_classify_text() {
        let classifier = StanceClassifier::builtin().unwrap();
        let sentences = vec![
            "the flat earth idea is a myth".to_string(),
            "the earth is not flat and that was debunked long ago".to_string(),
        ];
        let result = classifier.classify(&sentences, 8);
        assert_eq!(result.stance, Stance::Contradicting);
        let s = result.scores.unwrap();
        assert_eq!(s.support, 0);
        assert_eq!(s.contradict, 3);
        assert!(approx(result.contribution, 0.8 * 1.6));
    }

    #[test]
    fn test_synthetic_pattern_tables() {
        let patterns = StancePatterns::new(&["yes"], &["no"], &["maybe"]).unwrap();
        let classifier = StanceClassifier::new(patterns);
        let result = classifier.classify(&["yes no maybe".to_string()], 10);
        assert_eq!(result.scores, Some(scores(1, 1, 1)));
        assert_eq!(result.stance, Stance::Neutral);
        assert!(approx(result.contribution, 0.7));
    }
}
