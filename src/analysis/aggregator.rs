//! Verdict aggregation over per-source stances

use super::relevance::{filter_sentences, RelevanceFilter};
use super::stance::{Classification, StanceClassifier};
use crate::engine::models::{AnalysisResult, Evidence, SourceStats, Stance, Verdict};
use tracing::debug;

/// Weighted sums and counts accumulated over the evidence list
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StanceTally {
    pub weighted_positive: f64,
    pub weighted_negative: f64,
    pub weighted_neutral: f64,
    pub supporting: usize,
    pub contradicting: usize,
    pub neutral: usize,
}

impl StanceTally {
    /// Fold one classification into the tally
    pub fn record(&mut self, classification: &Classification) {
        match classification.stance {
            Stance::Supporting => {
                self.weighted_positive += classification.contribution;
                self.supporting += 1;
            }
            Stance::Contradicting => {
                self.weighted_negative += classification.contribution;
                self.contradicting += 1;
            }
            Stance::Neutral => {
                self.weighted_neutral += classification.contribution;
                self.neutral += 1;
            }
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.weighted_positive + self.weighted_negative + self.weighted_neutral
    }

    pub fn total(&self) -> usize {
        self.supporting + self.contradicting + self.neutral
    }

    /// Verdict and confidence; a pure function of the weights
    pub fn verdict(&self) -> (Verdict, u8) {
        let positive = self.weighted_positive;
        let negative = self.weighted_negative;
        let neutral = self.weighted_neutral;
        let total = self.total_weight();

        if total <= 0.0 {
            (Verdict::InsufficientData, 0)
        } else if negative > positive * 3.0 {
            (Verdict::LikelyFalse, scaled_confidence(negative / total, 100.0, 90))
        } else if positive > negative * 3.0 {
            (Verdict::LikelyTrue, scaled_confidence(positive / total, 100.0, 90))
        } else if neutral > positive + negative {
            (Verdict::Disputed, 45)
        } else if positive > negative * 1.5 {
            (Verdict::LikelyTrue, scaled_confidence(positive / total, 85.0, 70))
        } else if negative > positive * 1.5 {
            (Verdict::LikelyFalse, scaled_confidence(negative / total, 85.0, 70))
        } else {
            (Verdict::Disputed, 50)
        }
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            supporting: self.supporting,
            contradicting: self.contradicting,
            neutral: self.neutral,
            total: self.total(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Analyzed {} sources focusing on claim-relevant content: {} supporting, {} contradicting, {} neutral/unclear.",
            self.total(),
            self.supporting,
            self.contradicting,
            self.neutral
        )
    }

    pub fn into_result(self) -> AnalysisResult {
        if self.total() == 0 {
            return AnalysisResult::insufficient();
        }

        let (verdict, confidence) = self.verdict();
        AnalysisResult {
            verdict,
            confidence,
            summary: self.summary(),
            stats: self.stats(),
        }
    }
}

fn scaled_confidence(share: f64, scale: f64, cap: u8) -> u8 {
    let value = (share * scale).round().clamp(0.0, 100.0) as u8;
    value.min(cap)
}

/// Runs relevance filtering and stance classification over every source
#[derive(Debug, Clone)]
pub struct VerdictAggregator {
    filter: RelevanceFilter,
    classifier: StanceClassifier,
}

impl VerdictAggregator {
    pub fn new(filter: RelevanceFilter, classifier: StanceClassifier) -> Self {
        Self { filter, classifier }
    }

    /// Aggregator over the built-in stop words and pattern tables
    pub fn builtin() -> Result<Self, regex::Error> {
        Ok(Self::new(RelevanceFilter::default(), StanceClassifier::builtin()?))
    }

    /// Classify a single evidence item against the claim keywords
    pub fn classify(&self, keywords: &[String], evidence: &Evidence) -> Classification {
        let relevant = filter_sentences(keywords, evidence.analysis_text());
        self.classifier.classify(&relevant, evidence.reliability_score())
    }

    pub fn aggregate(&self, claim: &str, evidence: &[Evidence]) -> AnalysisResult {
        if evidence.is_empty() {
            return AnalysisResult::insufficient();
        }

        let keywords = self.filter.extractor().extract(claim);
        debug!("Claim keywords: {:?}", keywords);

        let mut tally = StanceTally::default();
        for item in evidence {
            let classification = self.classify(&keywords, item);
            match classification.scores {
                Some(scores) => debug!(
                    source = item.source(),
                    support = scores.support,
                    contradict = scores.contradict,
                    uncertain = scores.uncertain,
                    stance = ?classification.stance,
                    "Classified source"
                ),
                None => debug!(source = item.source(), "No relevant sentences found"),
            }
            tally.record(&classification);
        }

        debug!(
            "Final weights - pos: {:.2}, neg: {:.2}, neutral: {:.2}",
            tally.weighted_positive, tally.weighted_negative, tally.weighted_neutral
        );

        tally.into_result()
    }
}
