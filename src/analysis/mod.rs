//! Claim analysis: keywords, relevance, stance and verdict
//!
//! Everything in here is pure and deterministic. Upstream I/O lives in
//! `providers` and `fetch`; this module only sees finished evidence.

pub mod keywords;
pub mod relevance;
pub mod patterns;
pub mod stance;
pub mod aggregator;

pub use keywords::{KeywordExtractor, STOP_WORDS};
pub use relevance::{filter_sentences, RelevanceFilter};
pub use patterns::{PatternSet, StancePatterns};
pub use stance::{decide, Classification, StanceClassifier, StanceScores};
pub use aggregator::{StanceTally, VerdictAggregator};
