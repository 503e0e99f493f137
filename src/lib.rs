//! Claim checker
//!
//! Gathers evidence for a natural-language claim from encyclopedic, academic,
//! news and general web sources, classifies each source's stance with
//! weighted lexical patterns, and aggregates the stances into a verdict with
//! a confidence score.

pub mod analysis;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod metrics;
pub mod providers;

pub use config::Config;
pub use engine::{CheckResult, Orchestrator};
pub use error::{CheckerError, Result};

pub mod prelude {
    pub use crate::analysis::{KeywordExtractor, RelevanceFilter, StanceClassifier, VerdictAggregator};
    pub use crate::config::Config;
    pub use crate::engine::{
        AnalysisResult, CheckResult, Evidence, Orchestrator, ProviderReport, ProviderStatus,
        SourceStats, Stance, Verdict,
    };
    pub use crate::error::{CheckerError, Result};
    pub use crate::providers::{EvidenceProvider, ProviderKind, ProviderRegistry, SearchContext};
}
