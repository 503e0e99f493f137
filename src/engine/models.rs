//! Data model for claim checks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound of a provider-assigned reliability score
pub const MAX_RELIABILITY: u8 = 10;

/// Character budget for `Evidence::full_content`
pub const MAX_CONTENT_CHARS: usize = 5000;

/// One retrieved source record
///
/// Fields are read-only after construction: reliability is clamped to
/// `0..=10` and full content to the character budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    source: String,
    title: String,
    url: String,
    snippet: String,
    full_content: String,
    reliability_score: u8,
}

impl Evidence {
    /// Create a snippet-only evidence record
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        reliability_score: u8,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            full_content: String::new(),
            reliability_score: reliability_score.min(MAX_RELIABILITY),
        }
    }

    /// Attach extracted body text, truncated to `MAX_CONTENT_CHARS`
    pub fn with_full_content(mut self, content: impl Into<String>) -> Self {
        self.full_content = truncate_chars(&content.into(), MAX_CONTENT_CHARS);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn full_content(&self) -> &str {
        &self.full_content
    }

    pub fn reliability_score(&self) -> u8 {
        self.reliability_score
    }

    /// Text the stance analysis runs on: body if present, else snippet
    pub fn analysis_text(&self) -> &str {
        if self.full_content.is_empty() {
            &self.snippet
        } else {
            &self.full_content
        }
    }
}

/// Truncate to at most `max` characters without splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// A source's classified position toward the claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    Supporting,
    Contradicting,
    Neutral,
}

/// Final categorical conclusion about a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    LikelyTrue,
    LikelyFalse,
    Disputed,
    InsufficientData,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::LikelyTrue => "LIKELY_TRUE",
            Verdict::LikelyFalse => "LIKELY_FALSE",
            Verdict::Disputed => "DISPUTED",
            Verdict::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stance counts over all sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    pub supporting: usize,
    pub contradicting: usize,
    pub neutral: usize,
    pub total: usize,
}

impl SourceStats {
    /// Counts add up and match the number of sources
    pub fn is_consistent_with(&self, sources: usize) -> bool {
        self.total == sources && self.supporting + self.contradicting + self.neutral == self.total
    }
}

/// Verdict plus confidence and summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    /// 0..=100
    pub confidence: u8,
    pub summary: String,
    pub stats: SourceStats,
}

impl AnalysisResult {
    /// Result for an empty evidence list
    pub fn insufficient() -> Self {
        Self {
            verdict: Verdict::InsufficientData,
            confidence: 0,
            summary: "Not enough information found to verify this claim.".to_string(),
            stats: SourceStats::default(),
        }
    }
}

/// How a provider run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Ok,
    Failed,
    TimedOut,
}

impl ProviderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Ok => "ok",
            ProviderStatus::Failed => "failed",
            ProviderStatus::TimedOut => "timed_out",
        }
    }
}

/// Per-provider record of a check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderReport {
    pub provider: String,
    pub status: ProviderStatus,
    pub evidence_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

/// Complete outcome of one claim check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub id: Uuid,
    pub claim: String,
    pub analysis: AnalysisResult,
    /// Provider emission order, concatenated in registration order
    pub sources: Vec<Evidence>,
    pub timestamp: DateTime<Utc>,
    pub source_count: usize,
    pub providers: Vec<ProviderReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reliability_clamped() {
        let evidence = Evidence::new("Web Search", "t", "https://x.test", "s", 42);
        assert_eq!(evidence.reliability_score(), 10);
    }

    #[test]
    fn test_full_content_truncated_on_char_boundary() {
        let body = "é".repeat(MAX_CONTENT_CHARS + 10);
        let evidence = Evidence::new("Reuters", "t", "u", "s", 9).with_full_content(body);
        assert_eq!(evidence.full_content().chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn test_analysis_text_prefers_full_content() {
        let snippet_only = Evidence::new("Web Search", "t", "u", "snippet text", 5);
        assert_eq!(snippet_only.analysis_text(), "snippet text");

        let enriched = snippet_only.clone().with_full_content("body text");
        assert_eq!(enriched.analysis_text(), "body text");
    }

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_string(&Verdict::InsufficientData).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_DATA\"");
        assert_eq!(Verdict::LikelyFalse.to_string(), "LIKELY_FALSE");
    }

    #[test]
    fn test_stats_consistency() {
        let stats = SourceStats { supporting: 1, contradicting: 2, neutral: 3, total: 6 };
        assert!(stats.is_consistent_with(6));
        assert!(!stats.is_consistent_with(5));
    }

    #[test]
    fn test_insufficient_result() {
        let result = AnalysisResult::insufficient();
        assert_eq!(result.verdict, Verdict::InsufficientData);
        assert_eq!(result.confidence, 0);
        assert_eq!(result.stats, SourceStats::default());
    }
}
