//! Request and response bodies of the HTTP API

use crate::engine::CheckResult;
use crate::providers::ProviderDescriptor;
use serde::{Deserialize, Serialize};

/// Machine-readable error codes
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Error body returned on every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// POST /api/verify
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub claim: Option<String>,
}

/// POST /submit
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Simplified verdict shape served by POST /submit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub topic: String,
    pub resolution: String,
    /// Percentage string, e.g. "72%"
    pub confidence: String,
    pub supporting: usize,
    pub contradicting: usize,
    pub neutral: usize,
    pub sources: Vec<SubmitSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitSource {
    pub website: String,
    pub body: String,
    pub link: String,
}

impl From<&CheckResult> for SubmitResponse {
    fn from(result: &CheckResult) -> Self {
        let stats = &result.analysis.stats;
        Self {
            topic: result.claim.clone(),
            resolution: result.analysis.verdict.as_str().to_string(),
            confidence: format!("{}%", result.analysis.confidence),
            supporting: stats.supporting,
            contradicting: stats.contradicting,
            neutral: stats.neutral,
            sources: result
                .sources
                .iter()
                .map(|e| SubmitSource {
                    website: e.source().to_string(),
                    body: e.snippet().to_string(),
                    link: e.url().to_string(),
                })
                .collect(),
        }
    }
}

/// GET /api/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// GET /api/sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub sources: Vec<ProviderDescriptor>,
}
