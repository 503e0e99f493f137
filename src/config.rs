//! Service configuration
//!
//! Loaded once at startup from an optional TOML file, then overridden by
//! `CHECKER__<SECTION>__<KEY>` environment variables. The resulting value is
//! immutable and handed to the orchestrator; nothing reads it globally.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Config {
    /// Load configuration from a file (optional) and the environment
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("CHECKER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the engine misbehave
    pub fn validate(&self) -> Result<()> {
        use crate::error::CheckerError;

        if self.engine.max_concurrent_providers == 0 {
            return Err(CheckerError::Configuration(
                "engine.max_concurrent_providers must be at least 1".to_string(),
            ));
        }
        if self.engine.provider_timeout_ms == 0 || self.engine.check_budget_ms == 0 {
            return Err(CheckerError::Configuration(
                "engine timeouts must be non-zero".to_string(),
            ));
        }
        if self.fetch.request_timeout_ms == 0 {
            return Err(CheckerError::Configuration(
                "fetch.request_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.fetch.max_content_chars == 0 {
            return Err(CheckerError::Configuration(
                "fetch.max_content_chars must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5050 }
fn default_max_body_bytes() -> usize { 64 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// Orchestration limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-provider timeout in milliseconds
    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,

    /// Wall-clock budget for a whole check in milliseconds
    #[serde(default = "default_check_budget_ms")]
    pub check_budget_ms: u64,

    /// Providers allowed to run at the same time
    #[serde(default = "default_max_concurrent_providers")]
    pub max_concurrent_providers: usize,

    /// Shortest claim accepted by the HTTP layer (after trimming)
    #[serde(default = "default_min_claim_chars")]
    pub min_claim_chars: usize,
}

fn default_provider_timeout_ms() -> u64 { 20_000 }
fn default_check_budget_ms() -> u64 { 60_000 }
fn default_max_concurrent_providers() -> usize { 8 }
fn default_min_claim_chars() -> usize { 3 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: default_provider_timeout_ms(),
            check_budget_ms: default_check_budget_ms(),
            max_concurrent_providers: default_max_concurrent_providers(),
            min_claim_chars: default_min_claim_chars(),
        }
    }
}

impl EngineConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn check_budget(&self) -> Duration {
        Duration::from_millis(self.check_budget_ms)
    }
}

/// Outbound HTTP configuration shared by every provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout of a single outbound request in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Minimum spacing between two requests to the same host
    #[serde(default = "default_min_host_interval_ms")]
    pub min_host_interval_ms: u64,

    /// Character budget for extracted article bodies
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Consecutive failures before a host is short-circuited
    #[serde(default = "default_breaker_failures")]
    pub circuit_breaker_failures: usize,

    /// Cool-down before a short-circuited host is tried again
    #[serde(default = "default_breaker_reset")]
    pub circuit_breaker_reset_secs: u64,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}
fn default_request_timeout_ms() -> u64 { 10_000 }
fn default_min_host_interval_ms() -> u64 { 1_000 }
fn default_max_content_chars() -> usize { 5_000 }
fn default_breaker_failures() -> usize { 5 }
fn default_breaker_reset() -> u64 { 30 }

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_ms: default_request_timeout_ms(),
            min_host_interval_ms: default_min_host_interval_ms(),
            max_content_chars: default_max_content_chars(),
            circuit_breaker_failures: default_breaker_failures(),
            circuit_breaker_reset_secs: default_breaker_reset(),
        }
    }
}

impl FetchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn min_host_interval(&self) -> Duration {
        Duration::from_millis(self.min_host_interval_ms)
    }

    pub fn breaker_reset_timeout(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_reset_secs)
    }
}

/// A news outlet searched through a site-scoped web query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsOutlet {
    pub name: String,
    pub site: String,
}

impl NewsOutlet {
    pub fn new(name: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            site: site.into(),
        }
    }
}

/// Provider roster and endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_enabled")]
    pub wikipedia_enabled: bool,

    #[serde(default = "default_enabled")]
    pub news_enabled: bool,

    #[serde(default = "default_enabled")]
    pub scholar_enabled: bool,

    #[serde(default = "default_enabled")]
    pub web_enabled: bool,

    #[serde(default = "default_wikipedia_api_url")]
    pub wikipedia_api_url: String,

    #[serde(default = "default_wikipedia_page_base")]
    pub wikipedia_page_base: String,

    #[serde(default = "default_scholar_url")]
    pub scholar_url: String,

    #[serde(default = "default_duckduckgo_url")]
    pub duckduckgo_url: String,

    #[serde(default = "default_wikipedia_limit")]
    pub wikipedia_limit: usize,

    #[serde(default = "default_scholar_limit")]
    pub scholar_limit: usize,

    #[serde(default = "default_news_limit")]
    pub news_hits_per_outlet: usize,

    #[serde(default = "default_web_limit")]
    pub web_limit: usize,

    #[serde(default = "default_news_outlets")]
    pub news_outlets: Vec<NewsOutlet>,

    /// Domains whose web results are trusted and fetched in full
    #[serde(default = "default_trusted_domains")]
    pub trusted_domains: Vec<String>,
}

fn default_enabled() -> bool { true }
fn default_wikipedia_api_url() -> String { "https://en.wikipedia.org/w/api.php".to_string() }
fn default_wikipedia_page_base() -> String { "https://en.wikipedia.org/wiki/".to_string() }
fn default_scholar_url() -> String { "https://scholar.google.com/scholar".to_string() }
fn default_duckduckgo_url() -> String { "https://html.duckduckgo.com/html/".to_string() }
fn default_wikipedia_limit() -> usize { 3 }
fn default_scholar_limit() -> usize { 5 }
fn default_news_limit() -> usize { 2 }
fn default_web_limit() -> usize { 5 }

fn default_news_outlets() -> Vec<NewsOutlet> {
    vec![
        NewsOutlet::new("Reuters", "reuters.com"),
        NewsOutlet::new("Associated Press", "apnews.com"),
        NewsOutlet::new("BBC News", "bbc.com"),
        NewsOutlet::new("NPR", "npr.org"),
    ]
}

fn default_trusted_domains() -> Vec<String> {
    [
        "wikipedia.org", "britannica.com", "nature.com", "science.org",
        "nih.gov", "cdc.gov", "who.int", "nasa.gov", "edu",
        "reuters.com", "apnews.com", "bbc.com", "nytimes.com",
        "wsj.com", "economist.com", "scientificamerican.com",
    ]
    .iter()
    .map(|d| d.to_string())
    .collect()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            wikipedia_enabled: default_enabled(),
            news_enabled: default_enabled(),
            scholar_enabled: default_enabled(),
            web_enabled: default_enabled(),
            wikipedia_api_url: default_wikipedia_api_url(),
            wikipedia_page_base: default_wikipedia_page_base(),
            scholar_url: default_scholar_url(),
            duckduckgo_url: default_duckduckgo_url(),
            wikipedia_limit: default_wikipedia_limit(),
            scholar_limit: default_scholar_limit(),
            news_hits_per_outlet: default_news_limit(),
            web_limit: default_web_limit(),
            news_outlets: default_news_outlets(),
            trusted_domains: default_trusted_domains(),
        }
    }
}
