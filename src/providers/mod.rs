//! Evidence providers
//!
//! Each provider turns a claim into an ordered list of `Evidence`. The
//! orchestrator only sees the `EvidenceProvider` trait and iterates the
//! registry in registration order.

use crate::config::ProvidersConfig;
use crate::engine::models::Evidence;
use crate::fetch::{ContentFetcher, FetchError, HttpContentFetcher, UpstreamClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub mod duckduckgo;
pub mod wikipedia;
pub mod scholar;
pub mod news;
pub mod web;

pub use duckduckgo::{DuckDuckGoSearch, SearchHit, WebSearch};
pub use wikipedia::WikipediaProvider;
pub use scholar::ScholarProvider;
pub use news::NewsProvider;
pub use web::{TrustedDomains, WebSearchProvider};

/// Per-check context handed to every provider
#[derive(Clone, Debug)]
pub struct SearchContext {
    /// Fired when the check is abandoned; no new requests after that
    pub cancel: CancellationToken,
    /// Character budget for enriched content
    pub max_content_chars: usize,
}

impl SearchContext {
    pub fn new(cancel: CancellationToken, max_content_chars: usize) -> Self {
        Self {
            cancel,
            max_content_chars,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// The closed set of provider variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Encyclopedia,
    Academic,
    News,
    Search,
}

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Cancelled")]
    Cancelled,
}

/// Listing entry for a registered provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    pub status: String,
    pub reliability: u8,
}

/// Evidence retrieval strategy
#[async_trait]
pub trait EvidenceProvider: Send + Sync {
    /// Source name stamped on produced evidence
    fn name(&self) -> &str;

    fn kind(&self) -> ProviderKind;

    /// Nominal reliability; the web provider scores per domain
    fn reliability(&self) -> u8;

    /// Push evidence into `sink` in emission order
    ///
    /// Items pushed before an error stay in `sink`; callers keep them.
    async fn collect(
        &self,
        claim: &str,
        ctx: &SearchContext,
        sink: &mut Vec<Evidence>,
    ) -> Result<(), ProviderError>;

    /// Evidence for `claim`; failures are logged and yield a partial list
    async fn search(&self, claim: &str, ctx: &SearchContext) -> Vec<Evidence> {
        let mut sink = Vec::new();
        if let Err(e) = self.collect(claim, ctx, &mut sink).await {
            warn!("{} search error: {}", self.name(), e);
        }
        sink
    }

    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            name: self.name().to_string(),
            kind: self.kind(),
            status: "active".to_string(),
            reliability: self.reliability(),
        }
    }
}

/// Ordered set of providers
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn EvidenceProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn EvidenceProvider>) {
        self.providers.push(provider);
    }

    pub fn with(mut self, provider: Arc<dyn EvidenceProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn providers(&self) -> &[Arc<dyn EvidenceProvider>] {
        &self.providers
    }

    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.providers.iter().map(|p| p.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Build the standard roster: encyclopedia, news outlets, academic, web
    pub fn from_config(config: &ProvidersConfig, client: Arc<UpstreamClient>) -> Self {
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpContentFetcher::new(client.clone()));
        let search: Arc<dyn WebSearch> = Arc::new(DuckDuckGoSearch::new(
            client.clone(),
            config.duckduckgo_url.clone(),
        ));

        let mut registry = Self::new();

        if config.wikipedia_enabled {
            registry.register(Arc::new(WikipediaProvider::new(
                client.clone(),
                config.wikipedia_api_url.clone(),
                config.wikipedia_page_base.clone(),
                config.wikipedia_limit,
            )));
        }

        if config.news_enabled {
            for outlet in &config.news_outlets {
                registry.register(Arc::new(NewsProvider::new(
                    outlet.clone(),
                    search.clone(),
                    fetcher.clone(),
                    config.news_hits_per_outlet,
                )));
            }
        }

        if config.scholar_enabled {
            registry.register(Arc::new(ScholarProvider::new(
                client.clone(),
                config.scholar_url.clone(),
                config.scholar_limit,
            )));
        }

        if config.web_enabled {
            registry.register(Arc::new(WebSearchProvider::new(
                search,
                fetcher,
                TrustedDomains::new(config.trusted_domains.iter()),
                config.web_limit,
            )));
        }

        info!("Registered {} evidence providers", registry.len());

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;

    struct StaticProvider;

    #[async_trait]
    impl EvidenceProvider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::Search
        }

        fn reliability(&self) -> u8 {
            5
        }

        async fn collect(
            &self,
            claim: &str,
            _ctx: &SearchContext,
            sink: &mut Vec<Evidence>,
        ) -> Result<(), ProviderError> {
            sink.push(Evidence::new("static", claim, "https://a.test", "first", 5));
            Err(ProviderError::Parse("second page malformed".to_string()))
        }
    }

    #[tokio::test]
    async fn test_search_keeps_partial_results() {
        let ctx = SearchContext::new(CancellationToken::new(), 5000);
        let evidence = StaticProvider.search("claim", &ctx).await;
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].snippet(), "first");
    }

    #[test]
    fn test_descriptor() {
        let descriptor = StaticProvider.descriptor();
        assert_eq!(descriptor.name, "static");
        assert_eq!(descriptor.status, "active");
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["type"], "search");
    }

    #[test]
    fn test_default_roster_order() {
        let client = Arc::new(UpstreamClient::new(&FetchConfig::default()).unwrap());
        let registry = ProviderRegistry::from_config(&ProvidersConfig::default(), client);
        let names: Vec<String> = registry.descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "Wikipedia",
                "Reuters",
                "Associated Press",
                "BBC News",
                "NPR",
                "Google Scholar",
                "Web Search",
            ]
        );
    }

    #[test]
    fn test_disabled_providers_skipped() {
        let client = Arc::new(UpstreamClient::new(&FetchConfig::default()).unwrap());
        let config = ProvidersConfig {
            news_enabled: false,
            scholar_enabled: false,
            ..Default::default()
        };
        let registry = ProviderRegistry::from_config(&config, client);
        assert_eq!(registry.len(), 2);
    }
}
