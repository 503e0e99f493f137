//! General web search provider with domain-based reliability

use super::{EvidenceProvider, ProviderError, ProviderKind, SearchContext, WebSearch};
use crate::engine::models::Evidence;
use crate::fetch::ContentFetcher;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub const WEB_SOURCE: &str = "Web Search";
pub const TRUSTED_RELIABILITY: u8 = 8;
pub const UNTRUSTED_RELIABILITY: u8 = 5;

/// Trusted domain suffixes
///
/// A host matches an entry when it equals it or ends with `.<entry>`, so
/// `edu` covers every `.edu` host and `nasa.gov` covers `www.nasa.gov`.
#[derive(Debug, Clone, Default)]
pub struct TrustedDomains {
    domains: Vec<String>,
}

impl TrustedDomains {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim_matches('.').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn is_trusted(&self, url: &str) -> bool {
        let Some(host) = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
        else {
            return false;
        };

        self.domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .map_or(false, |rest| rest.ends_with('.'))
        })
    }

    pub fn reliability_for(&self, url: &str) -> u8 {
        if self.is_trusted(url) {
            TRUSTED_RELIABILITY
        } else {
            UNTRUSTED_RELIABILITY
        }
    }
}

pub struct WebSearchProvider {
    search: Arc<dyn WebSearch>,
    fetcher: Arc<dyn ContentFetcher>,
    trusted: TrustedDomains,
    limit: usize,
}

impl WebSearchProvider {
    pub fn new(
        search: Arc<dyn WebSearch>,
        fetcher: Arc<dyn ContentFetcher>,
        trusted: TrustedDomains,
        limit: usize,
    ) -> Self {
        Self {
            search,
            fetcher,
            trusted,
            limit,
        }
    }
}

#[async_trait]
impl EvidenceProvider for WebSearchProvider {
    fn name(&self) -> &str {
        WEB_SOURCE
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Search
    }

    fn reliability(&self) -> u8 {
        UNTRUSTED_RELIABILITY
    }

    async fn collect(
        &self,
        claim: &str,
        ctx: &SearchContext,
        sink: &mut Vec<Evidence>,
    ) -> Result<(), ProviderError> {
        let hits = self.search.search(claim, self.limit, &ctx.cancel).await?;
        debug!("Web search returned {} hits", hits.len());

        for hit in hits.into_iter().take(self.limit) {
            if ctx.is_cancelled() {
                return Err(ProviderError::Cancelled);
            }

            let reliability = self.trusted.reliability_for(&hit.url);
            // only trusted pages are worth a full fetch
            let content = if reliability >= TRUSTED_RELIABILITY {
                self.fetcher
                    .fetch(&hit.url, ctx.max_content_chars, &ctx.cancel)
                    .await
            } else {
                String::new()
            };

            sink.push(
                Evidence::new(WEB_SOURCE, hit.title, hit.url, hit.snippet, reliability)
                    .with_full_content(content),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SearchHit;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    struct CannedSearch(Vec<SearchHit>);

    #[async_trait]
    impl WebSearch for CannedSearch {
        async fn search(
            &self,
            _query: &str,
            limit: usize,
            _cancel: &CancellationToken,
        ) -> Result<Vec<SearchHit>, ProviderError> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }
    }

    #[derive(Default)]
    struct RecordingFetcher {
        fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentFetcher for RecordingFetcher {
        async fn fetch(&self, url: &str, _max_chars: usize, _cancel: &CancellationToken) -> String {
            self.fetched.lock().unwrap().push(url.to_string());
            format!("body of {}", url)
        }
    }

    fn hit(url: &str) -> SearchHit {
        SearchHit {
            title: "title".to_string(),
            url: url.to_string(),
            snippet: "snippet".to_string(),
        }
    }

    fn trusted() -> TrustedDomains {
        TrustedDomains::new(["nasa.gov", "edu", "bbc.com"])
    }

    #[test]
    fn test_trusted_host_matching() {
        let domains = trusted();
        assert!(domains.is_trusted("https://www.nasa.gov/apollo"));
        assert!(domains.is_trusted("https://nasa.gov"));
        assert!(domains.is_trusted("https://physics.mit.edu/paper"));
        assert!(domains.is_trusted("https://WWW.BBC.COM/news"));
        assert!(!domains.is_trusted("https://notnasa.gov/fake"));
        assert!(!domains.is_trusted("https://education.com/edu"));
        assert!(!domains.is_trusted("not a url"));
    }

    #[test]
    fn test_reliability_for() {
        let domains = trusted();
        assert_eq!(domains.reliability_for("https://www.nasa.gov/x"), 8);
        assert_eq!(domains.reliability_for("https://blog.example.com/x"), 5);
    }

    #[tokio::test]
    async fn test_only_trusted_hits_are_fetched() {
        let search = Arc::new(CannedSearch(vec![
            hit("https://www.nasa.gov/apollo"),
            hit("https://conspiracy.example.com/moon"),
        ]));
        let fetcher = Arc::new(RecordingFetcher::default());
        let provider = WebSearchProvider::new(search, fetcher.clone(), trusted(), 5);

        let ctx = SearchContext::new(CancellationToken::new(), 5000);
        let evidence = provider.search("moon landing", &ctx).await;

        assert_eq!(evidence.len(), 2);
        assert_eq!(evidence[0].reliability_score(), 8);
        assert_eq!(evidence[0].full_content(), "body of https://www.nasa.gov/apollo");
        assert_eq!(evidence[1].reliability_score(), 5);
        assert_eq!(evidence[1].full_content(), "");
        assert_eq!(
            *fetcher.fetched.lock().unwrap(),
            vec!["https://www.nasa.gov/apollo".to_string()]
        );
        assert!(evidence.iter().all(|e| e.source() == WEB_SOURCE));
    }

    #[tokio::test]
    async fn test_respects_limit() {
        let hits = (0..8).map(|i| hit(&format!("https://site{}.example.com", i))).collect();
        let provider = WebSearchProvider::new(
            Arc::new(CannedSearch(hits)),
            Arc::new(RecordingFetcher::default()),
            trusted(),
            5,
        );
        let ctx = SearchContext::new(CancellationToken::new(), 5000);
        assert_eq!(provider.search("claim", &ctx).await.len(), 5);
    }
}
