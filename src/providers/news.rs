//! News outlet provider: site-scoped web search plus full article fetch

use super::{EvidenceProvider, ProviderError, ProviderKind, SearchContext, WebSearch};
use crate::config::NewsOutlet;
use crate::engine::models::Evidence;
use crate::fetch::ContentFetcher;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub const NEWS_RELIABILITY: u8 = 9;

pub struct NewsProvider {
    outlet: NewsOutlet,
    search: Arc<dyn WebSearch>,
    fetcher: Arc<dyn ContentFetcher>,
    limit: usize,
}

impl NewsProvider {
    pub fn new(
        outlet: NewsOutlet,
        search: Arc<dyn WebSearch>,
        fetcher: Arc<dyn ContentFetcher>,
        limit: usize,
    ) -> Self {
        Self {
            outlet,
            search,
            fetcher,
            limit,
        }
    }

    pub fn query_for(&self, claim: &str) -> String {
        format!("{} site:{}", claim, self.outlet.site)
    }
}

#[async_trait]
impl EvidenceProvider for NewsProvider {
    fn name(&self) -> &str {
        &self.outlet.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::News
    }

    fn reliability(&self) -> u8 {
        NEWS_RELIABILITY
    }

    async fn collect(
        &self,
        claim: &str,
        ctx: &SearchContext,
        sink: &mut Vec<Evidence>,
    ) -> Result<(), ProviderError> {
        let hits = self
            .search
            .search(&self.query_for(claim), self.limit, &ctx.cancel)
            .await?;
        debug!("{} search returned {} hits", self.outlet.name, hits.len());

        for hit in hits.into_iter().take(self.limit) {
            if ctx.is_cancelled() {
                return Err(ProviderError::Cancelled);
            }

            let content = self
                .fetcher
                .fetch(&hit.url, ctx.max_content_chars, &ctx.cancel)
                .await;

            sink.push(
                Evidence::new(
                    self.outlet.name.as_str(),
                    hit.title,
                    hit.url,
                    hit.snippet,
                    NEWS_RELIABILITY,
                )
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

    #[derive(Default)]
    struct QueryRecorder {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl WebSearch for QueryRecorder {
        async fn search(
            &self,
            query: &str,
            limit: usize,
            _cancel: &CancellationToken,
        ) -> Result<Vec<SearchHit>, ProviderError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok((0..limit + 3)
                .map(|i| SearchHit {
                    title: format!("Story {}", i),
                    url: format!("https://www.reuters.com/story-{}", i),
                    snippet: "snippet".to_string(),
                })
                .collect())
        }
    }

    struct FixedFetcher;

    #[async_trait]
    impl ContentFetcher for FixedFetcher {
        async fn fetch(&self, _url: &str, _max_chars: usize, _cancel: &CancellationToken) -> String {
            "Full article text.".to_string()
        }
    }

    #[tokio::test]
    async fn test_site_scoped_query_and_enrichment() {
        let search = Arc::new(QueryRecorder::default());
        let provider = NewsProvider::new(
            NewsOutlet::new("Reuters", "reuters.com"),
            search.clone(),
            Arc::new(FixedFetcher),
            2,
        );

        let ctx = SearchContext::new(CancellationToken::new(), 5000);
        let evidence = provider.search("vaccines cause autism", &ctx).await;

        assert_eq!(
            *search.queries.lock().unwrap(),
            vec!["vaccines cause autism site:reuters.com".to_string()]
        );
        assert_eq!(evidence.len(), 2);
        assert_eq!(evidence[0].source(), "Reuters");
        assert_eq!(evidence[0].title(), "Story 0");
        assert_eq!(evidence[0].reliability_score(), 9);
        assert_eq!(evidence[0].full_content(), "Full article text.");
    }

    #[tokio::test]
    async fn test_cancelled_context_stops_enrichment() {
        let provider = NewsProvider::new(
            NewsOutlet::new("NPR", "npr.org"),
            Arc::new(QueryRecorder::default()),
            Arc::new(FixedFetcher),
            2,
        );
        let token = CancellationToken::new();
        token.cancel();
        let ctx = SearchContext::new(token, 5000);
        assert!(provider.search("claim", &ctx).await.is_empty());
    }
}
