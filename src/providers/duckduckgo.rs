//! Web search through the DuckDuckGo HTML endpoint

use super::ProviderError;
use crate::fetch::extract::element_text;
use crate::fetch::UpstreamClient;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

static RESULT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.result").expect("result selector is valid"));
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__a").expect("title selector is valid"));
static SNIPPET: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".result__snippet").expect("snippet selector is valid"));

/// Result links are protocol-relative redirects on this host
static REDIRECT_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("https://duckduckgo.com/").expect("redirect base is valid"));

/// One organic search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// General web search capability shared by the news and web providers
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Up to `limit` hits in result-page order
    async fn search(
        &self,
        query: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchHit>, ProviderError>;
}

pub struct DuckDuckGoSearch {
    client: Arc<UpstreamClient>,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(client: Arc<UpstreamClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        let html = self
            .client
            .get_text(&self.endpoint, &[("q", query)], cancel)
            .await?;

        let hits = parse_results(&html, limit);
        debug!("DuckDuckGo returned {} hits for {:?}", hits.len(), query);
        Ok(hits)
    }
}

/// Parse a result page; blocks without a title link are skipped
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);

    document
        .select(&RESULT)
        .take(limit)
        .filter_map(|block| {
            let title = block.select(&TITLE).next()?;
            let href = title.value().attr("href").unwrap_or_default();
            let snippet = block
                .select(&SNIPPET)
                .next()
                .map(|s| element_text(&s))
                .unwrap_or_default();

            Some(SearchHit {
                title: element_text(&title),
                url: resolve_redirect(href),
                snippet,
            })
        })
        .collect()
}

/// Unwrap a `/l/?uddg=` redirect into its target; anything else is kept
pub fn resolve_redirect(href: &str) -> String {
    let Ok(url) = REDIRECT_BASE.join(href) else {
        return href.to_string();
    };

    url.query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, target)| target.into_owned())
        .unwrap_or_else(|| href.to_string())
}
