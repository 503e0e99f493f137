//! Encyclopedia provider backed by the MediaWiki API

use super::{EvidenceProvider, ProviderError, ProviderKind, SearchContext};
use crate::engine::models::{truncate_chars, Evidence};
use crate::fetch::{strip_html, FetchError, UpstreamClient};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub const WIKIPEDIA_SOURCE: &str = "Wikipedia";
pub const WIKIPEDIA_RELIABILITY: u8 = 8;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    #[serde(default)]
    extract: String,
}

pub struct WikipediaProvider {
    client: Arc<UpstreamClient>,
    api_url: String,
    page_base: String,
    limit: usize,
}

impl WikipediaProvider {
    pub fn new(
        client: Arc<UpstreamClient>,
        api_url: impl Into<String>,
        page_base: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            page_base: page_base.into(),
            limit,
        }
    }

    fn page_url(&self, title: &str) -> String {
        format!("{}{}", self.page_base, title.replace(' ', "_"))
    }

    async fn intro_extract(&self, title: &str, ctx: &SearchContext) -> Result<String, FetchError> {
        let response: ExtractResponse = self
            .client
            .get_json(
                &self.api_url,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("prop", "extracts"),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                    ("titles", title),
                ],
                &ctx.cancel,
            )
            .await?;

        let extract = response
            .query
            .and_then(|q| q.pages.into_values().next())
            .map(|page| page.extract)
            .unwrap_or_default();

        Ok(truncate_chars(&extract, ctx.max_content_chars))
    }
}

#[async_trait]
impl EvidenceProvider for WikipediaProvider {
    fn name(&self) -> &str {
        WIKIPEDIA_SOURCE
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Encyclopedia
    }

    fn reliability(&self) -> u8 {
        WIKIPEDIA_RELIABILITY
    }

    async fn collect(
        &self,
        claim: &str,
        ctx: &SearchContext,
        sink: &mut Vec<Evidence>,
    ) -> Result<(), ProviderError> {
        let limit = self.limit.to_string();
        let response: SearchResponse = self
            .client
            .get_json(
                &self.api_url,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("list", "search"),
                    ("srsearch", claim),
                    ("srlimit", limit.as_str()),
                ],
                &ctx.cancel,
            )
            .await?;

        let items = response.query.map(|q| q.search).unwrap_or_default();
        debug!("Wikipedia search returned {} articles", items.len());

        for item in items.into_iter().take(self.limit) {
            if ctx.is_cancelled() {
                return Err(ProviderError::Cancelled);
            }

            let content = match self.intro_extract(&item.title, ctx).await {
                Ok(content) => content,
                Err(FetchError::Cancelled) => return Err(ProviderError::Cancelled),
                Err(e) => {
                    warn!("Wikipedia extract failed for {:?}: {}", item.title, e);
                    String::new()
                }
            };

            let evidence = Evidence::new(
                WIKIPEDIA_SOURCE,
                item.title.as_str(),
                self.page_url(&item.title),
                strip_html(&item.snippet),
                WIKIPEDIA_RELIABILITY,
            )
            .with_full_content(content);

            sink.push(evidence);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;

    #[test]
    fn test_page_url_uses_underscores() {
        let client = Arc::new(UpstreamClient::new(&FetchConfig::default()).unwrap());
        let provider = WikipediaProvider::new(
            client,
            "https://en.wikipedia.org/w/api.php",
            "https://en.wikipedia.org/wiki/",
            3,
        );
        assert_eq!(
            provider.page_url("Apollo 11 mission"),
            "https://en.wikipedia.org/wiki/Apollo_11_mission"
        );
    }

    #[test]
    fn test_search_response_tolerates_missing_query() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"batchcomplete":""}"#).unwrap();
        assert!(parsed.query.is_none());
    }

    #[test]
    fn test_extract_response_shape() {
        let parsed: ExtractResponse = serde_json::from_str(
            r#"{"query":{"pages":{"736":{"pageid":736,"title":"Earth","extract":"Earth is round."}}}}"#,
        )
        .unwrap();
        let page = parsed.query.unwrap().pages.into_values().next().unwrap();
        assert_eq!(page.extract, "Earth is round.");
    }
}
