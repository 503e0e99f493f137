//! Academic provider scraping the Google Scholar result page

use super::{EvidenceProvider, ProviderError, ProviderKind, SearchContext};
use crate::engine::models::Evidence;
use crate::fetch::extract::element_text;
use crate::fetch::UpstreamClient;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::debug;

pub const SCHOLAR_SOURCE: &str = "Google Scholar";
pub const SCHOLAR_RELIABILITY: u8 = 9;

static ENTRY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.gs_ri").expect("entry selector is valid"));
static HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3.gs_rt").expect("heading selector is valid"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("link selector is valid"));
static ABSTRACT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.gs_rs").expect("abstract selector is valid"));

/// Title, link and abstract of one scholarly result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScholarEntry {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

pub struct ScholarProvider {
    client: Arc<UpstreamClient>,
    endpoint: String,
    limit: usize,
}

impl ScholarProvider {
    pub fn new(client: Arc<UpstreamClient>, endpoint: impl Into<String>, limit: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            limit,
        }
    }
}

#[async_trait]
impl EvidenceProvider for ScholarProvider {
    fn name(&self) -> &str {
        SCHOLAR_SOURCE
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Academic
    }

    fn reliability(&self) -> u8 {
        SCHOLAR_RELIABILITY
    }

    async fn collect(
        &self,
        claim: &str,
        ctx: &SearchContext,
        sink: &mut Vec<Evidence>,
    ) -> Result<(), ProviderError> {
        let html = self
            .client
            .get_text(&self.endpoint, &[("q", claim), ("hl", "en")], &ctx.cancel)
            .await?;

        let entries = parse_entries(&html, self.limit);
        debug!("Google Scholar returned {} entries", entries.len());

        sink.extend(entries.into_iter().map(|entry| {
            Evidence::new(
                SCHOLAR_SOURCE,
                entry.title,
                entry.url,
                entry.snippet,
                SCHOLAR_RELIABILITY,
            )
        }));

        Ok(())
    }
}

/// Parse a result page; entries without a heading are skipped and
/// unlinked headings such as `[CITATION]` keep an empty url
pub fn parse_entries(html: &str, limit: usize) -> Vec<ScholarEntry> {
    let document = Html::parse_document(html);

    document
        .select(&ENTRY)
        .take(limit)
        .filter_map(|entry| {
            let heading = entry.select(&HEADING).next()?;
            let url = heading
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or_default()
                .to_string();
            let snippet = entry
                .select(&ABSTRACT)
                .next()
                .map(|s| element_text(&s))
                .unwrap_or_default();

            Some(ScholarEntry {
                title: element_text(&heading),
                url,
                snippet,
            })
        })
        .collect()
}
