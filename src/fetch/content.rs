//! Article content fetching

use super::client::{FetchError, UpstreamClient};
use super::extract::extract_article_text;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Turns a URL into up to `max_chars` of article body text
///
/// Implementations never fail: any problem yields an empty string.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str, max_chars: usize, cancel: &CancellationToken) -> String;
}

/// Fetches pages through the shared throttled client and extracts the body
pub struct HttpContentFetcher {
    client: Arc<UpstreamClient>,
}

impl HttpContentFetcher {
    pub fn new(client: Arc<UpstreamClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, url: &str, max_chars: usize, cancel: &CancellationToken) -> String {
        debug!("Fetching content from: {}", url);

        match self.client.get_text(url, &[], cancel).await {
            Ok(html) => extract_article_text(&html, max_chars),
            Err(FetchError::Cancelled) => String::new(),
            Err(e) => {
                warn!("Error fetching article content from {}: {}", url, e);
                String::new()
            }
        }
    }
}
