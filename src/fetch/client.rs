//! Throttled HTTP client shared by every provider
//!
//! All outbound traffic goes through here so per-host spacing and the
//! per-host circuit breaker apply uniformly, whether the request is a search
//! page, an encyclopedia API call or an article fetch.

use super::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use super::rate_limiter::HostRateLimiter;
use crate::config::FetchConfig;
use crate::metrics::METRICS;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Outbound request errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Circuit breaker is open for {0}")]
    CircuitOpen(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub struct UpstreamClient {
    http: Client,
    limiter: HostRateLimiter,
    breaker: CircuitBreaker,
}

impl UpstreamClient {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: config.circuit_breaker_failures,
            reset_timeout: config.breaker_reset_timeout(),
        });

        Ok(Self {
            http,
            limiter: HostRateLimiter::new(config.min_host_interval()),
            breaker,
        })
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// GET a page body as text
    pub async fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        let response = self.send(url, query, cancel).await?;
        response
            .text()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))
    }

    /// GET and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<T, FetchError> {
        let response = self.send(url, query, cancel).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))
    }

    async fn send(
        &self,
        url: &str,
        query: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, FetchError> {
        let mut target = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !query.is_empty() {
            target.query_pairs_mut().extend_pairs(query.iter());
        }
        let host = host_key(&target)?;

        if self.breaker.is_open(&host) {
            METRICS.circuit_open.with_label_values(&[host.as_str()]).inc();
            warn!("Circuit breaker is open for {}, skipping request", host);
            return Err(FetchError::CircuitOpen(host));
        }

        if !self.limiter.acquire(&host, cancel).await {
            return Err(FetchError::Cancelled);
        }

        debug!("GET {}", target);

        let sent = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            result = self.http.get(target).send() => result,
        };

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                self.breaker.mark_failure(&host);
                METRICS.record_upstream(false);
                return Err(if e.is_timeout() {
                    FetchError::Timeout(e.to_string())
                } else {
                    FetchError::RequestFailed(e.to_string())
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            if trips_breaker(status) {
                self.breaker.mark_failure(&host);
            }
            METRICS.record_upstream(false);
            return Err(FetchError::Status(status.as_u16()));
        }

        self.breaker.mark_success(&host);
        METRICS.record_upstream(true);
        Ok(response)
    }
}

/// Rate limiting and breaker key: host plus explicit port
pub fn host_key(url: &Url) -> Result<String, FetchError> {
    let host = url
        .host_str()
        .ok_or_else(|| FetchError::InvalidUrl(format!("{} has no host", url)))?;

    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Statuses that mean the host is struggling or throttling us
fn trips_breaker(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
