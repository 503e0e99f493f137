//! Outbound HTTP: throttling, circuit breaking and article extraction

pub mod client;
pub mod rate_limiter;
pub mod circuit_breaker;
pub mod extract;
pub mod content;

pub use client::{FetchError, UpstreamClient};
pub use rate_limiter::HostRateLimiter;
pub use circuit_breaker::{BreakerState, CircuitBreaker, CircuitBreakerConfig};
pub use extract::{extract_article_text, strip_html};
pub use content::{ContentFetcher, HttpContentFetcher};
