//! Per-host request spacing
//!
//! Every host gets a "next free slot". A caller reserves the slot, pushes it
//! forward by the minimum interval and sleeps until its own slot comes up, so
//! requests to one host are spaced out while other hosts proceed untouched.
//! A host whose slot is already in the past is dropped from the table.

use crate::metrics::METRICS;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub struct HostRateLimiter {
    min_interval: Duration,
    next_free: DashMap<String, Instant>,
}

impl HostRateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_free: DashMap::new(),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Hosts with a reservation still ahead of now
    pub fn tracked_hosts(&self) -> usize {
        self.next_free.len()
    }

    /// Wait for a request slot on `host`
    ///
    /// Returns `false` if `cancel` fired before the slot came up; the caller
    /// must not issue the request in that case.
    pub async fn acquire(&self, host: &str, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        if self.min_interval.is_zero() {
            return true;
        }

        let now = Instant::now();
        // an entry at or before now behaves exactly like a missing one
        self.next_free.retain(|_, next| *next > now);

        let slot = {
            let mut next = self.next_free.entry(host.to_string()).or_insert(now);
            let slot = (*next).max(now);
            *next = slot + self.min_interval;
            slot
        };

        if slot > now {
            METRICS.rate_limit_waits.inc();
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.release(host, slot);
                    return false;
                }
                _ = tokio::time::sleep_until(slot) => {}
            }
        }

        !cancel.is_cancelled()
    }

    /// Hand back an unused slot if nobody has queued behind it
    fn release(&self, host: &str, slot: Instant) {
        if let Some(mut next) = self.next_free.get_mut(host) {
            if *next == slot + self.min_interval {
                *next = slot;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_same_host_is_spaced() {
        let limiter = HostRateLimiter::new(Duration::from_millis(500));
        let token = CancellationToken::new();
        let start = Instant::now();

        assert!(limiter.acquire("en.wikipedia.org", &token).await);
        assert!(limiter.acquire("en.wikipedia.org", &token).await);
        assert!(limiter.acquire("en.wikipedia.org", &token).await);

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_hosts_do_not_wait() {
        let limiter = HostRateLimiter::new(Duration::from_secs(1));
        let token = CancellationToken::new();
        let start = Instant::now();

        assert!(limiter.acquire("reuters.com", &token).await);
        assert!(limiter.acquire("apnews.com", &token).await);
        assert!(limiter.acquire("bbc.com", &token).await);

        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_get_distinct_slots() {
        let limiter = std::sync::Arc::new(HostRateLimiter::new(Duration::from_millis(300)));
        let token = CancellationToken::new();
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let limiter = limiter.clone();
            let token = token.clone();
            handles.push(tokio::spawn(async move {
                limiter.acquire("html.duckduckgo.com", &token).await;
                start.elapsed()
            }));
        }

        let mut finished = Vec::new();
        for handle in handles {
            finished.push(handle.await.unwrap());
        }
        finished.sort();
        assert!(finished[1] - finished[0] >= Duration::from_millis(300));
        assert!(finished[2] - finished[1] >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_waiting() {
        let limiter = HostRateLimiter::new(Duration::from_secs(10));
        let token = CancellationToken::new();

        assert!(limiter.acquire("bbc.com", &token).await);

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        assert!(!limiter.acquire("bbc.com", &token).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_waiter_gives_slot_back() {
        let limiter = HostRateLimiter::new(Duration::from_secs(10));
        let token = CancellationToken::new();
        let start = Instant::now();

        assert!(limiter.acquire("apnews.com", &token).await);

        let abandoned = CancellationToken::new();
        let canceller = abandoned.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });
        assert!(!limiter.acquire("apnews.com", &abandoned).await);

        // the next caller takes the slot at 10s rather than the one after it
        assert!(limiter.acquire("apnews.com", &token).await);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_hosts_are_forgotten() {
        let limiter = HostRateLimiter::new(Duration::from_millis(200));
        let token = CancellationToken::new();

        assert!(limiter.acquire("reuters.com", &token).await);
        assert!(limiter.acquire("apnews.com", &token).await);
        assert_eq!(limiter.tracked_hosts(), 2);

        tokio::time::advance(Duration::from_millis(250)).await;

        assert!(limiter.acquire("bbc.com", &token).await);
        assert_eq!(limiter.tracked_hosts(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_token_refuses_immediately() {
        let limiter = HostRateLimiter::new(Duration::ZERO);
        let token = CancellationToken::new();
        token.cancel();
        assert!(!limiter.acquire("npr.org", &token).await);
    }
}
