//! Per-host circuit breaker for upstream protection
//!
//! A host that keeps failing (timeouts, 429s, 5xx) is short-circuited for a
//! cool-down period so a check does not keep hammering a host that is
//! already rate limiting us. Hosts only stay in the table while they have
//! recent failures.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,   // Normal operation
    Open,     // Failing, reject requests
    HalfOpen, // Testing if the host recovered
}

#[derive(Debug, Clone)]
struct BreakerEntry {
    state: BreakerState,
    failure_count: usize,
    opened_at: Option<Instant>,
    last_failure: Instant,
}

impl BreakerEntry {
    fn new() -> Self {
        Self {
            state: BreakerState::Closed,
            failure_count: 0,
            opened_at: None,
            last_failure: Instant::now(),
        }
    }

    /// Quiet for a full cool-down while closed, or two once opened
    fn is_stale(&self, reset_timeout: Duration) -> bool {
        let quiet_for = match self.state {
            BreakerState::Closed => reset_timeout,
            BreakerState::Open | BreakerState::HalfOpen => reset_timeout * 2,
        };
        self.last_failure.elapsed() >= quiet_for
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: usize,
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
        }
    }
}

pub struct CircuitBreaker {
    hosts: DashMap<String, BreakerEntry>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            hosts: DashMap::new(),
            config,
        }
    }

    /// Check if requests to `host` should be rejected
    pub fn is_open(&self, host: &str) -> bool {
        let Some(mut entry) = self.hosts.get_mut(host) else {
            return false;
        };

        if entry.state != BreakerState::Open {
            return false;
        }

        let cooled_down = entry
            .opened_at
            .map(|opened_at| opened_at.elapsed() >= self.config.reset_timeout)
            .unwrap_or(false);

        if cooled_down {
            entry.state = BreakerState::HalfOpen;
        }
        !cooled_down
    }

    /// A healthy host is indistinguishable from an unknown one
    pub fn mark_success(&self, host: &str) {
        self.hosts.remove(host);
    }

    pub fn mark_failure(&self, host: &str) {
        let reset_timeout = self.config.reset_timeout;
        self.hosts.retain(|_, entry| !entry.is_stale(reset_timeout));

        let mut entry = self
            .hosts
            .entry(host.to_string())
            .or_insert_with(BreakerEntry::new);

        entry.failure_count += 1;
        entry.last_failure = Instant::now();

        // A failed trial request while half-open re-opens immediately
        if entry.state == BreakerState::HalfOpen
            || entry.failure_count >= self.config.failure_threshold
        {
            entry.state = BreakerState::Open;
            entry.opened_at = Some(Instant::now());
        }
    }

    pub fn state(&self, host: &str) -> BreakerState {
        self.hosts
            .get(host)
            .map(|e| e.state)
            .unwrap_or(BreakerState::Closed)
    }

    pub fn failure_count(&self, host: &str) -> usize {
        self.hosts.get(host).map(|e| e.failure_count).unwrap_or(0)
    }

    pub fn tracked_hosts(&self) -> usize {
        self.hosts.len()
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}
