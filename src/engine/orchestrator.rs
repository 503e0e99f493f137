//! Claim check orchestration
//!
//! Every registered provider runs in its own task, bounded by a semaphore.
//! Each run gets `min(check deadline, permit time + provider timeout)`; a
//! provider that overruns keeps whatever it had pushed into its sink. Results
//! are concatenated in registration order, never completion order.

use super::models::{CheckResult, Evidence, ProviderReport, ProviderStatus};
use crate::analysis::VerdictAggregator;
use crate::config::{Config, EngineConfig};
use crate::error::{CheckerError, Result};
use crate::fetch::UpstreamClient;
use crate::metrics::METRICS;
use crate::providers::{EvidenceProvider, ProviderRegistry, SearchContext};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Evidence and report of one provider run
struct ProviderRun {
    evidence: Vec<Evidence>,
    report: ProviderReport,
}

pub struct Orchestrator {
    registry: ProviderRegistry,
    aggregator: Arc<VerdictAggregator>,
    semaphore: Arc<Semaphore>,
    provider_timeout: Duration,
    check_budget: Duration,
    max_content_chars: usize,
}

impl Orchestrator {
    pub fn new(
        registry: ProviderRegistry,
        aggregator: VerdictAggregator,
        engine: &EngineConfig,
        max_content_chars: usize,
    ) -> Self {
        Self {
            registry,
            aggregator: Arc::new(aggregator),
            semaphore: Arc::new(Semaphore::new(engine.max_concurrent_providers.max(1))),
            provider_timeout: engine.provider_timeout(),
            check_budget: engine.check_budget(),
            max_content_chars,
        }
    }

    /// Wire the standard provider roster and built-in pattern tables
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = UpstreamClient::new(&config.fetch)
            .map_err(|e| CheckerError::Configuration(e.to_string()))?;
        let registry = ProviderRegistry::from_config(&config.providers, Arc::new(client));
        let aggregator = VerdictAggregator::builtin()?;

        Ok(Self::new(
            registry,
            aggregator,
            &config.engine,
            config.fetch.max_content_chars,
        ))
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Check a claim with no external cancellation
    pub async fn check(&self, claim: &str) -> Result<CheckResult> {
        self.check_with_cancel(claim, CancellationToken::new()).await
    }

    /// Check a claim; cancelling `cancel` (or dropping this future) stops
    /// providers from issuing new outbound requests
    pub async fn check_with_cancel(
        &self,
        claim: &str,
        cancel: CancellationToken,
    ) -> Result<CheckResult> {
        let id = Uuid::new_v4();
        let started = Instant::now();
        let deadline = started + self.check_budget;

        info!(check_id = %id, providers = self.registry.len(), "Checking claim: {}", claim);

        let check_cancel = cancel.child_token();
        let _cancel_on_drop = check_cancel.clone().drop_guard();
        let ctx = SearchContext::new(check_cancel, self.max_content_chars);

        let handles: Vec<_> = self
            .registry
            .providers()
            .iter()
            .map(|provider| {
                tokio::spawn(run_provider(
                    provider.clone(),
                    claim.to_string(),
                    ctx.clone(),
                    self.semaphore.clone(),
                    self.provider_timeout,
                    deadline,
                ))
            })
            .collect();

        let mut sources = Vec::new();
        let mut reports = Vec::with_capacity(handles.len());

        let joined = join_all(handles).await;
        for (provider, outcome) in self.registry.providers().iter().zip(joined) {
            match outcome {
                Ok(run) => {
                    sources.extend(run.evidence);
                    reports.push(run.report);
                }
                Err(e) => {
                    error!(check_id = %id, "{} provider task aborted: {}", provider.name(), e);
                    METRICS.record_provider(provider.name(), ProviderStatus::Failed.as_str(), 0, 0.0);
                    reports.push(ProviderReport {
                        provider: provider.name().to_string(),
                        status: ProviderStatus::Failed,
                        evidence_count: 0,
                        error: Some(format!("provider task aborted: {}", e)),
                        elapsed_ms: 0,
                    });
                }
            }
        }

        let analysis = self.aggregator.aggregate(claim, &sources);

        if !analysis.stats.is_consistent_with(sources.len()) {
            error!(
                check_id = %id,
                "Source statistics {:?} disagree with {} collected sources",
                analysis.stats,
                sources.len()
            );
            return Err(CheckerError::Internal(format!(
                "source statistics do not add up to {} sources",
                sources.len()
            )));
        }

        let elapsed = started.elapsed();
        METRICS.record_check(analysis.verdict.as_str(), elapsed.as_secs_f64());
        info!(
            check_id = %id,
            verdict = %analysis.verdict,
            confidence = analysis.confidence,
            sources = sources.len(),
            "Check completed in {:?}",
            elapsed
        );

        Ok(CheckResult {
            id,
            claim: claim.to_string(),
            analysis,
            source_count: sources.len(),
            sources,
            timestamp: Utc::now(),
            providers: reports,
        })
    }
}

async fn run_provider(
    provider: Arc<dyn EvidenceProvider>,
    claim: String,
    ctx: SearchContext,
    semaphore: Arc<Semaphore>,
    provider_timeout: Duration,
    check_deadline: Instant,
) -> ProviderRun {
    let started = Instant::now();
    let name = provider.name().to_string();
    let mut sink = Vec::new();

    let (status, error) = match tokio::time::timeout_at(check_deadline, semaphore.acquire_owned()).await {
        Err(_) => (
            ProviderStatus::TimedOut,
            Some("check budget exhausted before the provider started".to_string()),
        ),
        Ok(Err(e)) => (ProviderStatus::Failed, Some(e.to_string())),
        Ok(Ok(_permit)) => {
            let deadline = check_deadline.min(Instant::now() + provider_timeout);
            match tokio::time::timeout_at(deadline, provider.collect(&claim, &ctx, &mut sink)).await {
                Ok(Ok(())) => (ProviderStatus::Ok, None),
                Ok(Err(e)) => (ProviderStatus::Failed, Some(e.to_string())),
                Err(_) => (
                    ProviderStatus::TimedOut,
                    Some(format!("timed out after {:?}", started.elapsed())),
                ),
            }
        }
    };

    let elapsed = started.elapsed();
    match &error {
        None => info!("{} returned {} sources in {:?}", name, sink.len(), elapsed),
        Some(e) => warn!(
            "{} {}: {} (keeping {} sources)",
            name,
            status.as_str(),
            e,
            sink.len()
        ),
    }
    METRICS.record_provider(&name, status.as_str(), sink.len(), elapsed.as_secs_f64());

    ProviderRun {
        report: ProviderReport {
            provider: name,
            status,
            evidence_count: sink.len(),
            error,
            elapsed_ms: elapsed.as_millis() as u64,
        },
        evidence: sink,
    }
}
