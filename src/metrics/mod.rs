//! Metrics collection for observability

use prometheus::{
    Counter, CounterVec, Histogram, HistogramVec, Opts, Registry,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_counter_with_registry, register_histogram_with_registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Check metrics
    pub checks_total: Counter,
    pub check_duration: Histogram,
    pub verdicts: CounterVec,

    // Provider metrics
    pub provider_runs: CounterVec,
    pub provider_duration: HistogramVec,
    pub evidence_collected: CounterVec,

    // Upstream HTTP metrics
    pub upstream_requests: CounterVec,
    pub rate_limit_waits: Counter,
    pub circuit_open: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let checks_total = register_counter_with_registry!(
            Opts::new("claim_checks_total", "Total claim checks performed"),
            registry
        )?;

        let check_duration = register_histogram_with_registry!(
            "claim_check_duration_seconds",
            "End-to-end claim check duration in seconds",
            registry
        )?;

        let verdicts = register_counter_vec_with_registry!(
            Opts::new("claim_verdicts_total", "Verdicts issued by kind"),
            &["verdict"],
            registry
        )?;

        let provider_runs = register_counter_vec_with_registry!(
            Opts::new("provider_runs_total", "Provider runs by outcome"),
            &["provider", "status"],
            registry
        )?;

        let provider_duration = register_histogram_vec_with_registry!(
            "provider_duration_seconds",
            "Provider run duration in seconds",
            &["provider"],
            registry
        )?;

        let evidence_collected = register_counter_vec_with_registry!(
            Opts::new("evidence_collected_total", "Evidence items collected per provider"),
            &["provider"],
            registry
        )?;

        let upstream_requests = register_counter_vec_with_registry!(
            Opts::new("upstream_requests_total", "Outbound HTTP requests by outcome"),
            &["status"],
            registry
        )?;

        let rate_limit_waits = register_counter_with_registry!(
            Opts::new("upstream_rate_limit_waits_total", "Requests delayed by per-host spacing"),
            registry
        )?;

        let circuit_open = register_counter_vec_with_registry!(
            Opts::new("upstream_circuit_open_total", "Requests rejected by an open circuit"),
            &["host"],
            registry
        )?;

        Ok(Self {
            registry,
            checks_total,
            check_duration,
            verdicts,
            provider_runs,
            provider_duration,
            evidence_collected,
            upstream_requests,
            rate_limit_waits,
            circuit_open,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a finished provider run
    pub fn record_provider(&self, provider: &str, status: &str, evidence: usize, seconds: f64) {
        self.provider_runs.with_label_values(&[provider, status]).inc();
        self.provider_duration
            .with_label_values(&[provider])
            .observe(seconds);
        self.evidence_collected
            .with_label_values(&[provider])
            .inc_by(evidence as f64);
    }

    /// Record a finished check
    pub fn record_check(&self, verdict: &str, seconds: f64) {
        self.checks_total.inc();
        self.verdicts.with_label_values(&[verdict]).inc();
        self.check_duration.observe(seconds);
    }

    /// Record an outbound request outcome
    pub fn record_upstream(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.upstream_requests.with_label_values(&[status]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
