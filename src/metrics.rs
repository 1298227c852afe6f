/// Metrics Module - Prometheus Instrumentation
///
/// Counters for evaluations, upstream failures and Lightning lookups, plus an
/// evaluation latency histogram. Served as text on `/metrics`.

use lazy_static::lazy_static;
use once_cell::sync::OnceCell;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::time::Instant;

/// Latency buckets for a full evaluation (seconds), upstream fetch included
const LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0, 30.0];

static INIT: OnceCell<()> = OnceCell::new();

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Completed evaluations
    /// Labels: mode (explorer, nodeonly)
    pub static ref EVALUATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("sovereign_evaluations_total", "Completed sovereignty evaluations"),
        &["mode"]
    ).unwrap();

    /// Upstream failures
    /// Labels: source (explorer, bitcoind, lnd)
    pub static ref UPSTREAM_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("sovereign_upstream_errors_total", "Failed calls to upstream services"),
        &["source"]
    ).unwrap();

    /// Fee estimates that fell back to the configured rate
    pub static ref FEE_FALLBACKS: IntCounter = IntCounter::new(
        "sovereign_fee_fallbacks_total",
        "Evaluations that used the fallback fee rate instead of a node estimate"
    ).unwrap();

    /// Lightning snapshot lookups
    /// Labels: outcome (ready, not_ready, unavailable)
    pub static ref LN_SNAPSHOTS: IntCounterVec = IntCounterVec::new(
        Opts::new("sovereign_ln_snapshots_total", "Lightning readiness lookups by outcome"),
        &["outcome"]
    ).unwrap();

    /// HTTP requests
    /// Labels: endpoint, status
    pub static ref HTTP_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("sovereign_http_requests_total", "Total HTTP requests"),
        &["endpoint", "status"]
    ).unwrap();

    /// End-to-end evaluation duration
    pub static ref EVALUATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new("sovereign_evaluation_duration_seconds", "Evaluation latency including upstream fetches")
            .buckets(LATENCY_BUCKETS.to_vec())
    ).unwrap();

    /// Service start timestamp
    pub static ref SERVICE_START_TIMESTAMP: IntGauge = IntGauge::new(
        "sovereign_service_start_timestamp_seconds",
        "Unix timestamp when service started"
    ).unwrap();
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    INIT.get_or_try_init(|| {
        REGISTRY.register(Box::new(EVALUATIONS.clone()))?;
        REGISTRY.register(Box::new(UPSTREAM_ERRORS.clone()))?;
        REGISTRY.register(Box::new(FEE_FALLBACKS.clone()))?;
        REGISTRY.register(Box::new(LN_SNAPSHOTS.clone()))?;
        REGISTRY.register(Box::new(HTTP_REQUESTS.clone()))?;
        REGISTRY.register(Box::new(EVALUATION_DURATION.clone()))?;
        REGISTRY.register(Box::new(SERVICE_START_TIMESTAMP.clone()))?;

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        SERVICE_START_TIMESTAMP.set(now as i64);
        Ok::<(), prometheus::Error>(())
    })?;
    Ok(())
}

/// Gather metrics in Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Timer for measuring durations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn record_evaluation(mode: &str, duration_secs: f64) {
    EVALUATIONS.with_label_values(&[mode]).inc();
    EVALUATION_DURATION.observe(duration_secs);
}

pub fn increment_upstream_errors(source: &str) {
    UPSTREAM_ERRORS.with_label_values(&[source]).inc();
}

pub fn increment_fee_fallbacks() {
    FEE_FALLBACKS.inc();
}

pub fn record_ln_snapshot(outcome: &str) {
    LN_SNAPSHOTS.with_label_values(&[outcome]).inc();
}

pub fn record_http_request(endpoint: &str, status: u16) {
    let status = status.to_string();
    HTTP_REQUESTS
        .with_label_values(&[endpoint, status.as_str()])
        .inc();
}
