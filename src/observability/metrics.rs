use anyhow::Result;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()
    }).await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token file metrics
    pub token_reads: IntCounterVec,
    pub token_read_failures: IntCounterVec,
    pub token_expiry_unix: IntGaugeVec,

    // Config
    pub config_validation_errors: IntCounter,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("tokensource".into()), None)
            .expect("static registry prefix is valid");

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_reads: IntCounterVec::new(Opts::new("token_reads_total", "Successful token file reads"),&["path"],).expect("valid metric"),
            token_read_failures: IntCounterVec::new(Opts::new("token_read_failures_total", "Token file read failures by reason"),&["path", "reason"],).expect("valid metric"),
            token_expiry_unix: IntGaugeVec::new(Opts::new("token_expiry_unix_seconds", "Instant the cached token becomes stale"),&["path"],).expect("valid metric"),

            config_validation_errors: IntCounter::new("config_validation_errors_total","Validation errors while loading config",).expect("valid metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_reads.clone())).expect("unique metric");
        reg.register(Box::new(metrics.token_read_failures.clone())).expect("unique metric");
        reg.register(Box::new(metrics.token_expiry_unix.clone())).expect("unique metric");
        reg.register(Box::new(metrics.config_validation_errors.clone())).expect("unique metric");

        metrics
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
