// src/metrics/collector.rs
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Check metrics
    pub check_runs_total: IntCounterVec,
    pub check_duration_seconds: HistogramVec,
    pub checks_passing: IntGauge,
    pub checks_total: IntGauge,

    // Served requests
    pub requests_total: IntCounterVec,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let check_runs_total = IntCounterVec::new(
            Opts::new("pac_check_runs_total", "Total number of downstream checks run"),
            &["check", "outcome"],
        )?;
        registry.register(Box::new(check_runs_total.clone()))?;

        let check_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "pac_check_duration_seconds",
                "Downstream check duration in seconds",
            ),
            &["check"],
        )?;
        registry.register(Box::new(check_duration_seconds.clone()))?;

        let checks_passing = IntGauge::new(
            "pac_checks_passing",
            "Number of checks that passed on the latest run",
        )?;
        registry.register(Box::new(checks_passing.clone()))?;

        let checks_total = IntGauge::new("pac_checks_total", "Number of configured checks")?;
        registry.register(Box::new(checks_total.clone()))?;

        let requests_total = IntCounterVec::new(
            Opts::new("pac_requests_total", "Total number of requests served"),
            &["path", "status_code"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        Ok(Self {
            check_runs_total,
            check_duration_seconds,
            checks_passing,
            checks_total,
            requests_total,
        })
    }

    pub fn record_check(&self, check: &str, success: bool, duration: Duration) {
        let outcome = if success { "success" } else { "failure" };
        self.check_runs_total
            .with_label_values(&[check, outcome])
            .inc();
        self.check_duration_seconds
            .with_label_values(&[check])
            .observe(duration.as_secs_f64());
    }

    pub fn update_check_counts(&self, passing: usize, total: usize) {
        self.checks_passing.set(passing as i64);
        self.checks_total.set(total as i64);
    }

    pub fn record_request(&self, path: &str, status_code: u16) {
        self.requests_total
            .with_label_values(&[path, &status_code.to_string()])
            .inc();
    }
}
