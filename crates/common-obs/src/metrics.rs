use std::time::Instant;

use once_cell::sync::OnceCell;
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::BuildInfo;

const DEFAULT_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0];

pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

static METRICS: OnceCell<ServiceMetrics> = OnceCell::new();

struct ServiceMetrics {
    service: String,
    started: Instant,
    registry: Registry,
    http_requests_total: IntCounterVec,
    handler_latency_seconds: HistogramVec,
    process_uptime_seconds: GaugeVec,
}

impl ServiceMetrics {
    fn new(service: &str, build: &BuildInfo) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["service", "route", "code"],
        )?;
        let handler_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_handler_latency_seconds",
                "HTTP handler latency in seconds",
            )
            .buckets(DEFAULT_BUCKETS.to_vec()),
            &["service", "route"],
        )?;
        let process_uptime_seconds = GaugeVec::new(
            Opts::new("process_uptime_seconds", "Process uptime in seconds"),
            &["service"],
        )?;
        let build_info = GaugeVec::new(
            Opts::new("build_info", "Build information for the running service"),
            &["service", "version", "build_sha", "build_time"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(handler_latency_seconds.clone()))?;
        registry.register(Box::new(process_uptime_seconds.clone()))?;
        registry.register(Box::new(build_info.clone()))?;

        build_info
            .with_label_values(&[service, build.version, build.build_sha, build.build_time])
            .set(1.0);
        process_uptime_seconds.with_label_values(&[service]).set(0.0);

        Ok(Self {
            service: service.to_string(),
            started: Instant::now(),
            registry,
            http_requests_total,
            handler_latency_seconds,
            process_uptime_seconds,
        })
    }
}

/// Install the process-wide metrics registry. Later calls keep the first service name.
pub(crate) fn init(service: &str, build: &BuildInfo) -> Result<(), prometheus::Error> {
    METRICS
        .get_or_try_init(|| ServiceMetrics::new(service, build))
        .map(|_| ())
}

pub fn service_name() -> Option<&'static str> {
    METRICS.get().map(|metrics| metrics.service.as_str())
}

/// Count a finished HTTP request and record its latency under the matched route.
pub fn observe_http_request(route: &str, code: &str, latency_seconds: f64) {
    let Some(metrics) = METRICS.get() else {
        return;
    };
    metrics
        .http_requests_total
        .with_label_values(&[metrics.service.as_str(), route, code])
        .inc();
    metrics
        .handler_latency_seconds
        .with_label_values(&[metrics.service.as_str(), route])
        .observe(latency_seconds);
}

/// Render every registered metric in the Prometheus text format.
///
/// Returns an empty document when metrics were never initialized.
pub fn encode_prometheus() -> String {
    let Some(metrics) = METRICS.get() else {
        return String::new();
    };

    metrics
        .process_uptime_seconds
        .with_label_values(&[metrics.service.as_str()])
        .set(metrics.started.elapsed().as_secs_f64());

    let mut buffer = Vec::new();
    if let Err(error) = TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer) {
        tracing::warn!(%error, "failed to encode prometheus metrics");
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}
