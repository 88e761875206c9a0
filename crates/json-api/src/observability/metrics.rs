//! Prometheus metrics for HTTP traffic and cart operation outcomes.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{StatusCode, header::CONTENT_TYPE},
};
use tracing::error;

const DURATION_BUCKETS: [f64; 11] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_requests_in_flight: IntGauge,
    cart_operations_total: IntCounterVec,
    cart_export_lines_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

fn metrics() -> Option<&'static Metrics> {
    METRICS
        .get_or_init(|| {
            build_metrics()
                .inspect_err(|source| error!("failed to build metrics registry: {source}"))
                .ok()
        })
        .as_ref()
}

fn register<C>(registry: &Registry, collector: C) -> Result<C, prometheus::Error>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

fn build_metrics() -> Result<Metrics, prometheus::Error> {
    let registry = Registry::new_custom(Some("trolley".to_string()), None)?;

    let http_requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new("http_requests_total", "HTTP requests by method, route and status."),
            &["method", "route", "status_class", "status_code"],
        )?,
    )?;

    let http_request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency by route.")
                .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        )?,
    )?;

    let http_requests_in_flight = register(
        &registry,
        IntGauge::new("http_requests_in_flight", "HTTP requests currently being served.")?,
    )?;

    let cart_operations_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "cart_operations_total",
                "Cart and admin operations by outcome (ok, version_conflict, not_found, ...).",
            ),
            &["operation", "outcome"],
        )?,
    )?;

    let cart_export_lines_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new("cart_export_lines_total", "Carts written by admin exports."),
            &["outcome"],
        )?,
    )?;

    Ok(Metrics {
        registry,
        http_requests_total,
        http_request_duration_seconds,
        http_requests_in_flight,
        cart_operations_total,
        cart_export_lines_total,
    })
}

/// Holds the in-flight gauge up for the life of one request.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    gauge: Option<&'static IntGauge>,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let gauge = metrics().map(|metrics| &metrics.http_requests_in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self { gauge }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if let Some(gauge) = self.gauge {
            gauge.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let class = status_class(status_code);
    let status_code = status_code.to_string();

    metrics
        .http_requests_total
        .with_label_values(&[method, route, class, status_code.as_str()])
        .inc();

    metrics
        .http_request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count one cart operation. `outcome` is `ok` or an error label.
pub(crate) fn observe_cart_operation(operation: &str, outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .cart_operations_total
            .with_label_values(&[operation, outcome])
            .inc();
    }
}

/// Count one exported cart line, or a failure that ended the export.
pub(crate) fn observe_export_line(outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .cart_export_lines_total
            .with_label_values(&[outcome])
            .inc();
    }
}

#[cfg(test)]
pub(crate) fn cart_operation_count(operation: &str, outcome: &str) -> u64 {
    metrics().map_or(0, |metrics| {
        metrics
            .cart_operations_total
            .with_label_values(&[operation, outcome])
            .get()
    })
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    if let Err(source) = res.add_header(CONTENT_TYPE, encoder.format_type(), true) {
        error!("failed to set metrics content type: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
