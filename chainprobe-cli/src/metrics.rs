//! Prometheus latency histograms and their HTTP exporter.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse, routing::get, Router};
use chainprobe_verifier::{LatencySink, OperationKind};
use prometheus::{Encoder, Histogram, HistogramOpts, HistogramVec, Registry, TextEncoder};
use tracing::{error, info, warn};

/// Histogram buckets, in milliseconds.
const LATENCY_BUCKETS_MS: [f64; 8] = [10.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0];

#[derive(Clone)]
pub struct LatencyMetrics {
    registry: Registry,
    block_number_latency: Histogram,
    block_response_latency: HistogramVec,
    logs_by_block_number_latency: Histogram,
}

impl LatencyMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let block_number_latency = Histogram::with_opts(
            HistogramOpts::new("evm_getBlockNumber_response_latency_ms", "eth_blockNumber latency (ms)")
                .buckets(LATENCY_BUCKETS_MS.to_vec()),
        )?;
        let block_response_latency = HistogramVec::new(
            HistogramOpts::new("evm_block_response_latency_ms", "eth_getBlockByNumber latency (ms)")
                .buckets(LATENCY_BUCKETS_MS.to_vec()),
            &["type"],
        )?;
        let logs_by_block_number_latency = Histogram::with_opts(
            HistogramOpts::new("evm_logs_by_block_number_latency_ms", "eth_getLogs by block number latency (ms)")
                .buckets(LATENCY_BUCKETS_MS.to_vec()),
        )?;

        registry.register(Box::new(block_number_latency.clone()))?;
        registry.register(Box::new(block_response_latency.clone()))?;
        registry.register(Box::new(logs_by_block_number_latency.clone()))?;

        Ok(Self {
            registry,
            block_number_latency,
            block_response_latency,
            logs_by_block_number_latency,
        })
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub async fn start_http_server(self: Arc<Self>, port: u16) {
        let app = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(self);

        let addr = format!("0.0.0.0:{}", port);
        let listener = match tokio::net::TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                warn!(%addr, error = %e, "metrics server failed to bind");
                return;
            }
        };

        info!("metrics server listening on http://{}/metrics", addr);
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "metrics server stopped");
        }
    }
}

async fn metrics_handler(State(metrics): State<Arc<LatencyMetrics>>) -> impl IntoResponse {
    match metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TextEncoder::new().format_type().to_string())],
            body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

impl LatencySink for LatencyMetrics {
    fn observe(&self, kind: OperationKind, latency: Duration) {
        let millis = latency.as_secs_f64() * 1000.0;
        match kind {
            OperationKind::HeightFetch => self.block_number_latency.observe(millis),
            OperationKind::CompactBlockFetch => self
                .block_response_latency
                .with_label_values(&["fullTx_false"])
                .observe(millis),
            OperationKind::ExpandedBlockFetch => self
                .block_response_latency
                .with_label_values(&["fullTx_true"])
                .observe(millis),
            OperationKind::LogsByRangeFetch => self.logs_by_block_number_latency.observe(millis),
        }
    }
}
