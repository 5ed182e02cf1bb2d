//! chainprobe CLI
//!
//! Checks that an Ethereum JSON-RPC endpoint serves logs consistent with
//! its blocks, either by sampling history (`--archive`) or by following
//! the chain head (`--realtime`).

mod commands;
mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod output;

use std::sync::Arc;

use chainprobe_verifier::{LatencySink, NoopSink, RpcClient};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::ProbeConfig;

#[derive(Parser, Debug)]
#[command(name = "chainprobe")]
#[command(author = "LogicCrafter")]
#[command(version)]
#[command(about = "chainprobe - JSON-RPC log/block consistency probe", long_about = None)]
pub struct Cli {
    /// JSON-RPC endpoint URL (also read from `.env`)
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Sample blocks evenly across the chain height
    #[arg(long)]
    pub archive: bool,

    /// Follow the chain head and check every new block
    #[arg(long)]
    pub realtime: bool,

    /// Number of archive sample points
    #[arg(long, default_value_t = chainprobe_verifier::archive::DEFAULT_SEGMENTS)]
    pub segments: u64,

    /// Delay before each realtime height poll, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub poll_delay_ms: u64,

    /// Extra delay after a consistent realtime check, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub settle_delay_ms: u64,

    /// Port for the Prometheus /metrics endpoint
    #[arg(long, default_value_t = 3000)]
    pub metrics_port: u16,

    /// Do not start the metrics endpoint
    #[arg(long)]
    pub no_metrics: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Print archive results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(feature = "metrics")]
fn latency_sink(config: &ProbeConfig) -> Arc<dyn LatencySink> {
    let Some(port) = config.metrics_port else {
        return Arc::new(NoopSink);
    };

    match metrics::LatencyMetrics::new() {
        Ok(m) => {
            let m = Arc::new(m);
            tokio::spawn(m.clone().start_http_server(port));
            m
        }
        Err(e) => {
            warn!(error = %e, "metrics disabled");
            Arc::new(NoopSink)
        }
    }
}

#[cfg(not(feature = "metrics"))]
fn latency_sink(_config: &ProbeConfig) -> Arc<dyn LatencySink> {
    Arc::new(NoopSink)
}

async fn run(config: ProbeConfig) -> i32 {
    let client = match RpcClient::new(&config.rpc_url) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to create RPC client: {}", e));
            return 1;
        }
    };

    let sink = latency_sink(&config);
    let mut exit_code = 0;

    // Archive first: the realtime monitor only returns on shutdown.
    if config.archive {
        exit_code = commands::archive::run(client.clone(), &config).await;
    }

    if config.realtime {
        let realtime_code = commands::realtime::run(client, sink, &config).await;
        if exit_code == 0 {
            exit_code = realtime_code;
        }
    }

    exit_code
}

#[tokio::main]
async fn main() {
    // A missing .env is fine; any other load failure is reported below.
    let dotenv_error = dotenvy::dotenv().err().filter(|e| !e.not_found());

    let cli = Cli::parse();

    let config = match ProbeConfig::try_from(cli) {
        Ok(c) => c,
        Err(e) => {
            if let Some(dotenv_error) = &dotenv_error {
                output::error(&format!("Failed to load .env: {}", dotenv_error));
            }
            output::error(&e.to_string());
            std::process::exit(2);
        }
    };

    init_tracing(config.log_json);

    if let Some(e) = dotenv_error {
        warn!(error = %e, "failed to load .env");
    }

    let exit_code = run(config).await;
    std::process::exit(exit_code);
}
