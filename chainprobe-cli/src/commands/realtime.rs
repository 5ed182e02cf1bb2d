//! Realtime mode: follow the chain head until interrupted.

use std::sync::Arc;

use chainprobe_verifier::{LatencySink, RealtimeMonitor, RpcClient};
use colored::Colorize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::ProbeConfig;
use crate::output;

pub async fn run(client: RpcClient, sink: Arc<dyn LatencySink>, config: &ProbeConfig) -> i32 {
    // Under --json, stdout carries only the archive report.
    if !config.json {
        output::header("Realtime monitor active");
        output::kv("Poll delay", &format!("{}ms", config.realtime_config.poll_delay.as_millis()));
        output::kv("Settle delay", &format!("{}ms", config.realtime_config.settle_delay.as_millis()));
        println!("{}", "Watching for new blocks... (Ctrl+C to stop)".dimmed());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                // Keep the sender alive so the monitor is not stopped.
                warn!(error = %e, "cannot listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    });

    let mut monitor = RealtimeMonitor::new(client, sink, config.realtime_config);
    monitor.run(shutdown_rx).await;

    if !config.json {
        output::kv("Highest block", &format!("#{}", monitor.highest()));
    }
    0
}
