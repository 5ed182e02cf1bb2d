//! Run configuration.
//!
//! Command-line arguments (and the `RPC_URL` environment variable) are
//! resolved into a validated [`ProbeConfig`] before anything touches the
//! network.

use std::time::Duration;

use chainprobe_verifier::RealtimeConfig;
use thiserror::Error;

use crate::Cli;

/// Invalid combinations of command-line arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("RPC_URL must be set and non-empty (use --rpc-url or the RPC_URL environment variable)")]
    EmptyRpcUrl,

    #[error("No mode selected. Pass --archive, --realtime, or both")]
    NoMode,

    #[error("--segments must be at least 1")]
    ZeroSegments,
}

/// Validated configuration for one invocation.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub rpc_url: String,
    pub archive: bool,
    pub realtime: bool,
    pub segments: u64,
    pub realtime_config: RealtimeConfig,
    /// `None` disables the metrics exporter.
    pub metrics_port: Option<u16>,
    pub log_json: bool,
    pub json: bool,
}

impl TryFrom<Cli> for ProbeConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let rpc_url = cli.rpc_url.unwrap_or_default().trim().to_string();
        if rpc_url.is_empty() {
            return Err(ConfigError::EmptyRpcUrl);
        }
        if !cli.archive && !cli.realtime {
            return Err(ConfigError::NoMode);
        }
        if cli.segments == 0 {
            return Err(ConfigError::ZeroSegments);
        }

        Ok(Self {
            rpc_url,
            archive: cli.archive,
            realtime: cli.realtime,
            segments: cli.segments,
            realtime_config: RealtimeConfig {
                poll_delay: Duration::from_millis(cli.poll_delay_ms),
                settle_delay: Duration::from_millis(cli.settle_delay_ms),
            },
            metrics_port: (!cli.no_metrics).then_some(cli.metrics_port),
            log_json: cli.log_json,
            json: cli.json,
        })
    }
}
