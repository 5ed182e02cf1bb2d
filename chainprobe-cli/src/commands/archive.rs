//! Archive mode: sample historical blocks across the chain height.

use chainprobe_verifier::{ArchiveSampler, RpcClient};

use crate::config::ProbeConfig;
use crate::output;

/// Exit code when at least one sampled block was inconsistent.
pub const EXIT_INCONSISTENT: i32 = 3;

pub async fn run(client: RpcClient, config: &ProbeConfig) -> i32 {
    if !config.json {
        output::info(&format!(
            "Archive mode: sampling {} points across the chain",
            config.segments
        ));
    }

    let summary = match ArchiveSampler::new(client, config.segments).run().await {
        Ok(s) => s,
        Err(e) => {
            output::error(&format!("Failed to fetch chain height: {}", e));
            return 1;
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&summary.checks) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                output::error(&format!("Failed to serialize results: {}", e));
                return 1;
            }
        }
    } else {
        output::archive_summary(&summary);
    }

    if summary.inconsistent() > 0 {
        EXIT_INCONSISTENT
    } else {
        0
    }
}
