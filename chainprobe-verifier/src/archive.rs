//! Archive sampling.
//!
//! Splits the chain's current height into evenly spaced points and checks
//! the block at each one. A failed sample is logged and skipped; the run
//! always visits every point.

use tracing::{info, warn};

use crate::error::Result;
use crate::gateway::ChainGateway;
use crate::result::BlockCheck;
use crate::verifier::BlockVerifier;

/// Default number of sample points.
pub const DEFAULT_SEGMENTS: u64 = 10;

/// Heights sampled for a chain of height `tip`: `floor(i * tip / segments)`
/// for `i` in `1..=segments`, ascending. Height zero is never the first
/// point unless `tip < segments`; the tip itself is always the last.
pub fn sample_heights(tip: u64, segments: u64) -> Vec<u64> {
    if segments == 0 {
        return Vec::new();
    }

    (1..=segments)
        .map(|i| ((i as u128 * tip as u128) / segments as u128) as u64)
        .collect()
}

/// Outcome of one archive run.
#[derive(Debug, Clone, Default)]
pub struct ArchiveSummary {
    /// Chain height the samples were derived from.
    pub tip: u64,
    /// Every sampled height, in visiting order.
    pub visited: Vec<u64>,
    /// Checks that completed, consistent or not.
    pub checks: Vec<BlockCheck>,
    /// Heights skipped because a fetch failed.
    pub skipped: Vec<u64>,
}

impl ArchiveSummary {
    /// Number of consistent blocks.
    pub fn consistent(&self) -> usize {
        self.checks.iter().filter(|c| c.is_consistent()).count()
    }

    /// Number of blocks with at least one discrepancy.
    pub fn inconsistent(&self) -> usize {
        self.checks.len() - self.consistent()
    }
}

/// Samples a fixed number of historical blocks.
pub struct ArchiveSampler<G> {
    verifier: BlockVerifier<G>,
    segments: u64,
}

impl<G: ChainGateway> ArchiveSampler<G> {
    /// Create a sampler with `segments` sample points.
    pub fn new(gateway: G, segments: u64) -> Self {
        Self {
            verifier: BlockVerifier::new(gateway),
            segments,
        }
    }

    /// Run one pass over the chain.
    ///
    /// # Errors
    ///
    /// Only if the initial height fetch fails; there is nothing to sample
    /// without it. Per-sample failures are logged and counted as skipped.
    pub async fn run(&self) -> Result<ArchiveSummary> {
        let head = self.verifier.gateway().current_height().await?;
        let tip = head.value;
        info!(tip, segments = self.segments, "archive sampling started");

        let mut summary = ArchiveSummary {
            tip,
            ..Default::default()
        };

        for height in sample_heights(tip, self.segments) {
            summary.visited.push(height);

            match self.verifier.check_block(height).await {
                Ok(check) => {
                    check.log();
                    summary.checks.push(check);
                }
                Err(e) => {
                    warn!(block = height, kind = e.kind(), error = %e, "sample skipped");
                    summary.skipped.push(height);
                }
            }
        }

        info!(
            visited = summary.visited.len(),
            consistent = summary.consistent(),
            inconsistent = summary.inconsistent(),
            skipped = summary.skipped.len(),
            "archive sampling finished"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_heights_even_split() {
        assert_eq!(
            sample_heights(1000, 10),
            vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]
        );
    }

    #[test]
    fn test_sample_heights_floor() {
        assert_eq!(sample_heights(25, 4), vec![6, 12, 18, 25]);
    }

    #[test]
    fn test_sample_heights_small_chain() {
        assert_eq!(sample_heights(3, 5), vec![0, 1, 1, 2, 3]);
    }

    #[test]
    fn test_sample_heights_no_overflow() {
        let heights = sample_heights(u64::MAX, 10);
        assert_eq!(heights.len(), 10);
        assert_eq!(*heights.last().unwrap(), u64::MAX);
    }

    #[test]
    fn test_zero_segments() {
        assert!(sample_heights(1000, 0).is_empty());
    }
}
