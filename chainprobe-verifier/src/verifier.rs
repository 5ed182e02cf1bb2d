//! Block verifier: the per-block logic shared by both sampling strategies.
//!
//! For one height it fetches the block twice (expanded and compact) and the
//! logs twice (by height range and by the expanded block's hash), then
//! checks both log sets against the expanded block.

use std::time::Instant;

use chainprobe_core::{check_bloom_coverage, check_logs_against_block};
use tracing::debug;

use crate::error::Result;
use crate::gateway::ChainGateway;
use crate::result::{BlockCheck, FetchLatencies};

/// Block verifier over any [`ChainGateway`].
///
/// # Example
///
/// ```rust,no_run
/// use chainprobe_verifier::{BlockVerifier, RpcClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let verifier = BlockVerifier::new(RpcClient::new("https://ethereum-rpc.publicnode.com")?);
///
///     let check = verifier.check_block(19_000_000).await?;
///     println!("{}", check);
///     Ok(())
/// }
/// ```
pub struct BlockVerifier<G> {
    gateway: G,
}

impl<G: ChainGateway> BlockVerifier<G> {
    /// Create a verifier over `gateway`.
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// The underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Fetch and check the block at `height`.
    ///
    /// The two block fetches run concurrently, then the two log fetches
    /// (the by-hash query needs the expanded block's hash). Validation only
    /// starts once all four have completed.
    ///
    /// # Errors
    ///
    /// The first gateway error from any of the four fetches.
    pub async fn check_block(&self, height: u64) -> Result<BlockCheck> {
        let (expanded, compact) = tokio::try_join!(
            self.gateway.block(height, true),
            self.gateway.block(height, false),
        )?;

        let block = expanded.value;
        let (by_range, by_hash) = tokio::try_join!(
            self.gateway.logs_by_range(height, height),
            self.gateway.logs_by_block_hash(block.hash),
        )?;

        let verify_start = Instant::now();
        let range_result = check_logs_against_block(&by_range.value, &block);
        let hash_result = check_logs_against_block(&by_hash.value, &block);
        let bloom_coverage = check_bloom_coverage(&by_range.value, &block.logs_bloom);

        debug!(
            block = height,
            in_bloom = bloom_coverage.in_bloom,
            missing = bloom_coverage.missing,
            verify_us = verify_start.elapsed().as_micros() as u64,
            "bloom coverage"
        );

        Ok(BlockCheck {
            block_number: height,
            block_hash: block.hash,
            by_range: range_result,
            by_hash: hash_result,
            bloom_coverage,
            latencies: FetchLatencies {
                expanded_block: expanded.latency,
                compact_block: compact.latency,
                logs_by_range: by_range.latency,
                logs_by_hash: by_hash.latency,
            },
        })
    }
}
