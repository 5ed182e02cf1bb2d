//! The remote calls the orchestrators depend on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chainprobe_core::BlockSnapshot;
use ethers_core::types::{Log, H256};

use crate::error::Result;

/// A successful payload together with the time the call took.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    /// The decoded result
    pub value: T,
    /// Round-trip time of the call
    pub latency: Duration,
}

impl<T> Timed<T> {
    /// Wrap a value with its latency.
    pub fn new(value: T, latency: Duration) -> Self {
        Self { value, latency }
    }
}

/// Typed access to the JSON-RPC methods used for consistency probing.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// `eth_blockNumber`
    async fn current_height(&self) -> Result<Timed<u64>>;

    /// `eth_getBlockByNumber`, with full transaction objects when
    /// `include_transactions` is set.
    async fn block(&self, height: u64, include_transactions: bool) -> Result<Timed<BlockSnapshot>>;

    /// `eth_getLogs` over the inclusive height range `[from, to]`.
    async fn logs_by_range(&self, from: u64, to: u64) -> Result<Timed<Vec<Log>>>;

    /// `eth_getLogs` filtered by block hash.
    async fn logs_by_block_hash(&self, hash: H256) -> Result<Timed<Vec<Log>>>;
}

#[async_trait]
impl<G: ChainGateway + ?Sized> ChainGateway for Arc<G> {
    async fn current_height(&self) -> Result<Timed<u64>> {
        (**self).current_height().await
    }

    async fn block(&self, height: u64, include_transactions: bool) -> Result<Timed<BlockSnapshot>> {
        (**self).block(height, include_transactions).await
    }

    async fn logs_by_range(&self, from: u64, to: u64) -> Result<Timed<Vec<Log>>> {
        (**self).logs_by_range(from, to).await
    }

    async fn logs_by_block_hash(&self, hash: H256) -> Result<Timed<Vec<Log>>> {
        (**self).logs_by_block_hash(hash).await
    }
}
