//! Latency recording.

use std::sync::Arc;
use std::time::Duration;

/// The timed operations reported after a successful validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// `eth_blockNumber`
    HeightFetch,
    /// `eth_getBlockByNumber` with transaction hashes only
    CompactBlockFetch,
    /// `eth_getBlockByNumber` with full transaction objects
    ExpandedBlockFetch,
    /// `eth_getLogs` by height range
    LogsByRangeFetch,
}

impl OperationKind {
    /// All kinds, in the order they are recorded.
    pub const ALL: [Self; 4] = [
        Self::HeightFetch,
        Self::CompactBlockFetch,
        Self::ExpandedBlockFetch,
        Self::LogsByRangeFetch,
    ];

    /// Stable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeightFetch => "height_fetch",
            Self::CompactBlockFetch => "compact_block_fetch",
            Self::ExpandedBlockFetch => "expanded_block_fetch",
            Self::LogsByRangeFetch => "logs_by_range_fetch",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write-only histogram recorder.
pub trait LatencySink: Send + Sync {
    /// Record one observation.
    fn observe(&self, kind: OperationKind, latency: Duration);
}

impl<S: LatencySink + ?Sized> LatencySink for Arc<S> {
    fn observe(&self, kind: OperationKind, latency: Duration) {
        (**self).observe(kind, latency)
    }
}

/// Sink that drops every observation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl LatencySink for NoopSink {
    fn observe(&self, _kind: OperationKind, _latency: Duration) {}
}
