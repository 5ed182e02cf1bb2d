#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chainprobe_core::{BlockSnapshot, TransactionRef};
use chainprobe_verifier::error::Result;
use chainprobe_verifier::{ChainGateway, GatewayError, LatencySink, OperationKind, Timed};
use ethers_core::types::{Address, Bloom, Log, H256, U64};
use tokio::sync::watch;

pub const HEIGHT_LATENCY: Duration = Duration::from_millis(5);
pub const EXPANDED_LATENCY: Duration = Duration::from_millis(40);
pub const COMPACT_LATENCY: Duration = Duration::from_millis(20);
pub const RANGE_LATENCY: Duration = Duration::from_millis(30);
pub const HASH_LATENCY: Duration = Duration::from_millis(25);

pub fn block_hash(height: u64) -> H256 {
    H256::from_low_u64_be(0x00AB_0000_0000 + height)
}

pub fn tx_hash(height: u64, index: u64) -> H256 {
    H256::from_low_u64_be(height * 1000 + index + 1)
}

pub fn log_for(tx: H256) -> Log {
    Log {
        address: Address::repeat_byte(0x11),
        transaction_hash: Some(tx),
        ..Default::default()
    }
}

/// Two transactions, one log each.
pub fn consistent_block(height: u64) -> (BlockSnapshot, Vec<Log>) {
    let txs = [tx_hash(height, 0), tx_hash(height, 1)];
    let block = BlockSnapshot {
        hash: block_hash(height),
        number: U64::from(height),
        logs_bloom: Bloom::zero(),
        transactions: txs.iter().map(|h| TransactionRef::Object { hash: *h }).collect(),
    };
    let logs = txs.iter().map(|h| log_for(*h)).collect();
    (block, logs)
}

#[derive(Debug, Clone, Copy)]
pub enum HeightStep {
    Height(u64),
    Fail,
}

/// In-memory gateway with scripted heights and canned blocks.
#[derive(Default)]
pub struct ScriptedGateway {
    heights: Mutex<VecDeque<HeightStep>>,
    blocks: HashMap<u64, BlockSnapshot>,
    logs_by_range: HashMap<u64, Vec<Log>>,
    logs_by_hash: HashMap<H256, Vec<Log>>,
    failing_blocks: HashSet<u64>,
    failing_compact: HashSet<u64>,
    failing_logs: HashSet<u64>,
    failing_hash_logs: HashSet<H256>,
    calls: Mutex<Vec<String>>,
    on_exhausted: Mutex<Option<watch::Sender<bool>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heights(self, heights: &[u64]) -> Self {
        self.with_steps(heights.iter().map(|h| HeightStep::Height(*h)).collect())
    }

    pub fn with_steps(self, steps: Vec<HeightStep>) -> Self {
        *self.heights.lock().unwrap() = steps.into();
        self
    }

    pub fn with_block(mut self, block: BlockSnapshot, by_range: Vec<Log>, by_hash: Vec<Log>) -> Self {
        let height = block.height();
        self.logs_by_range.insert(height, by_range);
        self.logs_by_hash.insert(block.hash, by_hash);
        self.blocks.insert(height, block);
        self
    }

    pub fn with_consistent_block(self, height: u64) -> Self {
        let (block, logs) = consistent_block(height);
        self.with_block(block, logs.clone(), logs)
    }

    /// The by-hash log set references a transaction the block lacks.
    pub fn with_inconsistent_block(self, height: u64) -> Self {
        let (block, logs) = consistent_block(height);
        let mut by_hash = logs.clone();
        by_hash.push(log_for(H256::repeat_byte(0xEE)));
        self.with_block(block, logs, by_hash)
    }

    pub fn with_failing_block(mut self, height: u64) -> Self {
        self.failing_blocks.insert(height);
        self
    }

    /// Only the compact (hashes-only) block fetch fails.
    pub fn with_failing_compact_block(mut self, height: u64) -> Self {
        self.failing_compact.insert(height);
        self
    }

    pub fn with_failing_logs(mut self, height: u64) -> Self {
        self.failing_logs.insert(height);
        self
    }

    /// Only the by-hash log fetch fails, for the canned block at `height`.
    pub fn with_failing_logs_by_hash(mut self, height: u64) -> Self {
        self.failing_hash_logs.insert(block_hash(height));
        self
    }

    /// Fire `tx` once the height script runs out.
    pub fn shutdown_when_exhausted(self, tx: watch::Sender<bool>) -> Self {
        *self.on_exhausted.lock().unwrap() = Some(tx);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChainGateway for ScriptedGateway {
    async fn current_height(&self) -> Result<Timed<u64>> {
        self.record("eth_blockNumber".to_string());
        let next = self.heights.lock().unwrap().pop_front();
        match next {
            Some(HeightStep::Height(h)) => Ok(Timed::new(h, HEIGHT_LATENCY)),
            Some(HeightStep::Fail) => Err(GatewayError::Transport("connection refused".to_string())),
            None => {
                if let Some(tx) = self.on_exhausted.lock().unwrap().take() {
                    let _ = tx.send(true);
                }
                Err(GatewayError::EmptyResult { method: "eth_blockNumber" })
            }
        }
    }

    async fn block(&self, height: u64, include_transactions: bool) -> Result<Timed<BlockSnapshot>> {
        self.record(format!("eth_getBlockByNumber({height},{include_transactions})"));
        if self.failing_blocks.contains(&height)
            || (!include_transactions && self.failing_compact.contains(&height))
        {
            return Err(GatewayError::Protocol {
                code: -32000,
                message: "header not found".to_string(),
            });
        }

        let block = self
            .blocks
            .get(&height)
            .cloned()
            .ok_or(GatewayError::EmptyResult { method: "eth_getBlockByNumber" })?;

        if include_transactions {
            Ok(Timed::new(block, EXPANDED_LATENCY))
        } else {
            let compact = BlockSnapshot {
                transactions: block
                    .transactions
                    .iter()
                    .map(|t| TransactionRef::Hash(t.hash()))
                    .collect(),
                ..block
            };
            Ok(Timed::new(compact, COMPACT_LATENCY))
        }
    }

    async fn logs_by_range(&self, from: u64, to: u64) -> Result<Timed<Vec<Log>>> {
        self.record(format!("eth_getLogs({from}..{to})"));
        if self.failing_logs.contains(&from) {
            return Err(GatewayError::Transport("HTTP 503".to_string()));
        }

        let logs = self.logs_by_range.get(&from).cloned().unwrap_or_default();
        Ok(Timed::new(logs, RANGE_LATENCY))
    }

    async fn logs_by_block_hash(&self, hash: H256) -> Result<Timed<Vec<Log>>> {
        self.record(format!("eth_getLogs({hash:#x})"));
        if self.failing_hash_logs.contains(&hash) {
            return Err(GatewayError::Protocol {
                code: -32005,
                message: "query timeout exceeded".to_string(),
            });
        }

        let logs = self.logs_by_hash.get(&hash).cloned().unwrap_or_default();
        Ok(Timed::new(logs, HASH_LATENCY))
    }
}

/// Sink that keeps every observation.
#[derive(Default)]
pub struct RecordingSink {
    observations: Mutex<Vec<(OperationKind, Duration)>>,
}

impl RecordingSink {
    pub fn observations(&self) -> Vec<(OperationKind, Duration)> {
        self.observations.lock().unwrap().clone()
    }
}

impl LatencySink for RecordingSink {
    fn observe(&self, kind: OperationKind, latency: Duration) {
        self.observations.lock().unwrap().push((kind, latency));
    }
}
