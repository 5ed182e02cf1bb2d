//! Per-block check report.
//!
//! Holds both consistency results for one block (logs fetched by height
//! range and logs fetched by block hash), the advisory bloom coverage,
//! and the latency of every fetch that fed them.

use std::time::Duration;

use chainprobe_core::{BloomCoverage, ValidationResult};
use ethers_core::types::H256;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Round-trip times of the fetches made for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchLatencies {
    /// Block with full transaction objects.
    #[serde(with = "duration_millis")]
    pub expanded_block: Duration,
    /// Block with transaction hashes only.
    #[serde(with = "duration_millis")]
    pub compact_block: Duration,
    /// Logs by height range.
    #[serde(with = "duration_millis")]
    pub logs_by_range: Duration,
    /// Logs by block hash.
    #[serde(with = "duration_millis")]
    pub logs_by_hash: Duration,
}

/// Result of checking one block.
///
/// # Example
///
/// ```rust
/// use chainprobe_core::{BloomCoverage, ValidationResult};
/// use chainprobe_verifier::{BlockCheck, FetchLatencies};
/// use ethers_core::types::H256;
/// use std::time::Duration;
///
/// let ok = ValidationResult {
///     valid: true,
///     reason: None,
///     errors: vec![],
///     logs_count: 3,
///     tx_hashes_count: 2,
///     errors_count: 0,
/// };
/// let check = BlockCheck {
///     block_number: 100,
///     block_hash: H256::zero(),
///     by_range: ok.clone(),
///     by_hash: ok,
///     bloom_coverage: BloomCoverage { logs_count: 3, in_bloom: 0, missing: 3 },
///     latencies: FetchLatencies {
///         expanded_block: Duration::from_millis(40),
///         compact_block: Duration::from_millis(20),
///         logs_by_range: Duration::from_millis(30),
///         logs_by_hash: Duration::from_millis(30),
///     },
/// };
///
/// assert!(check.is_consistent());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockCheck {
    /// The block height that was checked.
    pub block_number: u64,

    /// Hash of the expanded block, used for the by-hash log query.
    pub block_hash: H256,

    /// Logs fetched by height range, checked against the expanded block.
    pub by_range: ValidationResult,

    /// Logs fetched by block hash, checked against the expanded block.
    pub by_hash: ValidationResult,

    /// Raw bloom membership of the range log addresses (advisory).
    pub bloom_coverage: BloomCoverage,

    /// Fetch latencies.
    pub latencies: FetchLatencies,
}

impl BlockCheck {
    /// Both log sets agree with the block.
    pub fn is_consistent(&self) -> bool {
        self.by_range.valid && self.by_hash.valid
    }

    /// Emit the outcome through `tracing`, with every discrepancy on failure.
    pub fn log(&self) {
        if self.is_consistent() {
            info!(
                block = self.block_number,
                logs = self.by_range.logs_count,
                transactions = self.by_range.tx_hashes_count,
                "block consistent"
            );
            return;
        }

        for (source, result) in [("range", &self.by_range), ("hash", &self.by_hash)] {
            if result.valid {
                continue;
            }
            warn!(
                block = self.block_number,
                source,
                reason = result.reason.as_deref().unwrap_or("transaction hash mismatch"),
                errors = result.errors_count,
                "logs validation failed"
            );
            for error in &result.errors {
                warn!(block = self.block_number, source, "{}", error);
            }
        }
    }
}

/// Custom serialization for Duration as milliseconds.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl std::fmt::Display for BlockCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_consistent() {
            write!(
                f,
                "Block {} CONSISTENT ({} logs, {} transactions, bloom {}/{})",
                self.block_number,
                self.by_range.logs_count,
                self.by_range.tx_hashes_count,
                self.bloom_coverage.in_bloom,
                self.bloom_coverage.logs_count
            )
        } else {
            write!(
                f,
                "Block {} INCONSISTENT (by range: {}; by hash: {})",
                self.block_number, self.by_range, self.by_hash
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(valid: bool) -> ValidationResult {
        ValidationResult {
            valid,
            reason: None,
            errors: if valid { vec![] } else { vec!["Log #0 transactionHash <missing> not found in block.transactions".to_string()] },
            logs_count: 1,
            tx_hashes_count: 1,
            errors_count: if valid { 0 } else { 1 },
        }
    }

    fn check(by_range: bool, by_hash: bool) -> BlockCheck {
        BlockCheck {
            block_number: 12345,
            block_hash: H256::repeat_byte(0xAB),
            by_range: result(by_range),
            by_hash: result(by_hash),
            bloom_coverage: BloomCoverage { logs_count: 1, in_bloom: 1, missing: 0 },
            latencies: FetchLatencies {
                expanded_block: Duration::from_millis(12),
                compact_block: Duration::from_millis(7),
                logs_by_range: Duration::from_millis(9),
                logs_by_hash: Duration::from_millis(8),
            },
        }
    }

    #[test]
    fn test_consistency_requires_both() {
        assert!(check(true, true).is_consistent());
        assert!(!check(false, true).is_consistent());
        assert!(!check(true, false).is_consistent());
    }

    #[test]
    fn test_display() {
        assert!(check(true, true).to_string().contains("CONSISTENT"));
        let display = check(true, false).to_string();
        assert!(display.contains("INCONSISTENT"));
        assert!(display.contains("12345"));
    }

    #[test]
    fn test_latencies_serialize_as_millis() {
        let json = serde_json::to_value(check(true, true)).unwrap();
        assert_eq!(json["latencies"]["expandedBlock"], 12);
        assert_eq!(json["latencies"]["logsByHash"], 8);
        assert_eq!(json["blockNumber"], 12345);
    }
}
