//! Consistency checks between a block and the logs claimed for it.
//!
//! Two independent checks are provided:
//!
//! - [`check_bloom_coverage`]: advisory count of log addresses that test
//!   positive against the block bloom.
//! - [`check_logs_against_block`]: every log must reference a transaction
//!   present in the block, and an empty log set requires an empty filter
//!   prefix.

use ethers_core::types::{Bloom, Log};
use serde::{Deserialize, Serialize};

use crate::block::BlockSnapshot;
use crate::bloom::{is_member, prefix_is_zero};

/// Number of leading hex characters of the bloom that must be zero when a
/// block reports no logs (380 bits).
pub const EMPTY_BLOOM_PREFIX_NIBBLES: usize = 95;

/// Reason attached when a block has no logs but a populated bloom prefix.
pub const REASON_BLOOM_NOT_EMPTY: &str = "logs absent but filter non-empty";

/// Outcome of a bloom coverage check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloomCoverage {
    /// Number of logs tested
    pub logs_count: usize,
    /// Logs whose address tested positive
    pub in_bloom: usize,
    /// Logs whose address tested negative
    pub missing: usize,
}

/// Outcome of a log/transaction consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the logs are consistent with the block.
    pub valid: bool,
    /// Short reason for an immediate rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// One entry per discrepancy found.
    pub errors: Vec<String>,
    /// Number of logs checked.
    pub logs_count: usize,
    /// Number of transaction hashes found in the block.
    pub tx_hashes_count: usize,
    /// Number of discrepancies (`errors.len()`).
    pub errors_count: usize,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>, logs_count: usize, tx_hashes_count: usize) -> Self {
        Self {
            valid: errors.is_empty(),
            reason: None,
            errors_count: errors.len(),
            errors,
            logs_count,
            tx_hashes_count,
        }
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.valid {
            write!(
                f,
                "VALID ({} logs, {} transactions)",
                self.logs_count, self.tx_hashes_count
            )
        } else if let Some(reason) = &self.reason {
            write!(f, "INVALID: {} ({} transactions)", reason, self.tx_hashes_count)
        } else {
            write!(
                f,
                "INVALID: {} of {} logs unmatched ({} transactions)",
                self.errors_count, self.logs_count, self.tx_hashes_count
            )
        }
    }
}

/// Count how many log addresses test positive against `bloom`.
///
/// Raw membership may disagree with a canonically built bloom, so this
/// never marks logs invalid.
pub fn check_bloom_coverage(logs: &[Log], bloom: &Bloom) -> BloomCoverage {
    let in_bloom = logs
        .iter()
        .filter(|log| is_member(bloom, log.address.as_bytes()))
        .count();

    BloomCoverage {
        logs_count: logs.len(),
        in_bloom,
        missing: logs.len() - in_bloom,
    }
}

/// Check that every log references a transaction contained in `block`.
///
/// An empty log set is only valid if the first
/// [`EMPTY_BLOOM_PREFIX_NIBBLES`] hex characters of the bloom are zero.
pub fn check_logs_against_block(logs: &[Log], block: &BlockSnapshot) -> ValidationResult {
    let tx_hashes = block.transaction_hashes();

    if logs.is_empty() && !prefix_is_zero(&block.logs_bloom, EMPTY_BLOOM_PREFIX_NIBBLES) {
        return ValidationResult {
            valid: false,
            reason: Some(REASON_BLOOM_NOT_EMPTY.to_string()),
            errors: Vec::new(),
            logs_count: 0,
            tx_hashes_count: tx_hashes.len(),
            errors_count: 0,
        };
    }

    let errors = logs
        .iter()
        .enumerate()
        .filter_map(|(i, log)| match log.transaction_hash {
            Some(hash) if tx_hashes.contains(&hash) => None,
            Some(hash) => Some(format!(
                "Log #{} transactionHash {:#x} not found in block.transactions",
                i, hash
            )),
            None => Some(format!(
                "Log #{} transactionHash <missing> not found in block.transactions",
                i
            )),
        })
        .collect();

    ValidationResult::from_errors(errors, logs.len(), tx_hashes.len())
}
