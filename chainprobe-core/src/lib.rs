//! # chainprobe core
//!
//! Pure consistency checks for data served by an Ethereum JSON-RPC
//! endpoint: raw bloom membership, bloom coverage of a log set, and
//! cross-referencing logs against the transactions of their block.
//!
//! No network I/O and no async; the sampling strategies that feed these
//! checks live in `chainprobe-verifier`.
//!
//! ## Quick Start
//!
//! ```rust
//! use chainprobe_core::{check_logs_against_block, BlockSnapshot, TransactionRef};
//! use ethers_core::types::{Bloom, Log, H256, U64};
//!
//! let tx = H256::repeat_byte(1);
//! let block = BlockSnapshot {
//!     hash: H256::repeat_byte(0xAA),
//!     number: U64::from(100),
//!     logs_bloom: Bloom::zero(),
//!     transactions: vec![TransactionRef::Hash(tx)],
//! };
//! let log = Log { transaction_hash: Some(tx), ..Default::default() };
//!
//! let result = check_logs_against_block(&[log], &block);
//! assert!(result.valid);
//! ```

pub mod block;
pub mod bloom;
pub mod error;
pub mod validator;

// Re-export main types for convenience
pub use block::{BlockSnapshot, TransactionRef};
pub use bloom::{is_member, is_member_hex};
pub use error::CoreError;
pub use validator::{check_bloom_coverage, check_logs_against_block, BloomCoverage, ValidationResult};
