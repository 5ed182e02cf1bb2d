//! Block snapshot as returned by `eth_getBlockByNumber`.
//!
//! Only the fields the consistency checks read are kept. The transaction
//! list may hold bare hashes (compact fetch) or full transaction objects
//! (expanded fetch); both shapes deserialize into [`TransactionRef`].

use std::collections::HashSet;

use ethers_core::types::{Bloom, H256, U64};
use serde::{Deserialize, Serialize};

/// One entry of a block's `transactions` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionRef {
    /// Bare transaction hash.
    Hash(H256),
    /// Transaction object; every field other than `hash` is ignored.
    Object {
        /// Transaction hash
        hash: H256,
    },
}

impl TransactionRef {
    /// The transaction hash, whichever shape the entry has.
    pub fn hash(&self) -> H256 {
        match self {
            Self::Hash(hash) | Self::Object { hash } => *hash,
        }
    }
}

impl From<H256> for TransactionRef {
    fn from(hash: H256) -> Self {
        Self::Hash(hash)
    }
}

/// The parts of a block needed to cross-check its logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSnapshot {
    /// Block hash
    pub hash: H256,
    /// Block number (hex quantity on the wire)
    pub number: U64,
    /// Logs bloom filter
    pub logs_bloom: Bloom,
    /// Transactions, as hashes or objects
    #[serde(default)]
    pub transactions: Vec<TransactionRef>,
}

impl BlockSnapshot {
    /// Block height as an integer.
    pub fn height(&self) -> u64 {
        self.number.as_u64()
    }

    /// Set of transaction hashes contained in the block.
    pub fn transaction_hashes(&self) -> HashSet<H256> {
        self.transactions.iter().map(TransactionRef::hash).collect()
    }
}
