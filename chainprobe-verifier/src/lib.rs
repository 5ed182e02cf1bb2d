//! # chainprobe verifier
//!
//! Drives the `chainprobe-core` consistency checks against a live
//! Ethereum JSON-RPC endpoint.
//!
//! ## Modes
//!
//! - **Archive**: sample a fixed number of evenly spaced historical blocks
//!   ([`ArchiveSampler`]).
//! - **Realtime**: follow the chain head, check every new highest block and
//!   report backward movement as a reorg ([`RealtimeMonitor`]).
//!
//! Both modes check a block the same way ([`BlockVerifier`]): the logs
//! fetched by height range and by block hash must each reference only
//! transactions contained in the block.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chainprobe_verifier::{ArchiveSampler, RpcClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RpcClient::new("https://ethereum-rpc.publicnode.com")?;
//!     let summary = ArchiveSampler::new(client, 10).run().await?;
//!
//!     println!("Consistent: {}/{}", summary.consistent(), summary.visited.len());
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod error;
pub mod gateway;
pub mod realtime;
pub mod result;
pub mod rpc;
pub mod sink;
pub mod verifier;

// Re-export main types for convenience
pub use archive::{sample_heights, ArchiveSampler, ArchiveSummary};
pub use error::GatewayError;
pub use gateway::{ChainGateway, Timed};
pub use realtime::{HeadTracker, HeadTransition, IterationOutcome, RealtimeConfig, RealtimeMonitor};
pub use result::{BlockCheck, FetchLatencies};
pub use rpc::RpcClient;
pub use sink::{LatencySink, NoopSink, OperationKind};
pub use verifier::BlockVerifier;
