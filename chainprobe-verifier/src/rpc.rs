//! HTTP JSON-RPC gateway.
//!
//! Wraps `ethers_providers::Provider<Http>`, timing each call and
//! classifying failures into [`GatewayError`]. No caching and no retries:
//! every call goes to the endpoint exactly once.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chainprobe_core::BlockSnapshot;
use ethers_core::types::{BlockNumber, Filter, Log, H256, U64};
use ethers_providers::{Http, Provider, ProviderError, RpcError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use crate::error::{GatewayError, Result};
use crate::gateway::{ChainGateway, Timed};

/// JSON-RPC client for a single HTTP endpoint.
///
/// Request ids are assigned by the underlying transport.
///
/// # Example
///
/// ```rust,no_run
/// use chainprobe_verifier::{ChainGateway, RpcClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RpcClient::new("https://ethereum-rpc.publicnode.com")?;
///
///     let head = client.current_height().await?;
///     println!("Head #{} ({:?})", head.value, head.latency);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RpcClient {
    provider: Arc<Provider<Http>>,
}

impl RpcClient {
    /// Create a new RPC client from a URL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEndpoint` if the URL is empty or cannot be parsed.
    pub fn new(rpc_url: &str) -> Result<Self> {
        if rpc_url.trim().is_empty() {
            return Err(GatewayError::InvalidEndpoint("URL is empty".to_string()));
        }

        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| GatewayError::InvalidEndpoint(format!("{}: {}", rpc_url, e)))?;

        Ok(Self {
            provider: Arc::new(provider),
        })
    }

    /// Issue one call and time it. A `null` result becomes `EmptyResult`.
    async fn call<P, R>(&self, method: &'static str, params: P) -> Result<Timed<R>>
    where
        P: Debug + Serialize + Send + Sync,
        R: Debug + Serialize + DeserializeOwned + Send,
    {
        let start = Instant::now();
        let response: Option<R> = self
            .provider
            .request(method, params)
            .await
            .map_err(classify_error)?;
        let latency = start.elapsed();

        trace!(method, latency_ms = latency.as_millis() as u64, "rpc call completed");

        response
            .map(|value| Timed::new(value, latency))
            .ok_or(GatewayError::EmptyResult { method })
    }
}

/// Classify an ethers error into our error type.
fn classify_error(error: ProviderError) -> GatewayError {
    if let Some(response) = error.as_error_response() {
        return GatewayError::Protocol {
            code: response.code,
            message: response.message.clone(),
        };
    }

    GatewayError::Transport(error.to_string())
}

#[async_trait]
impl ChainGateway for RpcClient {
    async fn current_height(&self) -> Result<Timed<u64>> {
        let timed: Timed<U64> = self.call("eth_blockNumber", ()).await?;
        Ok(Timed::new(timed.value.as_u64(), timed.latency))
    }

    async fn block(&self, height: u64, include_transactions: bool) -> Result<Timed<BlockSnapshot>> {
        self.call(
            "eth_getBlockByNumber",
            (U64::from(height), include_transactions),
        )
        .await
    }

    async fn logs_by_range(&self, from: u64, to: u64) -> Result<Timed<Vec<Log>>> {
        let filter = Filter::new()
            .from_block(BlockNumber::Number(from.into()))
            .to_block(BlockNumber::Number(to.into()));
        self.call("eth_getLogs", [filter]).await
    }

    async fn logs_by_block_hash(&self, hash: H256) -> Result<Timed<Vec<Log>>> {
        let filter = Filter::new().at_block_hash(hash);
        self.call("eth_getLogs", [filter]).await
    }
}
