//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Query chain state (gas price, nonces, receipts, contract calls)
//! - Broadcast signed transactions
//! - Handle timeouts and network errors uniformly
//!
//! The pipeline only talks to [`ChainRpc`], so tests can swap in an
//! in-memory chain.

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ReceiptSummary};
use crate::config::BlockchainConfig;
use crate::observability::metrics;

/// Read and write access to an EVM node.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Chain ID reported by the node.
    async fn chain_id(&self) -> BlockchainResult<u64>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// Pending transaction count (next nonce) for an address.
    async fn transaction_count(&self, address: Address) -> BlockchainResult<u64>;

    /// Gas estimate for a transaction request.
    async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64>;

    /// Read-only contract call.
    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes>;

    /// Broadcast a signed transaction, returning its hash.
    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash>;

    /// Receipt of a transaction, `None` while pending.
    async fn transaction_receipt(&self, tx_hash: TxHash)
        -> BlockchainResult<Option<ReceiptSummary>>;
}

/// Alloy-backed RPC client for a single HTTP endpoint.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    config: BlockchainConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// No request is made here; the first RPC call opens the connection.
    pub fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let provider = Arc::new(ProviderBuilder::new().connect_http(url))
            as Arc<dyn Provider + Send + Sync>;

        tracing::info!(rpc_url = %config.rpc_url, "Blockchain client initialized");

        Ok(Self {
            provider,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// Run one RPC future under the configured timeout, recording metrics.
    async fn timed<T, E, F>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: std::fmt::Display + Send,
    {
        let start = Instant::now();
        let result = match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(BlockchainError::Rpc(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(method, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        };
        metrics::record_rpc_call(method, result.is_ok(), start);
        result
    }
}

#[async_trait]
impl ChainRpc for BlockchainClient {
    async fn chain_id(&self) -> BlockchainResult<u64> {
        self.timed("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.timed("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        let fut = async { self.provider.get_transaction_count(address).pending().await };
        self.timed("eth_getTransactionCount", fut).await
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64> {
        let fut = async { self.provider.estimate_gas(tx).await };
        self.timed("eth_estimateGas", fut).await
    }

    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        let fut = async { self.provider.call(tx).await };
        self.timed("eth_call", fut).await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let fut = async {
            self.provider
                .send_raw_transaction(&raw)
                .await
                .map(|pending| *pending.tx_hash())
        };
        self.timed("eth_sendRawTransaction", fut).await
    }

    async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<ReceiptSummary>> {
        let receipt: Option<TransactionReceipt> = self
            .timed(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?;

        Ok(receipt.map(|r| ReceiptSummary {
            transaction_hash: r.transaction_hash,
            gas_used: r.gas_used,
            block_number: r.block_number.unwrap_or_default(),
            success: r.status(),
        }))
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BlockchainConfig {
        BlockchainConfig {
            // Nothing listens on port 9 (discard); calls fail fast.
            rpc_url: "http://127.0.0.1:9".to_string(),
            rpc_timeout_secs: 5,
            ..BlockchainConfig::default()
        }
    }

    #[test]
    fn test_client_creation_is_offline() {
        assert!(BlockchainClient::new(test_config()).is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let err = BlockchainClient::new(config).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_rpc_error() {
        let client = BlockchainClient::new(test_config()).unwrap();
        let result = client.gas_price().await;
        assert!(matches!(
            result,
            Err(BlockchainError::Rpc(_)) | Err(BlockchainError::Timeout(_))
        ));
    }
}
