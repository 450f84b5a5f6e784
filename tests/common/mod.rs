//! Shared utilities for integration and load testing.
#![allow(dead_code)]

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use sdk_rust::TransferApiClient;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use token_transfer_api::blockchain::{BlockchainError, BlockchainResult, ChainRpc, ReceiptSummary};
use token_transfer_api::{AppContext, HttpServer, ServiceConfig, Shutdown};

/// Anvil's first account.
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_SENDER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const RECIPIENT: &str = "0x742d35cc6634c0532925a3b8d44268d9c8c16c99";

pub const MOCK_CHAIN_ID: u64 = 8453;
pub const MOCK_GAS_PRICE: u128 = 1_000_000;
pub const TOKEN_CALL_GAS: u64 = 52_000;
pub const NATIVE_GAS: u64 = 21_000;

/// A raw transaction the mock node accepted.
#[derive(Debug, Clone)]
pub struct SentTx {
    pub hash: TxHash,
    pub nonce: u64,
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub gas_price: Option<u128>,
    pub chain_id: Option<u64>,
    pub block_number: u64,
}

/// In-memory chain with failure injection and call counters.
pub struct MockChain {
    pub balance: Mutex<U256>,
    /// Pending transaction count of the signer.
    pub pending_count: AtomicU64,
    /// When set, accepted transactions do not bump `pending_count`.
    pub lagging_node: AtomicBool,
    /// 1-based index of the broadcast to reject.
    pub fail_broadcast_at: Mutex<Option<usize>>,
    /// 1-based index of the broadcast whose receipt reports a revert.
    pub revert_at: Mutex<Option<usize>>,
    pub fail_calls: AtomicBool,
    pub fail_gas_price: AtomicBool,
    /// Receipts stay pending forever.
    pub never_mine: AtomicBool,
    pub broadcast_delay: Mutex<Duration>,

    pub call_count: AtomicUsize,
    pub chain_id_count: AtomicUsize,
    pub gas_price_count: AtomicUsize,
    pub nonce_reads: AtomicUsize,
    pub broadcast_attempts: AtomicUsize,
    pub sent: Mutex<Vec<SentTx>>,
}

impl MockChain {
    pub fn new(balance: u64, pending_count: u64) -> Arc<Self> {
        Arc::new(Self {
            balance: Mutex::new(U256::from(balance)),
            pending_count: AtomicU64::new(pending_count),
            lagging_node: AtomicBool::new(false),
            fail_broadcast_at: Mutex::new(None),
            revert_at: Mutex::new(None),
            fail_calls: AtomicBool::new(false),
            fail_gas_price: AtomicBool::new(false),
            never_mine: AtomicBool::new(false),
            broadcast_delay: Mutex::new(Duration::ZERO),
            call_count: AtomicUsize::new(0),
            chain_id_count: AtomicUsize::new(0),
            gas_price_count: AtomicUsize::new(0),
            nonce_reads: AtomicUsize::new(0),
            broadcast_attempts: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_broadcast_at(&self, index: usize) {
        *self.fail_broadcast_at.lock().unwrap() = Some(index);
    }

    pub fn revert_at(&self, index: usize) {
        *self.revert_at.lock().unwrap() = Some(index);
    }

    pub fn set_broadcast_delay(&self, delay: Duration) {
        *self.broadcast_delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl ChainRpc for MockChain {
    async fn chain_id(&self) -> BlockchainResult<u64> {
        self.chain_id_count.fetch_add(1, Ordering::SeqCst);
        Ok(MOCK_CHAIN_ID)
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.gas_price_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_gas_price.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("gas price unavailable".into()));
        }
        Ok(MOCK_GAS_PRICE)
    }

    async fn transaction_count(&self, _address: Address) -> BlockchainResult<u64> {
        self.nonce_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.pending_count.load(Ordering::SeqCst))
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64> {
        let has_input = tx.input.input().is_some_and(|data| !data.is_empty());
        Ok(if has_input { TOKEN_CALL_GAS } else { NATIVE_GAS })
    }

    async fn call(&self, _tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_calls.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("execution reverted".into()));
        }
        let balance = *self.balance.lock().unwrap();
        Ok(Bytes::from(balance.to_be_bytes::<32>().to_vec()))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let attempt = self.broadcast_attempts.fetch_add(1, Ordering::SeqCst) + 1;

        let delay = *self.broadcast_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if *self.fail_broadcast_at.lock().unwrap() == Some(attempt) {
            return Err(BlockchainError::Rpc("replacement transaction underpriced".into()));
        }

        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref())
            .map_err(|e| BlockchainError::Rpc(format!("invalid raw transaction: {}", e)))?;

        let mut sent = self.sent.lock().unwrap();
        if sent.iter().any(|tx| tx.nonce == envelope.nonce()) {
            return Err(BlockchainError::Rpc("nonce too low".into()));
        }

        let hash = *envelope.tx_hash();
        let block_number = 1_000 + sent.len() as u64;
        sent.push(SentTx {
            hash,
            nonce: envelope.nonce(),
            to: envelope.to(),
            value: envelope.value(),
            input: envelope.input().clone(),
            gas_price: envelope.gas_price(),
            chain_id: envelope.chain_id(),
            block_number,
        });

        if !self.lagging_node.load(Ordering::SeqCst) {
            self.pending_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(hash)
    }

    async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<ReceiptSummary>> {
        if self.never_mine.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let sent = self.sent.lock().unwrap();
        let revert_at = *self.revert_at.lock().unwrap();
        Ok(sent.iter().enumerate().find(|(_, tx)| tx.hash == tx_hash).map(
            |(index, tx)| ReceiptSummary {
                transaction_hash: tx.hash,
                gas_used: if tx.input.is_empty() { NATIVE_GAS } else { TOKEN_CALL_GAS - 1_000 },
                block_number: tx.block_number,
                success: revert_at != Some(index + 1),
            },
        ))
    }
}

/// Service config pointing at nothing, with fast receipt polling.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.signer.private_key = Some(TEST_PRIVATE_KEY.to_string());
    config.blockchain.rpc_url = "http://127.0.0.1:9".to_string();
    config.blockchain.receipt_poll_interval_ms = 10;
    config.blockchain.receipt_timeout_secs = 2;
    config
}

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub client: TransferApiClient,
    pub context: Arc<AppContext>,
    pub shutdown: Shutdown,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the API with `chain` standing in for the RPC node.
pub async fn spawn_server(config: ServiceConfig, chain: Arc<MockChain>) -> TestServer {
    let context = Arc::new(AppContext::with_rpc(config, chain as Arc<dyn ChainRpc>));
    spawn_with_context(context).await
}

pub async fn spawn_with_context(context: Arc<AppContext>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server = HttpServer::new(context.clone());
    let signal = shutdown.clone();
    tokio::spawn(async move {
        server.run(listener, signal).await.unwrap();
    });

    TestServer {
        client: TransferApiClient::new(&format!("http://{}", addr)),
        context,
        shutdown,
    }
}
