//! Process-wide application context and signer bootstrap.
//!
//! # Data Flow
//! ```text
//! ServiceConfig
//!     → AppContext::new (no I/O, never fails)
//!     → AppContext::initialize (memoized)
//!         → Wallet::from_private_key
//!         → BlockchainClient::new (or an injected ChainRpc)
//!         → TokenContract bound to the configured address
//!     → Arc<ChainContext> shared read-only by all requests
//! ```
//!
//! Eager deployments call `initialize` during startup; lazy ones let the first
//! request that needs the chain do it. Both paths run the same code.

use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, U256};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::blockchain::{
    BlockchainClient, BlockchainError, BlockchainResult, ChainRpc, NonceSequencer, ReceiptPolicy,
    TokenContract, Wallet,
};
use crate::config::{InitMode, ServiceConfig};
use crate::error::{ServiceError, ServiceResult};

/// Everything needed to talk to the chain as the configured signer.
pub struct ChainContext {
    pub rpc: Arc<dyn ChainRpc>,
    pub wallet: Wallet,
    pub token: TokenContract,
    pub sequencer: NonceSequencer,
    pub receipts: ReceiptPolicy,
    /// Native amount sent with each transfer, as configured (ether units).
    pub native_tip: String,
    pub native_tip_wei: U256,
    configured_chain_id: Option<u64>,
    chain_id: OnceCell<u64>,
}

impl ChainContext {
    /// Derive the signer and bind the token contract.
    pub fn bootstrap(config: &ServiceConfig, rpc: Arc<dyn ChainRpc>) -> ServiceResult<Self> {
        let key = config.signer.private_key.as_deref().ok_or_else(|| {
            ServiceError::Configuration("PRIVATE_KEY environment variable is required".into())
        })?;
        let wallet =
            Wallet::from_private_key(key).map_err(|e| ServiceError::Configuration(e.to_string()))?;

        let token_address: Address = config.token.address.parse().map_err(|e| {
            ServiceError::Configuration(format!(
                "invalid token address '{}': {}",
                config.token.address, e
            ))
        })?;

        let native_tip_wei = parse_ether(&config.token.native_tip).map_err(|e| {
            ServiceError::Configuration(format!(
                "invalid native tip '{}': {}",
                config.token.native_tip, e
            ))
        })?;

        let chain = &config.blockchain;
        Ok(Self {
            rpc,
            wallet,
            token: TokenContract::new(token_address, config.token.decimals),
            sequencer: NonceSequencer::new(),
            receipts: ReceiptPolicy {
                poll_interval: Duration::from_millis(chain.receipt_poll_interval_ms),
                timeout: Duration::from_secs(chain.receipt_timeout_secs),
            },
            native_tip: config.token.native_tip.clone(),
            native_tip_wei,
            configured_chain_id: chain.chain_id,
            chain_id: OnceCell::new(),
        })
    }

    /// Chain ID for signing: configured value, else asked from the node once.
    pub async fn chain_id(&self) -> BlockchainResult<u64> {
        if let Some(id) = self.configured_chain_id {
            return Ok(id);
        }
        self.chain_id
            .get_or_try_init(|| async {
                let id = self.rpc.chain_id().await?;
                tracing::info!(chain_id = id, "Chain ID resolved from node");
                Ok::<_, BlockchainError>(id)
            })
            .await
            .copied()
    }
}

/// Application state shared by every handler.
pub struct AppContext {
    config: Arc<ServiceConfig>,
    rpc_override: Option<Arc<dyn ChainRpc>>,
    chain: OnceCell<Arc<ChainContext>>,
}

impl AppContext {
    /// Context that connects to the configured RPC URL on initialization.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
            rpc_override: None,
            chain: OnceCell::new(),
        }
    }

    /// Context using the given RPC implementation instead of an HTTP provider.
    pub fn with_rpc(config: ServiceConfig, rpc: Arc<dyn ChainRpc>) -> Self {
        Self {
            config: Arc::new(config),
            rpc_override: Some(rpc),
            chain: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn init_mode(&self) -> InitMode {
        self.config.runtime.init_mode()
    }

    /// Whether the chain context has been built.
    pub fn is_initialized(&self) -> bool {
        self.chain.initialized()
    }

    /// Build the chain context once; later calls return the cached one.
    ///
    /// Failed attempts are not cached, so fixing the environment and retrying
    /// works in lazy mode.
    pub async fn initialize(&self) -> ServiceResult<Arc<ChainContext>> {
        self.chain
            .get_or_try_init(|| async {
                let rpc = match &self.rpc_override {
                    Some(rpc) => rpc.clone(),
                    None => Arc::new(
                        BlockchainClient::new(self.config.blockchain.clone())
                            .map_err(|e| ServiceError::Configuration(e.to_string()))?,
                    ) as Arc<dyn ChainRpc>,
                };
                let chain = ChainContext::bootstrap(&self.config, rpc)?;
                tracing::info!(
                    signer = %chain.wallet.address(),
                    token = %chain.token.address,
                    decimals = chain.token.decimals,
                    "Chain context initialized"
                );
                Ok::<_, ServiceError>(Arc::new(chain))
            })
            .await
            .cloned()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("init_mode", &self.init_mode())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
