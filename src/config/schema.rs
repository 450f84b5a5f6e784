//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Public Base mainnet endpoint used when no RPC URL is configured.
pub const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";

/// Token contract the service transfers.
pub const DEFAULT_TOKEN_ADDRESS: &str = "0x69eFD833288605f320d77eB2aB99DDE62919BbC1";

/// Decimal precision of the default token contract.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 2;

/// Native amount sent alongside every token transfer, in ether units.
pub const DEFAULT_NATIVE_TIP: &str = "0.000001";

/// Root configuration for the transfer service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (port, body limits).
    pub listener: ListenerConfig,

    /// Chain connection settings.
    pub blockchain: BlockchainConfig,

    /// Token contract parameters.
    pub token: TokenSettings,

    /// Signing key material. Only ever populated from the environment.
    #[serde(skip)]
    pub signer: SignerConfig,

    /// Deployment mode.
    pub runtime: RuntimeConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_size: 64 * 1024,
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID used for EIP-155 signatures. Fetched from the node when unset.
    pub chain_id: Option<u64>,

    /// Human readable network name reported by the API.
    pub network_name: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a transaction receipt, in seconds.
    pub receipt_timeout_secs: u64,

    /// Interval between receipt polls, in milliseconds.
    pub receipt_poll_interval_ms: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: None,
            network_name: "Base Chain".to_string(),
            rpc_timeout_secs: 30,
            receipt_timeout_secs: 120,
            receipt_poll_interval_ms: 2000,
        }
    }
}

/// Token contract parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenSettings {
    /// ERC-20 contract address.
    pub address: String,

    /// Decimal precision. Trusted as configured; never read from the contract.
    pub decimals: u8,

    /// Native currency sent to the recipient with each transfer (ether units).
    pub native_tip: String,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            address: DEFAULT_TOKEN_ADDRESS.to_string(),
            decimals: DEFAULT_TOKEN_DECIMALS,
            native_tip: DEFAULT_NATIVE_TIP.to_string(),
        }
    }
}

/// Signing key holder.
#[derive(Clone, Default)]
pub struct SignerConfig {
    /// Raw hex private key as read from the environment.
    pub private_key: Option<String>,
}

impl SignerConfig {
    /// Masked view of the key: at most the first four characters plus length.
    pub fn masked(&self) -> Option<(String, usize)> {
        self.private_key.as_ref().map(|key| {
            let key = key.trim();
            (key.chars().take(4).collect(), key.len())
        })
    }
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Deployment mode.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Production (serverless) mode: lazy init, no debug endpoint, no local listener.
    pub production: bool,

    /// Override the initialization strategy implied by `production`.
    pub init: Option<InitMode>,
}

/// How the chain context gets initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitMode {
    /// Initialize at startup; configuration errors abort the process.
    Eager,
    /// Initialize on the first request that needs the chain.
    Lazy,
}

impl RuntimeConfig {
    /// Effective init mode.
    pub fn init_mode(&self) -> InitMode {
        self.init.unwrap_or(if self.production {
            InitMode::Lazy
        } else {
            InitMode::Eager
        })
    }
}

/// Timeout configuration for HTTP handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    ///
    /// Transfers wait for two receipts, so this is generous.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 300 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Emit JSON log lines. Forced on in production mode.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "token_transfer_api=info,tower_http=info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
