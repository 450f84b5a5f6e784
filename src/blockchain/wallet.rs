//! Wallet management and transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized
//! - The signer is derived once and shared read-only afterwards

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{BlockchainError, BlockchainResult, TransactionDraft};

/// Signing identity derived from the configured private key.
#[derive(Clone)]
pub struct Wallet {
    /// Network wallet wrapping the private key signer.
    wallet: EthereumWallet,
    /// Address derived from the key.
    address: Address,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// Accepts exactly 64 hex characters, optionally `0x`-prefixed and
    /// surrounded by whitespace.
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        if key_hex.len() != 64 {
            return Err(BlockchainError::Wallet(format!(
                "Private key must be 64 hex characters, got {}",
                key_hex.len()
            )));
        }

        if !key_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BlockchainError::Wallet(
                "Private key contains non-hex characters".to_string(),
            ));
        }

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key: {}", e)))?;
        let address = signer.address();

        tracing::info!(address = %address, "Wallet initialized");

        Ok(Self {
            wallet: EthereumWallet::from(signer),
            address,
        })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a draft into raw EIP-2718 bytes ready for `eth_sendRawTransaction`.
    pub async fn sign(&self, draft: TransactionDraft, chain_id: u64) -> BlockchainResult<Bytes> {
        let envelope = draft
            .into_request(chain_id)
            .build(&self.wallet)
            .await
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;

        Ok(Bytes::from(envelope.encoded_2718()))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
