//! Chain-specific types and error definitions.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use thiserror::Error;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not mined within the receipt timeout.
    #[error("Transaction {0} not mined after {1} seconds")]
    ReceiptTimeout(TxHash, u64),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(TxHash),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Signing a transaction draft failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Nonce management error.
    #[error("Nonce error: {0}")]
    Nonce(String),

    /// Contract returned data that does not match the ABI.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// What a transaction carries: contract call data or a plain native value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Call(Bytes),
    Value(U256),
}

/// Fully specified transaction before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub from: Address,
    pub to: Address,
    pub payload: Payload,
    pub gas: u64,
    pub gas_price: u128,
    pub nonce: u64,
}

impl TransactionDraft {
    /// Request used for gas estimation: no gas, price or nonce yet.
    pub fn estimate_request(from: Address, to: Address, payload: &Payload) -> TransactionRequest {
        let tx = TransactionRequest::default().with_from(from).with_to(to);
        match payload {
            Payload::Call(data) => tx.with_input(data.clone()),
            Payload::Value(value) => tx.with_value(*value),
        }
    }

    /// Legacy transaction request ready for signing.
    pub fn into_request(self, chain_id: u64) -> TransactionRequest {
        Self::estimate_request(self.from, self.to, &self.payload)
            .with_gas_limit(self.gas)
            .with_gas_price(self.gas_price)
            .with_nonce(self.nonce)
            .with_chain_id(chain_id)
    }
}

/// The parts of a mined receipt the API reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub transaction_hash: TxHash,
    pub gas_used: u64,
    pub block_number: u64,
    pub success: bool,
}

/// A mined transaction together with the nonce it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub receipt: ReceiptSummary,
    pub nonce: u64,
}
