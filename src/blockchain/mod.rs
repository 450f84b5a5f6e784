//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key, RPC URL)
//!     → wallet.rs (key validation, signing)
//!     → client.rs (RPC connection with timeouts)
//!     → token.rs (ERC-20 call encoding, balanceOf)
//!     → nonce.rs (per-signer nonce leases)
//!     → transaction.rs (draft, sign, broadcast, confirm)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod nonce;
pub mod token;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{BlockchainClient, ChainRpc};
pub use nonce::{NonceLease, NonceSequencer};
pub use token::TokenContract;
pub use transaction::{ReceiptPolicy, TxBuilder};
pub use types::{
    BlockchainError, BlockchainResult, Payload, ReceiptSummary, SubmittedTransaction,
    TransactionDraft,
};
pub use wallet::Wallet;
