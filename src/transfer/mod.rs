//! Token transfer and balance operations.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → validation.rs (address and amount checks, unit conversion)
//!     → balance.rs   (GET /balance: one balanceOf call)
//!     → pipeline.rs  (POST /transfer: token leg, then native tip leg)
//!     → types.rs     (response payloads)
//! ```
//!
//! Input checks never touch the chain, so bad requests are rejected before
//! the signer is even initialized.

pub mod balance;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use balance::BalanceQuery;
pub use pipeline::{TransferPipeline, TransferPlan};
pub use types::{
    Amount, BalanceReport, NativeTransferLeg, TokenTransferLeg, TransferOutcome, TransferRequest,
};
pub use validation::{from_base_units, is_valid_address, is_valid_amount, to_base_units};
