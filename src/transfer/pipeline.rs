//! Token transfer pipeline.
//!
//! # Steps
//! ```text
//! TransferRequest
//!     → TransferPlan::validate (fields, amount, address, base units)
//!     → nonce lease (serializes transfers of this signer)
//!     → balance preflight (nothing is sent if it fails)
//!     → gas price, read once for both transactions
//!     → token transfer: estimate, sign, broadcast, receipt   (nonce n)
//!     → native tip:     estimate, sign, broadcast, receipt   (nonce n + 1)
//!     → TransferOutcome
//! ```
//!
//! The token transfer is final once mined; a failing tip transaction does not
//! undo it.

use alloy::primitives::{Address, TxHash, U256};
use std::time::Instant;

use crate::blockchain::{BlockchainError, NonceLease, Payload, SubmittedTransaction, TxBuilder};
use crate::context::ChainContext;
use crate::error::{ServiceError, ServiceResult};
use crate::observability::metrics;
use crate::transfer::types::{
    display_address, Amount, NativeTransferLeg, TokenTransferLeg, TransferOutcome,
    TransferRequest,
};
use crate::transfer::validation::{
    amount_value, from_base_units, is_valid_amount, parse_address, to_base_units,
};

/// A transfer request that passed every input check.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPlan {
    pub recipient: Address,
    /// Recipient as the client wrote it.
    pub wallet_address: String,
    /// Amount as the client wrote it.
    pub amount: Amount,
    pub token_amount: U256,
}

impl TransferPlan {
    /// Input checks, in order. Needs no chain access.
    pub fn validate(request: TransferRequest, decimals: u8) -> ServiceResult<Self> {
        let (amount, wallet_address) = match (request.amount, request.wallet_address) {
            (Some(amount), Some(wallet)) if !amount.is_missing() && !wallet.trim().is_empty() => {
                (amount, wallet)
            }
            _ => {
                return Err(ServiceError::validation(
                    "amount and walletAddress are required",
                ))
            }
        };

        let value = amount_value(&amount)
            .filter(|_| is_valid_amount(&amount))
            .ok_or_else(|| ServiceError::validation("invalid amount, must be a positive number"))?;

        let recipient = parse_address(&wallet_address)
            .ok_or_else(|| ServiceError::validation("invalid wallet address"))?;

        let token_amount = to_base_units(value, decimals)
            .ok_or_else(|| ServiceError::validation("amount is out of range"))?;

        Ok(Self {
            recipient,
            wallet_address,
            amount,
            token_amount,
        })
    }
}

/// Runs validated transfers against one chain context.
pub struct TransferPipeline<'a> {
    chain: &'a ChainContext,
    network: &'a str,
}

impl<'a> TransferPipeline<'a> {
    pub fn new(chain: &'a ChainContext, network: &'a str) -> Self {
        Self { chain, network }
    }

    /// Execute the transfer. Records the outcome in metrics.
    pub async fn execute(&self, plan: TransferPlan) -> ServiceResult<TransferOutcome> {
        let start = Instant::now();
        let result = self.run(plan).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(ServiceError::InsufficientBalance { .. }) => "insufficient_balance",
            Err(_) => "failed",
        };
        metrics::record_transfer(outcome, start);
        result
    }

    async fn run(&self, plan: TransferPlan) -> ServiceResult<TransferOutcome> {
        let chain = self.chain;
        let rpc = chain.rpc.as_ref();
        let sender = chain.wallet.address();

        let mut lease = chain.sequencer.acquire().await;

        let balance = chain
            .token
            .balance_of(rpc, sender)
            .await
            .map_err(ServiceError::transaction)?;
        if balance < plan.token_amount {
            tracing::warn!(
                available = %balance,
                requested = %plan.token_amount,
                "Insufficient token balance"
            );
            return Err(ServiceError::InsufficientBalance {
                available: from_base_units(balance, chain.token.decimals),
                requested: plan.amount,
            });
        }

        let gas_price = rpc.gas_price().await.map_err(ServiceError::transaction)?;
        let calldata = chain
            .token
            .transfer_calldata(plan.recipient, plan.token_amount);

        let chain_count = rpc
            .transaction_count(sender)
            .await
            .map_err(ServiceError::transaction)?;
        let first_nonce = lease.sync(chain_count);

        let chain_id = chain.chain_id().await.map_err(ServiceError::transaction)?;
        let builder = TxBuilder::new(rpc, &chain.wallet, chain_id, chain.receipts);

        tracing::info!(
            from = %sender,
            to = %plan.recipient,
            token_amount = %plan.token_amount,
            gas_price,
            nonce = first_nonce,
            "Starting token transfer"
        );

        let token_tx = submit(
            &builder,
            &mut lease,
            chain.token.address,
            Payload::Call(calldata),
            gas_price,
        )
        .await
        .map_err(ServiceError::transaction)?;

        let tip_tx = submit(
            &builder,
            &mut lease,
            plan.recipient,
            Payload::Value(chain.native_tip_wei),
            gas_price,
        )
        .await
        .map_err(|source| {
            tracing::error!(
                token_tx = %token_tx.receipt.transaction_hash,
                error = %source,
                "Native transfer failed after token transfer was mined"
            );
            ServiceError::Transaction {
                source,
                token_tx: Some(token_tx.receipt.transaction_hash),
            }
        })?;

        tracing::info!(
            token_tx = %token_tx.receipt.transaction_hash,
            native_tx = %tip_tx.receipt.transaction_hash,
            "Transfer complete"
        );

        Ok(TransferOutcome {
            success: true,
            token_transfer: TokenTransferLeg::new(&token_tx, plan.amount, plan.token_amount),
            eth_transfer: NativeTransferLeg::new(&tip_tx, &chain.native_tip, chain.native_tip_wei),
            from: display_address(sender),
            to: plan.wallet_address,
            network: self.network.to_string(),
            total_transactions: 2,
        })
    }
}

/// Draft, broadcast and confirm one transaction with the lease's next nonce.
async fn submit(
    builder: &TxBuilder<'_>,
    lease: &mut NonceLease<'_>,
    to: Address,
    payload: Payload,
    gas_price: u128,
) -> Result<SubmittedTransaction, BlockchainError> {
    let nonce = lease
        .allocate()
        .ok_or_else(|| BlockchainError::Nonce("lease used before sync".into()))?;

    let draft = builder.draft(to, payload, gas_price, nonce).await?;
    let tx_hash: TxHash = builder.broadcast(draft).await?;
    lease.confirm(nonce);

    let receipt = builder.wait_for_receipt(tx_hash).await?;
    Ok(SubmittedTransaction { receipt, nonce })
}
