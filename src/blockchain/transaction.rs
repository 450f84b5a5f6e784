//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Build drafts with node gas estimation
//! - Sign and broadcast drafts
//! - Wait for the inclusion receipt
//!
//! Gas price and nonce are chosen by the caller; this module never re-reads
//! them.

use alloy::primitives::{Address, TxHash};
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::ChainRpc;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, Payload, ReceiptSummary, TransactionDraft,
};
use crate::blockchain::wallet::Wallet;

/// Receipt polling settings.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Transaction builder bound to one signer and chain.
pub struct TxBuilder<'a> {
    rpc: &'a dyn ChainRpc,
    wallet: &'a Wallet,
    chain_id: u64,
    receipts: ReceiptPolicy,
}

impl<'a> TxBuilder<'a> {
    /// Create a new transaction builder.
    pub fn new(
        rpc: &'a dyn ChainRpc,
        wallet: &'a Wallet,
        chain_id: u64,
        receipts: ReceiptPolicy,
    ) -> Self {
        Self {
            rpc,
            wallet,
            chain_id,
            receipts,
        }
    }

    /// Build a draft, asking the node for the gas limit.
    pub async fn draft(
        &self,
        to: Address,
        payload: Payload,
        gas_price: u128,
        nonce: u64,
    ) -> BlockchainResult<TransactionDraft> {
        let from = self.wallet.address();
        let gas = self
            .rpc
            .estimate_gas(TransactionDraft::estimate_request(from, to, &payload))
            .await?;

        Ok(TransactionDraft {
            from,
            to,
            payload,
            gas,
            gas_price,
            nonce,
        })
    }

    /// Sign and broadcast a draft. Returns once the node accepted it.
    pub async fn broadcast(&self, draft: TransactionDraft) -> BlockchainResult<TxHash> {
        let nonce = draft.nonce;
        let raw = self.wallet.sign(draft, self.chain_id).await?;
        let tx_hash = self.rpc.send_raw_transaction(raw).await?;

        tracing::info!(tx_hash = %tx_hash, nonce, "Transaction broadcast");
        Ok(tx_hash)
    }

    /// Wait for a transaction to be mined. Reverted transactions are errors.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<ReceiptSummary> {
        let result = timeout(self.receipts.timeout, async {
            let mut ticker = interval(self.receipts.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match self.rpc.transaction_receipt(tx_hash).await? {
                    Some(receipt) => return Ok(receipt),
                    None => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                }
            }
        })
        .await;

        let receipt = match result {
            Ok(receipt) => receipt?,
            Err(_) => {
                return Err(BlockchainError::ReceiptTimeout(
                    tx_hash,
                    self.receipts.timeout.as_secs(),
                ))
            }
        };

        if !receipt.success {
            return Err(BlockchainError::Reverted(tx_hash));
        }

        tracing::info!(
            tx_hash = %tx_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction mined"
        );
        Ok(receipt)
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}
