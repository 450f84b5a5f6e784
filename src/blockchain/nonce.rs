//! Per-signer nonce sequencing.
//!
//! Every transfer holds a [`NonceLease`] from before its balance preflight
//! until its last broadcast, so two requests never read the same nonce.
//! Inside a lease nonces are handed out arithmetically from one chain read.

use tokio::sync::{Mutex, MutexGuard};

/// Serializes nonce allocation for one signer.
#[derive(Debug, Default)]
pub struct NonceSequencer {
    /// Next nonce after the last transaction the node accepted from us.
    next_unused: Mutex<Option<u64>>,
}

impl NonceSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of the signer.
    pub async fn acquire(&self) -> NonceLease<'_> {
        NonceLease {
            guard: self.next_unused.lock().await,
            cursor: None,
        }
    }
}

/// Exclusive right to allocate nonces until dropped.
#[derive(Debug)]
pub struct NonceLease<'a> {
    guard: MutexGuard<'a, Option<u64>>,
    cursor: Option<u64>,
}

impl NonceLease<'_> {
    /// Set the starting point from the chain's pending transaction count.
    ///
    /// A lagging node never moves us behind a nonce we already broadcast.
    /// Returns the first nonce this lease will hand out.
    pub fn sync(&mut self, chain_count: u64) -> u64 {
        let start = match *self.guard {
            Some(local) if local > chain_count => {
                tracing::debug!(chain_count, local, "Node nonce behind local sequence");
                local
            }
            _ => chain_count,
        };
        self.cursor = Some(start);
        start
    }

    /// Hand out the next nonce. Call [`sync`](Self::sync) first.
    pub fn allocate(&mut self) -> Option<u64> {
        let nonce = self.cursor?;
        self.cursor = Some(nonce + 1);
        Some(nonce)
    }

    /// Record that the node accepted a transaction with `nonce`.
    pub fn confirm(&mut self, nonce: u64) {
        let next = nonce + 1;
        if self.guard.map_or(true, |current| next > current) {
            *self.guard = Some(next);
        }
    }
}
