//! Concurrency tests: many transfers against one signer.

use futures_util::future::join_all;
use std::collections::BTreeSet;
use std::time::Duration;

mod common;
use common::{spawn_server, test_config, MockChain, RECIPIENT};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_get_unique_contiguous_nonces() {
    const TRANSFERS: usize = 8;
    const START_NONCE: u64 = 20;

    let chain = MockChain::new(1_000_000, START_NONCE);
    chain.set_broadcast_delay(Duration::from_millis(5));
    let server = spawn_server(test_config(), chain.clone()).await;

    let results = join_all((0..TRANSFERS).map(|_| server.client.transfer("0.01", RECIPIENT))).await;

    let mut nonces = BTreeSet::new();
    for result in results {
        let outcome = result.unwrap();
        assert_eq!(outcome.eth_transfer.nonce, outcome.token_transfer.nonce + 1);
        assert!(nonces.insert(outcome.token_transfer.nonce));
        assert!(nonces.insert(outcome.eth_transfer.nonce));
    }

    let expected: BTreeSet<u64> = (START_NONCE..START_NONCE + 2 * TRANSFERS as u64).collect();
    assert_eq!(nonces, expected);
    assert_eq!(chain.sent().len(), 2 * TRANSFERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_balance_reads() {
    let chain = MockChain::new(250, 0);
    let server = spawn_server(test_config(), chain.clone()).await;

    let results = join_all((0..16).map(|_| server.client.balance(RECIPIENT))).await;
    for result in results {
        assert_eq!(result.unwrap().raw_balance, "250");
    }
    // Initialization happened exactly once.
    assert!(server.context.is_initialized());
}
