//! End-to-end reconstruction tests against the public API.

mod common;

use common::{pk, populated_store, run_bootstrap};
use ledger_bootstrap::{
    BootstrapError, Config, DelegateRegistrationHandler, HandlerRegistry, MemoryLedgerStore,
    StateBootstrap, VerifyError, VoteHandler,
};

#[tokio::test]
async fn balances_nonces_and_votes_reconstruct_exactly() {
    let wallets = run_bootstrap(populated_store(), Config::default()).await.unwrap();

    // 600 + 400 rewards, minus (100+10) and (200+10) sent.
    let sender = wallets.find_by_public_key(&pk("02aa")).unwrap();
    assert_eq!(sender.balance(), 680);
    assert_eq!(sender.nonce(), 2);
    assert_eq!(sender.vote, Some(pk("02d1")));

    let alice = wallets.find_by_username("alice").unwrap();
    let attrs = alice.delegate.as_ref().unwrap();
    assert_eq!(attrs.vote_balance, 680);
    assert_eq!(attrs.rank, Some(1));
}

#[tokio::test]
async fn untouched_wallets_end_at_zero() {
    // The delegate never generated a block nor sent a transaction; its
    // wallet exists only because of the registration record.
    let wallets = run_bootstrap(populated_store(), Config::default()).await.unwrap();

    let alice = wallets.find_by_username("alice").unwrap();
    assert_eq!(alice.balance(), 0);
    assert_eq!(alice.nonce(), 0);
}

#[tokio::test]
async fn empty_history_reconstructs_an_empty_directory() {
    let wallets = run_bootstrap(MemoryLedgerStore::new(), Config::default()).await.unwrap();
    assert!(wallets.is_empty());
}

#[tokio::test]
async fn unexplained_negative_balance_fails_the_run() {
    let mut store = MemoryLedgerStore::new();
    store.push_sent_transaction(pk("02aa"), 1, 8, 2);

    let err = run_bootstrap(store, Config::default()).await.unwrap_err();
    assert!(matches!(
        err,
        BootstrapError::Verify(VerifyError::NegativeBalance {
            balance: -10,
            ..
        })
    ));
}

#[tokio::test]
async fn genesis_sender_may_end_negative() {
    let mut store = MemoryLedgerStore::new();
    store.push_sent_transaction(pk("02aa"), 1, 4, 1);

    let config = Config::new().with_genesis_sender(pk("02aa"));
    let wallets = run_bootstrap(store, config).await.unwrap();
    assert_eq!(wallets.find_by_public_key(&pk("02aa")).unwrap().balance(), -5);
}

#[tokio::test]
async fn exception_table_admits_exact_balance_at_final_nonce() {
    let mut store = MemoryLedgerStore::new();
    for nonce in 1..=7 {
        let amount = if nonce == 7 { 2 } else { 0 };
        store.push_sent_transaction(pk("02aa"), nonce, amount, 0);
    }

    let config = Config::new().with_exception(pk("02aa"), 7, -2);
    let wallets = run_bootstrap(store, config).await.unwrap();
    assert_eq!(wallets.find_by_public_key(&pk("02aa")).unwrap().balance(), -2);
}

#[tokio::test]
async fn exception_table_rejects_mismatched_balance() {
    let mut store = MemoryLedgerStore::new();
    store.push_sent_transaction(pk("02aa"), 7, 3, 0);

    let config = Config::new().with_exception(pk("02aa"), 7, -2);
    let err = run_bootstrap(store, config).await.unwrap_err();
    assert!(matches!(
        err,
        BootstrapError::Verify(VerifyError::NegativeBalance {
            balance: -3,
            ..
        })
    ));
}

#[tokio::test]
async fn negative_vote_balance_fails_even_when_every_balance_is_allowed() {
    // The voter is a genesis sender, so its own -5 passes; the delegate's
    // aggregated vote balance is still negative and must fail the run.
    let mut store = MemoryLedgerStore::new();
    store.push_sent_transaction(pk("02aa"), 1, 4, 1);
    store.push_delegate_registration(pk("02d1"), "alice");
    store.push_vote(pk("02aa"), Some(pk("02d1")));

    let config = Config::new().with_genesis_sender(pk("02aa"));
    let err = run_bootstrap(store, config).await.unwrap_err();
    assert!(matches!(
        err,
        BootstrapError::Verify(VerifyError::NegativeVoteBalance {
            vote_balance: -5,
            ..
        })
    ));
}

#[tokio::test]
async fn reversed_handler_order_breaks_the_vote_dependency() {
    // Votes reference delegate registrations; running the vote handler
    // first must fail rather than silently reconstruct different state.
    let mut handlers = HandlerRegistry::new();
    handlers.register(Box::new(VoteHandler));
    handlers.register(Box::new(DelegateRegistrationHandler));

    let mut bootstrap =
        StateBootstrap::new(Config::default(), populated_store(), handlers).unwrap();
    let err = bootstrap.run().await.unwrap_err();
    assert!(matches!(err, BootstrapError::Handler(_)));
}

#[tokio::test]
async fn failed_runs_do_not_publish_a_directory() {
    let mut store = MemoryLedgerStore::new();
    store.push_sent_transaction(pk("02aa"), 1, 1, 0);

    // The error carries the violation; no repository escapes the run.
    let result = run_bootstrap(store, Config::default()).await;
    assert!(result.is_err());
}
