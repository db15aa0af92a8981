//! Shared fixtures for integration tests.

use ledger_bootstrap::{
    BootstrapResult, Config, HandlerRegistry, MemoryLedgerStore, PublicKey, StateBootstrap,
    WalletRepository,
};

pub fn pk(key: &str) -> PublicKey {
    PublicKey::from(key)
}

/// Run a full bootstrap with the default handlers.
pub async fn run_bootstrap(
    store: MemoryLedgerStore,
    config: Config,
) -> BootstrapResult<WalletRepository> {
    let mut bootstrap = StateBootstrap::new(config, store, HandlerRegistry::with_defaults())?;
    bootstrap.run().await
}

/// A store with one delegate (alice, key `02d1`) and one generator/sender
/// (`02aa`) that earned 1000 in rewards and sent two transactions.
pub fn populated_store() -> MemoryLedgerStore {
    let mut store = MemoryLedgerStore::new();
    store.push_reward(pk("02aa"), 600);
    store.push_reward(pk("02aa"), 400);
    store.push_sent_transaction(pk("02aa"), 1, 100, 10);
    store.push_sent_transaction(pk("02aa"), 2, 200, 10);
    store.push_delegate_registration(pk("02d1"), "alice");
    store.push_vote(pk("02aa"), Some(pk("02d1")));
    store
}
