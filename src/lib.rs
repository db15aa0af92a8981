//! Deterministic reconstruction of a node's in-memory ledger state.
//!
//! At startup, before a node may process new blocks, this library rebuilds
//! the authoritative wallet state (balances, nonces, delegate voting) from
//! the node's immutable, already-validated transaction history, then
//! verifies the result is internally consistent:
//!
//! - Fold block rewards into per-generator balances
//! - Apply sent-transaction debits and nonces to per-sender state
//! - Run each registered transaction type handler's bootstrap, in order
//! - Derive vote balances and a deterministic delegate ranking
//! - Verify no wallet ends in an unexplained negative state
//!
//! All balance arithmetic is exact integer arithmetic; historical anomalies
//! where a sender legitimately went negative are admitted only through a
//! static exception table (or genesis-sender exemption).
//!
//! # Quick Start
//!
//! ```no_run
//! use ledger_bootstrap::{Config, HandlerRegistry, MemoryLedgerStore, StateBootstrap};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // In a real node the store fronts durable block/transaction storage.
//!     let store = MemoryLedgerStore::new();
//!
//!     let config = Config::from_json_str(r#"{
//!         "negative_balances": {},
//!         "genesis_senders": []
//!     }"#)?;
//!
//!     let mut bootstrap = StateBootstrap::new(config, store, HandlerRegistry::with_defaults())?;
//!     let mut events = bootstrap.subscribe();
//!
//!     let wallets = bootstrap.run().await?;
//!     println!("reconstructed {} wallets", wallets.len());
//!
//!     while let Some(event) = events.try_recv() {
//!         println!("{:?}", event);
//!     }
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod handlers;
pub mod logging;
pub mod store;
pub mod types;
pub mod wallet;

// Re-export main types for convenience
pub use bootstrap::{BootstrapState, StateBootstrap};
pub use config::Config;
pub use error::{
    BootstrapError, BootstrapResult, ConfigError, HandlerError, LoggingError, StoreError,
    VerifyError,
};
pub use event_bus::{EventBus, EventReceiver};
pub use handlers::{
    DelegateRegistrationHandler, HandlerRegistry, TransactionHandler, VoteHandler,
};
pub use logging::{init_console_logging, init_logging, LogFileConfig, LoggingConfig, LoggingGuard};
pub use store::{
    BlockRewardRecord, DelegateRegistrationRecord, LedgerStore, MemoryLedgerStore,
    SentTransactionRecord, VoteRecord,
};
pub use types::{Address, Balance, BootstrapEvent, BootstrapPhase, Nonce, PublicKey};
pub use wallet::{DelegateAttributes, Wallet, WalletRepository};

/// Current version of the ledger-bootstrap library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
