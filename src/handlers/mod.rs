//! Transaction type handlers and their registry.
//!
//! Each transaction type that leaves derived state behind (delegate
//! registration, voting, …) contributes a handler whose `bootstrap`
//! reconstructs that state from history. Handlers run strictly in
//! registration order, one at a time; a later handler may rely on attributes
//! an earlier handler has set, so the order is part of the contract, not an
//! accident of iteration.

mod delegate;
mod vote;

pub use delegate::DelegateRegistrationHandler;
pub use vote::VoteHandler;

use async_trait::async_trait;

use crate::error::HandlerResult;
use crate::store::LedgerStore;
use crate::wallet::WalletRepository;

/// One-time reconstruction of a transaction type's derived wallet state.
#[async_trait]
pub trait TransactionHandler: Send + Sync {
    /// Stable identifying key, used for progress reporting and errors.
    fn name(&self) -> &'static str;

    /// Rebuild this type's derived state from history.
    ///
    /// Runs after reward and sent-transaction accumulation, so balances and
    /// nonces are already in place. Mutates wallet attributes only.
    async fn bootstrap(
        &self,
        store: &dyn LedgerStore,
        wallets: &mut WalletRepository,
    ) -> HandlerResult<()>;
}

/// Ordered list of registered handlers.
///
/// # Ordering contract
///
/// The default registration order is delegate registration, then votes:
/// [`VoteHandler`] refuses votes for wallets that are not registered
/// delegates, so it must run after [`DelegateRegistrationHandler`]. Custom
/// handlers with dependencies on earlier handlers' attributes must be
/// registered after them.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn TransactionHandler>>,
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in handlers in their required order.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DelegateRegistrationHandler));
        registry.register(Box::new(VoteHandler));
        registry
    }

    /// Append a handler. Registration order is execution order.
    pub fn register(&mut self, handler: Box<dyn TransactionHandler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn TransactionHandler> {
        self.handlers.iter().map(|handler| handler.as_ref())
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter().map(|h| h.name())).finish()
    }
}
