//! The reconstruction pipeline.
//!
//! [`StateBootstrap`] rebuilds the wallet directory from validated history
//! in five fixed phases: block rewards, sent transactions, per-type handler
//! bootstrap, vote aggregation, and consistency verification. Phases run
//! strictly in that order, never concurrently, and each assumes all earlier
//! phases' mutations are in place.
//!
//! The directory is built fresh inside the run and handed to the caller only
//! after verification passes, so a failed or interrupted run can never leak
//! partially reconstructed state. There is no retry: accumulation is not
//! idempotent, so recovering from a failure means a new run.

mod aggregator;
mod rewards;
mod transactions;
mod verifier;


use crate::config::Config;
use crate::error::{BootstrapError, BootstrapResult};
use crate::event_bus::{EventBus, EventReceiver};
use crate::handlers::HandlerRegistry;
use crate::store::LedgerStore;
use crate::types::{BootstrapEvent, BootstrapPhase};
use crate::wallet::WalletRepository;

/// Where a bootstrap run currently stands.
///
/// Transitions are strictly sequential; none may be skipped or retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    NotStarted,
    RewardsBuilt,
    SentTransactionsBuilt,
    HandlersBootstrapped,
    AggregatesBuilt,
    Verified,
    Failed,
}

impl BootstrapState {
    fn name(&self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::RewardsBuilt => "rewards built",
            Self::SentTransactionsBuilt => "sent transactions built",
            Self::HandlersBootstrapped => "handlers bootstrapped",
            Self::AggregatesBuilt => "aggregates built",
            Self::Verified => "verified",
            Self::Failed => "failed",
        }
    }

    /// The only state this one may be entered from.
    fn predecessor(&self) -> Option<Self> {
        match self {
            Self::NotStarted => None,
            Self::RewardsBuilt => Some(Self::NotStarted),
            Self::SentTransactionsBuilt => Some(Self::RewardsBuilt),
            Self::HandlersBootstrapped => Some(Self::SentTransactionsBuilt),
            Self::AggregatesBuilt => Some(Self::HandlersBootstrapped),
            Self::Verified => Some(Self::AggregatesBuilt),
            // Any phase can fail.
            Self::Failed => None,
        }
    }
}

/// Orchestrates one reconstruction run.
///
/// Create it with the store, configuration, and handler registry, subscribe
/// to events if desired, then call [`run`](Self::run) exactly once. The
/// returned repository is the node's authoritative wallet state.
pub struct StateBootstrap<S> {
    config: Config,
    store: S,
    handlers: HandlerRegistry,
    events: EventBus<BootstrapEvent>,
    state: BootstrapState,
}

impl<S: LedgerStore> StateBootstrap<S> {
    pub fn new(config: Config, store: S, handlers: HandlerRegistry) -> BootstrapResult<Self> {
        config.validate()?;
        let events = EventBus::new(config.event_capacity);
        Ok(Self {
            config,
            store,
            handlers,
            events,
            state: BootstrapState::NotStarted,
        })
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Subscribe to run events. Subscribe before calling [`run`](Self::run);
    /// past events are not replayed.
    pub fn subscribe(&self) -> EventReceiver<BootstrapEvent> {
        self.events.subscribe()
    }

    /// Execute the full pipeline and return the reconstructed wallet
    /// directory.
    ///
    /// Runs at most once per instance: a second call, whatever the outcome
    /// of the first, returns [`BootstrapError::InvalidState`]. On any phase
    /// failure the error is emitted to subscribers and returned; the caller
    /// decides whether node startup aborts or continues degraded.
    pub async fn run(&mut self) -> BootstrapResult<WalletRepository> {
        if self.state != BootstrapState::NotStarted {
            return Err(BootstrapError::InvalidState {
                expected: BootstrapState::NotStarted.name(),
                actual: self.state.name(),
            });
        }

        let total_steps = self.handlers.len() + 3;
        tracing::info!(steps = total_steps, "Reconstructing ledger state from history");

        let mut wallets = WalletRepository::new();
        match self.run_phases(&mut wallets, total_steps).await {
            Ok(()) => {
                let delegates = wallets.all_by_username().len();
                tracing::info!(
                    wallets = wallets.len(),
                    delegates,
                    "Ledger state reconstructed and verified"
                );
                self.events.emit(BootstrapEvent::Completed {
                    wallets: wallets.len(),
                    delegates,
                });
                Ok(wallets)
            }
            Err(error) => {
                self.state = BootstrapState::Failed;
                tracing::error!(%error, "Ledger state reconstruction failed");
                self.events.emit(BootstrapEvent::Failed {
                    reason: error.to_string(),
                });
                Err(error)
            }
        }
    }

    async fn run_phases(
        &mut self,
        wallets: &mut WalletRepository,
        total_steps: usize,
    ) -> BootstrapResult<()> {
        rewards::build_block_rewards(&self.store, wallets).await?;
        self.advance(BootstrapState::RewardsBuilt)?;
        self.phase_completed(BootstrapPhase::BlockRewards, 1, total_steps);

        transactions::build_sent_transactions(&self.store, wallets).await?;
        self.advance(BootstrapState::SentTransactionsBuilt)?;
        self.phase_completed(BootstrapPhase::SentTransactions, 2, total_steps);

        // Handlers run one at a time, in registration order; the first
        // failure aborts the rest of the sequence.
        for (index, handler) in self.handlers.iter().enumerate() {
            handler.bootstrap(&self.store, wallets).await?;
            self.phase_completed(BootstrapPhase::Handler(handler.name()), 3 + index, total_steps);
        }
        self.advance(BootstrapState::HandlersBootstrapped)?;

        aggregator::build_aggregates(wallets)?;
        self.advance(BootstrapState::AggregatesBuilt)?;
        self.phase_completed(BootstrapPhase::VoteAggregation, total_steps, total_steps);

        verifier::verify_wallets(wallets, &self.config)?;
        self.advance(BootstrapState::Verified)?;
        tracing::info!(phase = %BootstrapPhase::Verification, "Wallet state is consistent");

        Ok(())
    }

    /// Move to the next state, refusing any transition that would skip one.
    fn advance(&mut self, next: BootstrapState) -> BootstrapResult<()> {
        let expected = next.predecessor().map(|s| s.name()).unwrap_or("none");
        if next.predecessor() != Some(self.state) {
            return Err(BootstrapError::InvalidState {
                expected,
                actual: self.state.name(),
            });
        }
        self.state = next;
        Ok(())
    }

    fn phase_completed(&self, phase: BootstrapPhase, step: usize, total: usize) {
        tracing::info!(%phase, step, total, "Bootstrap phase completed");
        self.events.emit(BootstrapEvent::PhaseCompleted {
            phase,
            step,
            total,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HandlerResult, StoreError, StoreResult};
    use crate::handlers::TransactionHandler;
    use crate::store::{BlockRewardRecord, MemoryLedgerStore, SentTransactionRecord};
    use crate::types::PublicKey;
    use async_trait::async_trait;

    struct FailingStore;

    #[async_trait]
    impl LedgerStore for FailingStore {
        async fn block_rewards(&self) -> StoreResult<Vec<BlockRewardRecord>> {
            Err(StoreError::Backend("connection refused".into()))
        }

        async fn sent_transactions(&self) -> StoreResult<Vec<SentTransactionRecord>> {
            Ok(Vec::new())
        }
    }

    struct NamedHandler(&'static str);

    #[async_trait]
    impl TransactionHandler for NamedHandler {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn bootstrap(
            &self,
            _store: &dyn LedgerStore,
            _wallets: &mut WalletRepository,
        ) -> HandlerResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn successful_run_ends_verified() {
        let mut store = MemoryLedgerStore::new();
        store.push_reward(PublicKey::from("02aa"), 100);

        let mut bootstrap =
            StateBootstrap::new(Config::default(), store, HandlerRegistry::new()).unwrap();
        let wallets = bootstrap.run().await.unwrap();

        assert_eq!(bootstrap.state(), BootstrapState::Verified);
        assert_eq!(wallets.len(), 1);
    }

    #[tokio::test]
    async fn store_failure_aborts_and_marks_failed() {
        let mut bootstrap =
            StateBootstrap::new(Config::default(), FailingStore, HandlerRegistry::new()).unwrap();

        let err = bootstrap.run().await.unwrap_err();
        assert!(matches!(err, BootstrapError::Store(_)));
        assert_eq!(bootstrap.state(), BootstrapState::Failed);
    }

    #[tokio::test]
    async fn a_run_cannot_be_repeated() {
        let mut bootstrap = StateBootstrap::new(
            Config::default(),
            MemoryLedgerStore::new(),
            HandlerRegistry::new(),
        )
        .unwrap();

        bootstrap.run().await.unwrap();
        let err = bootstrap.run().await.unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn progress_counts_handlers_plus_three() {
        let mut handlers = HandlerRegistry::new();
        handlers.register(Box::new(NamedHandler("a")));
        handlers.register(Box::new(NamedHandler("b")));

        let mut bootstrap =
            StateBootstrap::new(Config::default(), MemoryLedgerStore::new(), handlers).unwrap();
        let mut rx = bootstrap.subscribe();
        bootstrap.run().await.unwrap();

        let mut steps = Vec::new();
        while let Some(event) = rx.try_recv() {
            if let BootstrapEvent::PhaseCompleted {
                step,
                total,
                ..
            } = event
            {
                assert_eq!(total, 5);
                steps.push(step);
            }
        }
        assert_eq!(steps, [1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn completion_event_reports_wallet_counts() {
        let mut store = MemoryLedgerStore::new();
        store.push_reward(PublicKey::from("02aa"), 100);
        store.push_delegate_registration(PublicKey::from("02aa"), "alice");

        let mut bootstrap =
            StateBootstrap::new(Config::default(), store, HandlerRegistry::with_defaults())
                .unwrap();
        let mut rx = bootstrap.subscribe();
        bootstrap.run().await.unwrap();

        let mut completed = None;
        while let Some(event) = rx.try_recv() {
            if let BootstrapEvent::Completed {
                wallets,
                delegates,
            } = event
            {
                completed = Some((wallets, delegates));
            }
        }
        assert_eq!(completed, Some((1, 1)));
    }

    #[tokio::test]
    async fn failure_event_is_emitted_to_subscribers() {
        let mut bootstrap =
            StateBootstrap::new(Config::default(), FailingStore, HandlerRegistry::new()).unwrap();
        let mut rx = bootstrap.subscribe();
        let _ = bootstrap.run().await;

        let event = rx.try_recv().unwrap();
        assert!(matches!(event, BootstrapEvent::Failed { .. }));
    }
}
