//! Delegate registration handler.

use async_trait::async_trait;

use crate::error::HandlerResult;
use crate::handlers::TransactionHandler;
use crate::store::LedgerStore;
use crate::wallet::WalletRepository;

/// Rebuilds delegate registrations.
///
/// Replays registration records in commit order, marking each sender's
/// wallet as a delegate under its registered username. A later registration
/// by the same sender supersedes the earlier one.
#[derive(Debug, Default)]
pub struct DelegateRegistrationHandler;

#[async_trait]
impl TransactionHandler for DelegateRegistrationHandler {
    fn name(&self) -> &'static str {
        "delegate-registration"
    }

    async fn bootstrap(
        &self,
        store: &dyn LedgerStore,
        wallets: &mut WalletRepository,
    ) -> HandlerResult<()> {
        let records = store.delegate_registrations().await?;
        let count = records.len();

        for record in records {
            wallets.register_delegate(&record.sender_public_key, &record.username);
        }

        tracing::debug!(registrations = count, "Delegate registrations applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLedgerStore;
    use crate::types::PublicKey;

    #[tokio::test]
    async fn registers_delegates_from_history() {
        let mut store = MemoryLedgerStore::new();
        store.push_delegate_registration(PublicKey::from("02aa"), "alice");
        store.push_delegate_registration(PublicKey::from("02bb"), "bob");

        let mut wallets = WalletRepository::new();
        DelegateRegistrationHandler.bootstrap(&store, &mut wallets).await.unwrap();

        assert!(wallets.find_by_username("alice").unwrap().is_delegate());
        assert!(wallets.find_by_username("bob").unwrap().is_delegate());
        assert_eq!(wallets.all_by_username().len(), 2);
    }

    #[tokio::test]
    async fn later_registration_supersedes_earlier() {
        let mut store = MemoryLedgerStore::new();
        store.push_delegate_registration(PublicKey::from("02aa"), "first");
        store.push_delegate_registration(PublicKey::from("02aa"), "second");

        let mut wallets = WalletRepository::new();
        DelegateRegistrationHandler.bootstrap(&store, &mut wallets).await.unwrap();

        assert!(wallets.find_by_username("first").is_none());
        assert!(wallets.find_by_username("second").is_some());
    }
}
