//! Vote handler.

use async_trait::async_trait;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::TransactionHandler;
use crate::store::LedgerStore;
use crate::wallet::WalletRepository;

/// Rebuilds the vote relation.
///
/// Replays vote records in commit order so each sender ends up with its
/// latest vote (or none, after an unvote). Votes may only point at wallets
/// that are already registered delegates, which is why this handler must run
/// after [`DelegateRegistrationHandler`](crate::handlers::DelegateRegistrationHandler).
#[derive(Debug, Default)]
pub struct VoteHandler;

#[async_trait]
impl TransactionHandler for VoteHandler {
    fn name(&self) -> &'static str {
        "vote"
    }

    async fn bootstrap(
        &self,
        store: &dyn LedgerStore,
        wallets: &mut WalletRepository,
    ) -> HandlerResult<()> {
        let records = store.votes().await?;
        let count = records.len();

        for record in records {
            if let Some(delegate) = &record.delegate_public_key {
                let registered = wallets
                    .find_by_public_key(delegate)
                    .map(|w| w.is_delegate())
                    .unwrap_or(false);
                if !registered {
                    return Err(HandlerError::UnknownDelegate {
                        voter: record.sender_public_key,
                        delegate: delegate.clone(),
                    });
                }
            }
            let voter = wallets.find_or_create_by_public_key(&record.sender_public_key);
            voter.vote = record.delegate_public_key;
        }

        tracing::debug!(votes = count, "Votes applied");
        Ok(())
    }
}
