//! Sent transaction accumulation, the second reconstruction phase.

use crate::error::{BootstrapError, BootstrapResult};
use crate::store::LedgerStore;
use crate::wallet::WalletRepository;

/// Apply every sent transaction's effect on its sender: overwrite the nonce
/// with the record's and debit `amount + fee` from the balance.
///
/// Relies on the store's ordering contract (ascending sequence per sender);
/// the nonce is overwritten, never compared, so out-of-order input leaves a
/// stale nonce behind undetected. Runs after reward accumulation and before
/// handler bootstrap.
pub(crate) async fn build_sent_transactions(
    store: &dyn LedgerStore,
    wallets: &mut WalletRepository,
) -> BootstrapResult<()> {
    let records = store.sent_transactions().await?;
    let count = records.len();

    for record in records {
        let wallet = wallets.find_or_create_by_public_key(&record.sender_public_key);
        wallet.set_nonce(record.nonce);
        let debit = record
            .amount
            .checked_add(record.fee)
            .ok_or_else(|| BootstrapError::BalanceOverflow {
                address: wallet.address().clone(),
            })?;
        wallet.debit(debit)?;
    }

    tracing::debug!(records = count, "Sent transactions accumulated");
    Ok(())
}
