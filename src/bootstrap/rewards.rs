//! Block reward accumulation, the first reconstruction phase.

use crate::error::BootstrapResult;
use crate::store::LedgerStore;
use crate::wallet::WalletRepository;

/// Fold every block reward into its generator's balance.
///
/// Rewards are additive, so record order does not matter. Not idempotent:
/// running this twice against the same repository double-counts every
/// reward, which is why a bootstrap run always starts from a fresh
/// repository.
pub(crate) async fn build_block_rewards(
    store: &dyn LedgerStore,
    wallets: &mut WalletRepository,
) -> BootstrapResult<()> {
    let records = store.block_rewards().await?;
    let count = records.len();

    for record in records {
        let wallet = wallets.find_or_create_by_public_key(&record.generator_public_key);
        wallet.credit(record.reward)?;
    }

    tracing::debug!(records = count, "Block rewards accumulated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLedgerStore;
    use crate::types::PublicKey;

    #[tokio::test]
    async fn rewards_accumulate_per_generator() {
        let mut store = MemoryLedgerStore::new();
        store.push_reward(PublicKey::from("02aa"), 200);
        store.push_reward(PublicKey::from("02bb"), 50);
        store.push_reward(PublicKey::from("02aa"), 200);

        let mut wallets = WalletRepository::new();
        build_block_rewards(&store, &mut wallets).await.unwrap();

        assert_eq!(wallets.find_by_public_key(&PublicKey::from("02aa")).unwrap().balance(), 400);
        assert_eq!(wallets.find_by_public_key(&PublicKey::from("02bb")).unwrap().balance(), 50);
    }

    #[tokio::test]
    async fn accumulation_is_not_idempotent() {
        // Documented precondition: a repository must never be reused across
        // runs. Re-running the fold double-counts.
        let mut store = MemoryLedgerStore::new();
        store.push_reward(PublicKey::from("02aa"), 100);

        let mut wallets = WalletRepository::new();
        build_block_rewards(&store, &mut wallets).await.unwrap();
        build_block_rewards(&store, &mut wallets).await.unwrap();

        assert_eq!(wallets.find_by_public_key(&PublicKey::from("02aa")).unwrap().balance(), 200);
    }
}
