//! Ledger store abstraction.
//!
//! The bootstrap only reads from the store; everything it consumes is
//! already-validated history. Implementations are expected to front whatever
//! durable storage the node uses.

mod memory;

pub use memory::MemoryLedgerStore;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{Nonce, PublicKey};

/// Aggregate block reward credited to one generator.
///
/// May be pre-aggregated per generator or emitted per block; rewards are
/// additive, so either form reconstructs the same balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRewardRecord {
    pub generator_public_key: PublicKey,
    pub reward: u128,
}

/// One sent transaction's effect on its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransactionRecord {
    pub sender_public_key: PublicKey,
    pub nonce: Nonce,
    pub amount: u128,
    pub fee: u128,
}

/// A delegate registration committed to history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateRegistrationRecord {
    pub sender_public_key: PublicKey,
    pub username: String,
}

/// A vote (or unvote) committed to history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub sender_public_key: PublicKey,
    /// `None` revokes the sender's current vote.
    pub delegate_public_key: Option<PublicKey>,
}

/// Read-only queries the bootstrap needs from the node's ledger storage.
///
/// # Ordering contract
///
/// `sent_transactions` must yield records in ascending sequence order per
/// sender (block height, then in-block order). The accumulator overwrites
/// each sender's nonce with the latest record it sees and does not re-sort,
/// so violating this contract silently corrupts nonces.
/// `delegate_registrations` and `votes` must likewise be in commit order, so
/// the latest registration or vote per sender wins. `block_rewards` carries
/// no ordering requirement.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// All block rewards in history, summed or per block.
    async fn block_rewards(&self) -> StoreResult<Vec<BlockRewardRecord>>;

    /// All sent transactions in history, ordered per the trait contract.
    async fn sent_transactions(&self) -> StoreResult<Vec<SentTransactionRecord>>;

    /// All delegate registrations in commit order. Stores backing chains
    /// without delegate registration can rely on the default.
    async fn delegate_registrations(&self) -> StoreResult<Vec<DelegateRegistrationRecord>> {
        Ok(Vec::new())
    }

    /// All votes in commit order. Stores backing chains without voting can
    /// rely on the default.
    async fn votes(&self) -> StoreResult<Vec<VoteRecord>> {
        Ok(Vec::new())
    }
}
