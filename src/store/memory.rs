//! In-memory ledger store implementation.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::store::{
    BlockRewardRecord, DelegateRegistrationRecord, LedgerStore, SentTransactionRecord, VoteRecord,
};
use crate::types::{Nonce, PublicKey};

/// In-memory ledger store.
///
/// Holds pre-loaded history; callers push records in the order the trait
/// contract requires. Primarily useful for tests and for nodes that stage
/// history in memory before bootstrapping.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    rewards: Vec<BlockRewardRecord>,
    transactions: Vec<SentTransactionRecord>,
    registrations: Vec<DelegateRegistrationRecord>,
    votes: Vec<VoteRecord>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reward(&mut self, generator: PublicKey, reward: u128) {
        self.rewards.push(BlockRewardRecord {
            generator_public_key: generator,
            reward,
        });
    }

    pub fn push_sent_transaction(
        &mut self,
        sender: PublicKey,
        nonce: Nonce,
        amount: u128,
        fee: u128,
    ) {
        self.transactions.push(SentTransactionRecord {
            sender_public_key: sender,
            nonce,
            amount,
            fee,
        });
    }

    pub fn push_delegate_registration(&mut self, sender: PublicKey, username: impl Into<String>) {
        self.registrations.push(DelegateRegistrationRecord {
            sender_public_key: sender,
            username: username.into(),
        });
    }

    pub fn push_vote(&mut self, sender: PublicKey, delegate: Option<PublicKey>) {
        self.votes.push(VoteRecord {
            sender_public_key: sender,
            delegate_public_key: delegate,
        });
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn block_rewards(&self) -> StoreResult<Vec<BlockRewardRecord>> {
        Ok(self.rewards.clone())
    }

    async fn sent_transactions(&self) -> StoreResult<Vec<SentTransactionRecord>> {
        Ok(self.transactions.clone())
    }

    async fn delegate_registrations(&self) -> StoreResult<Vec<DelegateRegistrationRecord>> {
        Ok(self.registrations.clone())
    }

    async fn votes(&self) -> StoreResult<Vec<VoteRecord>> {
        Ok(self.votes.clone())
    }
}
