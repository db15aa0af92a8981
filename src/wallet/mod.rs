//! Wallet entities and the in-memory repository they live in.

mod repository;

pub use repository::WalletRepository;

use crate::error::{BootstrapError, BootstrapResult};
use crate::types::{Address, Balance, Nonce, PublicKey};

/// Delegate capability attached to a wallet.
///
/// Presence of this record is what makes a wallet a delegate; the bootstrap
/// tests for it rather than for any separate flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateAttributes {
    /// Registered delegate username, unique across the ledger.
    pub username: String,
    /// Sum of the balances of all wallets currently voting for this delegate.
    /// Computed by the aggregator after all handlers have bootstrapped.
    pub vote_balance: Balance,
    /// Position in the delegate ranking, 1-based. Assigned by the aggregator.
    pub rank: Option<u32>,
}

impl DelegateAttributes {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            vote_balance: 0,
            rank: None,
        }
    }
}

/// In-memory account state for one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    address: Address,
    public_key: Option<PublicKey>,
    balance: Balance,
    nonce: Nonce,
    /// Present once the wallet has registered as a delegate.
    pub delegate: Option<DelegateAttributes>,
    /// The delegate this wallet currently votes for, if any.
    pub vote: Option<PublicKey>,
}

impl Wallet {
    pub(crate) fn new(address: Address) -> Self {
        Self {
            address,
            public_key: None,
            balance: 0,
            nonce: 0,
            delegate: None,
            vote: None,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    pub(crate) fn set_public_key(&mut self, public_key: PublicKey) {
        self.public_key.get_or_insert(public_key);
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    /// Last-used sequence number of transactions sent by this wallet.
    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    /// Overwrite the nonce with the latest observed value.
    ///
    /// Correctness relies on sent-transaction records arriving in ascending
    /// nonce order per sender; see [`LedgerStore`](crate::store::LedgerStore).
    pub(crate) fn set_nonce(&mut self, nonce: Nonce) {
        self.nonce = nonce;
    }

    /// Add to the balance, failing on arithmetic overflow.
    pub(crate) fn credit(&mut self, amount: u128) -> BootstrapResult<()> {
        let amount = Balance::try_from(amount).map_err(|_| self.overflow())?;
        self.balance = self.balance.checked_add(amount).ok_or_else(|| self.overflow())?;
        Ok(())
    }

    /// Subtract from the balance, failing on arithmetic overflow.
    ///
    /// Going negative is not an error here; the verifier decides later
    /// whether a negative final balance is acceptable.
    pub(crate) fn debit(&mut self, amount: u128) -> BootstrapResult<()> {
        let amount = Balance::try_from(amount).map_err(|_| self.overflow())?;
        self.balance = self.balance.checked_sub(amount).ok_or_else(|| self.overflow())?;
        Ok(())
    }

    pub fn is_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    fn overflow(&self) -> BootstrapError {
        BootstrapError::BalanceOverflow {
            address: self.address.clone(),
        }
    }
}
