//! Post-reconstruction consistency verification, the final phase.

use crate::config::Config;
use crate::error::{VerifyError, VerifyResult};
use crate::wallet::{Wallet, WalletRepository};

/// Check every wallet for an unexplained negative state.
///
/// Read-only and all-or-nothing: the first violation fails the run. Wallets
/// are checked independently, so enumeration order cannot change the
/// outcome, only which violation is reported first.
pub(crate) fn verify_wallets(wallets: &WalletRepository, config: &Config) -> VerifyResult<()> {
    for wallet in wallets.all_by_address() {
        verify_balance(wallet, config)?;
        verify_vote_balance(wallet)?;
    }
    Ok(())
}

/// A negative balance is allowed only for genesis senders, or when the
/// exception table records exactly this balance at the wallet's current
/// nonce.
fn verify_balance(wallet: &Wallet, config: &Config) -> VerifyResult<()> {
    if wallet.balance() >= 0 {
        return Ok(());
    }

    if let Some(public_key) = wallet.public_key() {
        if config.is_genesis_sender(public_key) {
            return Ok(());
        }
        if config.allowed_negative_balance(public_key, wallet.nonce()) == Some(wallet.balance()) {
            return Ok(());
        }
    }

    Err(VerifyError::NegativeBalance {
        address: wallet.address().clone(),
        public_key: wallet.public_key().cloned(),
        balance: wallet.balance(),
        nonce: wallet.nonce(),
    })
}

/// No delegate may end with a negative aggregated vote balance, whatever
/// the sign of its own balance.
fn verify_vote_balance(wallet: &Wallet) -> VerifyResult<()> {
    let Some(delegate) = wallet.delegate.as_ref() else {
        return Ok(());
    };

    if delegate.vote_balance < 0 {
        return Err(VerifyError::NegativeVoteBalance {
            username: delegate.username.clone(),
            public_key: wallet.public_key().cloned(),
            vote_balance: delegate.vote_balance,
        });
    }

    Ok(())
}
