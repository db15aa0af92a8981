//! Vote balance aggregation and delegate ranking, the fourth phase.

use std::cmp::Reverse;

use crate::error::{BootstrapError, BootstrapResult};
use crate::types::{Balance, PublicKey};
use crate::wallet::WalletRepository;

/// Derive vote balances and the delegate ranking from the final wallet set.
///
/// Runs once, after every handler has bootstrapped, so both balances and the
/// vote relation are final. Pure over the repository; no store access.
pub(crate) fn build_aggregates(wallets: &mut WalletRepository) -> BootstrapResult<()> {
    build_vote_balances(wallets)?;
    build_delegate_ranking(wallets);
    Ok(())
}

/// Sum each voter's balance into its delegate's vote balance.
fn build_vote_balances(wallets: &mut WalletRepository) -> BootstrapResult<()> {
    for wallet in wallets.all_by_address_mut() {
        if let Some(delegate) = wallet.delegate.as_mut() {
            delegate.vote_balance = 0;
        }
    }

    let votes: Vec<(PublicKey, Balance)> = wallets
        .all_by_address()
        .filter_map(|w| w.vote.clone().map(|delegate| (delegate, w.balance())))
        .collect();

    for (delegate_key, voter_balance) in votes {
        let Some(wallet) = wallets.find_mut_by_public_key(&delegate_key) else {
            // The vote handler only admits registered delegates; a miss here
            // means a custom handler bypassed that check.
            tracing::warn!(delegate = %delegate_key, "Vote for unknown delegate ignored");
            continue;
        };
        let address = wallet.address().clone();
        let Some(delegate) = wallet.delegate.as_mut() else {
            tracing::warn!(delegate = %delegate_key, "Vote for non-delegate wallet ignored");
            continue;
        };
        delegate.vote_balance = delegate
            .vote_balance
            .checked_add(voter_balance)
            .ok_or(BootstrapError::BalanceOverflow {
                address,
            })?;
    }

    Ok(())
}

/// Assign 1-based ranks: descending vote balance, ties broken by ascending
/// public key so the order is total and independent of traversal order.
fn build_delegate_ranking(wallets: &mut WalletRepository) {
    let mut delegates: Vec<(PublicKey, Balance)> = wallets
        .all_by_address()
        .filter(|w| w.is_delegate())
        .filter_map(|w| {
            let vote_balance = w.delegate.as_ref().map(|d| d.vote_balance)?;
            Some((w.public_key()?.clone(), vote_balance))
        })
        .collect();

    delegates.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));

    let count = delegates.len();
    for (index, (key, _)) in delegates.into_iter().enumerate() {
        if let Some(wallet) = wallets.find_mut_by_public_key(&key) {
            if let Some(delegate) = wallet.delegate.as_mut() {
                delegate.rank = Some(index as u32 + 1);
            }
        }
    }

    tracing::debug!(delegates = count, "Delegate ranking computed");
}
