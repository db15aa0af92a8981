//! Indexed container for all wallets in a reconstruction run.

use std::collections::{BTreeMap, HashMap};

use crate::types::{Address, PublicKey};
use crate::wallet::{DelegateAttributes, Wallet};

/// The wallet directory: owns every wallet and keeps lookup indexes by
/// address (primary), public key, and delegate username.
///
/// The address map is a `BTreeMap` so enumeration order is deterministic,
/// which keeps verification output and ranking tie-breaks reproducible.
///
/// A repository is created fresh for each bootstrap run and is the run's
/// only surviving artifact. A public-key lookup always resolves to the same
/// wallet as the lookup by the corresponding derived address.
#[derive(Debug, Default)]
pub struct WalletRepository {
    wallets: BTreeMap<Address, Wallet>,
    by_public_key: HashMap<PublicKey, Address>,
    by_username: HashMap<String, Address>,
}

impl WalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Find the wallet for a public key, creating it (and its indexes) if
    /// this is the first time the key has been observed.
    pub fn find_or_create_by_public_key(&mut self, public_key: &PublicKey) -> &mut Wallet {
        let address = self
            .by_public_key
            .entry(public_key.clone())
            .or_insert_with(|| Address::from_public_key(public_key))
            .clone();
        let wallet = self
            .wallets
            .entry(address.clone())
            .or_insert_with(|| Wallet::new(address));
        wallet.set_public_key(public_key.clone());
        wallet
    }

    pub fn find_by_address(&self, address: &Address) -> Option<&Wallet> {
        self.wallets.get(address)
    }

    pub fn find_by_public_key(&self, public_key: &PublicKey) -> Option<&Wallet> {
        let address = self.by_public_key.get(public_key)?;
        self.wallets.get(address)
    }

    pub(crate) fn find_mut_by_public_key(&mut self, public_key: &PublicKey) -> Option<&mut Wallet> {
        let address = self.by_public_key.get(public_key)?;
        self.wallets.get_mut(address)
    }

    pub fn find_by_username(&self, username: &str) -> Option<&Wallet> {
        let address = self.by_username.get(username)?;
        self.wallets.get(address)
    }

    /// Mark the wallet for `public_key` as a delegate and index its username.
    ///
    /// Re-registering the same wallet under a new username replaces the old
    /// index entry (history is already validated; the last registration is
    /// authoritative).
    pub(crate) fn register_delegate(&mut self, public_key: &PublicKey, username: &str) {
        let wallet = self.find_or_create_by_public_key(public_key);
        let previous = wallet
            .delegate
            .replace(DelegateAttributes::new(username))
            .map(|attrs| attrs.username);
        let address = wallet.address().clone();

        if let Some(previous) = previous {
            self.by_username.remove(&previous);
        }
        self.by_username.insert(username.to_string(), address);
    }

    /// All wallets in ascending address order.
    pub fn all_by_address(&self) -> impl Iterator<Item = &Wallet> {
        self.wallets.values()
    }

    pub(crate) fn all_by_address_mut(&mut self) -> impl Iterator<Item = &mut Wallet> {
        self.wallets.values_mut()
    }

    /// All delegate wallets keyed by username.
    pub fn all_by_username(&self) -> BTreeMap<&str, &Wallet> {
        self.by_username
            .iter()
            .filter_map(|(username, address)| {
                self.wallets.get(address).map(|w| (username.as_str(), w))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_or_create_is_idempotent_per_key() {
        let mut repo = WalletRepository::new();
        let key = PublicKey::from("02aa");
        let address = repo.find_or_create_by_public_key(&key).address().clone();
        repo.find_or_create_by_public_key(&key);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.find_by_address(&address).unwrap().public_key(), Some(&key));
    }

    #[test]
    fn public_key_and_address_lookups_agree() {
        let mut repo = WalletRepository::new();
        let key = PublicKey::from("02aa");
        repo.find_or_create_by_public_key(&key);

        let by_key = repo.find_by_public_key(&key).unwrap();
        let by_address = repo.find_by_address(&Address::from_public_key(&key)).unwrap();
        assert_eq!(by_key, by_address);
    }

    #[test]
    fn enumeration_is_in_address_order() {
        let mut repo = WalletRepository::new();
        for key in ["02cc", "02aa", "02bb"] {
            repo.find_or_create_by_public_key(&PublicKey::from(key));
        }
        let addresses: Vec<_> = repo.all_by_address().map(|w| w.address().clone()).collect();
        let mut sorted = addresses.clone();
        sorted.sort();
        assert_eq!(addresses, sorted);
    }

    #[test]
    fn register_delegate_indexes_username() {
        let mut repo = WalletRepository::new();
        let key = PublicKey::from("02aa");
        repo.register_delegate(&key, "genesis_1");

        let wallet = repo.find_by_username("genesis_1").unwrap();
        assert!(wallet.is_delegate());
        assert_eq!(wallet.public_key(), Some(&key));
        assert_eq!(repo.all_by_username().len(), 1);
    }

    #[test]
    fn re_registration_replaces_username_index() {
        let mut repo = WalletRepository::new();
        let key = PublicKey::from("02aa");
        repo.register_delegate(&key, "old_name");
        repo.register_delegate(&key, "new_name");

        assert!(repo.find_by_username("old_name").is_none());
        assert!(repo.find_by_username("new_name").is_some());
        assert_eq!(repo.all_by_username().len(), 1);
    }
}
