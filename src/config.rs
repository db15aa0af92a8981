//! Configuration for a bootstrap run.
//!
//! Carries the negative-balance exception table and the genesis sender set,
//! both static data capturing known historical anomalies. Loadable from a
//! JSON document or assembled programmatically.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Balance, Nonce, PublicKey};

/// Default capacity of the bootstrap event bus.
const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Configuration for the bootstrap run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Known historical anomalies: sender public key, then the sender's final
    /// nonce, mapping to the exact negative balance allowed at that nonce.
    ///
    /// The verifier compares against the wallet's *current* nonce after
    /// reconstruction; an entry only matches when both nonce and balance are
    /// exactly equal.
    pub negative_balance_exceptions: HashMap<PublicKey, HashMap<Nonce, Balance>>,

    /// Public keys that signed a transaction in the genesis block. Wholly
    /// exempt from the negative-balance check.
    pub genesis_senders: HashSet<PublicKey>,

    /// Buffer capacity of the event bus handed to subscribers.
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            negative_balance_exceptions: HashMap::new(),
            genesis_senders: HashSet::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// JSON document shape for exception configuration.
#[derive(Debug, Deserialize)]
struct ExceptionDocument {
    #[serde(default)]
    negative_balances: HashMap<PublicKey, HashMap<Nonce, Balance>>,
    #[serde(default)]
    genesis_senders: HashSet<PublicKey>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load exception configuration from a JSON reader.
    ///
    /// Expected shape:
    ///
    /// ```json
    /// {
    ///   "negative_balances": { "<publicKey>": { "<nonce>": -2 } },
    ///   "genesis_senders": ["<publicKey>"]
    /// }
    /// ```
    pub fn from_json_reader(reader: impl Read) -> ConfigResult<Self> {
        let doc: ExceptionDocument = serde_json::from_reader(reader)?;
        let config = Self {
            negative_balance_exceptions: doc.negative_balances,
            genesis_senders: doc.genesis_senders,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load exception configuration from a JSON string.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Self::from_json_reader(json.as_bytes())
    }

    /// Add a negative-balance exception entry.
    pub fn with_exception(
        mut self,
        public_key: PublicKey,
        nonce: Nonce,
        balance: Balance,
    ) -> Self {
        self.negative_balance_exceptions
            .entry(public_key)
            .or_default()
            .insert(nonce, balance);
        self
    }

    /// Add a genesis sender.
    pub fn with_genesis_sender(mut self, public_key: PublicKey) -> Self {
        self.genesis_senders.insert(public_key);
        self
    }

    /// Validate the configuration.
    ///
    /// Every exception entry must record a strictly negative balance; an
    /// entry that allows a non-negative balance is meaningless and almost
    /// certainly a transcription error in the exception table.
    pub fn validate(&self) -> ConfigResult<()> {
        for (public_key, by_nonce) in &self.negative_balance_exceptions {
            for (nonce, balance) in by_nonce {
                if *balance >= 0 {
                    return Err(ConfigError::NonNegativeException {
                        public_key: public_key.clone(),
                        nonce: *nonce,
                        balance: *balance,
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up the allowed negative balance for a sender at a nonce.
    pub fn allowed_negative_balance(
        &self,
        public_key: &PublicKey,
        nonce: Nonce,
    ) -> Option<Balance> {
        self.negative_balance_exceptions
            .get(public_key)
            .and_then(|by_nonce| by_nonce.get(&nonce))
            .copied()
    }

    /// Whether a public key signed a genesis transaction.
    pub fn is_genesis_sender(&self, public_key: &PublicKey) -> bool {
        self.genesis_senders.contains(public_key)
    }
}
