//! Core types shared across the ledger bootstrap library.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Wallet balance in the smallest indivisible unit.
///
/// Signed so that reconstruction can pass through (and verification can
/// detect) negative intermediate results. All arithmetic on balances goes
/// through checked operations; no floating point anywhere.
pub type Balance = i128;

/// Per-sender transaction sequence number.
pub type Nonce = u64;

/// Number of address bytes kept from the public key digest.
const ADDRESS_BYTES: usize = 20;

/// A participant's public key, in its canonical text form.
///
/// The bootstrap treats keys as opaque identifiers; signature semantics are
/// out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(String);

impl PublicKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PublicKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// A wallet address derived from a public key.
///
/// Derivation is SHA-256 over the canonical key text, truncated to 20 bytes
/// and hex encoded. Stable across runs, which is what enumeration order and
/// the verifier rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Derive the address for a public key.
    pub fn from_public_key(key: &PublicKey) -> Self {
        let digest = Sha256::digest(key.as_str().as_bytes());
        Self(hex::encode(&digest[..ADDRESS_BYTES]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A phase of the reconstruction pipeline, for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    /// Block rewards folded into generator balances.
    BlockRewards,
    /// Sent transaction debits and nonces applied.
    SentTransactions,
    /// A transaction type handler finished its bootstrap.
    Handler(&'static str),
    /// Vote balances and delegate ranking computed.
    VoteAggregation,
    /// Consistency verification passed.
    Verification,
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockRewards => f.write_str("block rewards"),
            Self::SentTransactions => f.write_str("sent transactions"),
            Self::Handler(name) => write!(f, "handler {}", name),
            Self::VoteAggregation => f.write_str("vote aggregation"),
            Self::Verification => f.write_str("verification"),
        }
    }
}

/// Events emitted during a bootstrap run.
///
/// Delivered fire-and-forget over the [`EventBus`](crate::event_bus::EventBus);
/// having no subscribers is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapEvent {
    /// A pipeline phase completed. `step`/`total` give coarse progress,
    /// where `total` is the registered handler count plus three.
    PhaseCompleted {
        phase: BootstrapPhase,
        step: usize,
        total: usize,
    },
    /// The full run completed and verification passed.
    Completed {
        wallets: usize,
        delegates: usize,
    },
    /// The run failed. The structured error is returned to the caller;
    /// this carries its rendered form for observers.
    Failed {
        reason: String,
    },
}
