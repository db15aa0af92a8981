//! Error types for the ledger bootstrap library.

use std::io;
use thiserror::Error;

use crate::types::{Address, Balance, Nonce, PublicKey};

/// Main error type for a bootstrap run.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Balance arithmetic overflow for wallet {address}")]
    BalanceOverflow {
        address: Address,
    },

    #[error("Invalid bootstrap state: expected {expected}, was {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Ledger store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Backend failure: {0}")]
    Backend(String),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Transaction handler bootstrap errors.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Handler {handler} failed: {reason}")]
    Failed {
        handler: &'static str,
        reason: String,
    },

    #[error("Vote for unregistered delegate {delegate} by {voter}")]
    UnknownDelegate {
        voter: PublicKey,
        delegate: PublicKey,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Consistency verification errors. Any of these is fatal to the run.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Negative balance {balance} for wallet {address} at nonce {nonce} with no matching exception")]
    NegativeBalance {
        address: Address,
        public_key: Option<PublicKey>,
        balance: Balance,
        nonce: Nonce,
    },

    #[error("Negative vote balance {vote_balance} for delegate {username}")]
    NegativeVoteBalance {
        username: String,
        public_key: Option<PublicKey>,
        vote_balance: Balance,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Exception balance for {public_key} at nonce {nonce} must be negative, got {balance}")]
    NonNegativeException {
        public_key: PublicKey,
        nonce: Nonce,
        balance: Balance,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Logging-related errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory: {0}")]
    DirectoryCreation(#[from] io::Error),

    #[error("Subscriber initialization failed: {0}")]
    SubscriberInit(String),

    #[error("Log rotation failed: {0}")]
    RotationFailed(String),
}

/// Result type alias for bootstrap operations.
pub type BootstrapResult<T> = std::result::Result<T, BootstrapError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for handler operations.
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Result type alias for verification.
pub type VerifyResult<T> = std::result::Result<T, VerifyError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for logging operations.
pub type LoggingResult<T> = std::result::Result<T, LoggingError>;
