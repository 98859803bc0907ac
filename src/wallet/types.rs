//! Signing types and error definitions.

use alloy::primitives::Address;
use thiserror::Error;

/// Errors that can occur while loading a key or signing.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Invalid private key format.
    #[error("Invalid private key format: {0}")]
    InvalidKey(String),

    /// The signer rejected the message.
    #[error("Message signing failed: {0}")]
    Signing(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Output of signing the login message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    /// Address derived from the signing key.
    pub address: Address,
    /// The exact message that was signed.
    pub message: String,
    /// 0x-prefixed 65-byte signature.
    pub signature: String,
}
