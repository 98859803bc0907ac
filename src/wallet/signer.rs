//! Wallet key loading and login-message signing.
//!
//! # Security
//! - Keys are never logged or serialized
//! - Only the derived address appears in logs

use alloy::primitives::{hex, Address};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::credentials::PrivateKey;
use crate::wallet::types::{SignedMessage, WalletError, WalletResult};

/// A single account's signer.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> WalletResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| WalletError::InvalidKey(format!("{}", e)))?;

        tracing::debug!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Create a wallet from a loaded credential.
    pub fn from_key(key: &PrivateKey) -> WalletResult<Self> {
        Self::from_private_key(key.expose())
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign arbitrary message bytes (EIP-191 personal message).
    pub async fn sign_message(&self, message: &[u8]) -> WalletResult<alloy::signers::Signature> {
        self.signer
            .sign_message(message)
            .await
            .map_err(|e| WalletError::Signing(e.to_string()))
    }

    /// Sign the login message and bundle it with the address, ready for the verify call.
    pub async fn sign_login(&self, message: &str) -> WalletResult<SignedMessage> {
        let signature = self.sign_message(message.as_bytes()).await?;
        Ok(SignedMessage {
            address: self.address(),
            message: message.to_string(),
            signature: hex::encode_prefixed(signature.as_bytes()),
        })
    }
}
