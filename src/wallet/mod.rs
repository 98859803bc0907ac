//! Wallet signing subsystem.
//!
//! # Data Flow
//! ```text
//! PrivateKey (credentials)
//!     → signer.rs (key parsing, address derivation)
//!     → sign_login(message) → SignedMessage { address, message, signature }
//!     → session authenticate call
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - Signature scheme is delegated to alloy's local signer (EIP-191)

pub mod signer;
pub mod types;

pub use signer::Wallet;
pub use types::{SignedMessage, WalletError, WalletResult};
