//! Stellar Wallet Core - multi-chain key recovery and Stellar account access
//!
//! One 32-byte secret, imported from a Stellar secret, a WIF or raw hex, is
//! turned into a Bitcoin (P2WPKH), a FLO (P2PKH) and a Stellar (ed25519)
//! identity. The crate also signs payloads with a Stellar seed, reads
//! accounts from Horizon and keeps a local lookup history.

pub mod error;
pub mod config;
pub mod crypto;
pub mod account;
pub mod transaction;

// Re-export commonly used types for convenience
pub use error::{Error, ErrorKind, Result};
pub use crypto::keys::{
    derive_multi_chain, import_secret, recover_multi_chain, ChainOutcome, MultiChainResult, Secret,
};
pub use transaction::signer::sign;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
