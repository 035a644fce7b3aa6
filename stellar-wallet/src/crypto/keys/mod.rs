//! Key import, derivation and management
//!
//! This module turns one canonical secret into key material for the
//! secp256k1 chains (BTC, FLO) and the ed25519 chain (XLM).

pub mod bitcoin;
pub mod stellar;
mod derivation;
mod import;

pub use derivation::*;
pub use import::*;
