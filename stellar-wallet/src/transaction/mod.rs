//! Transaction functionality
//!
//! Detached signing, network-bound transaction signatures and the Horizon
//! client used to read accounts and submit envelopes.

pub mod network;
pub mod provider;
pub mod signer;
pub mod types;

pub use network::{sign_transaction, DecoratedSignature};
pub use provider::{HorizonClient, HorizonConfig};
pub use signer::{sign, verify, Payload};
pub use types::*;
