//! Stellar network identity and transaction signature payloads
//!
//! Building transactions is left to the caller. Here an already-serialized
//! transaction XDR is hashed and signed for the target network.

use ed25519_dalek::Signer;
use sha2::{Digest, Sha256};

use crate::error::Result;
use super::signer::{self, SIGNATURE_LEN};

/// Passphrase of the public Stellar network
pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Passphrase of the SDF test network
pub const TESTNET_NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// XDR discriminant of `ENVELOPE_TYPE_TX`
const ENVELOPE_TYPE_TX: u32 = 2;

/// Network id: SHA-256 of the passphrase
pub fn network_id(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}

/// Hash signed by every signer of a transaction
pub fn transaction_hash(network_id: &[u8; 32], tx_xdr: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(network_id);
    hasher.update(ENVELOPE_TYPE_TX.to_be_bytes());
    hasher.update(tx_xdr);
    hasher.finalize().into()
}

/// A signature plus the hint Horizon uses to match it to a signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedSignature {
    /// Last four bytes of the signer's public key
    pub hint: [u8; 4],
    /// Detached ed25519 signature of the transaction hash
    pub signature: [u8; SIGNATURE_LEN],
}

/// Sign a serialized transaction for the network named by `passphrase`
pub fn sign_transaction(tx_xdr: &[u8], passphrase: &str, seed_hex: &str) -> Result<DecoratedSignature> {
    let signing_key = signer::signing_key_from_hex(seed_hex)?;
    let hash = transaction_hash(&network_id(passphrase), tx_xdr);

    let mut hint = [0u8; 4];
    hint.copy_from_slice(&signing_key.verifying_key().as_bytes()[28..]);

    Ok(DecoratedSignature {
        hint,
        signature: signing_key.sign(&hash).to_bytes(),
    })
}
