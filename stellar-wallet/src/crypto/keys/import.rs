//! Secret import
//!
//! Normalizes every accepted key encoding into the canonical 32-byte secret.
//! Decision order on the trimmed input:
//!
//! 1. empty: generate a fresh secp256k1 key
//! 2. 56 characters starting with `S`: Stellar secret seed
//! 3. 64 or 128 hex characters: raw hex, only the first 64 characters are used
//! 4. anything else: WIF
//!
//! A decode failure is always returned to the caller, never replaced by a
//! generated key.

use std::fmt;

use tracing::debug;

use crate::crypto::base58check;
use crate::crypto::strkey::STRKEY_LEN;
use crate::error::{Error, Result};
use super::derivation::Secret;

/// Number of hex characters that make up one secret
const SECRET_HEX_LEN: usize = Secret::LEN * 2;

/// An accepted key encoding, classified but not yet decoded
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum EncodedKey<'a> {
    /// No input: a new key is generated
    Empty,
    /// Stellar "S..." secret seed
    StellarSecret(&'a str),
    /// 64 or 128 hex characters
    Hex(&'a str),
    /// Wallet Import Format (Base58Check)
    Wif(&'a str),
}

impl<'a> EncodedKey<'a> {
    /// Classify trimmed user input
    pub fn classify(input: &'a str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            EncodedKey::Empty
        } else if trimmed.len() == STRKEY_LEN && trimmed.starts_with('S') {
            EncodedKey::StellarSecret(trimmed)
        } else if (trimmed.len() == SECRET_HEX_LEN || trimmed.len() == SECRET_HEX_LEN * 2)
            && trimmed.chars().all(|c| c.is_ascii_hexdigit())
        {
            EncodedKey::Hex(trimmed)
        } else {
            EncodedKey::Wif(trimmed)
        }
    }

    /// Name of the encoding, safe to log
    pub fn kind(&self) -> &'static str {
        match self {
            EncodedKey::Empty => "generated",
            EncodedKey::StellarSecret(_) => "stellar-secret",
            EncodedKey::Hex(_) => "hex",
            EncodedKey::Wif(_) => "wif",
        }
    }

    /// Decode into the canonical secret
    pub fn decode(&self) -> Result<ImportedSecret> {
        let (secret, compressed) = match *self {
            EncodedKey::Empty => (super::bitcoin::generate_secret(), true),
            EncodedKey::StellarSecret(value) => (super::stellar::decode_secret(value)?, true),
            EncodedKey::Hex(value) => {
                if value.len() > SECRET_HEX_LEN {
                    debug!("using the first {} of {} hex characters", SECRET_HEX_LEN, value.len());
                }
                (Secret::from_hex(&value[..SECRET_HEX_LEN])?, true)
            }
            EncodedKey::Wif(value) => {
                let wif = base58check::decode_wif(value)?;
                (wif.secret, wif.compressed)
            }
        };

        Ok(ImportedSecret {
            secret,
            compressed,
            source: self.kind(),
        })
    }
}

impl fmt::Debug for EncodedKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedKey::{}(..)", self.kind())
    }
}

/// A successfully imported secret
#[derive(Debug, Clone)]
pub struct ImportedSecret {
    /// Canonical 32-byte secret
    pub secret: Secret,
    /// Whether the source encoding asked for compressed public keys
    pub compressed: bool,
    /// Which encoding the secret came from
    pub source: &'static str,
}

/// Import a secret from any accepted encoding
///
/// Errors carry the "Failed to recover key" context.
pub fn import_secret(input: &str) -> Result<ImportedSecret> {
    let encoded = EncodedKey::classify(input);
    debug!(kind = encoded.kind(), "importing secret");
    encoded.decode().map_err(Error::key_recovery)
}
