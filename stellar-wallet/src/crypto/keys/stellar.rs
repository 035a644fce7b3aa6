//! Stellar key handling
//!
//! Stellar keys are ed25519 key pairs whose seed is the canonical 32-byte
//! secret itself (no extra hashing). Both the account id and the seed are
//! exported as StrKeys.

use ed25519_dalek::{SigningKey, VerifyingKey};

use crate::crypto::strkey::{self, STRKEY_LEN, VERSION_ACCOUNT_ID, VERSION_SECRET_SEED};
use crate::error::{Error, Result};
use super::derivation::{ChainKeyMaterial, Secret};

/// Build an ed25519 signing key directly from a 32-byte seed
pub fn signing_key_from_seed(seed: &[u8]) -> Result<SigningKey> {
    SigningKey::try_from(seed)
        .map_err(|e| Error::Derivation(format!("Invalid ed25519 seed: {}", e)))
}

/// Encode a public key as a "G..." account id
pub fn public_key_to_address(public_key: &VerifyingKey) -> String {
    strkey::encode(VERSION_ACCOUNT_ID, public_key.as_bytes())
}

/// Encode a seed as an "S..." secret
pub fn seed_to_secret(seed: &[u8; 32]) -> String {
    strkey::encode(VERSION_SECRET_SEED, seed)
}

/// Derive the XLM account id and secret export from a seed
pub fn derive_key_material(seed: &[u8]) -> Result<ChainKeyMaterial> {
    let signing_key = signing_key_from_seed(seed)?;

    Ok(ChainKeyMaterial {
        address: public_key_to_address(&signing_key.verifying_key()),
        private_key: seed_to_secret(&signing_key.to_bytes()),
    })
}

/// Decode an "S..." secret into the canonical secret
pub fn decode_secret(secret: &str) -> Result<Secret> {
    strkey::decode(VERSION_SECRET_SEED, secret).map(Secret::from_bytes)
}

/// Decode a "G..." account id into its ed25519 public key
pub fn decode_address(address: &str) -> Result<VerifyingKey> {
    let bytes = strkey::decode(VERSION_ACCOUNT_ID, address)?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| Error::Format(format!("Account id is not a valid ed25519 key: {}", e)))
}

/// Full account id check: alphabet, checksum and version byte
pub fn validate_address(address: &str) -> Result<()> {
    decode_address(address).map(|_| ())
}

/// Full secret seed check: alphabet, checksum and version byte
pub fn validate_secret(secret: &str) -> Result<()> {
    decode_secret(secret).map(|_| ())
}

/// Cheap shape check: 56 characters, "G" prefix, Base32 alphabet
pub fn is_valid_address(address: &str) -> bool {
    has_strkey_shape(address, 'G')
}

/// Cheap shape check: 56 characters, "S" prefix, Base32 alphabet
pub fn is_valid_secret(secret: &str) -> bool {
    has_strkey_shape(secret, 'S')
}

fn has_strkey_shape(value: &str, prefix: char) -> bool {
    value.len() == STRKEY_LEN
        && value.starts_with(prefix)
        && value.chars().all(|c| matches!(c, 'A'..='Z' | '2'..='7'))
}
