//! Base58Check encoding
//!
//! Used for Wallet Import Format private keys and for P2PKH addresses.
//! Layout: `[version(1)] + [body] + [checksum(4)]` where the checksum is the
//! first four bytes of a double SHA-256 over `version || body`.

use zeroize::Zeroizing;

use crate::crypto::checksum::double_sha256_checksum;
use crate::crypto::keys::Secret;
use crate::error::{Error, Result};

/// Length of the trailing checksum
pub const CHECKSUM_LEN: usize = 4;

/// Minimum decoded WIF length: version + 32-byte key + checksum
pub const MIN_WIF_LEN: usize = 1 + 32 + CHECKSUM_LEN;

/// Marker byte appended to the key when the public key is compressed
const COMPRESSED_FLAG: u8 = 0x01;

/// Encode `payload` as Base58 with a double SHA-256 checksum suffix
pub fn encode_check(payload: &[u8]) -> String {
    let mut data = Zeroizing::new(Vec::with_capacity(payload.len() + CHECKSUM_LEN));
    data.extend_from_slice(payload);
    data.extend_from_slice(&double_sha256_checksum(payload));
    bs58::encode(data.as_slice()).into_string()
}

/// Decode a Base58Check string and return the verified payload (version included)
pub fn decode_check(encoded: &str) -> Result<Vec<u8>> {
    let decoded = decode_base58(encoded)?;
    if decoded.len() <= CHECKSUM_LEN {
        return Err(Error::Format("Base58Check value too short".to_string()));
    }
    verify_checksum(&decoded).map(|payload| payload.to_vec())
}

/// A decoded Wallet Import Format key
#[derive(Debug)]
pub struct WifKey {
    /// Network version byte (0x80 for BTC mainnet, 0xa3 for FLO)
    pub version: u8,
    /// The 32-byte private scalar
    pub secret: Secret,
    /// Whether the key carried the compressed-public-key marker
    pub compressed: bool,
}

/// Decode and verify a WIF private key
pub fn decode_wif(wif: &str) -> Result<WifKey> {
    let decoded = Zeroizing::new(decode_base58(wif)?);

    if decoded.len() < MIN_WIF_LEN {
        return Err(Error::Format("Invalid WIF key: too short".to_string()));
    }

    let payload = verify_checksum(&decoded)?;
    let version = payload[0];
    let mut key = &payload[1..];

    let mut compressed = false;
    if key.len() == 33 && key[32] == COMPRESSED_FLAG {
        key = &key[..32];
        compressed = true;
    }

    let secret = Secret::from_slice(key).map_err(|_| {
        Error::Format(format!(
            "Invalid WIF key: unexpected key length {} (expected 32 or 33 with compression flag)",
            key.len()
        ))
    })?;

    Ok(WifKey { version, secret, compressed })
}

/// Encode a 32-byte scalar as WIF under `version`
pub fn encode_wif(version: u8, secret: &Secret, compressed: bool) -> String {
    let mut payload = Zeroizing::new(Vec::with_capacity(34));
    payload.push(version);
    payload.extend_from_slice(secret.as_bytes());
    if compressed {
        payload.push(COMPRESSED_FLAG);
    }
    encode_check(&payload)
}

fn decode_base58(encoded: &str) -> Result<Vec<u8>> {
    bs58::decode(encoded)
        .into_vec()
        .map_err(|e| Error::Format(format!("Invalid Base58 string: {}", e)))
}

/// Split off and verify the trailing checksum, returning the payload
fn verify_checksum(decoded: &[u8]) -> Result<&[u8]> {
    let (payload, provided) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    let expected = double_sha256_checksum(payload);

    if expected != provided {
        return Err(Error::checksum(&expected, provided));
    }

    Ok(payload)
}
