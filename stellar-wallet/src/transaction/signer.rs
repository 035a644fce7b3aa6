//! Detached ed25519 signing with a Stellar seed

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use zeroize::Zeroizing;

use crate::crypto::keys::stellar;
use crate::error::{Error, Result};

/// Length of a detached ed25519 signature
pub const SIGNATURE_LEN: usize = 64;

/// Bytes to be signed, either raw or base64 encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Raw bytes
    Bytes(&'a [u8]),
    /// Standard base64 text
    Base64(&'a str),
}

impl<'a> Payload<'a> {
    /// Resolve the payload into the bytes that get signed
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Payload::Bytes(bytes) => Ok(bytes.to_vec()),
            Payload::Base64(text) => STANDARD
                .decode(text.trim())
                .map_err(|e| Error::Format(format!("Invalid base64 payload: {}", e))),
        }
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Payload::Base64(text)
    }
}

/// Sign `payload` with the ed25519 key whose seed is `seed_hex`
///
/// The seed is expected to be already validated; only its first 64 hex
/// characters are used. Returns the 64-byte detached signature.
pub fn sign<'a>(payload: impl Into<Payload<'a>>, seed_hex: &str) -> Result<[u8; SIGNATURE_LEN]> {
    let message = payload.into().to_bytes()?;
    let signing_key = signing_key_from_hex(seed_hex)?;
    Ok(signing_key.sign(&message).to_bytes())
}

/// Build the ed25519 signing key from the first 64 hex characters of `seed_hex`
pub fn signing_key_from_hex(seed_hex: &str) -> Result<SigningKey> {
    let seed_hex = seed_hex.trim();
    let seed_hex = seed_hex.get(..64).unwrap_or(seed_hex);
    let seed = Zeroizing::new(
        hex::decode(seed_hex).map_err(|e| Error::Format(format!("Invalid seed hex: {}", e)))?,
    );
    stellar::signing_key_from_seed(&seed)
}

/// Verify a detached signature against a "G..." account id
pub fn verify(payload: &[u8], signature: &[u8; SIGNATURE_LEN], address: &str) -> Result<bool> {
    let public_key = stellar::decode_address(address)?;
    let signature = Signature::from_bytes(signature);
    Ok(public_key.verify(payload, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const SEED_HEX: &str = "4d691bc19b44a1383b1a0a130aaca3e05c3c1a371dbe45930ef9b761f7a74691";
    const ADDRESS: &str = "GDRXE2BQUC3AZNPVFSCEZ76NJ3WWL25FYFK6RGZGIEKWE4SOOHSUJUJ6";

    #[test]
    fn test_known_signature() {
        let signature = sign(&b"hello stellar"[..], SEED_HEX).unwrap();
        assert_eq!(
            hex::encode(signature),
            "e828a95ef8c44fcaf8f8aee2fabc6a59380141fefe388b845e89fdb664e08402\
             5a8f1e0b706a2b76b3a33d516c06a209d8a6e4712a3e60d7ffa7c6ad5d679a0e"
        );
    }

    #[test]
    fn test_base64_payload_matches_bytes() {
        let from_bytes = sign(&b"hello stellar"[..], SEED_HEX).unwrap();
        let from_base64 = sign("aGVsbG8gc3RlbGxhcg==", SEED_HEX).unwrap();
        assert_eq!(from_bytes, from_base64);
    }

    #[test]
    fn test_signature_verifies_against_address() {
        let signature = sign(&b"payload"[..], SEED_HEX).unwrap();
        assert!(verify(b"payload", &signature, ADDRESS).unwrap());
        assert!(!verify(b"tampered", &signature, ADDRESS).unwrap());
    }

    #[test]
    fn test_trailing_hex_is_ignored() {
        let long = format!("{}{}", SEED_HEX, "ab".repeat(32));
        assert_eq!(
            sign(&b"x"[..], &long).unwrap(),
            sign(&b"x"[..], SEED_HEX).unwrap()
        );
    }

    #[test]
    fn test_malformed_base64() {
        let err = sign("not*base64!", SEED_HEX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
