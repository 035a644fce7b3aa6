//! Stellar StrKey encoding
//!
//! A StrKey is `[version(1)] + [body(32)] + [crc16(2, little-endian)]`,
//! Base32 encoded with the RFC4648 alphabet and no padding. 35 bytes always
//! encode to exactly 56 characters.

use crate::crypto::checksum::crc16_xmodem;
use crate::error::{Error, Result};

/// Version byte of an account id ("G...")
pub const VERSION_ACCOUNT_ID: u8 = 0x30;

/// Version byte of an ed25519 secret seed ("S...")
pub const VERSION_SECRET_SEED: u8 = 0x90;

/// Encoded length of every 32-byte StrKey
pub const STRKEY_LEN: usize = 56;

/// Decoded length: version + body + checksum
const DECODED_LEN: usize = 1 + 32 + 2;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Encode a 32-byte body under `version`
pub fn encode(version: u8, body: &[u8; 32]) -> String {
    let mut data = [0u8; DECODED_LEN];
    data[0] = version;
    data[1..33].copy_from_slice(body);

    let checksum = crc16_xmodem(&data[..33]);
    data[33..].copy_from_slice(&checksum.to_le_bytes());

    base32_encode(&data)
}

/// Decode a StrKey, verifying its checksum and that it carries `expected_version`
pub fn decode(expected_version: u8, encoded: &str) -> Result<[u8; 32]> {
    if encoded.len() != STRKEY_LEN {
        return Err(Error::Format(format!(
            "StrKey must be {} characters, got {}",
            STRKEY_LEN,
            encoded.len()
        )));
    }

    let decoded = base32_decode(encoded)?;
    if decoded.len() < DECODED_LEN {
        return Err(Error::Format("StrKey too short".to_string()));
    }

    let provided = u16::from_le_bytes([decoded[33], decoded[34]]);
    let expected = crc16_xmodem(&decoded[..33]);
    if provided != expected {
        return Err(Error::checksum(&expected.to_le_bytes(), &provided.to_le_bytes()));
    }

    if decoded[0] != expected_version {
        return Err(Error::Format(format!(
            "wrong version byte (expected 0x{:02x}, got 0x{:02x})",
            expected_version, decoded[0]
        )));
    }

    let mut body = [0u8; 32];
    body.copy_from_slice(&decoded[1..33]);
    Ok(body)
}

/// RFC4648 Base32 without padding; the final partial group is zero-padded on the right
fn base32_encode(data: &[u8]) -> String {
    let mut output = String::with_capacity((data.len() * 8 + 4) / 5);
    let mut value: u32 = 0;
    let mut bits = 0;

    for byte in data {
        value = (value << 8) | *byte as u32;
        bits += 8;

        while bits >= 5 {
            output.push(BASE32_ALPHABET[((value >> (bits - 5)) & 31) as usize] as char);
            bits -= 5;
        }
    }

    if bits > 0 {
        output.push(BASE32_ALPHABET[((value << (5 - bits)) & 31) as usize] as char);
    }

    output
}

fn base32_decode(encoded: &str) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(encoded.len() * 5 / 8);
    let mut value: u32 = 0;
    let mut bits = 0;

    for c in encoded.chars() {
        let index = base32_index(c)
            .ok_or_else(|| Error::Format(format!("Invalid Base32 character '{}'", c)))?;

        value = (value << 5) | index;
        bits += 5;

        if bits >= 8 {
            output.push(((value >> (bits - 8)) & 0xFF) as u8);
            bits -= 8;
        }
    }

    Ok(output)
}

fn base32_index(c: char) -> Option<u32> {
    match c {
        'A'..='Z' => Some(c as u32 - 'A' as u32),
        '2'..='7' => Some(c as u32 - '2' as u32 + 26),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    // SEP-0005 test 1, account 0
    const SEED: &str = "SBGWSG6BTNCKCOB3DIFBGCVMUPQFYPA2G4O34RMTB343OYPXU5DJDVMN";
    const SEED_HEX: &str = "4d691bc19b44a1383b1a0a130aaca3e05c3c1a371dbe45930ef9b761f7a74691";

    #[test]
    fn test_decode_known_seed() {
        let body = decode(VERSION_SECRET_SEED, SEED).unwrap();
        assert_eq!(hex::encode(body), SEED_HEX);
    }

    #[test]
    fn test_encode_known_seed() {
        let mut body = [0u8; 32];
        body.copy_from_slice(&hex::decode(SEED_HEX).unwrap());
        assert_eq!(encode(VERSION_SECRET_SEED, &body), SEED);
    }

    #[test]
    fn test_zero_body_encodings() {
        let zero = [0u8; 32];
        assert_eq!(
            encode(VERSION_SECRET_SEED, &zero),
            "SAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSU2"
        );
        assert_eq!(
            encode(VERSION_ACCOUNT_ID, &zero),
            "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF"
        );
    }

    #[test]
    fn test_round_trip_varied_bodies() {
        for (i, version) in [VERSION_ACCOUNT_ID, VERSION_SECRET_SEED].iter().enumerate() {
            let mut body = [0u8; 32];
            for (j, b) in body.iter_mut().enumerate() {
                *b = (j as u8).wrapping_mul(37).wrapping_add(i as u8 * 101);
            }
            let encoded = encode(*version, &body);
            assert_eq!(encoded.len(), STRKEY_LEN);
            assert!(encoded.chars().all(|c| BASE32_ALPHABET.contains(&(c as u8))));
            assert_eq!(decode(*version, &encoded).unwrap(), body);
        }
    }

    #[test]
    fn test_every_single_character_flip_fails_checksum() {
        for pos in 0..SEED.len() {
            let mut chars: Vec<char> = SEED.chars().collect();
            let current = BASE32_ALPHABET.iter().position(|b| *b as char == chars[pos]).unwrap();
            chars[pos] = BASE32_ALPHABET[(current + 1) % 32] as char;
            let flipped: String = chars.into_iter().collect();

            let err = decode(VERSION_SECRET_SEED, &flipped).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Checksum, "position {}", pos);
        }
    }

    #[test]
    fn test_wrong_version_byte() {
        let zero = [0u8; 32];
        let account = encode(VERSION_ACCOUNT_ID, &zero);
        let err = decode(VERSION_SECRET_SEED, &account).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("wrong version byte"));
    }

    #[test]
    fn test_invalid_character() {
        let bad = SEED.replacen('B', "1", 1);
        let err = decode(VERSION_SECRET_SEED, &bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_wrong_length() {
        let err = decode(VERSION_SECRET_SEED, &SEED[..55]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
