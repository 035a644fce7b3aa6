//! Checksums used by the key encodings
//!
//! CRC16-XModem protects Stellar StrKey values, the truncated double SHA-256
//! protects Base58Check payloads (WIF keys and P2PKH addresses).

use sha2::{Digest, Sha256};

/// CRC16-XModem generator polynomial
const CRC16_POLY: u16 = 0x1021;

/// Calculate the CRC16-XModem checksum of `data`
///
/// Initial value 0x0000, MSB-first, no reflection and no final XOR.
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0x0000;
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// First four bytes of SHA-256(SHA-256(data))
pub fn double_sha256_checksum(data: &[u8]) -> [u8; 4] {
    let hash = Sha256::digest(Sha256::digest(data));
    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&hash[0..4]);
    checksum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_reference_vector() {
        assert_eq!(crc16_xmodem(b"123456789"), 0x31C3);
    }

    #[test]
    fn test_crc16_empty_and_single_byte() {
        assert_eq!(crc16_xmodem(&[]), 0x0000);
        assert_eq!(crc16_xmodem(b"A"), 0x58E5);
    }

    #[test]
    fn test_double_sha256_checksum() {
        // Base58Check checksum of the mainnet genesis P2PKH payload
        let payload = hex::decode("0062e907b15cbf27d5425399ebf6f0fb50ebb88f18").unwrap();
        assert_eq!(double_sha256_checksum(&payload), [0xc2, 0x9b, 0x7d, 0x93]);
    }
}
