//! Bitcoin-family (secp256k1) key handling for BTC and FLO

use ::bitcoin::address::NetworkUnchecked;
use ::bitcoin::hashes::{hash160, Hash};
use ::bitcoin::{Address, AddressType, PublicKey as BitcoinPublicKey};
use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1, SecretKey};

use crate::crypto::base58check;
use crate::error::{Error, Result};
use super::derivation::{AddressFormat, ChainKeyMaterial, ChainParams, Secret};

/// Generate a fresh random secp256k1 scalar
pub fn generate_secret() -> Secret {
    let secret_key = SecretKey::new(&mut OsRng);
    Secret::from_bytes(secret_key.secret_bytes())
}

/// Interpret the secret as a secp256k1 private key (must be in `1..n`)
pub fn secret_key(secret: &Secret) -> Result<SecretKey> {
    SecretKey::from_slice(secret.as_bytes())
        .map_err(|e| Error::Derivation(format!("Invalid secp256k1 secret key: {}", e)))
}

/// Compute the public key of a secret
pub fn public_key(secret: &Secret) -> Result<PublicKey> {
    let secp = Secp256k1::signing_only();
    let secret_key = secret_key(secret)?;
    Ok(PublicKey::from_secret_key(&secp, &secret_key))
}

/// Build the chain address of a public key under `params`
pub fn public_key_to_address(public_key: &PublicKey, params: &ChainParams) -> Result<String> {
    match params.address_format {
        AddressFormat::P2wpkh(network) => {
            let public_key = BitcoinPublicKey::new(*public_key);
            let address = Address::p2wpkh(&public_key, network)
                .map_err(|e| Error::Derivation(format!("Failed to create P2WPKH address: {}", e)))?;
            Ok(address.to_string())
        }
        AddressFormat::P2pkh => {
            let hash = hash160::Hash::hash(&public_key.serialize());

            let mut payload = Vec::with_capacity(21);
            payload.push(params.pubkey_version);
            payload.extend_from_slice(&hash.to_byte_array());

            Ok(base58check::encode_check(&payload))
        }
    }
}

/// Derive address and compressed WIF export for one secp256k1 chain
pub fn derive_chain(secret: &Secret, params: &ChainParams) -> Result<ChainKeyMaterial> {
    let public_key = public_key(secret)?;
    let address = public_key_to_address(&public_key, params)?;
    let private_key = base58check::encode_wif(params.wif_version, secret, true);

    Ok(ChainKeyMaterial { address, private_key })
}

/// Check that `address` is a well-formed address of the chain described by `params`
pub fn validate_address(address: &str, params: &ChainParams) -> Result<()> {
    match params.address_format {
        AddressFormat::P2wpkh(network) => {
            let parsed = address
                .parse::<Address<NetworkUnchecked>>()
                .map_err(|e| Error::Format(format!("Invalid {} address: {}", params.key_type.symbol(), e)))?
                .require_network(network)
                .map_err(|e| Error::Format(format!("Invalid {} address: {}", params.key_type.symbol(), e)))?;

            if parsed.address_type() != Some(AddressType::P2wpkh) {
                return Err(Error::Format(format!(
                    "Invalid {} address: not a P2WPKH address",
                    params.key_type.symbol()
                )));
            }
            Ok(())
        }
        AddressFormat::P2pkh => {
            let payload = base58check::decode_check(address)?;
            if payload.len() != 21 {
                return Err(Error::Format(format!(
                    "Invalid {} address: expected 21-byte payload, got {}",
                    params.key_type.symbol(),
                    payload.len()
                )));
            }
            if payload[0] != params.pubkey_version {
                return Err(Error::Format(format!(
                    "Invalid {} address: wrong version byte 0x{:02x}",
                    params.key_type.symbol(),
                    payload[0]
                )));
            }
            Ok(())
        }
    }
}
