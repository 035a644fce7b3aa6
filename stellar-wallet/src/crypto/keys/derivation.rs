//! Common key derivation functionality

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use super::import::import_secret;

/// Supported key types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// Bitcoin mainnet (secp256k1)
    Bitcoin,
    /// FLO mainnet (secp256k1)
    Flo,
    /// Stellar (ed25519)
    Stellar,
}

impl KeyType {
    /// Ticker used in exported results
    pub fn symbol(&self) -> &'static str {
        match self {
            KeyType::Bitcoin => "BTC",
            KeyType::Flo => "FLO",
            KeyType::Stellar => "XLM",
        }
    }
}

/// The canonical 32-byte private scalar shared by every chain
///
/// The bytes are wiped when the value is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Zeroizing<[u8; 32]>);

impl Secret {
    /// Length of a secret in bytes
    pub const LEN: usize = 32;

    /// Wrap 32 raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Copy a secret out of a slice that must be exactly 32 bytes long
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::LEN {
            return Err(Error::Format(format!(
                "Secret must be {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        let mut secret = Zeroizing::new([0u8; 32]);
        secret.copy_from_slice(bytes);
        Ok(Self(secret))
    }

    /// Parse exactly 64 hex characters
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(hex_str).map_err(|e| Error::Format(format!("Invalid hex key: {}", e)))?,
        );
        Self::from_slice(&bytes)
    }

    /// Get the raw secret bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering of the secret
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.as_slice())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Address scheme of a secp256k1 chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    /// Witness v0 key hash, bech32 encoded for the given network
    P2wpkh(::bitcoin::Network),
    /// Base58Check key hash under `ChainParams::pubkey_version`
    P2pkh,
}

/// Per-chain parameter set, passed explicitly into each derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
    /// Chain these parameters belong to
    pub key_type: KeyType,
    /// Version byte of P2PKH addresses
    pub pubkey_version: u8,
    /// Version byte of WIF private keys
    pub wif_version: u8,
    /// How the address is built from the public key
    pub address_format: AddressFormat,
}

impl ChainParams {
    /// Bitcoin mainnet, native segwit addresses
    pub const BITCOIN: ChainParams = ChainParams {
        key_type: KeyType::Bitcoin,
        pubkey_version: 0x00,
        wif_version: 0x80,
        address_format: AddressFormat::P2wpkh(::bitcoin::Network::Bitcoin),
    };

    /// FLO mainnet, legacy "F..." addresses
    pub const FLO: ChainParams = ChainParams {
        key_type: KeyType::Flo,
        pubkey_version: 0x23,
        wif_version: 0xa3,
        address_format: AddressFormat::P2pkh,
    };
}

/// Address and exportable private key for one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainKeyMaterial {
    /// Chain-native address
    pub address: String,
    /// Chain-native private key export (WIF or StrKey seed)
    pub private_key: String,
}

/// Result of deriving one isolated chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChainOutcome {
    /// Derivation succeeded
    Derived(ChainKeyMaterial),
    /// Derivation failed; the raw scalar hex is kept as the export
    Failed {
        /// Cause of the failure
        error: String,
        /// Raw scalar as hex
        private_key: String,
    },
}

impl ChainOutcome {
    /// Address shown in place of a failed derivation
    pub const FAILURE_SENTINEL: &'static str = "Error generating address";

    /// Whether the chain derived successfully
    pub fn is_derived(&self) -> bool {
        matches!(self, ChainOutcome::Derived(_))
    }

    /// Key material, if derivation succeeded
    pub fn material(&self) -> Option<&ChainKeyMaterial> {
        match self {
            ChainOutcome::Derived(material) => Some(material),
            ChainOutcome::Failed { .. } => None,
        }
    }

    /// Address, or the failure sentinel
    pub fn address(&self) -> &str {
        match self {
            ChainOutcome::Derived(material) => &material.address,
            ChainOutcome::Failed { .. } => Self::FAILURE_SENTINEL,
        }
    }

    /// Private key export, or the raw scalar hex on failure
    pub fn private_key(&self) -> &str {
        match self {
            ChainOutcome::Derived(material) => &material.private_key,
            ChainOutcome::Failed { private_key, .. } => private_key,
        }
    }
}

/// Key material for every supported chain, derived from one secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiChainResult {
    #[serde(rename = "BTC")]
    pub btc: ChainKeyMaterial,
    #[serde(rename = "FLO")]
    pub flo: ChainKeyMaterial,
    #[serde(rename = "XLM")]
    pub xlm: ChainOutcome,
}

/// Derive BTC, FLO and XLM key material from a canonical secret
///
/// A secp256k1 failure aborts the whole call. An ed25519 failure only
/// marks the XLM slot as failed.
pub fn derive_multi_chain(secret: &Secret) -> Result<MultiChainResult> {
    let btc = super::bitcoin::derive_chain(secret, &ChainParams::BITCOIN)?;
    let flo = super::bitcoin::derive_chain(secret, &ChainParams::FLO)?;
    let xlm = stellar_outcome(secret.as_bytes());

    debug!(btc = %btc.address, flo = %flo.address, xlm = %xlm.address(), "derived multi-chain addresses");

    Ok(MultiChainResult { btc, flo, xlm })
}

/// Import any accepted key encoding (or generate one when empty) and derive all chains
pub fn recover_multi_chain(input: &str) -> Result<MultiChainResult> {
    let imported = import_secret(input)?;
    derive_multi_chain(&imported.secret).map_err(Error::key_recovery)
}

fn stellar_outcome(seed: &[u8]) -> ChainOutcome {
    match super::stellar::derive_key_material(seed) {
        Ok(material) => ChainOutcome::Derived(material),
        Err(e) => {
            warn!(error = %e, "XLM derivation failed, keeping BTC/FLO results");
            ChainOutcome::Failed {
                error: e.to_string(),
                private_key: hex::encode(seed),
            }
        }
    }
}
