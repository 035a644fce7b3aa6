//! Cryptographic primitives and operations
//!
//! This module provides the checksum engines, the Base58Check and StrKey
//! codecs, and key import/derivation for every supported chain.

pub mod checksum;
pub mod base58check;
pub mod strkey;
pub mod keys;

pub use keys::*;
