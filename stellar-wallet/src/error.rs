//! Error types for the stellar-wallet library

use thiserror::Error;

/// Custom error type for stellar-wallet operations
#[derive(Error, Debug)]
pub enum Error {
    /// Bad length, invalid alphabet character or wrong version byte
    #[error("Format error: {0}")]
    Format(String),

    /// Stored checksum does not match the recomputed one (both in hex)
    #[error("Checksum mismatch (expected {expected}, got {provided})")]
    Checksum {
        expected: String,
        provided: String,
    },

    /// Curve or seed derivation failure
    #[error("Key derivation error: {0}")]
    Derivation(String),

    /// Wraps any failure raised while importing a secret
    #[error("Failed to recover key: {0}")]
    KeyRecovery(#[source] Box<Error>),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Coarse error category, stable across wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Checksum,
    Derivation,
    Provider,
    NotFound,
    Serialization,
    Storage,
}

impl Error {
    /// Build a checksum error from the raw expected/provided bytes
    pub fn checksum(expected: &[u8], provided: &[u8]) -> Self {
        Error::Checksum {
            expected: hex::encode(expected),
            provided: hex::encode(provided),
        }
    }

    /// Wrap an import failure with the "Failed to recover key" context
    pub fn key_recovery(cause: Error) -> Self {
        match cause {
            already @ Error::KeyRecovery(_) => already,
            other => Error::KeyRecovery(Box::new(other)),
        }
    }

    /// Category of this error, looking through `KeyRecovery`
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format(_) => ErrorKind::Format,
            Error::Checksum { .. } => ErrorKind::Checksum,
            Error::Derivation(_) => ErrorKind::Derivation,
            Error::KeyRecovery(cause) => cause.kind(),
            Error::Provider(_) => ErrorKind::Provider,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for stellar-wallet operations
pub type Result<T> = std::result::Result<T, Error>;
