//! Crypto error types.

use thiserror::Error;

/// Key handling and encoding errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Hex string could not be decoded
    #[error("invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Mixed-case hex string whose letter casing does not match its checksum
    #[error("invalid checksum for hex string '{0}'")]
    ChecksumMismatch(String),
}
