//! # Ed25519 Signatures
//!
//! Test accounts sign transactions with Ed25519. Signatures are
//! deterministic, so the same key and payload always produce the same
//! transaction signature.

use crate::hashing::{address_from_public_key, Address};
use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

/// Ed25519 seed length in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Ed25519 keypair.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: [u8; PRIVATE_KEY_SIZE]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Create from a seed of unchecked length, as read from a keys file.
    pub fn from_seed_slice(seed: &[u8]) -> Result<Self, CryptoError> {
        let seed: [u8; PRIVATE_KEY_SIZE] =
            seed.try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: PRIVATE_KEY_SIZE,
                    actual: seed.len(),
                })?;
        Ok(Self::from_seed(seed))
    }

    /// Get public key bytes.
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Get the account address of this keypair.
    pub fn address(&self) -> Address {
        address_from_public_key(&self.public_key())
    }

    /// Sign a message (deterministic - no RNG needed).
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_SIZE] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Get secret seed (for serialization).
    pub fn to_seed(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.signing_key.to_bytes()
    }
}

/// Verify an Ed25519 signature against a raw public key.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    let public_key: [u8; PUBLIC_KEY_SIZE] =
        public_key
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_SIZE,
                actual: public_key.len(),
            })?;
    let verifying_key =
        VerifyingKey::from_bytes(&public_key).map_err(|_| CryptoError::InvalidPublicKey)?;
    let signature = ed25519_dalek::Signature::from_slice(signature)
        .map_err(|_| CryptoError::SignatureVerificationFailed)?;

    verifying_key
        .verify(message, &signature)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let keypair = Ed25519KeyPair::generate();
        let message = b"transaction digest";

        let signature = keypair.sign(message);

        assert!(verify(&keypair.public_key(), message, &signature).is_ok());
    }

    #[test]
    fn test_wrong_message_fails() {
        let keypair = Ed25519KeyPair::generate();

        let signature = keypair.sign(b"message1");

        assert!(verify(&keypair.public_key(), b"message2", &signature).is_err());
    }

    #[test]
    fn test_deterministic_signatures() {
        let keypair = Ed25519KeyPair::from_seed([0xABu8; 32]);

        assert_eq!(keypair.sign(b"same"), keypair.sign(b"same"));
    }

    #[test]
    fn test_roundtrip_seed() {
        let original = Ed25519KeyPair::generate();
        let restored = Ed25519KeyPair::from_seed_slice(&original.to_seed()).unwrap();

        assert_eq!(original.public_key(), restored.public_key());
        assert_eq!(original.address(), restored.address());
    }

    #[test]
    fn test_short_seed_rejected() {
        let err = Ed25519KeyPair::from_seed_slice(&[1u8; 31]).err().unwrap();
        assert!(matches!(
            err,
            CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 31
            }
        ));
    }
}
