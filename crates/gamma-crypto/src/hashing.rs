//! # SHA-256 Hashing
//!
//! Digests used for transaction ids, request signatures and account
//! addresses.

use sha2::{Digest, Sha256};

/// SHA-256 output (256-bit).
pub type Hash = [u8; 32];

/// Length of an account address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Account address (last 20 bytes of the public key digest).
pub type Address = [u8; ADDRESS_SIZE];

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Derive the client address of an Ed25519 public key.
pub fn address_from_public_key(public_key: &[u8]) -> Address {
    let digest = sha256(public_key);
    let mut address = [0u8; ADDRESS_SIZE];
    address.copy_from_slice(&digest[digest.len() - ADDRESS_SIZE..]);
    address
}
