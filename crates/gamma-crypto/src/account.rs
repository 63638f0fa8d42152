//! Test accounts handed out by `gen-test-keys`.

use crate::hashing::Address;
use crate::signatures::{Ed25519KeyPair, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};

/// A freshly generated signing account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    /// Ed25519 seed.
    pub private_key: [u8; PRIVATE_KEY_SIZE],
    /// Ed25519 public key.
    pub public_key: [u8; PUBLIC_KEY_SIZE],
    /// Client address derived from the public key.
    pub address: Address,
}

impl Account {
    /// Generate a new random account.
    pub fn create() -> Self {
        Self::from_keypair(&Ed25519KeyPair::generate())
    }

    /// Build the account record of an existing keypair.
    pub fn from_keypair(keypair: &Ed25519KeyPair) -> Self {
        Self {
            private_key: keypair.to_seed(),
            public_key: keypair.public_key(),
            address: keypair.address(),
        }
    }
}
