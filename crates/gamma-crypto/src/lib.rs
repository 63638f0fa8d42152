//! # Gamma Crypto - Test Account Primitives
//!
//! The small slice of client-SDK cryptography the CLI needs.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Transaction signing |
//! | `hashing` | SHA-256 | Transaction digests, client addresses |
//! | `encoding` | checksummed hex | Keys file, `gamma:address` arguments |
//! | `account` | - | Test key generation |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod encoding;
pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use account::Account;
pub use encoding::{decode_hex, decode_plain_hex, encode_hex};
pub use errors::CryptoError;
pub use hashing::{address_from_public_key, sha256, Address, Hash, ADDRESS_SIZE};
pub use signatures::{verify, Ed25519KeyPair, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
