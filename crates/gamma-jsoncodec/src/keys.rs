//! Keys file format.
//!
//! ```json
//! {
//!   "user1": {
//!     "PrivateKey": "0x...",
//!     "PublicKey": "0x...",
//!     "Address": "0x..."
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use gamma_crypto::{decode_hex, encode_hex, Account, CryptoError};
use serde::{Deserialize, Serialize};

/// Number of accounts written by `gen-test-keys`.
pub const TEST_KEY_COUNT: usize = 10;

/// One keys file entry, all fields checksummed hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Key {
    pub private_key: String,
    pub public_key: String,
    pub address: String,
}

/// Decoded keys file entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawKey {
    pub private_key: Vec<u8>,
    pub public_key: Vec<u8>,
    pub address: Vec<u8>,
}

/// Keys file contents, ordered by id.
pub type KeysFile = BTreeMap<String, Key>;

impl From<&Account> for Key {
    fn from(account: &Account) -> Self {
        Self {
            private_key: encode_hex(&account.private_key),
            public_key: encode_hex(&account.public_key),
            address: encode_hex(&account.address),
        }
    }
}

impl TryFrom<&Key> for RawKey {
    type Error = CryptoError;

    fn try_from(key: &Key) -> Result<Self, Self::Error> {
        Ok(Self {
            private_key: decode_hex(&key.private_key)?,
            public_key: decode_hex(&key.public_key)?,
            address: decode_hex(&key.address)?,
        })
    }
}

/// Keys file for a batch of accounts, named `user1`, `user2`, ...
pub fn keys_file_from_accounts(accounts: &[Account]) -> KeysFile {
    accounts
        .iter()
        .enumerate()
        .map(|(i, account)| (format!("user{}", i + 1), Key::from(account)))
        .collect()
}

/// Keys file with [`TEST_KEY_COUNT`] fresh accounts.
pub fn generate_test_keys() -> KeysFile {
    let accounts: Vec<Account> = (0..TEST_KEY_COUNT).map(|_| Account::create()).collect();
    keys_file_from_accounts(&accounts)
}
