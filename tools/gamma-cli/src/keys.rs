//! Test keys file: generation and lookup.

use std::fs;
use std::path::Path;

use gamma_jsoncodec::{generate_test_keys, KeysFile, RawKey, TEST_KEY_COUNT};
use tracing::{debug, info};

use crate::error::{CliError, Result};

/// Write a fresh batch of test keys to `path`, replacing any existing file.
pub fn write_test_keys(path: &Path) -> Result<KeysFile> {
    let keys = generate_test_keys();
    let json = serde_json::to_string_pretty(&keys).map_err(CliError::KeysEncode)?;

    fs::write(path, json).map_err(CliError::KeysWrite)?;
    info!(path = %path.display(), count = TEST_KEY_COUNT, "test keys written");

    if !path.exists() {
        return Err(CliError::KeysWrite(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found after write.",
        )));
    }
    Ok(keys)
}

/// Look up key `id`, generating the keys file first if it is missing.
pub fn load_test_key(path: &Path, id: &str) -> Result<RawKey> {
    if !path.exists() {
        debug!(path = %path.display(), "keys file missing, generating");
        write_test_keys(path)?;
        println!("{} new test keys written successfully to '{}'.\n", TEST_KEY_COUNT, path.display());
    }

    let bytes = fs::read(path).map_err(|source| CliError::KeysOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let keys: KeysFile = serde_json::from_slice(&bytes).map_err(|source| CliError::KeysParse {
        path: path.to_path_buf(),
        source,
    })?;

    let key = keys.get(id).ok_or_else(|| CliError::KeyNotFound {
        id: id.to_string(),
        path: path.to_path_buf(),
    })?;

    RawKey::try_from(key).map_err(|source| CliError::KeyHex {
        id: id.to_string(),
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamma_crypto::{address_from_public_key, Ed25519KeyPair};

    #[test]
    fn test_written_keys_are_usable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");

        let written = write_test_keys(&path).unwrap();
        let key = load_test_key(&path, "user7").unwrap();

        let keypair = Ed25519KeyPair::from_seed_slice(&key.private_key).unwrap();
        assert_eq!(keypair.public_key().to_vec(), key.public_key);
        assert_eq!(address_from_public_key(&key.public_key).to_vec(), key.address);
        assert_eq!(written["user7"].public_key, gamma_crypto::encode_hex(&key.public_key));
    }

    #[test]
    fn test_missing_file_is_generated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auto.json");

        load_test_key(&path, "user1").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");
        write_test_keys(&path).unwrap();

        let err = load_test_key(&path, "user11").unwrap_err();

        assert!(matches!(err, CliError::KeyNotFound { ref id, .. } if id == "user11"));
    }

    #[test]
    fn test_corrupt_file_suggests_deleting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");
        fs::write(&path, "{not json").unwrap();

        let err = load_test_key(&path, "user1").unwrap_err();

        assert!(err.to_string().contains("Try deleting the key file"));
    }

    #[test]
    fn test_bad_hex_in_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");
        fs::write(
            &path,
            r#"{"user1": {"PrivateKey": "0xnothex", "PublicKey": "0x00", "Address": "0x00"}}"#,
        )
        .unwrap();

        assert!(matches!(load_test_key(&path, "user1"), Err(CliError::KeyHex { .. })));
    }
}
