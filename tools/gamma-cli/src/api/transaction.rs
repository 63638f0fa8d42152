//! Request construction and signing.
//!
//! A transaction is signed by hashing the compact JSON of its body with
//! SHA-256 and signing the digest with the signer's Ed25519 seed. The
//! transaction id is the body timestamp (8 bytes, big endian) followed
//! by that digest.

use chrono::Utc;
use gamma_crypto::{encode_hex, sha256, CryptoError, Ed25519KeyPair, Hash};
use gamma_jsoncodec::{marshal_args, ArgValue, RawKey};

use super::types::{RequestBody, SignedTransaction, Signer};

pub const PROTOCOL_VERSION: u32 = 1;
pub const NETWORK_TYPE_TEST_NET: &str = "TEST_NET";
pub const SIGNER_SCHEME_EDDSA: &str = "EDDSA";

/// Build and sign a transaction. Returns it with its transaction id.
pub fn create_transaction(
    signer: &RawKey,
    virtual_chain: u32,
    contract_name: &str,
    method_name: &str,
    args: &[ArgValue],
) -> Result<(SignedTransaction, String), CryptoError> {
    let body = request_body(
        now_nanos(),
        &signer.public_key,
        virtual_chain,
        contract_name,
        method_name,
        args,
    );
    sign_transaction(body, &signer.private_key)
}

/// Build an unsigned query.
pub fn create_query(
    public_key: &[u8],
    virtual_chain: u32,
    contract_name: &str,
    method_name: &str,
    args: &[ArgValue],
) -> RequestBody {
    request_body(now_nanos(), public_key, virtual_chain, contract_name, method_name, args)
}

/// Sign `body` with an Ed25519 seed.
pub fn sign_transaction(body: RequestBody, private_key: &[u8]) -> Result<(SignedTransaction, String), CryptoError> {
    let keypair = Ed25519KeyPair::from_seed_slice(private_key)?;
    let digest = body_digest(&body);
    let tx_id = tx_id(body.timestamp, &digest);
    let signature = keypair.sign(&digest);

    Ok((
        SignedTransaction {
            transaction: body,
            signature: encode_hex(&signature),
        },
        tx_id,
    ))
}

/// SHA-256 of the compact JSON body.
pub fn body_digest(body: &RequestBody) -> Hash {
    // serializing plain structs and strings cannot fail
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    sha256(&bytes)
}

/// `0x` checksummed hex of timestamp ‖ digest.
pub fn tx_id(timestamp: u64, digest: &Hash) -> String {
    let mut raw = Vec::with_capacity(8 + digest.len());
    raw.extend_from_slice(&timestamp.to_be_bytes());
    raw.extend_from_slice(digest);
    encode_hex(&raw)
}

fn request_body(
    timestamp: u64,
    public_key: &[u8],
    virtual_chain: u32,
    contract_name: &str,
    method_name: &str,
    args: &[ArgValue],
) -> RequestBody {
    RequestBody {
        protocol_version: PROTOCOL_VERSION,
        virtual_chain_id: virtual_chain,
        network_type: NETWORK_TYPE_TEST_NET.to_string(),
        timestamp,
        signer: Signer {
            scheme: SIGNER_SCHEME_EDDSA.to_string(),
            public_key: encode_hex(public_key),
        },
        contract_name: contract_name.to_string(),
        method_name: method_name.to_string(),
        input_arguments: marshal_args(args),
    }
}

fn now_nanos() -> u64 {
    Utc::now()
        .timestamp_nanos_opt()
        .and_then(|ns| u64::try_from(ns).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamma_crypto::{decode_hex, verify, Account};

    fn signer() -> RawKey {
        let account = Account::create();
        RawKey {
            private_key: account.private_key.to_vec(),
            public_key: account.public_key.to_vec(),
            address: account.address.to_vec(),
        }
    }

    #[test]
    fn test_signature_verifies_over_digest() {
        let key = signer();
        let body = request_body(1_000, &key.public_key, 42, "Counter", "add", &[ArgValue::Uint64(5)]);
        let digest = body_digest(&body);

        let (tx, _) = sign_transaction(body, &key.private_key).unwrap();

        let signature = decode_hex(&tx.signature).unwrap();
        assert!(verify(&key.public_key, &digest, &signature).is_ok());
    }

    #[test]
    fn test_tx_id_layout() {
        let digest = [0x11u8; 32];
        let id = tx_id(0x0102030405060708, &digest);
        let raw = decode_hex(&id).unwrap();

        assert!(id.starts_with("0x"));
        assert_eq!(raw.len(), 40);
        assert_eq!(&raw[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&raw[8..], &digest);
    }

    #[test]
    fn test_transaction_carries_inputs() {
        let key = signer();

        let (tx, id) = create_transaction(&key, 42, "Counter", "add", &[ArgValue::Uint64(5)]).unwrap();

        assert_eq!(tx.transaction.virtual_chain_id, 42);
        assert_eq!(tx.transaction.network_type, "TEST_NET");
        assert_eq!(tx.transaction.signer.public_key, encode_hex(&key.public_key));
        assert_eq!(tx.transaction.input_arguments[0].arg_type, "uint64");
        assert_eq!(id, tx_id(tx.transaction.timestamp, &body_digest(&tx.transaction)));
    }

    #[test]
    fn test_bad_private_key_rejected() {
        let mut key = signer();
        key.private_key.truncate(10);

        assert!(create_transaction(&key, 42, "Counter", "add", &[]).is_err());
    }

    #[test]
    fn test_query_is_unsigned_body() {
        let query = create_query(&[7u8; 32], 9, "_Deployments", "getInfo", &[ArgValue::String("x".into())]);

        assert_eq!(query.virtual_chain_id, 9);
        assert_eq!(query.method_name, "getInfo");
        assert!(query.timestamp > 0);
    }
}
