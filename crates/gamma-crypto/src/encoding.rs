//! # Checksummed Hex
//!
//! Keys, addresses and transaction ids are shown as `0x`-prefixed hex
//! whose letter casing carries a checksum: the letter at position `i` is
//! upper case iff nibble `i` of the SHA-256 digest of the raw bytes is 8
//! or above. Single-case input carries no checksum and is accepted as is.

use crate::hashing::sha256;
use crate::CryptoError;

/// Encode bytes as `0x`-prefixed checksummed hex.
pub fn encode_hex(data: &[u8]) -> String {
    let lower = hex::encode(data);
    let digest = sha256(data);

    let mut out = String::with_capacity(lower.len() + 2);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        if c.is_ascii_alphabetic() && digest_nibble(&digest, i) >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode hex (with or without `0x`), validating the checksum of
/// mixed-case input.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, CryptoError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    let data = hex::decode(digits)?;

    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    if has_upper && has_lower && encode_hex(&data)[2..] != *digits {
        return Err(CryptoError::ChecksumMismatch(value.to_string()));
    }

    Ok(data)
}

/// Decode hex with an optional `0x` prefix and no checksum semantics.
pub fn decode_plain_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(value.strip_prefix("0x").unwrap_or(value))
}

fn digest_nibble(digest: &[u8; 32], index: usize) -> u8 {
    let index = index % (digest.len() * 2);
    let byte = digest[index / 2];
    if index % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0f
    }
}
