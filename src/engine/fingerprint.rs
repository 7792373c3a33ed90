//! Fingerprint hasher: SHA-256 over canonical bytes
//!
//! A content fingerprint, not a MAC: there is no secret key, and it proves
//! nothing against an adversary who can rewrite the payload in transit. It
//! exists so that equal inputs produce byte-equal responses.
//!
//! This is the only approved hashing mechanism for contract-level context
//! hashes; every hash in a response goes through [`context_hash`].

use hex::ToHex;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::canonical;

/// Lowercase hex SHA-256 of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().encode_hex::<String>()
}

/// Deterministic fingerprint of a structured value: SHA-256 over its
/// canonical encoding.
pub fn context_hash(value: &Value) -> String {
    sha256_hex(&canonical::canonical_bytes(value))
}
