//! # Hashing Utilities
//!
//! SHA-256 is the only hash the wallet uses. It shows up in three places:
//!
//! - the three-digest derivation seed (see [`crate::identity::seed`]),
//! - the digest-list message encoding, where the canonical transaction is
//!   hashed and the digest bytes are written out as decimal numbers,
//! - the transaction hash, taken over the unpadded signed message.
//!
//! The ledger node recomputes all three, so these helpers must stay
//! byte-for-byte stable.

use sha2::{Digest, Sha256};

use crate::config::DIGEST_LENGTH;

/// Compute the SHA-256 hash of the input data.
///
/// ```
/// use dcl_wallet::crypto::sha256;
///
/// let hash = sha256(b"DCL");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; DIGEST_LENGTH];
    output.copy_from_slice(&result);
    output
}

/// Lowercase hex of the SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Render a digest as its byte values in decimal, separated by commas.
///
/// This is the textual form a JavaScript `Uint8Array` produces with
/// `toString()`, which is what the ledger node expects as the signed message
/// under [`crate::transaction::MessageEncoding::DigestList`]. For a 32-byte
/// digest the result is at most `32 * 3 + 31 = 127` bytes.
pub fn digest_to_decimal_list(digest: &[u8]) -> String {
    digest
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
