//! # Cryptographic Primitives
//!
//! Thin, typed wrappers over audited implementations:
//!
//! - **SLH-DSA-SHA2-256f** (`slh-dsa`) for signatures.
//! - **SHA-256** (`sha2`) for seed derivation, message digests and
//!   transaction hashes.
//!
//! Nothing in here invents cryptography. The one home-grown construction in
//! the wallet, three suffixed hashes standing in for a KDF, lives in
//! [`crate::identity::seed`] and is kept for recovery compatibility.

pub mod hash;
pub mod keys;

pub use hash::{digest_to_decimal_list, sha256, sha256_hex};
pub use keys::{KeyError, WalletKeypair, WalletPublicKey, WalletSignature};
