//! Derivation seed: three SHA-256 digests of the recovery phrase.
//!
//! ```text
//! seed = SHA-256(p) || SHA-256(p || "1") || SHA-256(p || "2")
//! ```
//!
//! where `p` is the phrase with leading and trailing whitespace removed.
//! Internal whitespace is hashed as typed, so `"a  b"` and `"a b"` are
//! different wallets.
//!
//! This stretches a single 256-bit digest into the 768 bits SLH-DSA-256f
//! keygen consumes. It is not a KDF (no salt, no work factor) and is kept
//! only because every existing address was derived this way.

use std::fmt;

use crate::config::{DIGEST_LENGTH, SEED_LENGTH, SEED_SUFFIXES};
use crate::crypto::hash::sha256;

use super::phrase::trim_phrase;

/// A 96-byte keygen seed. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivationSeed([u8; SEED_LENGTH]);

impl DerivationSeed {
    /// Derive the seed for `phrase`. The phrase is trimmed first.
    pub fn derive(phrase: &str) -> Self {
        let trimmed = trim_phrase(phrase);
        let mut seed = [0u8; SEED_LENGTH];

        seed[..DIGEST_LENGTH].copy_from_slice(&sha256(trimmed.as_bytes()));
        for (i, suffix) in SEED_SUFFIXES.iter().enumerate() {
            let input = format!("{trimmed}{suffix}");
            let offset = (i + 1) * DIGEST_LENGTH;
            seed[offset..offset + DIGEST_LENGTH].copy_from_slice(&sha256(input.as_bytes()));
        }

        Self(seed)
    }

    /// Wrap raw seed bytes, e.g. from a test vector.
    pub fn from_bytes(bytes: [u8; SEED_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for DerivationSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivationSeed(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_suffixed_digests() {
        let seed = DerivationSeed::derive("alpha beta");
        let bytes = seed.as_bytes();
        assert_eq!(&bytes[..32], &sha256(b"alpha beta"));
        assert_eq!(&bytes[32..64], &sha256(b"alpha beta1"));
        assert_eq!(&bytes[64..], &sha256(b"alpha beta2"));
    }

    #[test]
    fn outer_whitespace_is_ignored() {
        assert_eq!(
            DerivationSeed::derive("  alpha beta\n"),
            DerivationSeed::derive("alpha beta")
        );
    }

    #[test]
    fn byte_order_mark_is_trimmed() {
        assert_eq!(
            DerivationSeed::derive("\u{FEFF}alpha beta\u{FEFF}"),
            DerivationSeed::derive("alpha beta")
        );
        assert_eq!(
            DerivationSeed::derive("\u{3000}alpha beta\u{2028}"),
            DerivationSeed::derive("alpha beta")
        );
    }

    #[test]
    fn next_line_is_not_trimmed() {
        assert_ne!(
            DerivationSeed::derive("alpha beta\u{0085}"),
            DerivationSeed::derive("alpha beta")
        );
    }

    #[test]
    fn inner_whitespace_is_significant() {
        assert_ne!(
            DerivationSeed::derive("alpha  beta"),
            DerivationSeed::derive("alpha beta")
        );
    }

    #[test]
    fn one_character_changes_the_seed() {
        assert_ne!(
            DerivationSeed::derive("alpha beta"),
            DerivationSeed::derive("alpha betb")
        );
    }

    #[test]
    fn known_first_segment() {
        // SHA-256("abc")
        let seed = DerivationSeed::derive("abc");
        assert_eq!(
            hex::encode(&seed.as_bytes()[..32]),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
