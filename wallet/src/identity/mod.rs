//! # Identity Module
//!
//! Everything that turns a recovery phrase into a wallet:
//!
//! 1. **Phrase**: generated or imported words, plus the sign-up checks.
//! 2. **Seed**: 96 bytes from three SHA-256 digests of the trimmed phrase.
//! 3. **Keypair**: SLH-DSA-SHA2-256f keygen seeded with those 96 bytes.
//! 4. **Record**: the plaintext JSON object the front end persists.
//! 5. **Store**: where that record lives ([`IdentityStore`]).
//!
//! Derivation is a pure function. The same trimmed phrase yields the same
//! keypair on every device, which is the whole recovery story: there is no
//! other backup.

pub mod phrase;
pub mod record;
pub mod seed;
pub mod store;

pub use phrase::{confirm_password, trim_phrase, PhraseError, RecoveryPhrase};
pub use record::{IdentityRecord, RecordError};
pub use seed::DerivationSeed;
pub use store::{IdentityStore, MemoryIdentityStore, SledIdentityStore, StoreError};

use tracing::debug;

use crate::crypto::keys::WalletKeypair;

/// Derive the wallet keypair for `phrase`.
///
/// Leading and trailing whitespace is trimmed; everything else is hashed as
/// typed. Infallible: the seed length is fixed by construction.
///
/// ```no_run
/// use dcl_wallet::identity::derive_identity;
///
/// let a = derive_identity("correct horse battery staple ...");
/// let b = derive_identity("correct horse battery staple ... ");
/// assert_eq!(a.public_key(), b.public_key());
/// ```
pub fn derive_identity(phrase: &str) -> WalletKeypair {
    let seed = DerivationSeed::derive(phrase);
    let keypair = WalletKeypair::from_seed(&seed);
    debug!(address = %keypair.address(), "identity derived");
    keypair
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPLES: &str =
        "apple apple apple apple apple apple apple apple apple apple apple apple";

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_identity(APPLES);
        let b = derive_identity(APPLES);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.secret_key_bytes(), b.secret_key_bytes());
    }

    #[test]
    fn trailing_space_is_trimmed() {
        let a = derive_identity(APPLES);
        let b = derive_identity(&format!("{APPLES} "));
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn one_character_difference_changes_key() {
        let a = derive_identity(APPLES);
        let b = derive_identity(&APPLES.replacen('a', "b", 1));
        assert_ne!(a.public_key(), b.public_key());
    }
}
