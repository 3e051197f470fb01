//! The persisted identity record.
//!
//! One JSON object per wallet, stored under a single key:
//!
//! ```json
//! { "password": "...", "secretPhrase": "...", "publicKey": "<hex>", "privateKey": "<hex>" }
//! ```
//!
//! Everything is plaintext, including the private key and the phrase. The
//! password is stored next to them and protects nothing. Existing wallets
//! depend on this exact layout, so it is reproduced as is; see the security
//! notes in DESIGN.md.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::phrase::RecoveryPhrase;
use crate::crypto::keys::WalletKeypair;

/// Errors reading key material out of a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record exists but its key fields are empty, not hex, or the wrong
    /// length.
    #[error("key pair missing in identity record")]
    KeyPairMissing,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub secret_phrase: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub private_key: String,
}

impl IdentityRecord {
    /// Derive the keypair for `phrase` and assemble the record a front end
    /// saves at the end of sign-up or import.
    pub fn create(password: &str, phrase: &RecoveryPhrase) -> Self {
        let keypair = super::derive_identity(phrase.as_str());
        Self::from_parts(password, phrase, &keypair)
    }

    pub fn from_parts(password: &str, phrase: &RecoveryPhrase, keypair: &WalletKeypair) -> Self {
        Self {
            password: password.to_string(),
            secret_phrase: phrase.as_str().to_string(),
            public_key: keypair.address(),
            private_key: keypair.secret_key_hex(),
        }
    }

    /// The account address (public key hex).
    pub fn address(&self) -> &str {
        &self.public_key
    }

    /// Load the signing keypair.
    ///
    /// Both key fields must be present. Only `privateKey` is decoded; the
    /// public key is re-derived from it.
    pub fn keypair(&self) -> Result<WalletKeypair, RecordError> {
        if self.private_key.is_empty() || self.public_key.is_empty() {
            return Err(RecordError::KeyPairMissing);
        }
        WalletKeypair::from_secret_hex(&self.private_key).map_err(|_| RecordError::KeyPairMissing)
    }
}

impl std::fmt::Debug for IdentityRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityRecord")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
