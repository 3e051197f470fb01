//! Transaction signing.
//!
//! The procedure, for a given intent and keypair:
//!
//! 1. Build the [`CanonicalTransaction`] (fees fixed at zero).
//! 2. Encode it as the message string ([`MessageEncoding`]).
//! 3. Reject messages over 128 UTF-8 bytes.
//! 4. Zero-pad to 128 bytes and sign the padded buffer.
//! 5. Hash the *unpadded* message for the transaction hash.
//!
//! Nothing is retried and nothing partial is returned: an attempt either
//! yields a complete [`SignedTransactionPayload`] or an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::canonical::{CanonicalTransaction, TransactionIntent};
use super::message::{pad_message, MessageEncoding};
use crate::crypto::hash::sha256_hex;
use crate::crypto::keys::{KeyError, WalletKeypair};
use crate::identity::{IdentityStore, RecordError, StoreError};

/// Errors that abort a signing attempt.
#[derive(Debug, Error)]
pub enum SignError {
    /// No identity record on this device.
    #[error("user not authenticated")]
    UserNotAuthenticated,

    /// The record exists but the key fields are unusable.
    #[error("key pair missing in identity record")]
    KeyPairMissing,

    #[error("message too long for SLH-DSA slot: {len} bytes (max {max})")]
    MessageTooLong { len: usize, max: usize },

    #[error("transfer value {0} has no JSON representation")]
    InvalidValue(f64),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("identity store error: {0}")]
    Store(#[from] StoreError),
}

impl From<RecordError> for SignError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::KeyPairMissing => SignError::KeyPairMissing,
        }
    }
}

/// What signing hands to the broadcast step. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransactionPayload {
    /// The signed message before padding.
    pub raw_signature: String,
    /// Hex of the SLH-DSA signature over the padded message.
    pub signature: String,
    /// Hex SHA-256 of the unpadded message; the lookup key on the ledger.
    pub transaction_hash: String,
}

/// Sign `intent` with `keypair`.
///
/// `intent.from` is taken as given; the caller makes sure it is the
/// keypair's address.
///
/// ```no_run
/// use dcl_wallet::identity::derive_identity;
/// use dcl_wallet::transaction::{sign_transaction, MessageEncoding, TransactionIntent};
///
/// let keypair = derive_identity("apple apple apple apple apple apple apple apple apple apple apple apple");
/// let intent = TransactionIntent::new(keypair.address(), "11111111111111111111111111111111", 5.0, "DCL");
/// let signed = sign_transaction(&keypair, &intent, MessageEncoding::DigestList).unwrap();
/// assert_eq!(signed.transaction_hash.len(), 64);
/// ```
pub fn sign_transaction(
    keypair: &WalletKeypair,
    intent: &TransactionIntent,
    encoding: MessageEncoding,
) -> Result<SignedTransactionPayload, SignError> {
    let canonical = CanonicalTransaction::from_intent(intent)?;
    let message = encoding.encode(&canonical)?;
    let message_bytes = message.as_bytes();
    let padded = pad_message(message_bytes)?;

    debug!(
        encoding = %encoding,
        message_len = message_bytes.len(),
        "signing transaction"
    );
    let signature = keypair.sign(&padded)?;
    let transaction_hash = sha256_hex(message_bytes);

    info!(
        to = %intent.to,
        value = intent.value,
        token = %intent.token_name,
        tx_hash = %transaction_hash,
        "transaction signed"
    );

    Ok(SignedTransactionPayload {
        raw_signature: message,
        signature: signature.to_hex(),
        transaction_hash,
    })
}

/// Load the signing keypair and sender address from `store`.
///
/// An empty store is [`SignError::UserNotAuthenticated`]; a record with
/// unusable key fields is [`SignError::KeyPairMissing`].
pub fn load_signing_identity(
    store: &dyn IdentityStore,
) -> Result<(WalletKeypair, String), SignError> {
    let record = store.load()?.ok_or(SignError::UserNotAuthenticated)?;
    let keypair = record.keypair()?;
    Ok((keypair, record.address().to_string()))
}

/// Load the keypair from `store` and sign `intent` with it.
///
/// This is the entry point a front end calls. Store failures map as in
/// [`load_signing_identity`].
pub fn sign_with_store(
    store: &dyn IdentityStore,
    intent: &TransactionIntent,
    encoding: MessageEncoding,
) -> Result<SignedTransactionPayload, SignError> {
    let (keypair, _) = load_signing_identity(store)?;
    sign_transaction(&keypair, intent, encoding)
}
