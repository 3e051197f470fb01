//! Checking a [`SignedTransactionPayload`] the way a ledger node does.
//!
//! The verifier never sees the padded buffer. It rebuilds it from
//! `rawSignature`, so the check also confirms that padding is reproducible.

use thiserror::Error;

use super::canonical::{CanonicalTransaction, TransactionIntent};
use super::message::{pad_message, MessageEncoding};
use super::signing::{SignError, SignedTransactionPayload};
use crate::crypto::hash::sha256_hex;
use crate::crypto::keys::{KeyError, WalletPublicKey, WalletSignature};

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("message cannot be rebuilt: {0}")]
    Message(#[from] SignError),

    #[error("signature does not verify")]
    BadSignature,

    #[error("transaction hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("signed message does not match the transaction")]
    MessageMismatch,
}

/// Verify `payload` against the sender's public key.
///
/// Checks, in order: the transaction hash is the SHA-256 of the unpadded
/// message, and the signature covers the zero-padded message.
pub fn verify_signed_transaction(
    public_key_hex: &str,
    payload: &SignedTransactionPayload,
) -> Result<(), VerifyError> {
    let public_key = WalletPublicKey::from_hex(public_key_hex)?;
    let message = payload.raw_signature.as_bytes();

    let actual = sha256_hex(message);
    if actual != payload.transaction_hash {
        return Err(VerifyError::HashMismatch {
            expected: payload.transaction_hash.clone(),
            actual,
        });
    }

    let padded = pad_message(message)?;
    let signature = WalletSignature::from_hex(&payload.signature)?;
    if !public_key.verify(&padded, &signature) {
        return Err(VerifyError::BadSignature);
    }
    Ok(())
}

/// Like [`verify_signed_transaction`], and additionally check that the
/// signed message is the one `intent` encodes to. The sender key is
/// `intent.from`.
pub fn verify_intent(
    intent: &TransactionIntent,
    payload: &SignedTransactionPayload,
    encoding: MessageEncoding,
) -> Result<(), VerifyError> {
    let canonical = CanonicalTransaction::from_intent(intent)?;
    if encoding.encode(&canonical)? != payload.raw_signature {
        return Err(VerifyError::MessageMismatch);
    }
    verify_signed_transaction(&intent.from, payload)
}
