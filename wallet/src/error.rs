//! Error taxonomy surfaced to front ends.
//!
//! Module errors ([`SignError`], [`ClientError`], ...) carry detail for logs.
//! A front end mostly needs to know which of a handful of situations it is
//! in, and [`WalletError`] is that coarse view.

use thiserror::Error;

use crate::crypto::keys::KeyError;
use crate::identity::{PhraseError, RecordError, StoreError};
use crate::ledger::{ClientError, SendError};
use crate::transaction::{SignError, VerifyError};

#[derive(Debug, Error)]
pub enum WalletError {
    /// No identity record on this device.
    #[error("user not authenticated")]
    AuthenticationMissing,

    /// An identity record exists but its key fields are unusable.
    #[error("key material missing from identity record")]
    KeyMaterialMissing,

    /// The signed message does not fit the 128-byte slot.
    #[error("message too long: {len} bytes (max {max})")]
    MessageTooLong {
        /// Length of the unpadded message.
        len: usize,
        /// Slot size.
        max: usize,
    },

    /// Any ledger or seed-server request that failed or timed out.
    #[error("network failure: {0}")]
    NetworkFailure(#[from] ClientError),

    /// Bad user input: phrase, password, or send form.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Anything else that should not happen with well-formed data.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type WalletResult<T> = Result<T, WalletError>;

impl From<SignError> for WalletError {
    fn from(e: SignError) -> Self {
        match e {
            SignError::UserNotAuthenticated => WalletError::AuthenticationMissing,
            SignError::KeyPairMissing => WalletError::KeyMaterialMissing,
            SignError::MessageTooLong { len, max } => WalletError::MessageTooLong { len, max },
            SignError::InvalidValue(v) => WalletError::InvalidInput(format!("amount {v}")),
            SignError::Store(e) => WalletError::Storage(e),
            other => WalletError::Internal(other.to_string()),
        }
    }
}

impl From<SendError> for WalletError {
    fn from(e: SendError) -> Self {
        match e {
            SendError::Sign(e) => e.into(),
            SendError::Broadcast(e) => WalletError::NetworkFailure(e),
            invalid => WalletError::InvalidInput(invalid.to_string()),
        }
    }
}

impl From<PhraseError> for WalletError {
    fn from(e: PhraseError) -> Self {
        WalletError::InvalidInput(e.to_string())
    }
}

impl From<RecordError> for WalletError {
    fn from(_: RecordError) -> Self {
        WalletError::KeyMaterialMissing
    }
}

impl From<KeyError> for WalletError {
    fn from(e: KeyError) -> Self {
        WalletError::Internal(e.to_string())
    }
}

impl From<VerifyError> for WalletError {
    fn from(e: VerifyError) -> Self {
        WalletError::Internal(e.to_string())
    }
}
