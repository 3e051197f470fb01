//! # Transaction Module
//!
//! Building, signing, verifying and wrapping transfers.
//!
//! ```text
//! TransactionIntent ─► CanonicalTransaction ─► message ─► pad(128) ─► SLH-DSA sign
//!                                                 │
//!                                                 └──► SHA-256 ─► transactionHash
//! ```
//!
//! The result is a [`SignedTransactionPayload`], which
//! [`TransactionEnvelope`] wraps into the body the ledger node accepts.

pub mod canonical;
pub mod envelope;
pub mod message;
pub mod signing;
pub mod verification;

pub use canonical::{
    js_number, transaction_action, CanonicalTransaction, JsNumber, TransactionIntent,
};
pub use envelope::{EnvelopeMessage, Instruction, TransactionEnvelope};
pub use message::{pad_message, MessageEncoding};
pub use signing::{
    load_signing_identity, sign_transaction, sign_with_store, SignError, SignedTransactionPayload,
};
pub use verification::{verify_intent, verify_signed_transaction, VerifyError};
