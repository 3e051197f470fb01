// Copyright (c) 2026 DCL Wallet Contributors. MIT License.
// See LICENSE for details.

//! # DCL Wallet — Core Library
//!
//! The part of the DCL wallet that has to be right: turning a recovery
//! phrase into a post-quantum keypair, and turning a transfer into a signed
//! transaction a ledger node will accept. Screens, modals and QR codes live
//! elsewhere and call in with plain values.
//!
//! ## Architecture
//!
//! - **crypto** — SHA-256 helpers and SLH-DSA-SHA2-256f keys.
//! - **identity** — recovery phrases, seed derivation, the identity record
//!   and where it is stored.
//! - **transaction** — canonical transaction, signed message, 128-byte
//!   padding, signing, verification, broadcast envelope.
//! - **ledger** — HTTP client for the ledger node, background balance
//!   poller, and the send state machine.
//! - **config** — protocol constants and runtime configuration.
//! - **error** — the coarse error taxonomy front ends show to users.
//!
//! ## Compatibility
//!
//! Key derivation, the signed message format and the stored record layout
//! are fixed by wallets already in the wild. Changing any of them changes
//! addresses or breaks existing records, so they are reproduced exactly,
//! weak spots included (see DESIGN.md).

pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod transaction;

pub use config::WalletConfig;
pub use error::{WalletError, WalletResult};
pub use identity::derive_identity;
pub use transaction::{sign_transaction, MessageEncoding, SignedTransactionPayload, TransactionIntent};
