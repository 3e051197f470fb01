//! # Ledger Module
//!
//! Everything that talks to a ledger node: the HTTP client, the background
//! balance poller, and the send flow that ties signing to broadcast.

pub mod client;
pub mod poller;
pub mod send;

pub use client::{
    base_url, BalanceResponse, ChainTransaction, ClientError, ClientResult, Direction,
    HttpLedgerClient, LedgerApi,
};
pub use poller::{AccountSnapshot, BalancePoller};
pub use send::{SendError, SendFlow, SendReceipt, SendRequest, SendState};
