//! The body posted to `POST /transaction`.
//!
//! ```json
//! {"signatures":["<sig hex>","<raw message>"],
//!  "message":{"account_keys":["<from>","<to>","11111111111111111111111111111111"],
//!             "recent_blockhash":"Hx7K9nQpM4vR2wLbCjFtE5sYuWd3A8zBgX6kNcVy",
//!             "instructions":[{"program_id_index":2,"accounts":[0,1],"data":<value>}]}}
//! ```
//!
//! Nodes parse this shape verbatim. The blockhash and program index are
//! fixed placeholders.

use serde::{Deserialize, Serialize};

use super::canonical::{js_number, JsNumber};
use super::signing::{SignError, SignedTransactionPayload};
use crate::config::{RECENT_BLOCKHASH_PLACEHOLDER, SYSTEM_PROGRAM_ADDRESS, TRANSFER_PROGRAM_ID_INDEX};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    /// `[signature_hex, rawSignature]`.
    pub signatures: Vec<String>,
    pub message: EnvelopeMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMessage {
    /// `[from, to, system program]`.
    pub account_keys: Vec<String>,
    pub recent_blockhash: String,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Index into `account_keys` of the program to run.
    pub program_id_index: u8,
    /// Indices into `account_keys`: sender, recipient.
    pub accounts: Vec<u8>,
    /// Transfer amount.
    pub data: JsNumber,
}

impl TransactionEnvelope {
    /// Wrap a signed transfer from `from` to `to` of `value`.
    pub fn new(
        from: &str,
        to: &str,
        value: f64,
        payload: &SignedTransactionPayload,
    ) -> Result<Self, SignError> {
        let data = js_number(value).ok_or(SignError::InvalidValue(value))?;
        Ok(Self {
            signatures: vec![payload.signature.clone(), payload.raw_signature.clone()],
            message: EnvelopeMessage {
                account_keys: vec![from.to_string(), to.to_string(), SYSTEM_PROGRAM_ADDRESS.to_string()],
                recent_blockhash: RECENT_BLOCKHASH_PLACEHOLDER.to_string(),
                instructions: vec![Instruction {
                    program_id_index: TRANSFER_PROGRAM_ID_INDEX,
                    accounts: vec![0, 1],
                    data,
                }],
            },
        })
    }

    pub fn signature(&self) -> Option<&str> {
        self.signatures.first().map(String::as_str)
    }

    pub fn raw_message(&self) -> Option<&str> {
        self.signatures.get(1).map(String::as_str)
    }
}
