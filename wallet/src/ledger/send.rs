//! # Send Flow
//!
//! One send attempt, from filled-in form to node reply:
//!
//! ```text
//! Idle ─► Composing ─► Signing ─┬─► Signed ─► Broadcasting ─┬─► Confirmed
//!                               └─► Failed                  └─► BroadcastFailed
//! ```
//!
//! A request that fails validation stays in `Composing`. Nothing is retried;
//! after a failure the user starts a new attempt from scratch. There is no
//! outbox, so a failed broadcast leaves no local trace.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use super::client::{ClientError, LedgerApi};
use crate::identity::IdentityStore;
use crate::transaction::{
    load_signing_identity, sign_transaction, MessageEncoding, SignError, SignedTransactionPayload,
    TransactionEnvelope, TransactionIntent,
};

#[derive(Debug, Error)]
pub enum SendError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid amount {value}: must be greater than 0 and at most the balance {balance}")]
    InvalidAmount { value: f64, balance: f64 },

    #[error("signing failed: {0}")]
    Sign(#[from] SignError),

    #[error("broadcast failed: {0}")]
    Broadcast(#[from] ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SendState {
    Idle,
    Composing,
    Signing,
    Signed,
    Failed,
    Broadcasting,
    Confirmed,
    BroadcastFailed,
}

impl SendState {
    /// Whether `next` may follow `self`.
    pub fn can_advance_to(self, next: SendState) -> bool {
        use SendState::*;
        matches!(
            (self, next),
            (Idle, Composing)
                | (Composing, Signing)
                | (Signing, Signed)
                | (Signing, Failed)
                | (Signed, Broadcasting)
                | (Broadcasting, Confirmed)
                | (Broadcasting, BroadcastFailed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SendState::Failed | SendState::Confirmed | SendState::BroadcastFailed
        )
    }
}

impl fmt::Display for SendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The form fields of a send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub to: String,
    pub value: f64,
    pub token_name: String,
}

impl SendRequest {
    pub fn new(to: impl Into<String>, value: f64, token_name: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            value,
            token_name: token_name.into(),
        }
    }

    /// `to` and `token_name` must be non-blank and `value` in `(0, balance]`.
    pub fn validate(&self, balance: f64) -> Result<(), SendError> {
        if self.to.trim().is_empty() {
            return Err(SendError::MissingField("to"));
        }
        if self.token_name.trim().is_empty() {
            return Err(SendError::MissingField("tokenName"));
        }
        // NaN fails both comparisons.
        if !(self.value > 0.0 && self.value <= balance) {
            return Err(SendError::InvalidAmount {
                value: self.value,
                balance,
            });
        }
        Ok(())
    }
}

/// What a confirmed send produced.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub payload: SignedTransactionPayload,
    pub envelope: TransactionEnvelope,
    /// Body of the node's reply.
    pub response: Value,
}

impl SendReceipt {
    pub fn transaction_hash(&self) -> &str {
        &self.payload.transaction_hash
    }
}

/// Drives one send attempt and records every state it passes through.
#[derive(Debug, Clone)]
pub struct SendFlow {
    encoding: MessageEncoding,
    state: SendState,
    transitions: Vec<SendState>,
}

impl SendFlow {
    pub fn new(encoding: MessageEncoding) -> Self {
        Self {
            encoding,
            state: SendState::Idle,
            transitions: vec![SendState::Idle],
        }
    }

    pub fn state(&self) -> SendState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`.
    pub fn transitions(&self) -> &[SendState] {
        &self.transitions
    }

    /// Back to `Idle` for a fresh attempt.
    pub fn reset(&mut self) {
        self.state = SendState::Idle;
        self.transitions = vec![SendState::Idle];
    }

    fn advance(&mut self, next: SendState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal send transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
        self.transitions.push(next);
    }

    /// Validate, sign with the stored identity, and broadcast.
    ///
    /// `balance` is the last balance shown to the user. The sender is the
    /// stored record's address.
    pub async fn execute(
        &mut self,
        store: &dyn IdentityStore,
        api: &dyn LedgerApi,
        request: &SendRequest,
        balance: f64,
    ) -> Result<SendReceipt, SendError> {
        if self.state != SendState::Idle {
            self.reset();
        }
        self.advance(SendState::Composing);
        request.validate(balance)?;

        self.advance(SendState::Signing);
        let (intent, payload) = match self.sign(store, request) {
            Ok(signed) => signed,
            Err(e) => {
                self.advance(SendState::Failed);
                warn!(error = %e, "send aborted during signing");
                return Err(e.into());
            }
        };
        let envelope = match TransactionEnvelope::new(&intent.from, &intent.to, intent.value, &payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                self.advance(SendState::Failed);
                return Err(e.into());
            }
        };
        self.advance(SendState::Signed);

        self.advance(SendState::Broadcasting);
        match api.broadcast(&envelope).await {
            Ok(response) => {
                self.advance(SendState::Confirmed);
                info!(tx_hash = %payload.transaction_hash, "send confirmed");
                Ok(SendReceipt {
                    payload,
                    envelope,
                    response,
                })
            }
            Err(e) => {
                self.advance(SendState::BroadcastFailed);
                warn!(error = %e, tx_hash = %payload.transaction_hash, "broadcast failed");
                Err(e.into())
            }
        }
    }

    fn sign(
        &self,
        store: &dyn IdentityStore,
        request: &SendRequest,
    ) -> Result<(TransactionIntent, SignedTransactionPayload), SignError> {
        let (keypair, from) = load_signing_identity(store)?;
        let intent = TransactionIntent::new(
            from,
            request.to.clone(),
            request.value,
            request.token_name.clone(),
        );
        let payload = sign_transaction(&keypair, &intent, self.encoding)?;
        Ok((intent, payload))
    }
}

impl Default for SendFlow {
    fn default() -> Self {
        Self::new(MessageEncoding::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{IdentityRecord, MemoryIdentityStore, RecoveryPhrase};
    use crate::ledger::client::{BalanceResponse, ChainTransaction, ClientResult};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct RecordingNode {
        fail: bool,
        posted: Mutex<Vec<TransactionEnvelope>>,
    }

    impl RecordingNode {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                posted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LedgerApi for RecordingNode {
        async fn discover_node(&self) -> ClientResult<String> {
            Ok("http://mock".into())
        }

        async fn balance(&self, _address: &str) -> ClientResult<BalanceResponse> {
            Ok(BalanceResponse { balance: "100".into() })
        }

        async fn history(&self, _address: &str) -> ClientResult<Vec<ChainTransaction>> {
            Ok(Vec::new())
        }

        async fn broadcast(&self, envelope: &TransactionEnvelope) -> ClientResult<Value> {
            if self.fail {
                return Err(ClientError::NoNodeAvailable);
            }
            self.posted.lock().push(envelope.clone());
            Ok(serde_json::json!({ "ok": true }))
        }
    }

    fn store() -> MemoryIdentityStore {
        let phrase = RecoveryPhrase::from_stored(
            "apple apple apple apple apple apple apple apple apple apple apple apple",
        );
        MemoryIdentityStore::with_record(&IdentityRecord::create("pw", &phrase)).unwrap()
    }

    #[test]
    fn validation_rules() {
        assert!(SendRequest::new("bob", 5.0, "DCL").validate(5.0).is_ok());
        assert!(matches!(
            SendRequest::new("", 5.0, "DCL").validate(10.0),
            Err(SendError::MissingField("to"))
        ));
        assert!(matches!(
            SendRequest::new("bob", 5.0, " ").validate(10.0),
            Err(SendError::MissingField("tokenName"))
        ));
        for bad in [0.0, -1.0, 10.5, f64::NAN] {
            assert!(matches!(
                SendRequest::new("bob", bad, "DCL").validate(10.0),
                Err(SendError::InvalidAmount { .. })
            ));
        }
    }

    #[test]
    fn legal_transitions() {
        assert!(SendState::Idle.can_advance_to(SendState::Composing));
        assert!(SendState::Signing.can_advance_to(SendState::Failed));
        assert!(!SendState::Composing.can_advance_to(SendState::Broadcasting));
        assert!(!SendState::Confirmed.can_advance_to(SendState::Signing));
        assert!(SendState::BroadcastFailed.is_terminal());
        assert!(!SendState::Signed.is_terminal());
    }

    #[tokio::test]
    async fn successful_send_walks_every_state() {
        let store = store();
        let node = RecordingNode::new(false);
        let mut flow = SendFlow::default();

        let receipt = flow
            .execute(&store, &node, &SendRequest::new("bob", 5.0, "DCL"), 100.0)
            .await
            .unwrap();

        assert_eq!(
            flow.transitions(),
            &[
                SendState::Idle,
                SendState::Composing,
                SendState::Signing,
                SendState::Signed,
                SendState::Broadcasting,
                SendState::Confirmed,
            ]
        );
        let posted = node.posted.lock();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0], receipt.envelope);
        assert_eq!(posted[0].raw_message(), Some(receipt.payload.raw_signature.as_str()));
        assert_eq!(receipt.transaction_hash().len(), 64);
    }

    #[tokio::test]
    async fn over_balance_stays_composing() {
        let node = RecordingNode::new(false);
        let mut flow = SendFlow::default();
        let err = flow
            .execute(&store(), &node, &SendRequest::new("bob", 500.0, "DCL"), 100.0)
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::InvalidAmount { .. }));
        assert_eq!(flow.state(), SendState::Composing);
        assert!(node.posted.lock().is_empty());
    }

    #[tokio::test]
    async fn missing_identity_fails_signing() {
        let node = RecordingNode::new(false);
        let mut flow = SendFlow::default();
        let err = flow
            .execute(&MemoryIdentityStore::new(), &node, &SendRequest::new("bob", 1.0, "DCL"), 100.0)
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::Sign(SignError::UserNotAuthenticated)));
        assert_eq!(flow.state(), SendState::Failed);
    }

    #[tokio::test]
    async fn incomplete_record_fails_signing() {
        let node = RecordingNode::new(false);
        let mut flow = SendFlow::default();
        let store = MemoryIdentityStore::with_raw(r#"{"password":"pw","secretPhrase":"x"}"#);
        let err = flow
            .execute(&store, &node, &SendRequest::new("bob", 1.0, "DCL"), 100.0)
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::Sign(SignError::KeyPairMissing)));
        assert_eq!(flow.state(), SendState::Failed);
        assert!(node.posted.lock().is_empty());
    }

    #[tokio::test]
    async fn oversized_message_fails_signing() {
        let node = RecordingNode::new(false);
        let mut flow = SendFlow::new(MessageEncoding::CanonicalJson);
        let err = flow
            .execute(&store(), &node, &SendRequest::new("bob", 1.0, "DCL"), 100.0)
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::Sign(SignError::MessageTooLong { .. })));
        assert_eq!(flow.state(), SendState::Failed);
        assert!(node.posted.lock().is_empty());
    }

    #[tokio::test]
    async fn node_error_is_broadcast_failed() {
        let node = RecordingNode::new(true);
        let mut flow = SendFlow::default();
        let err = flow
            .execute(&store(), &node, &SendRequest::new("bob", 1.0, "DCL"), 100.0)
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::Broadcast(_)));
        assert_eq!(flow.state(), SendState::BroadcastFailed);

        // A new attempt starts over from Idle.
        let ok = RecordingNode::new(false);
        flow.execute(&store(), &ok, &SendRequest::new("bob", 1.0, "DCL"), 100.0)
            .await
            .unwrap();
        assert_eq!(flow.transitions()[0], SendState::Idle);
        assert_eq!(flow.state(), SendState::Confirmed);
    }
}
