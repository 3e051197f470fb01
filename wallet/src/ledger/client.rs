//! # Ledger Node Client
//!
//! The HTTP contract the wallet depends on:
//!
//! | Call                                 | Response                          |
//! |--------------------------------------|-----------------------------------|
//! | `GET {seed}/seed`                    | `["host:port", ...]`              |
//! | `GET {node}/transaction/balance/{a}` | `{"balance": "..."}`              |
//! | `GET {node}/transaction/key/{a}`     | `[ChainTransaction, ...]`         |
//! | `POST {node}/transaction`            | node-defined JSON                 |
//!
//! The first address from the seed server becomes the active node for the
//! life of the client. Seed entries are bare `host:port`; `http://` is
//! prefixed when no scheme is given.
//!
//! Every request carries the client's timeout. Nothing here retries.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::NATIVE_TOKEN;
use crate::transaction::{js_number, TransactionEnvelope};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The seed server answered with an empty list.
    #[error("no full node available")]
    NoNodeAvailable,
}

pub type ClientResult<T> = Result<T, ClientError>;

/// `GET /transaction/balance/{address}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Decimal string as the node formats it. Nodes that answer with a bare
    /// JSON number are accepted too.
    #[serde(deserialize_with = "string_or_number")]
    pub balance: String,
}

impl BalanceResponse {
    /// The balance as a number, for send validation. `None` if the node
    /// sent something unparseable.
    pub fn amount(&self) -> Option<f64> {
        self.balance.trim().parse().ok()
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected balance string, got {other}"
        ))),
    }
}

/// One entry of `GET /transaction/key/{address}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainTransaction {
    pub status: String,
    pub block: u64,
    pub timestamp: String,
    pub transaction_action: String,
    pub from: String,
    pub to: String,
    pub value: f64,
    pub transaction_fee: f64,
    pub gas_price: f64,
    pub transaction_hash: String,
    pub signature: String,
}

/// Which side of a transfer the wallet was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Sent,
    Received,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Sent => f.write_str("Sent"),
            Direction::Received => f.write_str("Received"),
        }
    }
}

impl ChainTransaction {
    /// `Sent` when `own_address` is the sender, otherwise `Received`.
    pub fn direction(&self, own_address: &str) -> Direction {
        if self.from == own_address {
            Direction::Sent
        } else {
            Direction::Received
        }
    }

    /// History line, e.g. `Sent 5 DCL`.
    pub fn describe(&self, own_address: &str) -> String {
        let value = js_number(self.value)
            .map(|n| n.to_string())
            .unwrap_or_else(|| self.value.to_string());
        format!("{} {} {}", self.direction(own_address), value, NATIVE_TOKEN)
    }
}

/// Read and write access to a ledger node.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Ask the seed server for nodes and pick the first. Returns the base
    /// URL of the chosen node.
    async fn discover_node(&self) -> ClientResult<String>;

    async fn balance(&self, address: &str) -> ClientResult<BalanceResponse>;

    async fn history(&self, address: &str) -> ClientResult<Vec<ChainTransaction>>;

    /// Post a signed transaction. Single attempt; the node's reply is
    /// returned as is.
    async fn broadcast(&self, envelope: &TransactionEnvelope) -> ClientResult<Value>;
}

/// [`LedgerApi`] over HTTP.
///
/// Node discovery is lazy: the first call that needs a node asks the seed
/// server, unless one was pinned with [`with_node`](Self::with_node).
pub struct HttpLedgerClient {
    http: Client,
    seed_server: String,
    node: RwLock<Option<String>>,
}

impl HttpLedgerClient {
    pub fn new(seed_server: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            seed_server: base_url(&seed_server.into()),
            node: RwLock::new(None),
        })
    }

    /// Skip discovery and talk to `node` directly.
    pub fn with_node(self, node: &str) -> Self {
        *self.node.write() = Some(base_url(node));
        self
    }

    /// The node in use, if one has been chosen yet.
    pub fn active_node(&self) -> Option<String> {
        self.node.read().clone()
    }

    async fn node(&self) -> ClientResult<String> {
        if let Some(node) = self.active_node() {
            return Ok(node);
        }
        self.discover_node().await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> ClientResult<T> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl LedgerApi for HttpLedgerClient {
    async fn discover_node(&self) -> ClientResult<String> {
        let url = format!("{}/seed", self.seed_server);
        let nodes: Vec<String> = self.get_json(&url).await?;
        let first = nodes.first().ok_or(ClientError::NoNodeAvailable)?;
        let node = base_url(first);
        info!(%node, candidates = nodes.len(), "full node selected");
        *self.node.write() = Some(node.clone());
        Ok(node)
    }

    async fn balance(&self, address: &str) -> ClientResult<BalanceResponse> {
        let url = format!("{}/transaction/balance/{}", self.node().await?, address);
        self.get_json(&url).await
    }

    async fn history(&self, address: &str) -> ClientResult<Vec<ChainTransaction>> {
        let url = format!("{}/transaction/key/{}", self.node().await?, address);
        self.get_json(&url).await
    }

    async fn broadcast(&self, envelope: &TransactionEnvelope) -> ClientResult<Value> {
        let url = format!("{}/transaction", self.node().await?);
        debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .json(envelope)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let reply = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) if body.trim().is_empty() => Value::Null,
            Err(_) => Value::String(body),
        };
        info!(%url, "transaction broadcast");
        Ok(reply)
    }
}

/// `host:port` → `http://host:port`; existing schemes are kept. Trailing
/// slashes are dropped so paths can be appended with `/`.
pub fn base_url(address: &str) -> String {
    let address = address.trim().trim_end_matches('/');
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}
