//! # Balance Poller
//!
//! Background refresh of balance and history for one address.
//!
//! ## Timing
//!
//! The first refresh runs as soon as the task starts, then once per
//! interval. Ticks that fall due while a refresh is still in flight are
//! delayed rather than bursted, so at most one balance request and one
//! history request are outstanding at any time.
//!
//! ## Failures
//!
//! A failed request is logged at `warn` and the last-known value is kept.
//! Balance and history fail independently.
//!
//! ## Shutdown
//!
//! [`BalancePoller::shutdown`] signals the task over a `watch` channel and
//! waits for it to exit. Dropping the handle has the same effect without
//! the wait. An in-flight refresh is abandoned, not awaited.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::client::{ChainTransaction, LedgerApi};

/// Last-known account state as seen by the poller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountSnapshot {
    /// `None` until the first successful balance fetch.
    pub balance: Option<String>,
    pub history: Vec<ChainTransaction>,
    /// Time of the last successful balance or history fetch.
    pub updated_at: Option<DateTime<Utc>>,
    /// Number of completed refresh rounds, successful or not.
    pub rounds: u64,
}

/// Handle to a running poll task.
pub struct BalancePoller {
    snapshot: watch::Receiver<AccountSnapshot>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl BalancePoller {
    /// Start polling `address` every `interval`. Must be called inside a
    /// tokio runtime.
    pub fn spawn(api: Arc<dyn LedgerApi>, address: impl Into<String>, interval: Duration) -> Self {
        let address = address.into();
        let (snapshot_tx, snapshot_rx) = watch::channel(AccountSnapshot::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(%address, interval_ms = interval.as_millis() as u64, "balance poller starting");
        let task = tokio::spawn(run(api, address, interval, snapshot_tx, shutdown_rx));

        Self {
            snapshot: snapshot_rx,
            shutdown: shutdown_tx,
            task,
        }
    }

    /// Current last-known state.
    pub fn snapshot(&self) -> AccountSnapshot {
        self.snapshot.borrow().clone()
    }

    /// A receiver that is notified after every refresh round.
    pub fn subscribe(&self) -> watch::Receiver<AccountSnapshot> {
        self.snapshot.clone()
    }

    /// Stop the task and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "balance poller task ended abnormally");
        }
    }
}

async fn run(
    api: Arc<dyn LedgerApi>,
    address: String,
    interval: Duration,
    snapshot: watch::Sender<AccountSnapshot>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = refresh(api.as_ref(), &address, &snapshot) => {}
            _ = shutdown.changed() => break,
        }
    }
    info!(%address, "balance poller stopped");
}

/// One poll round: fetch balance, then history, folding results into the
/// snapshot.
pub async fn refresh(api: &dyn LedgerApi, address: &str, snapshot: &watch::Sender<AccountSnapshot>) {
    let balance = match api.balance(address).await {
        Ok(response) => Some(response.balance),
        Err(e) => {
            warn!(error = %e, "balance refresh failed, keeping last value");
            None
        }
    };
    let history = match api.history(address).await {
        Ok(history) => Some(history),
        Err(e) => {
            warn!(error = %e, "history refresh failed, keeping last value");
            None
        }
    };

    snapshot.send_modify(|state| {
        let updated = balance.is_some() || history.is_some();
        if let Some(balance) = balance {
            state.balance = Some(balance);
        }
        if let Some(history) = history {
            state.history = history;
        }
        if updated {
            state.updated_at = Some(Utc::now());
        }
        state.rounds += 1;
        debug!(round = state.rounds, balance = ?state.balance, txs = state.history.len(), "poll round");
    });
}
