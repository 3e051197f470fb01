// Copyright (c) 2026 DCL Wallet Contributors. MIT License.
// See LICENSE for details.

//! # DCL Wallet CLI
//!
//! Entry point for the `dcl-wallet` binary: a headless front end over the
//! `dcl-wallet` core.
//!
//! - `create`  — generate a phrase and save a new identity
//! - `import`  — restore an identity from a phrase
//! - `address` — print the wallet address
//! - `balance` — fetch the balance
//! - `history` — list transactions
//! - `send`    — sign and broadcast a transfer
//! - `watch`   — poll balance and history until Ctrl-C
//! - `forget`  — delete the stored identity
//! - `version` — print build information

mod cli;
mod logging;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use dcl_wallet::config::{MESSAGE_SLOT_LENGTH, NATIVE_TOKEN, SIGNATURE_SCHEME};
use dcl_wallet::identity::{
    confirm_password, IdentityRecord, IdentityStore, RecoveryPhrase, SledIdentityStore,
};
use dcl_wallet::ledger::{
    AccountSnapshot, BalancePoller, ChainTransaction, HttpLedgerClient, LedgerApi, SendFlow,
    SendRequest,
};
use dcl_wallet::{WalletConfig, WalletError};

use cli::{Commands, GlobalArgs, WalletCli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = WalletCli::parse();
    logging::init_logging(&cli.global.log_level, cli.global.log_format.into());
    let config = wallet_config(&cli.global);

    match cli.command {
        Commands::Create(args) => create(&config, args),
        Commands::Import(args) => import(&config, args),
        Commands::Address => address(&config),
        Commands::Balance => balance(&config, &cli.global).await,
        Commands::History(args) => history(&config, &cli.global, args).await,
        Commands::Send(args) => send(&config, &cli.global, args).await,
        Commands::Watch(args) => watch(&config, &cli.global, args).await,
        Commands::Forget(args) => forget(&config, args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Environment defaults overlaid with explicit flags.
fn wallet_config(global: &GlobalArgs) -> WalletConfig {
    let mut config = WalletConfig::from_env();
    if let Some(path) = &global.store_path {
        config.store_path = path.clone();
    }
    if let Some(url) = &global.seed_server {
        config.seed_server = url.clone();
    }
    if let Some(ms) = global.timeout_ms.filter(|ms| *ms > 0) {
        config.request_timeout = Duration::from_millis(ms);
    }
    if let Some(encoding) = global.message_encoding {
        config.message_encoding = encoding;
    }
    config
}

fn open_store(config: &WalletConfig) -> Result<SledIdentityStore> {
    SledIdentityStore::open(&config.store_path).with_context(|| {
        format!("failed to open identity store at {}", config.store_path.display())
    })
}

fn load_record(store: &dyn IdentityStore) -> Result<IdentityRecord> {
    let record = store
        .load()
        .context("failed to read identity record")?
        .ok_or(WalletError::AuthenticationMissing)
        .context("no wallet on this device; run `dcl-wallet create` or `dcl-wallet import`")?;
    Ok(record)
}

fn ledger_client(config: &WalletConfig, global: &GlobalArgs) -> Result<HttpLedgerClient> {
    let client = HttpLedgerClient::new(&config.seed_server, config.request_timeout)
        .context("failed to build HTTP client")?;
    Ok(match &global.node {
        Some(node) => client.with_node(node),
        None => client,
    })
}

/// Refuse to overwrite an identity unless asked to.
fn ensure_vacant(store: &dyn IdentityStore, force: bool) -> Result<()> {
    if !force && store.load().context("failed to read identity record")?.is_some() {
        bail!("a wallet already exists on this device; pass --force to replace it");
    }
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

// ---------------------------------------------------------------------------
// Identity commands
// ---------------------------------------------------------------------------

fn create(config: &WalletConfig, args: cli::CreateArgs) -> Result<()> {
    confirm_password(&args.password.password, &args.password.confirm_password)
        .map_err(WalletError::from)?;
    let store = open_store(config)?;
    ensure_vacant(&store, args.force)?;

    let phrase = RecoveryPhrase::generate();
    println!("Recovery phrase (the only way to restore this wallet):");
    println!();
    println!("    {}", phrase.as_str());
    println!();

    if !args.skip_confirm {
        let typed = prompt_line("Re-type the phrase to confirm: ")?;
        if !phrase.confirms(&typed) {
            bail!("phrase does not match; nothing was saved");
        }
    }

    let record = IdentityRecord::create(&args.password.password, &phrase);
    store.save(&record).context("failed to save identity")?;
    println!("Wallet created.");
    println!("  Address : {}", record.address());
    Ok(())
}

fn import(config: &WalletConfig, args: cli::ImportArgs) -> Result<()> {
    let text = match args.phrase {
        Some(phrase) => phrase,
        None => prompt_line("Recovery phrase: ")?,
    };
    let phrase = RecoveryPhrase::import(&text).map_err(WalletError::from)?;
    confirm_password(&args.password.password, &args.password.confirm_password)
        .map_err(WalletError::from)?;

    let store = open_store(config)?;
    ensure_vacant(&store, args.force)?;

    let record = IdentityRecord::create(&args.password.password, &phrase);
    store.save(&record).context("failed to save identity")?;
    println!("Wallet imported.");
    println!("  Address : {}", record.address());
    Ok(())
}

fn address(config: &WalletConfig) -> Result<()> {
    let store = open_store(config)?;
    println!("{}", load_record(&store)?.address());
    Ok(())
}

fn forget(config: &WalletConfig, args: cli::ForgetArgs) -> Result<()> {
    if !args.yes {
        bail!("this deletes the wallet's keys; pass --yes if the recovery phrase is safe");
    }
    let store = open_store(config)?;
    store.clear().context("failed to delete identity")?;
    println!("Wallet removed from this device.");
    Ok(())
}

// ---------------------------------------------------------------------------
// Ledger commands
// ---------------------------------------------------------------------------

async fn balance(config: &WalletConfig, global: &GlobalArgs) -> Result<()> {
    let record = load_record(&open_store(config)?)?;
    let client = ledger_client(config, global)?;
    let response = client
        .balance(record.address())
        .await
        .map_err(WalletError::from)?;
    println!("{} {}", response.balance, NATIVE_TOKEN);
    Ok(())
}

async fn history(config: &WalletConfig, global: &GlobalArgs, args: cli::HistoryArgs) -> Result<()> {
    let record = load_record(&open_store(config)?)?;
    let client = ledger_client(config, global)?;
    let txs = client
        .history(record.address())
        .await
        .map_err(WalletError::from)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&txs)?);
        return Ok(());
    }
    if txs.is_empty() {
        println!("No transactions yet.");
    }
    for tx in &txs {
        println!("{}", history_line(tx, record.address()));
    }
    Ok(())
}

fn history_line(tx: &ChainTransaction, own_address: &str) -> String {
    let hash = tx.transaction_hash.get(..16).unwrap_or(&tx.transaction_hash);
    format!(
        "{}  {:<20} {:<10} {}..",
        format_date(&tx.timestamp),
        tx.describe(own_address),
        tx.status,
        hash
    )
}

fn format_date(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

async fn send(config: &WalletConfig, global: &GlobalArgs, args: cli::SendArgs) -> Result<()> {
    let store = open_store(config)?;
    let record = load_record(&store)?;
    let client = ledger_client(config, global)?;

    let shown = client
        .balance(record.address())
        .await
        .map_err(WalletError::from)?;
    let balance = shown
        .amount()
        .with_context(|| format!("node reported an unreadable balance: {}", shown.balance))?;

    let request = SendRequest::new(args.to, args.amount, args.token);
    let mut flow = SendFlow::new(config.message_encoding);
    let result = flow.execute(&store, &client, &request, balance).await;
    tracing::debug!(transitions = ?flow.transitions(), "send flow finished");

    let receipt = result
        .map_err(WalletError::from)
        .with_context(|| format!("send failed in state {}", flow.state()))?;
    println!("Transaction sent.");
    println!("  Hash   : {}", receipt.transaction_hash());
    println!("  Amount : {} {}", request.value, request.token_name);
    println!("  To     : {}", request.to);
    Ok(())
}

async fn watch(config: &WalletConfig, global: &GlobalArgs, args: cli::WatchArgs) -> Result<()> {
    let record = load_record(&open_store(config)?)?;
    let api: Arc<dyn LedgerApi> = Arc::new(ledger_client(config, global)?);
    let interval = args
        .interval_ms
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or(config.poll_interval);

    let poller = BalancePoller::spawn(api, record.address(), interval);
    let mut updates = poller.subscribe();
    eprintln!("Watching {} every {:?}; Ctrl-C to stop.", record.address(), interval);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                print_snapshot(&snapshot, record.address());
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received, stopping poller");
                break;
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}

fn print_snapshot(snapshot: &AccountSnapshot, own_address: &str) {
    let when = snapshot
        .updated_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".into());
    let balance = snapshot.balance.as_deref().unwrap_or("?");
    println!(
        "[{when}] balance {balance} {NATIVE_TOKEN}, {} transactions",
        snapshot.history.len()
    );
    if let Some(latest) = snapshot.history.last() {
        println!("           latest: {}", history_line(latest, own_address));
    }
}

fn print_version() {
    println!("dcl-wallet {}", env!("CARGO_PKG_VERSION"));
    println!("scheme     {}", SIGNATURE_SCHEME);
    println!("msg slot   {} bytes", MESSAGE_SLOT_LENGTH);
}
