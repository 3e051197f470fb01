//! # CLI Interface
//!
//! Command-line structure for `dcl-wallet`, using `clap` derive. Global
//! flags select the store, seed server and logging; each subcommand is one
//! wallet action.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use dcl_wallet::config::NATIVE_TOKEN;
use dcl_wallet::MessageEncoding;

/// DCL wallet.
///
/// Creates or restores a post-quantum wallet identity from a recovery
/// phrase, shows balance and history, and signs and broadcasts transfers.
#[derive(Parser, Debug)]
#[command(
    name = "dcl-wallet",
    about = "DCL post-quantum wallet",
    version,
    propagate_version = true
)]
pub struct WalletCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand. Each falls back to its `DCL_*`
/// environment variable, then to the built-in default.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory of the on-disk identity store.
    #[arg(long, global = true, env = "DCL_STORE_PATH")]
    pub store_path: Option<PathBuf>,

    /// Seed server used to discover a ledger node.
    #[arg(long, global = true, env = "DCL_SEED_SERVER")]
    pub seed_server: Option<String>,

    /// Talk to this node directly instead of asking the seed server.
    #[arg(long, global = true, env = "DCL_NODE")]
    pub node: Option<String>,

    /// Per-request HTTP timeout in milliseconds.
    #[arg(long, global = true, env = "DCL_REQUEST_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Signed message format.
    #[arg(long, global = true, env = "DCL_MESSAGE_ENCODING")]
    pub message_encoding: Option<MessageEncoding>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "dcl_wallet=warn,dcl_wallet_cli=info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new 12-word recovery phrase and save a new identity.
    Create(CreateArgs),
    /// Restore an identity from an existing recovery phrase.
    Import(ImportArgs),
    /// Print the wallet address.
    Address,
    /// Fetch the current balance from the ledger node.
    Balance,
    /// List transactions involving this wallet.
    History(HistoryArgs),
    /// Sign and broadcast a transfer.
    Send(SendArgs),
    /// Poll balance and history until interrupted.
    Watch(WatchArgs),
    /// Delete the stored identity. Irreversible without the phrase.
    Forget(ForgetArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct PasswordArgs {
    /// Wallet password. Stored with the identity; not used for encryption.
    #[arg(long, env = "DCL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Repeat of `--password`.
    #[arg(long, env = "DCL_PASSWORD_CONFIRM", hide_env_values = true)]
    pub confirm_password: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub password: PasswordArgs,

    /// Do not ask to re-type the phrase.
    #[arg(long)]
    pub skip_confirm: bool,

    /// Replace an existing identity.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub password: PasswordArgs,

    /// Recovery phrase. Read from stdin when omitted.
    #[arg(long, env = "DCL_PHRASE", hide_env_values = true)]
    pub phrase: Option<String>,

    /// Replace an existing identity.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Print raw JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Recipient address.
    #[arg(long)]
    pub to: String,

    /// Amount in whole tokens.
    #[arg(long)]
    pub amount: f64,

    /// Token to send.
    #[arg(long, default_value = NATIVE_TOKEN)]
    pub token: String,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Poll period in milliseconds.
    #[arg(long, env = "DCL_POLL_INTERVAL_MS")]
    pub interval_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct ForgetArgs {
    /// Confirm deletion.
    #[arg(long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        WalletCli::command().debug_assert();
    }

    #[test]
    fn send_defaults_to_native_token() {
        let cli = WalletCli::try_parse_from(["dcl-wallet", "send", "--to", "bob", "--amount", "2.5"])
            .unwrap();
        match cli.command {
            Commands::Send(args) => {
                assert_eq!(args.to, "bob");
                assert_eq!(args.amount, 2.5);
                assert_eq!(args.token, "DCL");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn message_encoding_flag_parses() {
        let cli = WalletCli::try_parse_from([
            "dcl-wallet",
            "address",
            "--message-encoding",
            "canonical-json",
        ])
        .unwrap();
        assert_eq!(cli.global.message_encoding, Some(MessageEncoding::CanonicalJson));
    }
}
