//! # Wallet Configuration & Constants
//!
//! Every fixed number the wallet core depends on lives here. Most of them are
//! wire-level facts shared with the ledger node, so changing one is a
//! compatibility break, not a tuning knob.
//!
//! Runtime-tunable settings (seed server, timeouts, poll period) are grouped
//! in [`WalletConfig`], which can be built from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::transaction::MessageEncoding;

// ---------------------------------------------------------------------------
// Identity Derivation
// ---------------------------------------------------------------------------

/// SHA-256 digest length in bytes.
pub const DIGEST_LENGTH: usize = 32;

/// Number of digests concatenated into a derivation seed.
pub const SEED_DIGEST_COUNT: usize = 3;

/// Derivation seed length: three SHA-256 digests back to back.
/// SLH-DSA-SHA2-256f key generation consumes exactly `3 * n` bytes with `n = 32`.
pub const SEED_LENGTH: usize = DIGEST_LENGTH * SEED_DIGEST_COUNT;

/// Suffixes appended to the trimmed phrase for the second and third digest.
/// The first digest is taken over the bare phrase.
pub const SEED_SUFFIXES: [&str; 2] = ["1", "2"];

/// Minimum word count accepted when importing an existing phrase.
pub const MIN_IMPORT_WORDS: usize = 12;

/// Word count of a freshly generated phrase.
pub const GENERATED_PHRASE_WORDS: usize = 12;

// ---------------------------------------------------------------------------
// Signature Scheme
// ---------------------------------------------------------------------------

/// Signature scheme identifier, for logs and diagnostics.
pub const SIGNATURE_SCHEME: &str = "SLH-DSA-SHA2-256f";

/// SLH-DSA-SHA2-256f public key length (`PK.seed || PK.root`).
pub const PUBLIC_KEY_LENGTH: usize = 64;

/// SLH-DSA-SHA2-256f secret key length (`SK.seed || SK.prf || PK.seed || PK.root`).
pub const SECRET_KEY_LENGTH: usize = 128;

/// SLH-DSA-SHA2-256f signature length.
pub const SIGNATURE_LENGTH: usize = 49_856;

/// Fixed input slot of the signer. Messages are zero-padded up to this size
/// and anything longer is rejected outright.
pub const MESSAGE_SLOT_LENGTH: usize = 128;

// ---------------------------------------------------------------------------
// Ledger Envelope
// ---------------------------------------------------------------------------

/// Address of the system transfer program. Third entry of `account_keys`.
pub const SYSTEM_PROGRAM_ADDRESS: &str = "11111111111111111111111111111111";

/// Placeholder block hash the node currently expects verbatim.
pub const RECENT_BLOCKHASH_PLACEHOLDER: &str = "Hx7K9nQpM4vR2wLbCjFtE5sYuWd3A8zBgX6kNcVy";

/// Index of [`SYSTEM_PROGRAM_ADDRESS`] inside `account_keys`.
pub const TRANSFER_PROGRAM_ID_INDEX: u8 = 2;

/// Fee fields are hard-wired to zero; there is no fee market.
pub const TRANSACTION_FEE: u64 = 0;

/// See [`TRANSACTION_FEE`].
pub const GAS_PRICE: u64 = 0;

/// Native token symbol shown by the wallet.
pub const NATIVE_TOKEN: &str = "DCL";

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Balance/history refresh period.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default bound on any single HTTP request to the seed server or a node.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Key under which the identity record is stored.
pub const IDENTITY_RECORD_KEY: &str = "user_info";

/// Default on-disk location of the identity store, relative to the working
/// directory.
pub const DEFAULT_STORE_PATH: &str = ".dcl-wallet";

/// Default seed server used to discover a ledger node.
pub const DEFAULT_SEED_SERVER: &str = "http://127.0.0.1:8000";

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

mod env_vars {
    pub const SEED_SERVER: &str = "DCL_SEED_SERVER";
    pub const REQUEST_TIMEOUT_MS: &str = "DCL_REQUEST_TIMEOUT_MS";
    pub const POLL_INTERVAL_MS: &str = "DCL_POLL_INTERVAL_MS";
    pub const MESSAGE_ENCODING: &str = "DCL_MESSAGE_ENCODING";
    pub const STORE_PATH: &str = "DCL_STORE_PATH";
}

/// Settings a front end hands to the wallet core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Base URL of the seed server (`GET {seed_server}/seed`).
    pub seed_server: String,

    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,

    /// Period of the balance/history poller.
    pub poll_interval: Duration,

    /// How the canonical transaction is turned into signed bytes.
    pub message_encoding: MessageEncoding,

    /// Directory of the on-disk identity store.
    pub store_path: PathBuf,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            seed_server: DEFAULT_SEED_SERVER.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: POLL_INTERVAL,
            message_encoding: MessageEncoding::default(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl WalletConfig {
    /// Builds a configuration from `DCL_*` environment variables, falling
    /// back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(env_vars::SEED_SERVER) {
            tracing::debug!("using {} for seed discovery", env_vars::SEED_SERVER);
            config.seed_server = url;
        }
        if let Some(ms) = read_millis(env_vars::REQUEST_TIMEOUT_MS) {
            config.request_timeout = ms;
        }
        if let Some(ms) = read_millis(env_vars::POLL_INTERVAL_MS) {
            config.poll_interval = ms;
        }
        if let Ok(raw) = std::env::var(env_vars::MESSAGE_ENCODING) {
            match raw.parse() {
                Ok(encoding) => config.message_encoding = encoding,
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring message encoding"),
            }
        }
        if let Ok(path) = std::env::var(env_vars::STORE_PATH) {
            config.store_path = PathBuf::from(path);
        }

        config
    }
}

fn read_millis(var: &str) -> Option<Duration> {
    let raw = std::env::var(var).ok()?;
    match raw.parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            tracing::warn!(var, value = %raw, "ignoring non-positive or malformed duration");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_three_digests() {
        assert_eq!(SEED_LENGTH, 96);
        assert_eq!(SEED_SUFFIXES.len() + 1, SEED_DIGEST_COUNT);
    }

    #[test]
    fn key_sizes_match_parameter_set() {
        // 256f: n = 32, pk = 2n, sk = 4n.
        assert_eq!(PUBLIC_KEY_LENGTH, 2 * DIGEST_LENGTH);
        assert_eq!(SECRET_KEY_LENGTH, 4 * DIGEST_LENGTH);
    }

    #[test]
    fn program_index_points_at_system_program() {
        let keys = ["from", "to", SYSTEM_PROGRAM_ADDRESS];
        assert_eq!(keys[TRANSFER_PROGRAM_ID_INDEX as usize], SYSTEM_PROGRAM_ADDRESS);
    }

    #[test]
    fn defaults_use_protocol_constants() {
        let config = WalletConfig::default();
        assert_eq!(config.poll_interval, POLL_INTERVAL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.message_encoding, MessageEncoding::DigestList);
    }
}
