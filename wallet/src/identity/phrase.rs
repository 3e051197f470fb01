//! Recovery phrases and sign-up input checks.
//!
//! A recovery phrase is the wallet's master secret: every key is a pure
//! function of it (see [`super::derive_identity`]). Phrases enter the wallet
//! two ways:
//!
//! - **Sign-up**: [`RecoveryPhrase::generate`] draws 12 words at random. The
//!   user must then type it back; [`RecoveryPhrase::confirms`] checks that.
//! - **Import**: [`RecoveryPhrase::import`] accepts a typed phrase of at
//!   least 12 words.
//!
//! Words come from the English BIP-39 list but the phrase carries no BIP-39
//! checksum, and the seed is not derived the BIP-39 way. Any phrase the user
//! types is a valid wallet.

use std::fmt;

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::config::{GENERATED_PHRASE_WORDS, MIN_IMPORT_WORDS};

/// Errors raised while collecting identity input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhraseError {
    #[error("recovery phrase is empty")]
    Empty,

    #[error("please enter a valid {min}+ word secret phrase (got {got} words)")]
    TooFewWords { min: usize, got: usize },

    #[error("password must not be empty")]
    PasswordEmpty,

    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Strip leading and trailing whitespace the way ECMAScript
/// `String.prototype.trim` does.
///
/// That set adds U+FEFF to Unicode `White_Space` and leaves out U+0085, so
/// a phrase pasted with a byte-order mark still derives the same wallet and
/// one ending in NEL does not.
pub fn trim_phrase(text: &str) -> &str {
    text.trim_matches(is_trim_whitespace)
}

fn is_trim_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c != '\u{0085}' && c.is_whitespace())
}

/// A recovery phrase as the user typed or was shown it.
///
/// The untrimmed text is kept because that is what the identity record
/// stores; derivation and comparisons always use [`trimmed`](Self::trimmed).
#[derive(Clone, PartialEq, Eq)]
pub struct RecoveryPhrase {
    text: String,
}

impl RecoveryPhrase {
    /// Generate a fresh 12-word phrase from the OS RNG.
    pub fn generate() -> Self {
        let list = bip39::Language::English.word_list();
        let mut rng = OsRng;
        let words: Vec<&str> = (0..GENERATED_PHRASE_WORDS)
            .filter_map(|_| list.choose(&mut rng).copied())
            .collect();
        Self {
            text: words.join(" "),
        }
    }

    /// Accept a phrase typed at the import screen.
    ///
    /// Words are counted by splitting the trimmed input on single spaces,
    /// so runs of spaces count as extra (empty) words. That mirrors the
    /// check existing users passed when they imported.
    pub fn import(input: &str) -> Result<Self, PhraseError> {
        let trimmed = trim_phrase(input);
        if trimmed.is_empty() {
            return Err(PhraseError::Empty);
        }
        let got = trimmed.split(' ').count();
        if got < MIN_IMPORT_WORDS {
            return Err(PhraseError::TooFewWords {
                min: MIN_IMPORT_WORDS,
                got,
            });
        }
        Ok(Self {
            text: input.to_string(),
        })
    }

    /// Wrap an already-stored phrase without re-validating it.
    pub fn from_stored(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The phrase exactly as entered.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The derivation input: leading/trailing whitespace removed.
    pub fn trimmed(&self) -> &str {
        trim_phrase(&self.text)
    }

    pub fn word_count(&self) -> usize {
        self.trimmed().split_whitespace().count()
    }

    /// `true` when `typed` matches this phrase after trimming both sides.
    /// Exact string comparison: word order and inner spacing matter.
    pub fn confirms(&self, typed: &str) -> bool {
        trim_phrase(typed) == self.trimmed()
    }
}

impl fmt::Debug for RecoveryPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoveryPhrase(<{} words>)", self.word_count())
    }
}

/// Sign-up/import password check: both fields filled in and identical.
///
/// The password is stored alongside the keys but is not used to encrypt
/// anything.
pub fn confirm_password(password: &str, confirmation: &str) -> Result<(), PhraseError> {
    if password.is_empty() || confirmation.is_empty() {
        return Err(PhraseError::PasswordEmpty);
    }
    if password != confirmation {
        return Err(PhraseError::PasswordMismatch);
    }
    Ok(())
}
