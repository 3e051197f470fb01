//! From canonical transaction to the fixed-size buffer the signer sees.
//!
//! Two encodings exist for the signed message:
//!
//! - [`MessageEncoding::DigestList`]: the ledger's format. SHA-256 of the
//!   canonical JSON, written as 32 comma-separated decimal byte values.
//!   Always fits the 128-byte slot.
//! - [`MessageEncoding::CanonicalJson`]: the canonical JSON itself. Only
//!   short addresses fit; a real 128-hex-char sender address does not.
//!
//! Either way the message is then length-checked and zero-padded to
//! [`MESSAGE_SLOT_LENGTH`] bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::canonical::CanonicalTransaction;
use super::signing::SignError;
use crate::config::MESSAGE_SLOT_LENGTH;
use crate::crypto::hash::{digest_to_decimal_list, sha256};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageEncoding {
    #[default]
    DigestList,
    CanonicalJson,
}

impl MessageEncoding {
    /// The message string for `canonical` under this encoding.
    pub fn encode(self, canonical: &CanonicalTransaction) -> Result<String, SignError> {
        let json = canonical.to_json()?;
        Ok(match self {
            MessageEncoding::DigestList => digest_to_decimal_list(&sha256(json.as_bytes())),
            MessageEncoding::CanonicalJson => json,
        })
    }
}

impl fmt::Display for MessageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageEncoding::DigestList => f.write_str("digest-list"),
            MessageEncoding::CanonicalJson => f.write_str("canonical-json"),
        }
    }
}

impl FromStr for MessageEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "digest-list" | "digest" => Ok(MessageEncoding::DigestList),
            "canonical-json" | "json" => Ok(MessageEncoding::CanonicalJson),
            other => Err(format!("unknown message encoding: {other}")),
        }
    }
}

/// Zero-pad `message` to exactly [`MESSAGE_SLOT_LENGTH`] bytes.
///
/// Fails with [`SignError::MessageTooLong`] when the message does not fit;
/// nothing is ever truncated.
pub fn pad_message(message: &[u8]) -> Result<[u8; MESSAGE_SLOT_LENGTH], SignError> {
    if message.len() > MESSAGE_SLOT_LENGTH {
        return Err(SignError::MessageTooLong {
            len: message.len(),
            max: MESSAGE_SLOT_LENGTH,
        });
    }
    let mut padded = [0u8; MESSAGE_SLOT_LENGTH];
    padded[..message.len()].copy_from_slice(message);
    Ok(padded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::canonical::TransactionIntent;

    #[test]
    fn padding_keeps_prefix_and_zero_fills() {
        for len in [0usize, 1, 64, 127, 128] {
            let message = vec![0xAB; len];
            let padded = pad_message(&message).unwrap();
            assert_eq!(padded.len(), MESSAGE_SLOT_LENGTH);
            assert_eq!(&padded[..len], &message[..]);
            assert!(padded[len..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn padding_rejects_oversized_message() {
        let err = pad_message(&[1u8; 129]).unwrap_err();
        assert!(matches!(err, SignError::MessageTooLong { len: 129, max: 128 }));
    }

    #[test]
    fn digest_list_encoding_is_decimal_bytes_of_json_hash() {
        let canonical =
            CanonicalTransaction::from_intent(&TransactionIntent::new("a", "b", 1.0, "DCL")).unwrap();
        let message = MessageEncoding::DigestList.encode(&canonical).unwrap();
        let expected = sha256(canonical.to_json().unwrap().as_bytes());

        let parsed: Vec<u8> = message.split(',').map(|n| n.parse().unwrap()).collect();
        assert_eq!(parsed, expected.to_vec());
    }

    #[test]
    fn canonical_json_encoding_is_the_json() {
        let canonical =
            CanonicalTransaction::from_intent(&TransactionIntent::new("a", "b", 1.0, "DCL")).unwrap();
        assert_eq!(
            MessageEncoding::CanonicalJson.encode(&canonical).unwrap(),
            canonical.to_json().unwrap()
        );
    }

    #[test]
    fn parse_and_display() {
        for encoding in [MessageEncoding::DigestList, MessageEncoding::CanonicalJson] {
            assert_eq!(encoding.to_string().parse::<MessageEncoding>(), Ok(encoding));
        }
        assert_eq!("JSON".parse(), Ok(MessageEncoding::CanonicalJson));
        assert!("base64".parse::<MessageEncoding>().is_err());
    }
}
