//! # Key Management
//!
//! SLH-DSA-SHA2-256f keypairs for wallet identities.
//!
//! SLH-DSA (FIPS 205, formerly SPHINCS+) is a stateless hash-based signature
//! scheme. Its security rests only on the hash function, which is why the
//! ledger picked it as its post-quantum scheme. The "f" parameter sets trade
//! signature size (~49 KB) for signing speed.
//!
//! Key generation here is always deterministic: the three FIPS 205 seeds
//! (`SK.seed`, `SK.prf`, `PK.seed`) are sliced out of a 96-byte
//! [`DerivationSeed`], so the same recovery phrase always restores the same
//! account.
//!
//! ## Encoding
//!
//! Keys and signatures travel as lowercase hex. The public key hex *is* the
//! on-chain address. Secret key bytes are never logged.

use std::fmt;

use slh_dsa::signature::{Keypair, Signer, Verifier};
use slh_dsa::{Sha2_256f, Signature, SigningKey, VerifyingKey};
use thiserror::Error;

use crate::config::{DIGEST_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use crate::identity::seed::DerivationSeed;

/// Errors that can occur during key operations.
///
/// Messages never include key bytes.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key: expected {SECRET_KEY_LENGTH} bytes of hex")]
    InvalidSecretKey,

    #[error("invalid public key: expected {PUBLIC_KEY_LENGTH} bytes of hex")]
    InvalidPublicKey,

    #[error("invalid signature encoding")]
    InvalidSignature,

    #[error("signing failed")]
    SigningFailed,
}

/// A wallet identity keypair.
///
/// Deliberately not `Serialize`: exporting the secret key is done through
/// [`secret_key_hex`](Self::secret_key_hex) and nowhere else.
#[derive(Clone)]
pub struct WalletKeypair {
    signing_key: SigningKey<Sha2_256f>,
}

/// The public half of an identity; also the account address.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletPublicKey {
    verifying_key: VerifyingKey<Sha2_256f>,
}

/// An SLH-DSA signature.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletSignature {
    bytes: Vec<u8>,
}

impl WalletKeypair {
    /// Deterministic key generation from a derivation seed.
    ///
    /// The seed is split as `SK.seed || SK.prf || PK.seed`, which is the
    /// layout FIPS 205 `slh_keygen_internal` takes and the one other
    /// SLH-DSA implementations use for seeded keygen.
    pub fn from_seed(seed: &DerivationSeed) -> Self {
        let bytes = seed.as_bytes();
        let (sk_seed, rest) = bytes.split_at(DIGEST_LENGTH);
        let (sk_prf, pk_seed) = rest.split_at(DIGEST_LENGTH);
        let signing_key = SigningKey::<Sha2_256f>::slh_keygen_internal(sk_seed, sk_prf, pk_seed);
        Self { signing_key }
    }

    /// Rebuild a keypair from the 128-byte encoded secret key.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidSecretKey);
        }
        let signing_key =
            SigningKey::<Sha2_256f>::try_from(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Rebuild a keypair from the hex form stored in the identity record.
    pub fn from_secret_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        Self::from_secret_bytes(&bytes)
    }

    pub fn public_key(&self) -> WalletPublicKey {
        WalletPublicKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Hex of the public key, i.e. the account address.
    pub fn address(&self) -> String {
        self.public_key().to_hex()
    }

    /// Sign `message` with the pure FIPS 205 interface and an empty context.
    ///
    /// Signing is deterministic for a given key and message.
    pub fn sign(&self, message: &[u8]) -> Result<WalletSignature, KeyError> {
        let signature: Signature<Sha2_256f> = self
            .signing_key
            .try_sign(message)
            .map_err(|_| KeyError::SigningFailed)?;
        Ok(WalletSignature {
            bytes: signature.to_bytes().as_slice().to_vec(),
        })
    }

    pub fn verify(&self, message: &[u8], signature: &WalletSignature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Encoded secret key bytes. Handle with care.
    pub fn secret_key_bytes(&self) -> Vec<u8> {
        self.signing_key.to_bytes().as_slice().to_vec()
    }

    /// Hex of [`secret_key_bytes`](Self::secret_key_bytes), the form written
    /// to the identity record.
    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.secret_key_bytes())
    }
}

impl fmt::Debug for WalletKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletKeypair")
            .field("public_key", &self.public_key())
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl WalletPublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(KeyError::InvalidPublicKey);
        }
        let verifying_key =
            VerifyingKey::<Sha2_256f>::try_from(bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { verifying_key })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.verifying_key.to_bytes().as_slice().to_vec()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Returns `false` for malformed signatures instead of erroring.
    pub fn verify(&self, message: &[u8], signature: &WalletSignature) -> bool {
        let Ok(signature) = Signature::<Sha2_256f>::try_from(signature.bytes.as_slice()) else {
            return false;
        };
        self.verifying_key.verify(message, &signature).is_ok()
    }
}

impl fmt::Debug for WalletPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "WalletPublicKey({}..)", &hex[..16])
    }
}

impl fmt::Display for WalletPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl WalletSignature {
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for WalletSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletSignature({} bytes)", self.bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SIGNATURE_LENGTH;

    fn keypair(fill: u8) -> WalletKeypair {
        WalletKeypair::from_seed(&DerivationSeed::from_bytes([fill; 96]))
    }

    #[test]
    fn seeded_keygen_is_deterministic() {
        let a = keypair(7);
        let b = keypair(7);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.secret_key_bytes(), b.secret_key_bytes());
    }

    #[test]
    fn different_seeds_give_different_keys() {
        assert_ne!(keypair(1).public_key(), keypair(2).public_key());
    }

    #[test]
    fn key_lengths() {
        let kp = keypair(3);
        assert_eq!(kp.secret_key_bytes().len(), SECRET_KEY_LENGTH);
        assert_eq!(kp.public_key().to_bytes().len(), PUBLIC_KEY_LENGTH);
        assert_eq!(kp.address().len(), PUBLIC_KEY_LENGTH * 2);
    }

    #[test]
    fn secret_key_layout_embeds_seed_parts() {
        // sk = SK.seed || SK.prf || PK.seed || PK.root
        let mut raw = [0u8; 96];
        raw[..32].fill(0xA1);
        raw[32..64].fill(0xB2);
        raw[64..].fill(0xC3);
        let kp = WalletKeypair::from_seed(&DerivationSeed::from_bytes(raw));
        let sk = kp.secret_key_bytes();
        assert_eq!(&sk[..96], &raw[..]);
        // The public key starts with PK.seed.
        assert_eq!(&kp.public_key().to_bytes()[..32], &raw[64..]);
    }

    #[test]
    fn sign_and_verify() {
        let kp = keypair(9);
        let sig = kp.sign(b"transfer").unwrap();
        assert_eq!(sig.as_bytes().len(), SIGNATURE_LENGTH);
        assert!(kp.verify(b"transfer", &sig));
        assert!(!kp.verify(b"transfes", &sig));
    }

    #[test]
    fn secret_hex_roundtrip_preserves_identity() {
        let kp = keypair(4);
        let restored = WalletKeypair::from_secret_hex(&kp.secret_key_hex()).unwrap();
        assert_eq!(kp.public_key(), restored.public_key());
    }

    #[test]
    fn malformed_key_hex_rejected() {
        assert!(matches!(
            WalletKeypair::from_secret_hex("zz"),
            Err(KeyError::InvalidSecretKey)
        ));
        assert!(matches!(
            WalletKeypair::from_secret_hex("abcd"),
            Err(KeyError::InvalidSecretKey)
        ));
        assert!(matches!(
            WalletPublicKey::from_hex("abcd"),
            Err(KeyError::InvalidPublicKey)
        ));
    }

    #[test]
    fn truncated_signature_does_not_verify() {
        let kp = keypair(5);
        let sig = kp.sign(b"msg").unwrap();
        let short = WalletSignature::from_hex(&sig.to_hex()[..64]).unwrap();
        assert!(!kp.verify(b"msg", &short));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = keypair(6);
        let rendered = format!("{:?}", kp);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&kp.secret_key_hex()));
    }
}
