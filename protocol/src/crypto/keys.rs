//! Ed25519 keypair, public key and signature wrappers.
//!
//! Every account on a PULSAR network is anchored by an Ed25519 keypair.
//! This module handles creation, serialization and the sign/verify
//! operations the transaction layer consumes.
//!
//! Private keys are zeroized on drop by ed25519-dalek, key generation uses
//! the OS RNG, and key bytes are never logged. Keep it that way.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors that can occur during key operations.
///
/// Intentionally vague about *why* something failed; error messages must
/// not leak details about key material.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

// ---------------------------------------------------------------------------
// PulsarKeypair
// ---------------------------------------------------------------------------

/// An Ed25519 keypair controlling a PULSAR account.
///
/// Deliberately does NOT implement `Serialize`/`Deserialize`: exporting a
/// private key should be an explicit act via
/// [`secret_key_bytes`](Self::secret_key_bytes), not a side effect of
/// serializing a struct that happens to contain one.
///
/// # Examples
///
/// ```
/// use pulsar_protocol::crypto::keys::PulsarKeypair;
///
/// let kp = PulsarKeypair::generate();
/// let sig = kp.sign(b"payload digest");
/// assert!(kp.verify(b"payload digest", &sig));
/// ```
pub struct PulsarKeypair {
    signing_key: SigningKey,
}

/// The public half of a PULSAR account identity, safe to share.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulsarPublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a message. Always 64 bytes when produced by
/// [`PulsarKeypair::sign`]; anything else simply fails verification.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulsarSignature {
    bytes: Vec<u8>,
}

impl PulsarKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    ///
    /// In Ed25519 the 32-byte secret key *is* the seed. A weak seed makes
    /// a weak key; produce it with a CSPRNG or KDF.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a keypair from a hex-encoded secret key.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidSecretKey);
        }
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        seed.copy_from_slice(&bytes);
        Ok(Self::from_seed(&seed))
    }

    /// The public key associated with this keypair.
    pub fn public_key(&self) -> PulsarPublicKey {
        PulsarPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Raw public key bytes. This is the identity that appears on-chain.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a message.
    ///
    /// Ed25519 signatures are deterministic: the same (key, message) pair
    /// always produces the same signature, so no randomness is consumed at
    /// signing time.
    pub fn sign(&self, message: &[u8]) -> PulsarSignature {
        let sig = self.signing_key.sign(message);
        PulsarSignature {
            bytes: sig.to_bytes().to_vec(),
        }
    }

    /// Verify a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &PulsarSignature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Export the raw 32-byte secret key material. Handle with care: do not
    /// log it, do not transmit it in plaintext.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Clone for PulsarKeypair {
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for PulsarKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material, not even partially.
        write!(f, "PulsarKeypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for PulsarKeypair {
    /// Equality compares public keys only. Comparing secret material in a
    /// non-constant-time way is a bad habit, and for identity purposes the
    /// public key is what matters.
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for PulsarKeypair {}

// ---------------------------------------------------------------------------
// PulsarPublicKey
// ---------------------------------------------------------------------------

impl PulsarPublicKey {
    /// Create a public key from raw bytes without point validation.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Create a public key from a byte slice, validating length and that
    /// the bytes represent a valid Ed25519 point.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != 32 {
            return Err(KeyError::InvalidPublicKey);
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// The 4-byte signature hint for this key: its last four bytes.
    ///
    /// Decorated signatures carry the hint so a verifier holding several
    /// candidate keys can skip the ones that cannot possibly match.
    pub fn signature_hint(&self) -> [u8; 4] {
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&self.bytes[28..]);
        hint
    }

    /// Verify a signature against this public key.
    ///
    /// Returns a plain boolean; callers almost always want a yes/no answer
    /// rather than the specific failure mode.
    pub fn verify(&self, message: &[u8], signature: &PulsarSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.bytes.as_slice().try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        verifying_key
            .verify(message, &DalekSignature::from_bytes(&sig_bytes))
            .is_ok()
    }

    /// Hex-encoded representation, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        if bytes.len() != 32 {
            return Err(KeyError::InvalidPublicKey);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { bytes: arr })
    }

    /// Base58-encoded representation, for compact display.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.bytes).into_string()
    }
}

impl Hash for PulsarPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for PulsarPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PulsarPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PulsarPublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// PulsarSignature
// ---------------------------------------------------------------------------

impl PulsarSignature {
    /// Create a signature from the raw 64-byte representation.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex-encoded signature, 128 characters for a valid signature.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a hex-encoded signature.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 64 {
            return Err(hex::FromHexError::OddLength);
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for PulsarSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PulsarSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "PulsarSignature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "PulsarSignature({})", hex_str)
        }
    }
}
