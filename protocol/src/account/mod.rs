//! # Account Identifiers
//!
//! The three ways the protocol names a key on the wire:
//!
//! - [`AccountId`] - a plain account: a tagged 32-byte Ed25519 public key.
//! - [`MuxedAccount`] - an account that may carry a 64-bit multiplexing id,
//!   letting one underlying key serve many virtual sub-accounts (exchange
//!   deposit addresses being the classic use). Every transaction source is
//!   normalized to this representation.
//! - [`SignerKey`] - the extra-signer vocabulary used by transaction
//!   preconditions: a raw key, a pre-authorized transaction hash, the hash
//!   of an arbitrary preimage, or a key bound to a specific signed payload.
//!
//! For humans, account keys render as Bech32 strings with the `pulsar`
//! prefix (`pulsar1...`). Bech32 detects up to four character errors,
//! which matters when addresses travel through copy-paste.

use std::fmt;

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ADDRESS_HRP, SIGNER_PAYLOAD_MAX_BYTES};
use crate::crypto::keys::{PulsarKeypair, PulsarPublicKey};
use crate::xdr::{WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};

/// Wire discriminant for a plain Ed25519 public key.
const PUBLIC_KEY_TYPE_ED25519: i32 = 0;

/// Wire discriminants for the muxed-account union.
const KEY_TYPE_ED25519: i32 = 0x000;
const KEY_TYPE_MUXED_ED25519: i32 = 0x100;

/// Wire discriminants for the signer-key union.
const SIGNER_KEY_TYPE_ED25519: i32 = 0;
const SIGNER_KEY_TYPE_PRE_AUTH_TX: i32 = 1;
const SIGNER_KEY_TYPE_HASH_X: i32 = 2;
const SIGNER_KEY_TYPE_ED25519_SIGNED_PAYLOAD: i32 = 3;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur constructing or parsing account identifiers.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The Bech32 string could not be decoded.
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The decoded address has an unexpected human-readable prefix.
    #[error("invalid address prefix: expected '{expected}', got '{got}'")]
    InvalidHrp { expected: String, got: String },

    /// The decoded address payload has an unexpected length.
    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidDataLength { expected: usize, got: usize },

    /// A signed-payload signer exceeds the protocol-fixed payload bound.
    #[error("signer payload is {len} bytes, maximum is {max}")]
    SignerPayloadTooLong { len: usize, max: usize },
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A plain account identifier: a tagged Ed25519 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId {
    ed25519: [u8; 32],
}

impl AccountId {
    /// Wraps raw Ed25519 public key bytes.
    pub fn from_bytes(ed25519: [u8; 32]) -> Self {
        Self { ed25519 }
    }

    /// The account's underlying key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.ed25519
    }

    /// The account's public key as a verification-capable value.
    pub fn public_key(&self) -> PulsarPublicKey {
        PulsarPublicKey::from_bytes(self.ed25519)
    }

    /// Renders the account as a `pulsar1...` Bech32 address.
    pub fn to_address(&self) -> String {
        let hrp = Hrp::parse(ADDRESS_HRP).expect("static HRP is valid");
        bech32::encode::<Bech32>(hrp, &self.ed25519).expect("32 bytes always encode")
    }

    /// Parses a `pulsar1...` Bech32 address back into an account id.
    pub fn from_address(addr: &str) -> Result<Self, AccountError> {
        let (hrp, data) =
            bech32::decode(addr).map_err(|e| AccountError::Bech32Decode(e.to_string()))?;
        let expected = Hrp::parse(ADDRESS_HRP).expect("static HRP is valid");
        if hrp != expected {
            return Err(AccountError::InvalidHrp {
                expected: ADDRESS_HRP.to_string(),
                got: hrp.to_string(),
            });
        }
        if data.len() != 32 {
            return Err(AccountError::InvalidDataLength {
                expected: 32,
                got: data.len(),
            });
        }
        let mut ed25519 = [0u8; 32];
        ed25519.copy_from_slice(&data);
        Ok(Self { ed25519 })
    }
}

impl From<PulsarPublicKey> for AccountId {
    fn from(pk: PulsarPublicKey) -> Self {
        Self::from_bytes(*pk.as_bytes())
    }
}

impl From<&PulsarKeypair> for AccountId {
    fn from(kp: &PulsarKeypair) -> Self {
        Self::from_bytes(kp.public_key_bytes())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_address())
    }
}

impl XdrEncode for AccountId {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_i32(PUBLIC_KEY_TYPE_ED25519);
        w.write_fixed(&self.ed25519);
    }
}

impl XdrDecode for AccountId {
    const TYPE_NAME: &'static str = "AccountId";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            PUBLIC_KEY_TYPE_ED25519 => Ok(Self {
                ed25519: r.read_fixed::<32>(Self::TYPE_NAME)?,
            }),
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// MuxedAccount
// ---------------------------------------------------------------------------

/// An account reference that may carry a multiplexing id.
///
/// Transaction sources, payment destinations and fee sources all use this
/// representation on the wire. A plain [`AccountId`] converts losslessly
/// into the `Ed25519` arm; the `MuxedEd25519` arm adds a caller-assigned
/// 64-bit id on top of the same underlying key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MuxedAccount {
    /// A bare key, no multiplexing id.
    Ed25519([u8; 32]),
    /// A key plus a 64-bit sub-account id.
    MuxedEd25519 { id: u64, ed25519: [u8; 32] },
}

impl MuxedAccount {
    /// Wraps raw key bytes as an unmuxed account.
    pub fn from_bytes(ed25519: [u8; 32]) -> Self {
        Self::Ed25519(ed25519)
    }

    /// Attaches a multiplexing id to an account.
    pub fn muxed(account: AccountId, id: u64) -> Self {
        Self::MuxedEd25519 {
            id,
            ed25519: *account.as_bytes(),
        }
    }

    /// The underlying key bytes, with any multiplexing id stripped.
    pub fn ed25519(&self) -> &[u8; 32] {
        match self {
            Self::Ed25519(bytes) => bytes,
            Self::MuxedEd25519 { ed25519, .. } => ed25519,
        }
    }

    /// The plain account id behind this reference.
    pub fn account_id(&self) -> AccountId {
        AccountId::from_bytes(*self.ed25519())
    }

    /// The multiplexing id, when present.
    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Ed25519(_) => None,
            Self::MuxedEd25519 { id, .. } => Some(*id),
        }
    }
}

impl From<AccountId> for MuxedAccount {
    fn from(account: AccountId) -> Self {
        Self::Ed25519(*account.as_bytes())
    }
}

impl From<PulsarPublicKey> for MuxedAccount {
    fn from(pk: PulsarPublicKey) -> Self {
        Self::Ed25519(*pk.as_bytes())
    }
}

impl From<&PulsarKeypair> for MuxedAccount {
    fn from(kp: &PulsarKeypair) -> Self {
        Self::Ed25519(kp.public_key_bytes())
    }
}

impl fmt::Display for MuxedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(_) => write!(f, "{}", self.account_id()),
            Self::MuxedEd25519 { id, .. } => write!(f, "{}#{}", self.account_id(), id),
        }
    }
}

impl XdrEncode for MuxedAccount {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::Ed25519(bytes) => {
                w.write_i32(KEY_TYPE_ED25519);
                w.write_fixed(bytes);
            }
            Self::MuxedEd25519 { id, ed25519 } => {
                w.write_i32(KEY_TYPE_MUXED_ED25519);
                w.write_u64(*id);
                w.write_fixed(ed25519);
            }
        }
    }
}

impl XdrDecode for MuxedAccount {
    const TYPE_NAME: &'static str = "MuxedAccount";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            KEY_TYPE_ED25519 => Ok(Self::Ed25519(r.read_fixed::<32>(Self::TYPE_NAME)?)),
            KEY_TYPE_MUXED_ED25519 => {
                let id = r.read_u64()?;
                let ed25519 = r.read_fixed::<32>(Self::TYPE_NAME)?;
                Ok(Self::MuxedEd25519 { id, ed25519 })
            }
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// SignerKey
// ---------------------------------------------------------------------------

/// A key that can authorize a transaction as an extra precondition signer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignerKey {
    /// A plain Ed25519 public key.
    Ed25519([u8; 32]),
    /// The hash of a pre-authorized transaction.
    PreAuthTx([u8; 32]),
    /// SHA-256 hash of an arbitrary preimage; revealing the preimage signs.
    HashX([u8; 32]),
    /// A key that must sign this exact payload, not just the transaction.
    Ed25519SignedPayload { ed25519: [u8; 32], payload: Vec<u8> },
}

impl SignerKey {
    /// A signed-payload signer. The payload is bounded by
    /// [`SIGNER_PAYLOAD_MAX_BYTES`].
    pub fn ed25519_signed_payload(
        ed25519: [u8; 32],
        payload: Vec<u8>,
    ) -> Result<Self, AccountError> {
        if payload.len() > SIGNER_PAYLOAD_MAX_BYTES {
            return Err(AccountError::SignerPayloadTooLong {
                len: payload.len(),
                max: SIGNER_PAYLOAD_MAX_BYTES,
            });
        }
        Ok(Self::Ed25519SignedPayload { ed25519, payload })
    }
}

impl XdrEncode for SignerKey {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::Ed25519(bytes) => {
                w.write_i32(SIGNER_KEY_TYPE_ED25519);
                w.write_fixed(bytes);
            }
            Self::PreAuthTx(bytes) => {
                w.write_i32(SIGNER_KEY_TYPE_PRE_AUTH_TX);
                w.write_fixed(bytes);
            }
            Self::HashX(bytes) => {
                w.write_i32(SIGNER_KEY_TYPE_HASH_X);
                w.write_fixed(bytes);
            }
            Self::Ed25519SignedPayload { ed25519, payload } => {
                w.write_i32(SIGNER_KEY_TYPE_ED25519_SIGNED_PAYLOAD);
                w.write_fixed(ed25519);
                w.write_var_bytes(payload);
            }
        }
    }
}

impl XdrDecode for SignerKey {
    const TYPE_NAME: &'static str = "SignerKey";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            SIGNER_KEY_TYPE_ED25519 => Ok(Self::Ed25519(r.read_fixed::<32>(Self::TYPE_NAME)?)),
            SIGNER_KEY_TYPE_PRE_AUTH_TX => {
                Ok(Self::PreAuthTx(r.read_fixed::<32>(Self::TYPE_NAME)?))
            }
            SIGNER_KEY_TYPE_HASH_X => Ok(Self::HashX(r.read_fixed::<32>(Self::TYPE_NAME)?)),
            SIGNER_KEY_TYPE_ED25519_SIGNED_PAYLOAD => {
                let ed25519 = r.read_fixed::<32>(Self::TYPE_NAME)?;
                let payload =
                    r.read_var_bytes(SIGNER_PAYLOAD_MAX_BYTES as u32, Self::TYPE_NAME)?;
                Ok(Self::Ed25519SignedPayload { ed25519, payload })
            }
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        bytes
    }

    #[test]
    fn account_id_address_roundtrip() {
        let account = AccountId::from_bytes(sample_key());
        let addr = account.to_address();
        assert!(addr.starts_with("pulsar1"));
        assert_eq!(AccountId::from_address(&addr).unwrap(), account);
    }

    #[test]
    fn address_with_wrong_hrp_rejected() {
        let hrp = Hrp::parse("btc").unwrap();
        let encoded = bech32::encode::<Bech32>(hrp, &sample_key()).unwrap();
        let err = AccountId::from_address(&encoded).unwrap_err();
        assert!(matches!(err, AccountError::InvalidHrp { .. }));
    }

    #[test]
    fn address_with_wrong_length_rejected() {
        let hrp = Hrp::parse(ADDRESS_HRP).unwrap();
        let encoded = bech32::encode::<Bech32>(hrp, &[0u8; 16]).unwrap();
        let err = AccountId::from_address(&encoded).unwrap_err();
        assert!(matches!(
            err,
            AccountError::InvalidDataLength {
                expected: 32,
                got: 16
            }
        ));
    }

    #[test]
    fn garbage_address_rejected() {
        assert!(matches!(
            AccountId::from_address("definitely not bech32").unwrap_err(),
            AccountError::Bech32Decode(_)
        ));
    }

    #[test]
    fn account_id_wire_shape() {
        let account = AccountId::from_bytes(sample_key());
        let bytes = account.to_xdr();
        // 4-byte discriminant (0) then 32 key bytes.
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
        assert_eq!(&bytes[4..], &sample_key());
        assert_eq!(AccountId::from_xdr(&bytes).unwrap(), account);
    }

    #[test]
    fn account_id_unknown_discriminant() {
        let mut bytes = AccountId::from_bytes(sample_key()).to_xdr();
        bytes[3] = 9;
        let err = AccountId::from_xdr(&bytes).unwrap_err();
        assert_eq!(
            err,
            WireError::UnknownDiscriminant {
                type_name: "AccountId",
                value: 9
            }
        );
    }

    #[test]
    fn muxed_account_roundtrip_both_arms() {
        let plain = MuxedAccount::from_bytes(sample_key());
        assert_eq!(MuxedAccount::from_xdr(&plain.to_xdr()).unwrap(), plain);

        let muxed = MuxedAccount::muxed(AccountId::from_bytes(sample_key()), 42);
        let bytes = muxed.to_xdr();
        // Discriminant 0x100, then 8-byte id, then 32 key bytes.
        assert_eq!(&bytes[..4], &[0, 0, 1, 0]);
        assert_eq!(bytes.len(), 44);
        assert_eq!(MuxedAccount::from_xdr(&bytes).unwrap(), muxed);
    }

    #[test]
    fn muxed_account_strips_to_account_id() {
        let account = AccountId::from_bytes(sample_key());
        let muxed = MuxedAccount::muxed(account, 7);
        assert_eq!(muxed.account_id(), account);
        assert_eq!(muxed.id(), Some(7));
        assert_eq!(MuxedAccount::from(account).id(), None);
    }

    #[test]
    fn signer_key_roundtrip_all_arms() {
        let keys = [
            SignerKey::Ed25519(sample_key()),
            SignerKey::PreAuthTx([1u8; 32]),
            SignerKey::HashX([2u8; 32]),
            SignerKey::ed25519_signed_payload(sample_key(), vec![1, 2, 3]).unwrap(),
        ];
        for key in keys {
            assert_eq!(SignerKey::from_xdr(&key.to_xdr()).unwrap(), key);
        }
    }

    #[test]
    fn signer_payload_bound_enforced() {
        let err = SignerKey::ed25519_signed_payload(sample_key(), vec![0u8; 65]).unwrap_err();
        assert!(matches!(
            err,
            AccountError::SignerPayloadTooLong { len: 65, max: 64 }
        ));
    }

    #[test]
    fn signer_key_unknown_discriminant() {
        let err = SignerKey::from_xdr(&[0, 0, 0, 8]).unwrap_err();
        assert!(matches!(err, WireError::UnknownDiscriminant { value: 8, .. }));
    }

    #[test]
    fn display_includes_mux_id() {
        let account = AccountId::from_bytes(sample_key());
        let muxed = MuxedAccount::muxed(account, 99);
        assert!(muxed.to_string().ends_with("#99"));
        assert!(muxed.to_string().starts_with("pulsar1"));
    }
}
