//! Decorated signatures and transaction envelopes.
//!
//! An envelope is what actually travels: a transaction of one of the
//! three shapes plus the signatures collected over its signature-payload
//! hash. Signatures are "decorated" with a 4-byte hint (the last four
//! bytes of the signing key) so a verifier holding several candidate
//! keys can skip the ones that cannot match.

use serde::{Deserialize, Serialize};

use crate::config::{MAX_SIGNATURES, SIGNATURE_MAX_BYTES};
use crate::crypto::keys::PulsarKeypair;
use crate::xdr::{WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};

use super::builder::{Transaction, TransactionV0};
use super::fee_bump::FeeBumpTransaction;
use super::signing::{Network, TaggedTransaction, TransactionSignaturePayload};
use super::TxError;

/// Envelope-type discriminants on the wire.
const ENVELOPE_TYPE_TX_V0: i32 = 0;
const ENVELOPE_TYPE_TX: i32 = 2;
const ENVELOPE_TYPE_TX_FEE_BUMP: i32 = 5;

// ---------------------------------------------------------------------------
// DecoratedSignature
// ---------------------------------------------------------------------------

/// A signature plus the 4-byte hint identifying which key produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
    /// Last four bytes of the signing public key.
    pub hint: [u8; 4],
    /// The signature bytes, at most 64.
    pub signature: Vec<u8>,
}

impl DecoratedSignature {
    /// Signs a payload hash with a keypair and decorates the result.
    pub fn sign(keypair: &PulsarKeypair, payload_hash: &[u8; 32]) -> Self {
        Self {
            hint: keypair.public_key().signature_hint(),
            signature: keypair.sign(payload_hash).as_bytes().to_vec(),
        }
    }
}

impl XdrEncode for DecoratedSignature {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_fixed(&self.hint);
        w.write_var_bytes(&self.signature);
    }
}

impl XdrDecode for DecoratedSignature {
    const TYPE_NAME: &'static str = "DecoratedSignature";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            hint: r.read_fixed::<4>(Self::TYPE_NAME)?,
            signature: r.read_var_bytes(SIGNATURE_MAX_BYTES as u32, Self::TYPE_NAME)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Envelope bodies
// ---------------------------------------------------------------------------

/// A legacy-shape transaction with its signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionV0Envelope {
    pub tx: TransactionV0,
    pub signatures: Vec<DecoratedSignature>,
}

/// A current-shape transaction with its signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionV1Envelope {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

/// A fee-bump transaction with its signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBumpTransactionEnvelope {
    pub tx: FeeBumpTransaction,
    pub signatures: Vec<DecoratedSignature>,
}

macro_rules! impl_envelope_body_xdr {
    ($ty:ty, $name:literal) => {
        impl XdrEncode for $ty {
            fn encode(&self, w: &mut XdrWriter) {
                self.tx.encode(w);
                self.signatures.encode(w);
            }
        }

        impl XdrDecode for $ty {
            const TYPE_NAME: &'static str = $name;

            fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
                Ok(Self {
                    tx: XdrDecode::decode(r)?,
                    signatures: r.read_vec(MAX_SIGNATURES as u32, "signatures")?,
                })
            }
        }
    };
}

impl_envelope_body_xdr!(TransactionV0Envelope, "TransactionV0Envelope");
impl_envelope_body_xdr!(TransactionV1Envelope, "TransactionV1Envelope");
impl_envelope_body_xdr!(FeeBumpTransactionEnvelope, "FeeBumpTransactionEnvelope");

// ---------------------------------------------------------------------------
// TransactionEnvelope
// ---------------------------------------------------------------------------

/// The envelope union: one of the three transaction shapes plus its
/// signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionEnvelope {
    /// A legacy-shape transaction.
    TxV0(TransactionV0Envelope),
    /// A current-shape transaction.
    Tx(TransactionV1Envelope),
    /// A fee bump.
    FeeBump(FeeBumpTransactionEnvelope),
}

impl TransactionEnvelope {
    /// An unsigned envelope around a current-shape transaction.
    pub fn for_transaction(tx: Transaction) -> Self {
        Self::Tx(TransactionV1Envelope {
            tx,
            signatures: Vec::new(),
        })
    }

    /// An unsigned envelope around a legacy-shape transaction.
    pub fn for_transaction_v0(tx: TransactionV0) -> Self {
        Self::TxV0(TransactionV0Envelope {
            tx,
            signatures: Vec::new(),
        })
    }

    /// An unsigned envelope around a fee bump.
    pub fn for_fee_bump(tx: FeeBumpTransaction) -> Self {
        Self::FeeBump(FeeBumpTransactionEnvelope {
            tx,
            signatures: Vec::new(),
        })
    }

    /// The signature payload this envelope signs on the given network.
    ///
    /// A legacy-shape envelope is normalized to the current shape here,
    /// so its payload matches what the current-shape equivalent would
    /// sign.
    pub fn signature_payload(&self, network: &Network) -> TransactionSignaturePayload {
        let tagged = match self {
            Self::TxV0(env) => TaggedTransaction::wrap_transaction_v0(&env.tx),
            Self::Tx(env) => TaggedTransaction::wrap_transaction(env.tx.clone()),
            Self::FeeBump(env) => TaggedTransaction::wrap_fee_bump(env.tx.clone()),
        };
        TransactionSignaturePayload::new(network, tagged)
    }

    /// The transaction hash on the given network: SHA-256 of the
    /// signature payload bytes.
    pub fn hash(&self, network: &Network) -> [u8; 32] {
        self.signature_payload(network).hash()
    }

    /// Signs the envelope for a network and appends the decorated
    /// signature.
    ///
    /// Fails with [`TxError::TooManySignatures`] past the per-envelope
    /// bound.
    pub fn sign(&mut self, network: &Network, keypair: &PulsarKeypair) -> Result<(), TxError> {
        let hash = self.hash(network);
        let signature = DecoratedSignature::sign(keypair, &hash);
        let signatures = match self {
            Self::TxV0(env) => &mut env.signatures,
            Self::Tx(env) => &mut env.signatures,
            Self::FeeBump(env) => &mut env.signatures,
        };
        if signatures.len() >= MAX_SIGNATURES {
            return Err(TxError::TooManySignatures);
        }
        signatures.push(signature);
        Ok(())
    }

    /// The signatures collected so far.
    pub fn signatures(&self) -> &[DecoratedSignature] {
        match self {
            Self::TxV0(env) => &env.signatures,
            Self::Tx(env) => &env.signatures,
            Self::FeeBump(env) => &env.signatures,
        }
    }
}

impl XdrEncode for TransactionEnvelope {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::TxV0(env) => {
                w.write_i32(ENVELOPE_TYPE_TX_V0);
                env.encode(w);
            }
            Self::Tx(env) => {
                w.write_i32(ENVELOPE_TYPE_TX);
                env.encode(w);
            }
            Self::FeeBump(env) => {
                w.write_i32(ENVELOPE_TYPE_TX_FEE_BUMP);
                env.encode(w);
            }
        }
    }
}

impl XdrDecode for TransactionEnvelope {
    const TYPE_NAME: &'static str = "TransactionEnvelope";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            ENVELOPE_TYPE_TX_V0 => Ok(Self::TxV0(TransactionV0Envelope::decode(r)?)),
            ENVELOPE_TYPE_TX => Ok(Self::Tx(TransactionV1Envelope::decode(r)?)),
            ENVELOPE_TYPE_TX_FEE_BUMP => Ok(Self::FeeBump(FeeBumpTransactionEnvelope::decode(r)?)),
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
    use crate::account::AccountId;
    use crate::transaction::operation::{Asset, Operation};

    fn keypair() -> PulsarKeypair {
        PulsarKeypair::from_seed(&[11u8; 32])
    }

    fn sample_tx(keypair: &PulsarKeypair) -> Transaction {
        let dest = AccountId::from_bytes([2u8; 32]);
        Transaction::new(keypair, 3)
            .with_operation(Operation::payment(dest, Asset::native(), 250))
            .unwrap()
    }

    #[test]
    fn sign_appends_a_verifying_decorated_signature() {
        let kp = keypair();
        let mut envelope = TransactionEnvelope::for_transaction(sample_tx(&kp));
        let network = Network::testnet();
        envelope.sign(&network, &kp).unwrap();

        assert_eq!(envelope.signatures().len(), 1);
        let sig = &envelope.signatures()[0];
        assert_eq!(sig.hint, kp.public_key().signature_hint());

        let hash = envelope.hash(&network);
        let pulsar_sig = crate::crypto::keys::PulsarSignature::from_bytes(
            sig.signature.as_slice().try_into().unwrap(),
        );
        assert!(kp.public_key().verify(&hash, &pulsar_sig));
    }

    #[test]
    fn signing_does_not_change_the_hash() {
        let kp = keypair();
        let mut envelope = TransactionEnvelope::for_transaction(sample_tx(&kp));
        let network = Network::testnet();
        let before = envelope.hash(&network);
        envelope.sign(&network, &kp).unwrap();
        assert_eq!(envelope.hash(&network), before);
    }

    #[test]
    fn signature_bound_enforced() {
        let kp = keypair();
        let mut envelope = TransactionEnvelope::for_transaction(sample_tx(&kp));
        let network = Network::testnet();
        for _ in 0..MAX_SIGNATURES {
            envelope.sign(&network, &kp).unwrap();
        }
        assert!(matches!(
            envelope.sign(&network, &kp).unwrap_err(),
            TxError::TooManySignatures
        ));
    }

    #[test]
    fn envelope_roundtrip_all_shapes() {
        let kp = keypair();
        let network = Network::testnet();

        let mut v1 = TransactionEnvelope::for_transaction(sample_tx(&kp));
        v1.sign(&network, &kp).unwrap();

        let mut v0 = TransactionEnvelope::for_transaction_v0(
            TransactionV0::new(kp.public_key_bytes(), 3)
                .with_operation(Operation::payment(
                    AccountId::from_bytes([2u8; 32]),
                    Asset::native(),
                    250,
                ))
                .unwrap(),
        );
        v0.sign(&network, &kp).unwrap();

        let bump = FeeBumpTransaction::wrapping(&v1, 900, AccountId::from_bytes([5u8; 32]))
            .unwrap();
        let mut bump_env = TransactionEnvelope::for_fee_bump(bump);
        bump_env.sign(&network, &kp).unwrap();

        for envelope in [v0, v1, bump_env] {
            let back = TransactionEnvelope::from_xdr(&envelope.to_xdr()).unwrap();
            assert_eq!(back, envelope);
        }
    }

    #[test]
    fn v0_envelope_hash_matches_upgraded_shape() {
        let kp = keypair();
        let v0_tx = TransactionV0::new(kp.public_key_bytes(), 3)
            .with_operation(Operation::payment(
                AccountId::from_bytes([2u8; 32]),
                Asset::native(),
                250,
            ))
            .unwrap();
        let network = Network::testnet();
        let v0_env = TransactionEnvelope::for_transaction_v0(v0_tx.clone());
        let v1_env = TransactionEnvelope::for_transaction(v0_tx.upgrade());
        assert_eq!(v0_env.hash(&network), v1_env.hash(&network));
    }

    #[test]
    fn decorated_signature_roundtrip() {
        let sig = DecoratedSignature {
            hint: [1, 2, 3, 4],
            signature: vec![9u8; 64],
        };
        assert_eq!(DecoratedSignature::from_xdr(&sig.to_xdr()).unwrap(), sig);
    }

    #[test]
    fn decode_rejects_oversized_signature() {
        let mut w = XdrWriter::new();
        w.write_fixed(&[0u8; 4]);
        w.write_var_bytes(&[0u8; 68]);
        let err = DecoratedSignature::from_xdr(&w.finish()).unwrap_err();
        assert!(matches!(
            err,
            WireError::LengthOutOfBounds { len: 68, max: 64, .. }
        ));
    }

    #[test]
    fn unknown_envelope_type_fails_decode() {
        let err = TransactionEnvelope::from_xdr(&[0, 0, 0, 1]).unwrap_err();
        assert!(matches!(err, WireError::UnknownDiscriminant { value: 1, .. }));
    }
}
