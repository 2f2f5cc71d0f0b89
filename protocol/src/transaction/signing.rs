//! Networks, tagged transactions and the canonical signature payload.
//!
//! What gets signed is never the bare transaction. It is a
//! [`TransactionSignaturePayload`]: the 32-byte network identifier
//! followed by a tagged wrapper of the transaction. The network id pins
//! a signature to one network (a testnet signature can never replay on
//! mainnet), and the tag pins it to one shape (a fee bump can never be
//! confused with the transaction it wraps).
//!
//! The subtle rule lives in [`TaggedTransaction::wrap_transaction_v0`]:
//! a legacy-shape transaction is rewritten into its current-shape
//! equivalent before wrapping. Both shapes therefore produce
//! byte-identical payloads, which is what keeps signatures valid across
//! the shape migration. Any mismatch between what is signed and what is
//! transmitted is a security bug, so the rewrite is centralized here and
//! nowhere else.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{MAINNET_PASSPHRASE, TESTNET_PASSPHRASE};
use crate::crypto::hash::sha256_array;
use crate::xdr::{WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};

use super::builder::{Transaction, TransactionV0};
use super::fee_bump::FeeBumpTransaction;

/// Envelope-type discriminants used by the payload's tagged transaction.
const ENVELOPE_TYPE_TX: i32 = 2;
const ENVELOPE_TYPE_TX_FEE_BUMP: i32 = 5;

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// A named network, identified by the digest of its passphrase.
///
/// The passphrase is a human-readable string; the 32-byte network id mixed
/// into signature payloads is its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    passphrase: String,
}

impl Network {
    /// A network from an arbitrary passphrase.
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    /// The public network.
    pub fn mainnet() -> Self {
        Self::new(MAINNET_PASSPHRASE)
    }

    /// The shared test network.
    pub fn testnet() -> Self {
        Self::new(TESTNET_PASSPHRASE)
    }

    /// The passphrase.
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// The 32-byte network identifier: SHA-256 of the passphrase.
    pub fn id(&self) -> [u8; 32] {
        sha256_array(self.passphrase.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// TaggedTransaction
// ---------------------------------------------------------------------------

/// The two-variant union of signable transaction shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaggedTransaction {
    /// A current-shape transaction.
    Tx(Transaction),
    /// A fee-bump transaction.
    FeeBump(FeeBumpTransaction),
}

impl TaggedTransaction {
    /// Wraps a current-shape transaction.
    pub fn wrap_transaction(tx: Transaction) -> Self {
        Self::Tx(tx)
    }

    /// Wraps a legacy-shape transaction, rewriting it to the current
    /// shape first.
    ///
    /// The rewrite promotes the source key to muxed form, copies fee,
    /// memo, operations and sequence number verbatim, and maps the
    /// optional time window to `Preconditions::None` or the `Time`
    /// variant. A legacy transaction and its hand-built current-shape
    /// twin produce byte-identical payloads.
    pub fn wrap_transaction_v0(tx: &TransactionV0) -> Self {
        trace!(seq_num = tx.seq_num(), "normalizing legacy shape for signing");
        Self::Tx(tx.upgrade())
    }

    /// Wraps a fee-bump transaction.
    pub fn wrap_fee_bump(tx: FeeBumpTransaction) -> Self {
        Self::FeeBump(tx)
    }
}

impl XdrEncode for TaggedTransaction {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::Tx(tx) => {
                w.write_i32(ENVELOPE_TYPE_TX);
                tx.encode(w);
            }
            Self::FeeBump(tx) => {
                w.write_i32(ENVELOPE_TYPE_TX_FEE_BUMP);
                tx.encode(w);
            }
        }
    }
}

impl XdrDecode for TaggedTransaction {
    const TYPE_NAME: &'static str = "TaggedTransaction";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            ENVELOPE_TYPE_TX => Ok(Self::Tx(Transaction::decode(r)?)),
            ENVELOPE_TYPE_TX_FEE_BUMP => Ok(Self::FeeBump(FeeBumpTransaction::decode(r)?)),
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionSignaturePayload
// ---------------------------------------------------------------------------

/// The exact structure whose encoding is hashed and signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignaturePayload {
    network_id: [u8; 32],
    tagged_transaction: TaggedTransaction,
}

impl TransactionSignaturePayload {
    /// A payload for a network, deriving the network id from the
    /// passphrase.
    pub fn new(network: &Network, tagged_transaction: TaggedTransaction) -> Self {
        Self {
            network_id: network.id(),
            tagged_transaction,
        }
    }

    /// A payload for an already-computed network id digest.
    pub fn with_network_id(network_id: [u8; 32], tagged_transaction: TaggedTransaction) -> Self {
        Self {
            network_id,
            tagged_transaction,
        }
    }

    /// The network id this payload is pinned to.
    pub fn network_id(&self) -> &[u8; 32] {
        &self.network_id
    }

    /// The wrapped transaction.
    pub fn tagged_transaction(&self) -> &TaggedTransaction {
        &self.tagged_transaction
    }

    /// The canonical bytes handed to a signer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xdr()
    }

    /// SHA-256 of the canonical bytes. This digest is both what gets
    /// signed and, for enveloped transactions, the transaction hash.
    pub fn hash(&self) -> [u8; 32] {
        sha256_array(&self.to_bytes())
    }
}

impl XdrEncode for TransactionSignaturePayload {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_fixed(&self.network_id);
        self.tagged_transaction.encode(w);
    }
}

impl XdrDecode for TransactionSignaturePayload {
    const TYPE_NAME: &'static str = "TransactionSignaturePayload";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            network_id: r.read_fixed::<32>(Self::TYPE_NAME)?,
            tagged_transaction: TaggedTransaction::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountId, MuxedAccount};
    use crate::transaction::envelope::TransactionEnvelope;
    use crate::transaction::memo::Memo;
    use crate::transaction::operation::{Asset, Operation};
    use crate::transaction::preconditions::{Preconditions, TimeBounds};

    fn sample_ops_tx(source: impl Into<MuxedAccount>) -> Transaction {
        let dest = AccountId::from_bytes([2u8; 32]);
        Transaction::new(source, 42)
            .with_memo(Memo::id(7))
            .with_operation(Operation::payment(dest, Asset::native(), 1_000))
            .unwrap()
    }

    #[test]
    fn network_ids_differ_and_are_sha256() {
        let mainnet = Network::mainnet();
        let testnet = Network::testnet();
        assert_ne!(mainnet.id(), testnet.id());
        assert_eq!(
            mainnet.id(),
            sha256_array(MAINNET_PASSPHRASE.as_bytes())
        );
    }

    #[test]
    fn payload_starts_with_network_id() {
        let tx = sample_ops_tx(AccountId::from_bytes([1u8; 32]));
        let payload = TransactionSignaturePayload::new(
            &Network::testnet(),
            TaggedTransaction::wrap_transaction(tx),
        );
        let bytes = payload.to_bytes();
        assert_eq!(&bytes[..32], &Network::testnet().id());
        // Envelope-type discriminant of the current shape follows.
        assert_eq!(&bytes[32..36], &[0, 0, 0, 2]);
    }

    #[test]
    fn payload_roundtrip() {
        let tx = sample_ops_tx(AccountId::from_bytes([1u8; 32]));
        let payload = TransactionSignaturePayload::new(
            &Network::testnet(),
            TaggedTransaction::wrap_transaction(tx),
        );
        let back = TransactionSignaturePayload::from_xdr(&payload.to_bytes()).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn raw_digest_and_passphrase_paths_agree() {
        let tx = sample_ops_tx(AccountId::from_bytes([1u8; 32]));
        let via_network = TransactionSignaturePayload::new(
            &Network::testnet(),
            TaggedTransaction::wrap_transaction(tx.clone()),
        );
        let via_digest = TransactionSignaturePayload::with_network_id(
            Network::testnet().id(),
            TaggedTransaction::wrap_transaction(tx),
        );
        assert_eq!(via_network.to_bytes(), via_digest.to_bytes());
    }

    #[test]
    fn legacy_and_current_shapes_sign_identically() {
        let source_key = [1u8; 32];
        let dest = AccountId::from_bytes([2u8; 32]);
        let bounds = TimeBounds::new(100, 200);

        let v0 = TransactionV0::new(source_key, 42)
            .with_time_bounds(Some(bounds))
            .with_memo(Memo::id(7))
            .with_operation(Operation::payment(dest, Asset::native(), 1_000))
            .unwrap();

        // The hand-built current-shape twin.
        let v1 = Transaction::new(MuxedAccount::from_bytes(source_key), 42)
            .with_preconditions(Preconditions::wrap_time_bounds(Some(bounds)))
            .with_memo(Memo::id(7))
            .with_operation(Operation::payment(dest, Asset::native(), 1_000))
            .unwrap();

        let network = Network::testnet();
        let legacy_payload = TransactionSignaturePayload::new(
            &network,
            TaggedTransaction::wrap_transaction_v0(&v0),
        );
        let current_payload = TransactionSignaturePayload::new(
            &network,
            TaggedTransaction::wrap_transaction(v1),
        );
        assert_eq!(legacy_payload.to_bytes(), current_payload.to_bytes());
        assert_eq!(legacy_payload.hash(), current_payload.hash());
    }

    #[test]
    fn legacy_without_bounds_signs_with_none_preconditions() {
        let v0 = TransactionV0::new([1u8; 32], 1);
        let tagged = TaggedTransaction::wrap_transaction_v0(&v0);
        match tagged {
            TaggedTransaction::Tx(ref tx) => {
                assert_eq!(*tx.preconditions(), Preconditions::None)
            }
            _ => panic!("legacy wrap must produce the Tx arm"),
        }
    }

    #[test]
    fn fee_bump_payload_uses_its_own_tag() {
        let tx = sample_ops_tx(AccountId::from_bytes([1u8; 32]));
        let envelope = TransactionEnvelope::for_transaction(tx);
        let bump =
            FeeBumpTransaction::wrapping(&envelope, 400, AccountId::from_bytes([3u8; 32]))
                .unwrap();
        let payload = TransactionSignaturePayload::new(
            &Network::testnet(),
            TaggedTransaction::wrap_fee_bump(bump),
        );
        let bytes = payload.to_bytes();
        assert_eq!(&bytes[32..36], &[0, 0, 0, 5]);
        let back = TransactionSignaturePayload::from_xdr(&bytes).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn tagged_transaction_unknown_discriminant() {
        let err = TaggedTransaction::from_xdr(&[0, 0, 0, 1]).unwrap_err();
        assert!(matches!(err, WireError::UnknownDiscriminant { value: 1, .. }));
    }

    #[test]
    fn different_networks_produce_different_hashes() {
        let tx = sample_ops_tx(AccountId::from_bytes([1u8; 32]));
        let mainnet = TransactionSignaturePayload::new(
            &Network::mainnet(),
            TaggedTransaction::wrap_transaction(tx.clone()),
        );
        let testnet = TransactionSignaturePayload::new(
            &Network::testnet(),
            TaggedTransaction::wrap_transaction(tx),
        );
        assert_ne!(mainnet.hash(), testnet.hash());
    }
}
