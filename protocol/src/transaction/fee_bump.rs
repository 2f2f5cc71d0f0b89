//! Fee-bump transactions.
//!
//! A fee bump lets a third party pay a higher fee for a transaction that
//! is already assembled and signed, without touching the inner
//! transaction: a stuck payment can be pushed through by whoever cares
//! about it landing, not just the account that authored it.
//!
//! Only the current transaction shape can be wrapped. A legacy-shape
//! envelope must be upgraded first ([`super::TransactionV0::upgrade`]
//! and re-signed); handing
//! one to [`FeeBumpTransaction::wrapping`] is a construction error, not
//! something silently converted, because the inner transaction's
//! signatures were made over the legacy bytes and would not survive a
//! silent rewrite.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::account::MuxedAccount;
use crate::xdr::{ExtensionPoint, WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};

use super::builder::Transaction;
use super::envelope::TransactionEnvelope;
use super::TxError;

/// Wire discriminant for the inner-transaction wrapper: the envelope-type
/// value of the current shape.
const ENVELOPE_TYPE_TX: i32 = 2;

/// The tagged wrapper around a fee-bumped inner transaction.
///
/// A one-arm union on the wire today; the discriminant is still encoded
/// so the shape can grow without a format break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InnerTransaction {
    /// A current-shape transaction.
    Tx(Transaction),
}

impl XdrEncode for InnerTransaction {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::Tx(tx) => {
                w.write_i32(ENVELOPE_TYPE_TX);
                tx.encode(w);
            }
        }
    }
}

impl XdrDecode for InnerTransaction {
    const TYPE_NAME: &'static str = "InnerTransaction";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            ENVELOPE_TYPE_TX => Ok(Self::Tx(Transaction::decode(r)?)),
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

/// A transaction that replaces the fee of an inner transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBumpTransaction {
    fee_source: MuxedAccount,
    fee: i64,
    inner_tx: InnerTransaction,
    ext: ExtensionPoint,
}

impl FeeBumpTransaction {
    /// Wraps the transaction inside `envelope` with a new fee paid by
    /// `fee_source`.
    ///
    /// Fails with [`TxError::FeeBumpRequiresCurrentShape`] unless the
    /// envelope wraps the current shape. The supplied fee is accepted as
    /// given; whether it actually covers the inner fee is a relationship
    /// the submitting network enforces, and callers that want to check
    /// up front can use [`check_fee_covers_inner`](Self::check_fee_covers_inner).
    pub fn wrapping(
        envelope: &TransactionEnvelope,
        fee: i64,
        fee_source: impl Into<MuxedAccount>,
    ) -> Result<Self, TxError> {
        let inner = match envelope {
            TransactionEnvelope::Tx(v1) => v1.tx.clone(),
            TransactionEnvelope::TxV0(_) => {
                return Err(TxError::FeeBumpRequiresCurrentShape {
                    found: "legacy-shape envelope",
                })
            }
            TransactionEnvelope::FeeBump(_) => {
                return Err(TxError::FeeBumpRequiresCurrentShape {
                    found: "fee-bump envelope",
                })
            }
        };
        debug!(fee, inner_fee = inner.fee(), "wrapping transaction in fee bump");
        Ok(Self {
            fee_source: fee_source.into(),
            fee,
            inner_tx: InnerTransaction::Tx(inner),
            ext: ExtensionPoint::V0,
        })
    }

    /// The account paying the replacement fee.
    pub fn fee_source(&self) -> &MuxedAccount {
        &self.fee_source
    }

    /// The replacement fee.
    pub fn fee(&self) -> i64 {
        self.fee
    }

    /// The wrapped transaction.
    pub fn inner_transaction(&self) -> &Transaction {
        let InnerTransaction::Tx(tx) = &self.inner_tx;
        tx
    }

    /// Opt-in validation that the replacement fee covers the inner fee.
    ///
    /// Construction deliberately does not enforce this; networks differ
    /// on the exact sufficiency rule and a wrapper built for later
    /// re-submission may intentionally undercut today's floor.
    pub fn check_fee_covers_inner(&self) -> Result<(), TxError> {
        let inner = i64::from(self.inner_transaction().fee());
        if self.fee < inner {
            return Err(TxError::FeeBelowInner {
                outer: self.fee,
                inner,
            });
        }
        Ok(())
    }
}

impl XdrEncode for FeeBumpTransaction {
    fn encode(&self, w: &mut XdrWriter) {
        self.fee_source.encode(w);
        w.write_i64(self.fee);
        self.inner_tx.encode(w);
        self.ext.encode(w);
    }
}

impl XdrDecode for FeeBumpTransaction {
    const TYPE_NAME: &'static str = "FeeBumpTransaction";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            fee_source: MuxedAccount::decode(r)?,
            fee: r.read_i64()?,
            inner_tx: InnerTransaction::decode(r)?,
            ext: ExtensionPoint::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;
    use crate::transaction::builder::TransactionV0;
    use crate::transaction::operation::{Asset, Operation};

    fn inner_tx() -> Transaction {
        let source = AccountId::from_bytes([1u8; 32]);
        let dest = AccountId::from_bytes([2u8; 32]);
        Transaction::new(source, 9)
            .with_operation(Operation::payment(dest, Asset::native(), 1_000))
            .unwrap()
    }

    fn fee_source() -> AccountId {
        AccountId::from_bytes([3u8; 32])
    }

    #[test]
    fn wraps_current_shape_envelope() {
        let envelope = TransactionEnvelope::for_transaction(inner_tx());
        let bump = FeeBumpTransaction::wrapping(&envelope, 500, fee_source()).unwrap();
        assert_eq!(bump.fee(), 500);
        assert_eq!(bump.inner_transaction(), &inner_tx());
        assert_eq!(*bump.fee_source(), MuxedAccount::from(fee_source()));
    }

    #[test]
    fn rejects_legacy_shape_envelope() {
        let v0 = TransactionV0::new([1u8; 32], 9);
        let envelope = TransactionEnvelope::for_transaction_v0(v0);
        let err = FeeBumpTransaction::wrapping(&envelope, 500, fee_source()).unwrap_err();
        assert!(matches!(
            err,
            TxError::FeeBumpRequiresCurrentShape {
                found: "legacy-shape envelope"
            }
        ));
    }

    #[test]
    fn rejects_double_bump() {
        let envelope = TransactionEnvelope::for_transaction(inner_tx());
        let bump = FeeBumpTransaction::wrapping(&envelope, 500, fee_source()).unwrap();
        let bump_envelope = TransactionEnvelope::for_fee_bump(bump);
        let err = FeeBumpTransaction::wrapping(&bump_envelope, 900, fee_source()).unwrap_err();
        assert!(matches!(
            err,
            TxError::FeeBumpRequiresCurrentShape {
                found: "fee-bump envelope"
            }
        ));
    }

    #[test]
    fn fee_check_is_opt_in() {
        let envelope = TransactionEnvelope::for_transaction(inner_tx());
        // Construction accepts a fee below the inner fee.
        let bump = FeeBumpTransaction::wrapping(&envelope, 10, fee_source()).unwrap();
        let err = bump.check_fee_covers_inner().unwrap_err();
        assert!(matches!(err, TxError::FeeBelowInner { outer: 10, inner: 100 }));

        let bump = FeeBumpTransaction::wrapping(&envelope, 100, fee_source()).unwrap();
        assert!(bump.check_fee_covers_inner().is_ok());
    }

    #[test]
    fn roundtrip() {
        let envelope = TransactionEnvelope::for_transaction(inner_tx());
        let bump = FeeBumpTransaction::wrapping(&envelope, 500, fee_source()).unwrap();
        assert_eq!(
            FeeBumpTransaction::from_xdr(&bump.to_xdr()).unwrap(),
            bump
        );
    }

    #[test]
    fn inner_wrapper_rejects_unknown_discriminant() {
        let mut bytes = InnerTransaction::Tx(inner_tx()).to_xdr();
        bytes[3] = 4;
        let err = InnerTransaction::from_xdr(&bytes).unwrap_err();
        assert!(matches!(err, WireError::UnknownDiscriminant { value: 4, .. }));
    }
}
