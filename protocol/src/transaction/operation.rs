//! Operations, assets and signing-threshold classification.
//!
//! An operation is one instruction inside a transaction: create an
//! account, move value, merge an account away, or bump a sequence number.
//! Each operation may override the transaction's source account; on the
//! wire that override is an optional in front of the body union.
//!
//! Operations also drive two derived properties of the enclosing
//! transaction: the minimum fee (per-operation flat fee) and the signature
//! threshold category the source account must clear. Account merges are
//! always high threshold; sequence bumps are low; value movement is
//! medium.

use serde::{Deserialize, Serialize};

use crate::account::{AccountId, MuxedAccount};
use crate::xdr::{WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};

use super::TxError;

/// Wire discriminants for the operation body union.
const OP_CREATE_ACCOUNT: i32 = 0;
const OP_PAYMENT: i32 = 1;
const OP_ACCOUNT_MERGE: i32 = 8;
const OP_BUMP_SEQUENCE: i32 = 11;

/// Wire discriminants for the asset union.
const ASSET_NATIVE: i32 = 0;
const ASSET_ALPHANUM4: i32 = 1;
const ASSET_ALPHANUM12: i32 = 2;

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

/// Signature-weight category an operation demands of its source account.
///
/// Ordered so that the maximum over a transaction's operations is the
/// threshold the whole transaction must clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Threshold {
    Low,
    Medium,
    High,
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// An asset reference: the native asset or an issued credit.
///
/// Issued assets are named by a short code and their issuing account.
/// Codes of up to four characters use the compact arm; five through
/// twelve use the wide arm. Codes are zero-padded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    /// The network's native asset.
    Native,
    /// An issued asset with a code of 1 to 4 characters.
    CreditAlphanum4 { code: [u8; 4], issuer: AccountId },
    /// An issued asset with a code of 5 to 12 characters.
    CreditAlphanum12 { code: [u8; 12], issuer: AccountId },
}

impl Asset {
    /// The native asset.
    pub fn native() -> Self {
        Self::Native
    }

    /// An issued asset. The arm is picked from the code length; empty and
    /// over-long codes fail with [`TxError::InvalidAssetCode`].
    pub fn credit(code: &str, issuer: AccountId) -> Result<Self, TxError> {
        let bytes = code.as_bytes();
        match bytes.len() {
            1..=4 => {
                let mut padded = [0u8; 4];
                padded[..bytes.len()].copy_from_slice(bytes);
                Ok(Self::CreditAlphanum4 {
                    code: padded,
                    issuer,
                })
            }
            5..=12 => {
                let mut padded = [0u8; 12];
                padded[..bytes.len()].copy_from_slice(bytes);
                Ok(Self::CreditAlphanum12 {
                    code: padded,
                    issuer,
                })
            }
            _ => Err(TxError::InvalidAssetCode {
                code: code.to_string(),
            }),
        }
    }
}

impl XdrEncode for Asset {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::Native => w.write_i32(ASSET_NATIVE),
            Self::CreditAlphanum4 { code, issuer } => {
                w.write_i32(ASSET_ALPHANUM4);
                w.write_fixed(code);
                issuer.encode(w);
            }
            Self::CreditAlphanum12 { code, issuer } => {
                w.write_i32(ASSET_ALPHANUM12);
                w.write_fixed(code);
                issuer.encode(w);
            }
        }
    }
}

impl XdrDecode for Asset {
    const TYPE_NAME: &'static str = "Asset";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            ASSET_NATIVE => Ok(Self::Native),
            ASSET_ALPHANUM4 => Ok(Self::CreditAlphanum4 {
                code: r.read_fixed::<4>(Self::TYPE_NAME)?,
                issuer: AccountId::decode(r)?,
            }),
            ASSET_ALPHANUM12 => Ok(Self::CreditAlphanum12 {
                code: r.read_fixed::<12>(Self::TYPE_NAME)?,
                issuer: AccountId::decode(r)?,
            }),
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation bodies
// ---------------------------------------------------------------------------

/// Funds a new account with a starting balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountOp {
    pub destination: AccountId,
    pub starting_balance: i64,
}

/// Moves an amount of an asset to a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOp {
    pub destination: MuxedAccount,
    pub asset: Asset,
    pub amount: i64,
}

/// Raises the source account's sequence number to `bump_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpSequenceOp {
    pub bump_to: i64,
}

/// The operation body union, keyed by operation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationBody {
    CreateAccount(CreateAccountOp),
    Payment(PaymentOp),
    /// Merges the source account into the destination. The body is just
    /// the destination; there is no inner struct.
    AccountMerge(MuxedAccount),
    BumpSequence(BumpSequenceOp),
}

impl OperationBody {
    /// The signing-threshold category this operation demands.
    ///
    /// Account merges are always classified high. Sequence bumps are the
    /// one low-threshold operation here; everything that moves value is
    /// medium.
    pub fn threshold(&self) -> Threshold {
        match self {
            Self::AccountMerge(_) => Threshold::High,
            Self::BumpSequence(_) => Threshold::Low,
            Self::CreateAccount(_) | Self::Payment(_) => Threshold::Medium,
        }
    }
}

impl XdrEncode for OperationBody {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::CreateAccount(op) => {
                w.write_i32(OP_CREATE_ACCOUNT);
                op.destination.encode(w);
                w.write_i64(op.starting_balance);
            }
            Self::Payment(op) => {
                w.write_i32(OP_PAYMENT);
                op.destination.encode(w);
                op.asset.encode(w);
                w.write_i64(op.amount);
            }
            Self::AccountMerge(destination) => {
                w.write_i32(OP_ACCOUNT_MERGE);
                destination.encode(w);
            }
            Self::BumpSequence(op) => {
                w.write_i32(OP_BUMP_SEQUENCE);
                w.write_i64(op.bump_to);
            }
        }
    }
}

impl XdrDecode for OperationBody {
    const TYPE_NAME: &'static str = "OperationBody";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            OP_CREATE_ACCOUNT => Ok(Self::CreateAccount(CreateAccountOp {
                destination: AccountId::decode(r)?,
                starting_balance: r.read_i64()?,
            })),
            OP_PAYMENT => Ok(Self::Payment(PaymentOp {
                destination: MuxedAccount::decode(r)?,
                asset: Asset::decode(r)?,
                amount: r.read_i64()?,
            })),
            OP_ACCOUNT_MERGE => Ok(Self::AccountMerge(MuxedAccount::decode(r)?)),
            OP_BUMP_SEQUENCE => Ok(Self::BumpSequence(BumpSequenceOp {
                bump_to: r.read_i64()?,
            })),
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// One instruction inside a transaction: an optional per-operation source
/// account and the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Overrides the transaction source for this operation when present.
    pub source_account: Option<MuxedAccount>,
    /// What the operation does.
    pub body: OperationBody,
}

impl Operation {
    /// An operation sourced from the enclosing transaction's account.
    pub fn new(body: OperationBody) -> Self {
        Self {
            source_account: None,
            body,
        }
    }

    /// Overrides the source account for this operation.
    pub fn with_source(mut self, source: impl Into<MuxedAccount>) -> Self {
        self.source_account = Some(source.into());
        self
    }

    /// A create-account operation.
    pub fn create_account(destination: AccountId, starting_balance: i64) -> Self {
        Self::new(OperationBody::CreateAccount(CreateAccountOp {
            destination,
            starting_balance,
        }))
    }

    /// A payment operation.
    pub fn payment(destination: impl Into<MuxedAccount>, asset: Asset, amount: i64) -> Self {
        Self::new(OperationBody::Payment(PaymentOp {
            destination: destination.into(),
            asset,
            amount,
        }))
    }

    /// An account-merge operation.
    pub fn account_merge(destination: impl Into<MuxedAccount>) -> Self {
        Self::new(OperationBody::AccountMerge(destination.into()))
    }

    /// A bump-sequence operation.
    pub fn bump_sequence(bump_to: i64) -> Self {
        Self::new(OperationBody::BumpSequence(BumpSequenceOp { bump_to }))
    }

    /// The signing-threshold category this operation demands.
    pub fn threshold(&self) -> Threshold {
        self.body.threshold()
    }
}

/// The maximum threshold over a slice of operations, or `None` when the
/// slice is empty. Precedence is strictly high over medium over low.
pub(crate) fn max_threshold(operations: &[Operation]) -> Option<Threshold> {
    operations.iter().map(Operation::threshold).max()
}

impl XdrEncode for Operation {
    fn encode(&self, w: &mut XdrWriter) {
        self.source_account.encode(w);
        self.body.encode(w);
    }
}

impl XdrDecode for Operation {
    const TYPE_NAME: &'static str = "Operation";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            source_account: Option::<MuxedAccount>::decode(r)?,
            body: OperationBody::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> AccountId {
        AccountId::from_bytes([7u8; 32])
    }

    #[test]
    fn asset_code_picks_the_right_arm() {
        assert!(matches!(
            Asset::credit("USD", issuer()).unwrap(),
            Asset::CreditAlphanum4 { .. }
        ));
        assert!(matches!(
            Asset::credit("LONGCODE", issuer()).unwrap(),
            Asset::CreditAlphanum12 { .. }
        ));
    }

    #[test]
    fn asset_code_bounds() {
        assert!(matches!(
            Asset::credit("", issuer()).unwrap_err(),
            TxError::InvalidAssetCode { .. }
        ));
        assert!(matches!(
            Asset::credit("THIRTEENCHARS", issuer()).unwrap_err(),
            TxError::InvalidAssetCode { .. }
        ));
    }

    #[test]
    fn asset_roundtrip() {
        let assets = vec![
            Asset::native(),
            Asset::credit("USD", issuer()).unwrap(),
            Asset::credit("DEADBEEF", issuer()).unwrap(),
        ];
        for asset in assets {
            assert_eq!(Asset::from_xdr(&asset.to_xdr()).unwrap(), asset);
        }
    }

    #[test]
    fn operation_roundtrip_all_bodies() {
        let dest = AccountId::from_bytes([1u8; 32]);
        let ops = vec![
            Operation::create_account(dest, 5_000_000),
            Operation::payment(dest, Asset::native(), 100),
            Operation::account_merge(dest),
            Operation::bump_sequence(99),
            Operation::payment(dest, Asset::native(), 1).with_source(MuxedAccount::muxed(dest, 4)),
        ];
        for op in ops {
            assert_eq!(Operation::from_xdr(&op.to_xdr()).unwrap(), op);
        }
    }

    #[test]
    fn thresholds_classify_as_documented() {
        let dest = AccountId::from_bytes([1u8; 32]);
        assert_eq!(Operation::account_merge(dest).threshold(), Threshold::High);
        assert_eq!(Operation::bump_sequence(1).threshold(), Threshold::Low);
        assert_eq!(
            Operation::payment(dest, Asset::native(), 1).threshold(),
            Threshold::Medium
        );
        assert_eq!(
            Operation::create_account(dest, 1).threshold(),
            Threshold::Medium
        );
    }

    #[test]
    fn max_threshold_precedence() {
        let dest = AccountId::from_bytes([1u8; 32]);
        assert_eq!(max_threshold(&[]), None);
        assert_eq!(
            max_threshold(&[Operation::bump_sequence(1)]),
            Some(Threshold::Low)
        );
        assert_eq!(
            max_threshold(&[
                Operation::bump_sequence(1),
                Operation::payment(dest, Asset::native(), 1),
            ]),
            Some(Threshold::Medium)
        );
        assert_eq!(
            max_threshold(&[
                Operation::payment(dest, Asset::native(), 1),
                Operation::account_merge(dest),
                Operation::bump_sequence(1),
            ]),
            Some(Threshold::High)
        );
    }

    #[test]
    fn unknown_operation_type_fails_decode() {
        let mut w = XdrWriter::new();
        w.write_bool(false); // no source override
        w.write_i32(40); // no such operation type
        let err = Operation::from_xdr(&w.finish()).unwrap_err();
        assert!(matches!(
            err,
            WireError::UnknownDiscriminant { value: 40, .. }
        ));
    }
}
