//! Transaction and operation result decoding.
//!
//! After submission, the network answers with a [`TransactionResult`]:
//! the fee actually charged and a result union keyed by a fixed,
//! protocol-frozen code table. Success codes carry the per-operation
//! results; the fee-bump codes carry the inner transaction's result pair;
//! every other code is void.
//!
//! The code table is wire-frozen. The numeric values below are the
//! protocol, not an implementation detail, and must never be renumbered.

use serde::{Deserialize, Serialize};

use crate::config::MAX_OPERATIONS;
use crate::xdr::{ExtensionPoint, WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};

/// Operation-type discriminants, shared with the operation body union.
const OP_CREATE_ACCOUNT: i32 = 0;
const OP_PAYMENT: i32 = 1;
const OP_ACCOUNT_MERGE: i32 = 8;
const OP_BUMP_SEQUENCE: i32 = 11;

// ---------------------------------------------------------------------------
// TransactionResultCode
// ---------------------------------------------------------------------------

/// The frozen transaction result code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum TransactionResultCode {
    /// The inner transaction of a fee bump succeeded.
    FeeBumpInnerSuccess = 1,
    /// All operations succeeded.
    Success = 0,
    /// One of the operations failed; none were applied.
    Failed = -1,
    /// The ledger closed before the validity window opened.
    TooEarly = -2,
    /// The ledger closed after the validity window expired.
    TooLate = -3,
    /// No operation was specified.
    MissingOperation = -4,
    /// The sequence number does not match the source account.
    BadSeq = -5,
    /// Too few valid signatures, or signed for the wrong network.
    BadAuth = -6,
    /// Paying the fee would take the fee source below its reserve.
    InsufficientBalance = -7,
    /// The source account was not found.
    NoAccount = -8,
    /// The fee is below the current floor.
    InsufficientFee = -9,
    /// Signatures were attached that are not needed by any signer.
    BadAuthExtra = -10,
    /// The network hit an unexpected internal error.
    InternalError = -11,
    /// The transaction shape is not supported.
    NotSupported = -12,
    /// The inner transaction of a fee bump failed.
    FeeBumpInnerFailed = -13,
    /// A sponsorship was opened or left dangling.
    BadSponsorship = -14,
    /// The minimum sequence age or ledger gap precondition was not met.
    BadMinSeqAgeOrGap = -15,
    /// A precondition or other structural element is invalid.
    Malformed = -16,
}

impl TransactionResultCode {
    /// True for the two success codes.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::FeeBumpInnerSuccess)
    }

    /// The normalized snake_case token for a failure code, `None` for the
    /// success codes.
    pub fn error_code(self) -> Option<&'static str> {
        match self {
            Self::Success | Self::FeeBumpInnerSuccess => None,
            Self::Failed => Some("failed"),
            Self::TooEarly => Some("too_early"),
            Self::TooLate => Some("too_late"),
            Self::MissingOperation => Some("missing_operation"),
            Self::BadSeq => Some("bad_seq"),
            Self::BadAuth => Some("bad_auth"),
            Self::InsufficientBalance => Some("insufficient_balance"),
            Self::NoAccount => Some("no_account"),
            Self::InsufficientFee => Some("insufficient_fee"),
            Self::BadAuthExtra => Some("bad_auth_extra"),
            Self::InternalError => Some("internal_error"),
            Self::NotSupported => Some("not_supported"),
            Self::FeeBumpInnerFailed => Some("fee_bump_inner_failed"),
            Self::BadSponsorship => Some("bad_sponsorship"),
            Self::BadMinSeqAgeOrGap => Some("bad_min_seq_age_or_gap"),
            Self::Malformed => Some("malformed"),
        }
    }

    /// A human-readable description of a failure code, `None` for the
    /// success codes.
    pub fn error_message(self) -> Option<&'static str> {
        match self {
            Self::Success | Self::FeeBumpInnerSuccess => None,
            Self::Failed => Some("one of the operations failed (none were applied)"),
            Self::TooEarly => Some("ledger closed before the minimum time bound"),
            Self::TooLate => Some("ledger closed after the maximum time bound"),
            Self::MissingOperation => Some("no operation was specified"),
            Self::BadSeq => Some("sequence number does not match the source account"),
            Self::BadAuth => Some("too few valid signatures or signed for the wrong network"),
            Self::InsufficientBalance => Some("fee would reduce the account below its reserve"),
            Self::NoAccount => Some("source account not found"),
            Self::InsufficientFee => Some("fee is too small"),
            Self::BadAuthExtra => Some("unused signatures attached to the transaction"),
            Self::InternalError => Some("an unknown error occurred"),
            Self::NotSupported => Some("transaction shape not supported"),
            Self::FeeBumpInnerFailed => Some("fee bump inner transaction failed"),
            Self::BadSponsorship => Some("sponsorship not confirmed"),
            Self::BadMinSeqAgeOrGap => {
                Some("minimum sequence age or ledger gap condition not met")
            }
            Self::Malformed => Some("transaction is structurally invalid"),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-operation results
// ---------------------------------------------------------------------------

/// Result of a create-account operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateAccountResult {
    Success,
    Malformed,
    Underfunded,
    LowReserve,
    AlreadyExists,
}

impl CreateAccountResult {
    fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Malformed => -1,
            Self::Underfunded => -2,
            Self::LowReserve => -3,
            Self::AlreadyExists => -4,
        }
    }

    fn from_code(value: i32) -> Result<Self, WireError> {
        Ok(match value {
            0 => Self::Success,
            -1 => Self::Malformed,
            -2 => Self::Underfunded,
            -3 => Self::LowReserve,
            -4 => Self::AlreadyExists,
            _ => {
                return Err(WireError::UnknownDiscriminant {
                    type_name: "CreateAccountResult",
                    value,
                })
            }
        })
    }
}

/// Result of a payment operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentResult {
    Success,
    Malformed,
    Underfunded,
    SrcNoTrust,
    SrcNotAuthorized,
    NoDestination,
    NoTrust,
    NotAuthorized,
    LineFull,
    NoIssuer,
}

impl PaymentResult {
    fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Malformed => -1,
            Self::Underfunded => -2,
            Self::SrcNoTrust => -3,
            Self::SrcNotAuthorized => -4,
            Self::NoDestination => -5,
            Self::NoTrust => -6,
            Self::NotAuthorized => -7,
            Self::LineFull => -8,
            Self::NoIssuer => -9,
        }
    }

    fn from_code(value: i32) -> Result<Self, WireError> {
        Ok(match value {
            0 => Self::Success,
            -1 => Self::Malformed,
            -2 => Self::Underfunded,
            -3 => Self::SrcNoTrust,
            -4 => Self::SrcNotAuthorized,
            -5 => Self::NoDestination,
            -6 => Self::NoTrust,
            -7 => Self::NotAuthorized,
            -8 => Self::LineFull,
            -9 => Self::NoIssuer,
            _ => {
                return Err(WireError::UnknownDiscriminant {
                    type_name: "PaymentResult",
                    value,
                })
            }
        })
    }
}

/// Result of an account-merge operation. Success carries the balance that
/// was transferred to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountMergeResult {
    Success { source_account_balance: i64 },
    Malformed,
    NoAccount,
    ImmutableSet,
    HasSubEntries,
    SeqnumTooFar,
    DestFull,
    IsSponsor,
}

impl AccountMergeResult {
    fn code(self) -> i32 {
        match self {
            Self::Success { .. } => 0,
            Self::Malformed => -1,
            Self::NoAccount => -2,
            Self::ImmutableSet => -3,
            Self::HasSubEntries => -4,
            Self::SeqnumTooFar => -5,
            Self::DestFull => -6,
            Self::IsSponsor => -7,
        }
    }
}

/// Result of a bump-sequence operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BumpSequenceResult {
    Success,
    BadSeq,
}

impl BumpSequenceResult {
    fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::BadSeq => -1,
        }
    }

    fn from_code(value: i32) -> Result<Self, WireError> {
        Ok(match value {
            0 => Self::Success,
            -1 => Self::BadSeq,
            _ => {
                return Err(WireError::UnknownDiscriminant {
                    type_name: "BumpSequenceResult",
                    value,
                })
            }
        })
    }
}

/// The per-operation result union, keyed by operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationResultTr {
    CreateAccount(CreateAccountResult),
    Payment(PaymentResult),
    AccountMerge(AccountMergeResult),
    BumpSequence(BumpSequenceResult),
}

impl XdrEncode for OperationResultTr {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::CreateAccount(result) => {
                w.write_i32(OP_CREATE_ACCOUNT);
                w.write_i32(result.code());
            }
            Self::Payment(result) => {
                w.write_i32(OP_PAYMENT);
                w.write_i32(result.code());
            }
            Self::AccountMerge(result) => {
                w.write_i32(OP_ACCOUNT_MERGE);
                w.write_i32(result.code());
                if let AccountMergeResult::Success {
                    source_account_balance,
                } = result
                {
                    w.write_i64(*source_account_balance);
                }
            }
            Self::BumpSequence(result) => {
                w.write_i32(OP_BUMP_SEQUENCE);
                w.write_i32(result.code());
            }
        }
    }
}

impl XdrDecode for OperationResultTr {
    const TYPE_NAME: &'static str = "OperationResultTr";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            OP_CREATE_ACCOUNT => Ok(Self::CreateAccount(CreateAccountResult::from_code(
                r.read_i32()?,
            )?)),
            OP_PAYMENT => Ok(Self::Payment(PaymentResult::from_code(r.read_i32()?)?)),
            OP_ACCOUNT_MERGE => {
                let code = r.read_i32()?;
                let result = match code {
                    0 => AccountMergeResult::Success {
                        source_account_balance: r.read_i64()?,
                    },
                    -1 => AccountMergeResult::Malformed,
                    -2 => AccountMergeResult::NoAccount,
                    -3 => AccountMergeResult::ImmutableSet,
                    -4 => AccountMergeResult::HasSubEntries,
                    -5 => AccountMergeResult::SeqnumTooFar,
                    -6 => AccountMergeResult::DestFull,
                    -7 => AccountMergeResult::IsSponsor,
                    value => {
                        return Err(WireError::UnknownDiscriminant {
                            type_name: "AccountMergeResult",
                            value,
                        })
                    }
                };
                Ok(Self::AccountMerge(result))
            }
            OP_BUMP_SEQUENCE => Ok(Self::BumpSequence(BumpSequenceResult::from_code(
                r.read_i32()?,
            )?)),
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

/// The outer operation result union: either the operation ran and its
/// typed result follows, or it was rejected before running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationResult {
    /// The operation ran; the typed result follows.
    Inner(OperationResultTr),
    /// The per-operation source failed authorization.
    BadAuth,
    /// The per-operation source account does not exist.
    NoAccount,
    /// The operation is not supported at this protocol version.
    NotSupported,
    /// The source account would exceed its sub-entry limit.
    TooManySubentries,
    /// The operation exceeded the per-ledger work limit.
    ExceededWorkLimit,
    /// The source account would exceed its sponsoring limit.
    TooManySponsoring,
}

impl OperationResult {
    fn code(&self) -> i32 {
        match self {
            Self::Inner(_) => 0,
            Self::BadAuth => -1,
            Self::NoAccount => -2,
            Self::NotSupported => -3,
            Self::TooManySubentries => -4,
            Self::ExceededWorkLimit => -5,
            Self::TooManySponsoring => -6,
        }
    }
}

impl XdrEncode for OperationResult {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_i32(self.code());
        if let Self::Inner(tr) = self {
            tr.encode(w);
        }
    }
}

impl XdrDecode for OperationResult {
    const TYPE_NAME: &'static str = "OperationResult";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            0 => Ok(Self::Inner(OperationResultTr::decode(r)?)),
            -1 => Ok(Self::BadAuth),
            -2 => Ok(Self::NoAccount),
            -3 => Ok(Self::NotSupported),
            -4 => Ok(Self::TooManySubentries),
            -5 => Ok(Self::ExceededWorkLimit),
            -6 => Ok(Self::TooManySponsoring),
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Inner (fee-bumped) transaction results
// ---------------------------------------------------------------------------

/// Result union of the transaction inside a fee bump. Same code table as
/// the outer union minus the two fee-bump codes, which cannot nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InnerTransactionResultResult {
    Success(Vec<OperationResult>),
    Failed(Vec<OperationResult>),
    TooEarly,
    TooLate,
    MissingOperation,
    BadSeq,
    BadAuth,
    InsufficientBalance,
    NoAccount,
    InsufficientFee,
    BadAuthExtra,
    InternalError,
    NotSupported,
    BadSponsorship,
    BadMinSeqAgeOrGap,
    Malformed,
}

impl InnerTransactionResultResult {
    /// The code of the active arm.
    pub fn code(&self) -> TransactionResultCode {
        match self {
            Self::Success(_) => TransactionResultCode::Success,
            Self::Failed(_) => TransactionResultCode::Failed,
            Self::TooEarly => TransactionResultCode::TooEarly,
            Self::TooLate => TransactionResultCode::TooLate,
            Self::MissingOperation => TransactionResultCode::MissingOperation,
            Self::BadSeq => TransactionResultCode::BadSeq,
            Self::BadAuth => TransactionResultCode::BadAuth,
            Self::InsufficientBalance => TransactionResultCode::InsufficientBalance,
            Self::NoAccount => TransactionResultCode::NoAccount,
            Self::InsufficientFee => TransactionResultCode::InsufficientFee,
            Self::BadAuthExtra => TransactionResultCode::BadAuthExtra,
            Self::InternalError => TransactionResultCode::InternalError,
            Self::NotSupported => TransactionResultCode::NotSupported,
            Self::BadSponsorship => TransactionResultCode::BadSponsorship,
            Self::BadMinSeqAgeOrGap => TransactionResultCode::BadMinSeqAgeOrGap,
            Self::Malformed => TransactionResultCode::Malformed,
        }
    }

    /// True iff the inner transaction succeeded.
    pub fn was_successful(&self) -> bool {
        self.code().is_success()
    }

    /// The per-operation results for the success/failure arms.
    pub fn op_results(&self) -> Option<&[OperationResult]> {
        match self {
            Self::Success(ops) | Self::Failed(ops) => Some(ops),
            _ => None,
        }
    }
}

impl XdrEncode for InnerTransactionResultResult {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_i32(self.code() as i32);
        if let Self::Success(ops) | Self::Failed(ops) = self {
            ops.encode(w);
        }
    }
}

impl XdrDecode for InnerTransactionResultResult {
    const TYPE_NAME: &'static str = "InnerTransactionResultResult";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            0 => Ok(Self::Success(
                r.read_vec(MAX_OPERATIONS as u32, "op results")?,
            )),
            -1 => Ok(Self::Failed(
                r.read_vec(MAX_OPERATIONS as u32, "op results")?,
            )),
            -2 => Ok(Self::TooEarly),
            -3 => Ok(Self::TooLate),
            -4 => Ok(Self::MissingOperation),
            -5 => Ok(Self::BadSeq),
            -6 => Ok(Self::BadAuth),
            -7 => Ok(Self::InsufficientBalance),
            -8 => Ok(Self::NoAccount),
            -9 => Ok(Self::InsufficientFee),
            -10 => Ok(Self::BadAuthExtra),
            -11 => Ok(Self::InternalError),
            -12 => Ok(Self::NotSupported),
            -14 => Ok(Self::BadSponsorship),
            -15 => Ok(Self::BadMinSeqAgeOrGap),
            -16 => Ok(Self::Malformed),
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

/// Result of the transaction inside a fee bump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerTransactionResult {
    /// Fee charged to the inner source. Always reported, even on failure.
    pub fee_charged: i64,
    /// The result union.
    pub result: InnerTransactionResultResult,
    /// Reserved.
    pub ext: ExtensionPoint,
}

impl XdrEncode for InnerTransactionResult {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_i64(self.fee_charged);
        self.result.encode(w);
        self.ext.encode(w);
    }
}

impl XdrDecode for InnerTransactionResult {
    const TYPE_NAME: &'static str = "InnerTransactionResult";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            fee_charged: r.read_i64()?,
            result: InnerTransactionResultResult::decode(r)?,
            ext: ExtensionPoint::decode(r)?,
        })
    }
}

/// The inner transaction's hash paired with its result, as reported by a
/// fee-bump outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerTransactionResultPair {
    /// Hash of the inner transaction.
    pub transaction_hash: [u8; 32],
    /// The inner transaction's result.
    pub result: InnerTransactionResult,
}

impl XdrEncode for InnerTransactionResultPair {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_fixed(&self.transaction_hash);
        self.result.encode(w);
    }
}

impl XdrDecode for InnerTransactionResultPair {
    const TYPE_NAME: &'static str = "InnerTransactionResultPair";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            transaction_hash: r.read_fixed::<32>(Self::TYPE_NAME)?,
            result: InnerTransactionResult::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// TransactionResultResult / TransactionResult
// ---------------------------------------------------------------------------

/// The outer transaction result union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionResultResult {
    FeeBumpInnerSuccess(InnerTransactionResultPair),
    Success(Vec<OperationResult>),
    Failed(Vec<OperationResult>),
    TooEarly,
    TooLate,
    MissingOperation,
    BadSeq,
    BadAuth,
    InsufficientBalance,
    NoAccount,
    InsufficientFee,
    BadAuthExtra,
    InternalError,
    NotSupported,
    FeeBumpInnerFailed(InnerTransactionResultPair),
    BadSponsorship,
    BadMinSeqAgeOrGap,
    Malformed,
}

impl TransactionResultResult {
    /// The code of the active arm.
    pub fn code(&self) -> TransactionResultCode {
        match self {
            Self::FeeBumpInnerSuccess(_) => TransactionResultCode::FeeBumpInnerSuccess,
            Self::Success(_) => TransactionResultCode::Success,
            Self::Failed(_) => TransactionResultCode::Failed,
            Self::TooEarly => TransactionResultCode::TooEarly,
            Self::TooLate => TransactionResultCode::TooLate,
            Self::MissingOperation => TransactionResultCode::MissingOperation,
            Self::BadSeq => TransactionResultCode::BadSeq,
            Self::BadAuth => TransactionResultCode::BadAuth,
            Self::InsufficientBalance => TransactionResultCode::InsufficientBalance,
            Self::NoAccount => TransactionResultCode::NoAccount,
            Self::InsufficientFee => TransactionResultCode::InsufficientFee,
            Self::BadAuthExtra => TransactionResultCode::BadAuthExtra,
            Self::InternalError => TransactionResultCode::InternalError,
            Self::NotSupported => TransactionResultCode::NotSupported,
            Self::FeeBumpInnerFailed(_) => TransactionResultCode::FeeBumpInnerFailed,
            Self::BadSponsorship => TransactionResultCode::BadSponsorship,
            Self::BadMinSeqAgeOrGap => TransactionResultCode::BadMinSeqAgeOrGap,
            Self::Malformed => TransactionResultCode::Malformed,
        }
    }

    /// True iff the code is `Success` or `FeeBumpInnerSuccess`.
    pub fn was_successful(&self) -> bool {
        self.code().is_success()
    }

    /// Logical negation of [`was_successful`](Self::was_successful).
    pub fn was_not_successful(&self) -> bool {
        !self.was_successful()
    }

    /// The snake_case failure token, `None` for the success codes.
    pub fn error_code(&self) -> Option<&'static str> {
        self.code().error_code()
    }

    /// The human-readable failure description, `None` for the success
    /// codes.
    pub fn error_message(&self) -> Option<&'static str> {
        self.code().error_message()
    }

    /// The per-operation results. `None` for every void arm and for the
    /// fee-bump arms, whose payload is the inner pair instead.
    pub fn op_results(&self) -> Option<&[OperationResult]> {
        match self {
            Self::Success(ops) | Self::Failed(ops) => Some(ops),
            _ => None,
        }
    }

    /// The nested inner result pair of the fee-bump arms.
    pub fn inner_result_pair(&self) -> Option<&InnerTransactionResultPair> {
        match self {
            Self::FeeBumpInnerSuccess(pair) | Self::FeeBumpInnerFailed(pair) => Some(pair),
            _ => None,
        }
    }
}

impl XdrEncode for TransactionResultResult {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_i32(self.code() as i32);
        match self {
            Self::FeeBumpInnerSuccess(pair) | Self::FeeBumpInnerFailed(pair) => pair.encode(w),
            Self::Success(ops) | Self::Failed(ops) => ops.encode(w),
            _ => {}
        }
    }
}

impl XdrDecode for TransactionResultResult {
    const TYPE_NAME: &'static str = "TransactionResultResult";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            1 => Ok(Self::FeeBumpInnerSuccess(InnerTransactionResultPair::decode(r)?)),
            0 => Ok(Self::Success(
                r.read_vec(MAX_OPERATIONS as u32, "op results")?,
            )),
            -1 => Ok(Self::Failed(
                r.read_vec(MAX_OPERATIONS as u32, "op results")?,
            )),
            -2 => Ok(Self::TooEarly),
            -3 => Ok(Self::TooLate),
            -4 => Ok(Self::MissingOperation),
            -5 => Ok(Self::BadSeq),
            -6 => Ok(Self::BadAuth),
            -7 => Ok(Self::InsufficientBalance),
            -8 => Ok(Self::NoAccount),
            -9 => Ok(Self::InsufficientFee),
            -10 => Ok(Self::BadAuthExtra),
            -11 => Ok(Self::InternalError),
            -12 => Ok(Self::NotSupported),
            -13 => Ok(Self::FeeBumpInnerFailed(InnerTransactionResultPair::decode(r)?)),
            -14 => Ok(Self::BadSponsorship),
            -15 => Ok(Self::BadMinSeqAgeOrGap),
            -16 => Ok(Self::Malformed),
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

/// A transaction's outcome: the fee actually charged and the result union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    /// The fee actually charged to the fee source.
    pub fee_charged: i64,
    /// The result union.
    pub result: TransactionResultResult,
    /// Reserved.
    pub ext: ExtensionPoint,
}

impl TransactionResult {
    /// True iff the transaction (or fee-bump inner transaction) succeeded.
    pub fn was_successful(&self) -> bool {
        self.result.was_successful()
    }

    /// Logical negation of [`was_successful`](Self::was_successful).
    pub fn was_not_successful(&self) -> bool {
        !self.was_successful()
    }

    /// The result code.
    pub fn result_code(&self) -> TransactionResultCode {
        self.result.code()
    }

    /// The snake_case failure token, `None` on success.
    pub fn error_code(&self) -> Option<&'static str> {
        self.result.error_code()
    }

    /// The human-readable failure description, `None` on success.
    pub fn error_message(&self) -> Option<&'static str> {
        self.result.error_message()
    }
}

impl XdrEncode for TransactionResult {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_i64(self.fee_charged);
        self.result.encode(w);
        self.ext.encode(w);
    }
}

impl XdrDecode for TransactionResult {
    const TYPE_NAME: &'static str = "TransactionResult";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            fee_charged: r.read_i64()?,
            result: TransactionResultResult::decode(r)?,
            ext: ExtensionPoint::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
