//! Transaction assembly for the current and legacy shapes.
//!
//! A [`Transaction`] is assembled field by field, copy-on-write: every
//! `with_*` returns a new value and leaves the original untouched. The
//! one piece of non-obvious logic is the fee floor: the fee must cover
//! `operation_count * MIN_OPERATION_FEE`, and appending an operation
//! raises the fee to that floor when it would otherwise fall short. The
//! fee is never lowered automatically.
//!
//! [`TransactionV0`] is the legacy wire shape: the source account is a
//! raw Ed25519 key instead of a muxed account, and the only supported
//! precondition is an optional time window. It follows the same assembly
//! rules and can be upgraded losslessly to the current shape, which is
//! how legacy transactions enter signature payloads (see
//! [`super::signing`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::account::MuxedAccount;
use crate::config::{MAX_OPERATIONS, MIN_OPERATION_FEE};
use crate::xdr::{ExtensionPoint, WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};

use super::memo::Memo;
use super::operation::{max_threshold, Operation, Threshold};
use super::preconditions::{Preconditions, TimeBounds};
use super::TxError;

// ---------------------------------------------------------------------------
// Transaction (current shape)
// ---------------------------------------------------------------------------

/// A current-shape transaction.
///
/// Immutable once constructed; assembly happens through the `with_*`
/// methods, each returning a new value. A transaction is built once per
/// submission attempt and discarded after encoding.
///
/// # Examples
///
/// ```
/// use pulsar_protocol::account::AccountId;
/// use pulsar_protocol::transaction::{Operation, Transaction};
/// use pulsar_protocol::transaction::Asset;
///
/// let source = AccountId::from_bytes([1u8; 32]);
/// let dest = AccountId::from_bytes([2u8; 32]);
/// let tx = Transaction::new(source, 5)
///     .with_operation(Operation::payment(dest, Asset::native(), 1_000))
///     .unwrap();
/// assert_eq!(tx.seq_num(), 5);
/// assert!(tx.fee() >= 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    source_account: MuxedAccount,
    fee: u32,
    seq_num: i64,
    preconditions: Preconditions,
    memo: Memo,
    operations: Vec<Operation>,
    ext: ExtensionPoint,
}

impl Transaction {
    /// Starts a transaction for a source account and sequence number.
    ///
    /// The source is normalized to the muxed representation whatever its
    /// concrete form. Preconditions and memo start empty, the operation
    /// list starts empty, and the fee starts at the single-operation
    /// floor.
    pub fn new(source_account: impl Into<MuxedAccount>, seq_num: i64) -> Self {
        Self {
            source_account: source_account.into(),
            fee: MIN_OPERATION_FEE,
            seq_num,
            preconditions: Preconditions::none(),
            memo: Memo::None,
            operations: Vec::new(),
            ext: ExtensionPoint::V0,
        }
    }

    /// Sets an explicit fee.
    ///
    /// The fee is clamped up to the floor for the operations already
    /// present, so the fee invariant holds at every step, not just at the
    /// end.
    pub fn with_fee(mut self, fee: u32) -> Self {
        self.fee = fee.max(self.minimum_fee());
        self
    }

    /// Appends an operation, raising the fee to the new floor if needed.
    ///
    /// Fails with [`TxError::TooManyOperations`] past the per-transaction
    /// bound.
    pub fn with_operation(mut self, operation: Operation) -> Result<Self, TxError> {
        if self.operations.len() >= MAX_OPERATIONS {
            return Err(TxError::TooManyOperations);
        }
        self.operations.push(operation);
        let floor = self.minimum_fee();
        if self.fee < floor {
            debug!(fee = self.fee, floor, "raising fee to operation floor");
            self.fee = floor;
        }
        Ok(self)
    }

    /// Replaces the memo.
    pub fn with_memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    /// Replaces the preconditions.
    pub fn with_preconditions(mut self, preconditions: Preconditions) -> Self {
        self.preconditions = preconditions;
        self
    }

    /// The source account in muxed form.
    pub fn source_account(&self) -> &MuxedAccount {
        &self.source_account
    }

    /// The fee in the smallest fee unit.
    pub fn fee(&self) -> u32 {
        self.fee
    }

    /// The sequence number this transaction consumes.
    pub fn seq_num(&self) -> i64 {
        self.seq_num
    }

    /// The validity preconditions.
    pub fn preconditions(&self) -> &Preconditions {
        &self.preconditions
    }

    /// The memo.
    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// The operations, in execution order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The fee floor for the current operation count.
    pub fn minimum_fee(&self) -> u32 {
        self.operations.len() as u32 * MIN_OPERATION_FEE
    }

    /// The signing-threshold category the source account must clear:
    /// the maximum over all operations, or `None` while the operation
    /// list is empty.
    pub fn operation_threshold(&self) -> Option<Threshold> {
        max_threshold(&self.operations)
    }
}

impl XdrEncode for Transaction {
    fn encode(&self, w: &mut XdrWriter) {
        self.source_account.encode(w);
        w.write_u32(self.fee);
        w.write_i64(self.seq_num);
        self.preconditions.encode(w);
        self.memo.encode(w);
        self.operations.encode(w);
        self.ext.encode(w);
    }
}

impl XdrDecode for Transaction {
    const TYPE_NAME: &'static str = "Transaction";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            source_account: MuxedAccount::decode(r)?,
            fee: r.read_u32()?,
            seq_num: r.read_i64()?,
            preconditions: Preconditions::decode(r)?,
            memo: Memo::decode(r)?,
            operations: r.read_vec(MAX_OPERATIONS as u32, "operations")?,
            ext: ExtensionPoint::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// TransactionV0 (legacy shape)
// ---------------------------------------------------------------------------

/// A legacy-shape transaction.
///
/// Predates both muxed accounts and structured preconditions: the source
/// is a bare Ed25519 key and the only constraint is an optional time
/// window. Kept for decoding old traffic and for tooling that still emits
/// it; new construction should use [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionV0 {
    source_account_ed25519: [u8; 32],
    fee: u32,
    seq_num: i64,
    time_bounds: Option<TimeBounds>,
    memo: Memo,
    operations: Vec<Operation>,
    ext: ExtensionPoint,
}

impl TransactionV0 {
    /// Starts a legacy transaction for a raw source key and sequence
    /// number. Same defaults as the current shape.
    pub fn new(source_account_ed25519: [u8; 32], seq_num: i64) -> Self {
        Self {
            source_account_ed25519,
            fee: MIN_OPERATION_FEE,
            seq_num,
            time_bounds: None,
            memo: Memo::None,
            operations: Vec::new(),
            ext: ExtensionPoint::V0,
        }
    }

    /// Sets an explicit fee, clamped up to the current floor.
    pub fn with_fee(mut self, fee: u32) -> Self {
        self.fee = fee.max(self.minimum_fee());
        self
    }

    /// Appends an operation under the same fee rules as the current shape.
    pub fn with_operation(mut self, operation: Operation) -> Result<Self, TxError> {
        if self.operations.len() >= MAX_OPERATIONS {
            return Err(TxError::TooManyOperations);
        }
        self.operations.push(operation);
        let floor = self.minimum_fee();
        if self.fee < floor {
            debug!(fee = self.fee, floor, "raising fee to operation floor");
            self.fee = floor;
        }
        Ok(self)
    }

    /// Replaces the memo.
    pub fn with_memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    /// Replaces the optional time window.
    pub fn with_time_bounds(mut self, time_bounds: Option<TimeBounds>) -> Self {
        self.time_bounds = time_bounds;
        self
    }

    /// The raw source key.
    pub fn source_account_ed25519(&self) -> &[u8; 32] {
        &self.source_account_ed25519
    }

    /// The fee in the smallest fee unit.
    pub fn fee(&self) -> u32 {
        self.fee
    }

    /// The sequence number this transaction consumes.
    pub fn seq_num(&self) -> i64 {
        self.seq_num
    }

    /// The optional time window.
    pub fn time_bounds(&self) -> Option<&TimeBounds> {
        self.time_bounds.as_ref()
    }

    /// The memo.
    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// The operations, in execution order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The fee floor for the current operation count.
    pub fn minimum_fee(&self) -> u32 {
        self.operations.len() as u32 * MIN_OPERATION_FEE
    }

    /// The signing-threshold category, as for the current shape.
    pub fn operation_threshold(&self) -> Option<Threshold> {
        max_threshold(&self.operations)
    }

    /// Rewrites this legacy transaction into its current-shape equivalent.
    ///
    /// The source key is promoted to the muxed form; fee, sequence number,
    /// memo and operations carry over verbatim; the optional time window
    /// becomes `Preconditions::None` or the `Time` variant. The upgrade is
    /// what makes a legacy transaction and its current-shape twin sign
    /// byte-identically.
    pub fn upgrade(&self) -> Transaction {
        Transaction {
            source_account: MuxedAccount::from_bytes(self.source_account_ed25519),
            fee: self.fee,
            seq_num: self.seq_num,
            preconditions: Preconditions::wrap_time_bounds(self.time_bounds),
            memo: self.memo.clone(),
            operations: self.operations.clone(),
            ext: ExtensionPoint::V0,
        }
    }
}

impl XdrEncode for TransactionV0 {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_fixed(&self.source_account_ed25519);
        w.write_u32(self.fee);
        w.write_i64(self.seq_num);
        self.time_bounds.encode(w);
        self.memo.encode(w);
        self.operations.encode(w);
        self.ext.encode(w);
    }
}

impl XdrDecode for TransactionV0 {
    const TYPE_NAME: &'static str = "TransactionV0";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            source_account_ed25519: r.read_fixed::<32>(Self::TYPE_NAME)?,
            fee: r.read_u32()?,
            seq_num: r.read_i64()?,
            time_bounds: Option::<TimeBounds>::decode(r)?,
            memo: Memo::decode(r)?,
            operations: r.read_vec(MAX_OPERATIONS as u32, "operations")?,
            ext: ExtensionPoint::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
