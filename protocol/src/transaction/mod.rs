//! # Transaction Model
//!
//! Construction, wire encoding, signature payloads and result decoding for
//! PULSAR transactions. Everything in this module is an immutable value:
//! "mutators" are copy-on-write and return a new value with one field
//! replaced, so assembly on independent tasks needs no coordination.
//!
//! ## Architecture
//!
//! ```text
//! preconditions.rs - validity constraints: time/ledger windows, sequence
//!                    gates, extra signers, and the three-variant union
//!                    that normalizes legacy and current forms
//! memo.rs          - the five-variant memo union
//! operation.rs     - operations, assets, signing-threshold classification
//! builder.rs       - Transaction (current shape) and TransactionV0
//!                    (legacy shape): assembly, fee floor, thresholds
//! fee_bump.rs      - FeeBumpTransaction wrapping a current-shape envelope
//! envelope.rs      - decorated signatures and the three envelope forms
//! signing.rs       - Network, TaggedTransaction and the canonical
//!                    signature payload (what actually gets signed)
//! result.rs        - transaction/operation result unions and the
//!                    error-code tables
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Assemble** a [`Transaction`] from a source account, a sequence
//!    number and operations; preconditions and memo default to empty.
//! 2. **Compose** the [`TransactionSignaturePayload`] for a target
//!    network, hash it, and sign the digest.
//! 3. **Enclose** transaction plus signatures in a
//!    [`TransactionEnvelope`] and submit it.
//! 4. **Decode** the [`TransactionResult`] that comes back and map its
//!    code to success or a named failure.
//!
//! A transaction value is created once per submission attempt and
//! discarded after encoding; nothing here outlives a request/response
//! cycle.

use thiserror::Error;

pub mod builder;
pub mod envelope;
pub mod fee_bump;
pub mod memo;
pub mod operation;
pub mod preconditions;
pub mod result;
pub mod signing;

pub use builder::{Transaction, TransactionV0};
pub use envelope::{
    DecoratedSignature, FeeBumpTransactionEnvelope, TransactionEnvelope, TransactionV0Envelope,
    TransactionV1Envelope,
};
pub use fee_bump::FeeBumpTransaction;
pub use memo::Memo;
pub use operation::{Asset, Operation, OperationBody, Threshold};
pub use preconditions::{LedgerBounds, Preconditions, PreconditionsV2, TimeBounds};
pub use result::{
    InnerTransactionResult, InnerTransactionResultPair, InnerTransactionResultResult,
    OperationResult, OperationResultTr, TransactionResult, TransactionResultCode,
    TransactionResultResult,
};
pub use signing::{Network, TaggedTransaction, TransactionSignaturePayload};

use crate::config::{
    MAX_EXTRA_SIGNERS, MAX_OPERATIONS, MAX_SIGNATURES, MEMO_TEXT_MAX_BYTES,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while constructing transaction values.
///
/// These all surface synchronously at the point of violation; there is no
/// transient failure anywhere in this module. Each message names the field
/// and bound involved so the caller can correct construction before
/// resubmitting.
#[derive(Debug, Error)]
pub enum TxError {
    /// A text memo over the protocol-fixed byte bound.
    #[error("memo text is {len} bytes, maximum is {MEMO_TEXT_MAX_BYTES}")]
    MemoTextTooLong { len: usize },

    /// An asset code that is empty or longer than twelve characters.
    #[error("asset code '{code}' must be 1 to 12 characters")]
    InvalidAssetCode { code: String },

    /// More extra signers than a V2 precondition set may carry.
    #[error("preconditions allow at most {MAX_EXTRA_SIGNERS} extra signers, got {count}")]
    TooManyExtraSigners { count: usize },

    /// Appending an operation past the per-transaction bound.
    #[error("transaction already carries the maximum of {MAX_OPERATIONS} operations")]
    TooManyOperations,

    /// Appending a signature past the per-envelope bound.
    #[error("envelope already carries the maximum of {MAX_SIGNATURES} signatures")]
    TooManySignatures,

    /// A time-bound string that does not parse as RFC 3339.
    #[error("cannot parse time point '{input}'")]
    InvalidTimePoint { input: String },

    /// Interval requested on time bounds that are unbounded on a side.
    #[error("time bounds are unbounded on at least one side, no interval exists")]
    UnboundedTimeInterval,

    /// Fee-bumping an envelope that does not wrap the current shape.
    #[error("fee bump requires a current-shape transaction envelope, got {found}")]
    FeeBumpRequiresCurrentShape { found: &'static str },

    /// Opt-in fee check: the outer fee does not cover the inner fee.
    #[error("fee bump fee {outer} does not cover the inner transaction fee {inner}")]
    FeeBelowInner { outer: i64, inner: i64 },
}
