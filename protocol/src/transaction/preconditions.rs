//! Transaction validity preconditions.
//!
//! A transaction is only valid while its preconditions hold: inside a time
//! window, inside a ledger-number window, after a minimum source sequence
//! number, after the source sequence has aged enough, and with any extra
//! required signers present.
//!
//! The wire format grew up in two steps. The legacy form carried only an
//! optional time window; the current form ([`PreconditionsV2`]) carries
//! the full structured set. [`Preconditions`] is the three-variant union
//! that reconciles them:
//!
//! - `None` - no constraints at all (discriminant 0, void payload).
//! - `Time` - the legacy time-window-only form (discriminant 1).
//! - `V2` - the full structured form (discriminant 2).
//!
//! Exactly one variant is active. Accessors read through whichever variant
//! that is, and the `with_*` mutators promote to `V2` on first contact
//! with any V2-only field, preserving fields already set. A value never
//! silently downgrades: callers that want the legacy wire shape must ask
//! for it via [`Preconditions::wrap_time_bounds`].
//!
//! "No time bounds" is expressed by the `None` variant, never by a
//! `TimeBounds` of two zeros. A zero on one side of an existing window
//! means unbounded on that side only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TxError;
use crate::account::SignerKey;
use crate::config::{
    DEFAULT_VALIDITY_PAST_SECS, DEFAULT_VALIDITY_SECS, MAX_EXTRA_SIGNERS,
};
use crate::xdr::{WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};

/// Wire discriminants for the precondition union.
const PRECOND_NONE: i32 = 0;
const PRECOND_TIME: i32 = 1;
const PRECOND_V2: i32 = 2;

// ---------------------------------------------------------------------------
// TimeBounds
// ---------------------------------------------------------------------------

/// A validity window in Unix-epoch seconds.
///
/// `min_time == 0` means no lower bound; `max_time == 0` means no upper
/// bound. Use [`Preconditions::none`] to express "no bounds at all";
/// a both-zero `TimeBounds` is a window, not the absence of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    /// Earliest time the transaction is valid, or 0 for unbounded.
    pub min_time: u64,
    /// Latest time the transaction is valid, or 0 for unbounded.
    pub max_time: u64,
}

impl TimeBounds {
    /// A window from explicit epoch seconds.
    pub fn new(min_time: u64, max_time: u64) -> Self {
        Self { min_time, max_time }
    }

    /// A window parsed from two RFC 3339 timestamps.
    ///
    /// Fails with [`TxError::InvalidTimePoint`] on anything that does not
    /// parse or that predates the epoch.
    pub fn from_rfc3339(min: &str, max: &str) -> Result<Self, TxError> {
        Ok(Self {
            min_time: parse_time_point(min)?,
            max_time: parse_time_point(max)?,
        })
    }

    /// A window opening now and closing `valid_for_secs` from now.
    pub fn valid_for(valid_for_secs: u64) -> Self {
        let now = Utc::now().timestamp() as u64;
        Self {
            min_time: now,
            max_time: now + valid_for_secs,
        }
    }

    /// The width of the window in seconds.
    ///
    /// Only defined when both sides are bounded; an unbounded side has no
    /// interval to report and fails with [`TxError::UnboundedTimeInterval`].
    pub fn interval(&self) -> Result<u64, TxError> {
        if self.min_time == 0 || self.max_time == 0 {
            return Err(TxError::UnboundedTimeInterval);
        }
        Ok(self.max_time.saturating_sub(self.min_time))
    }
}

fn parse_time_point(input: &str) -> Result<u64, TxError> {
    let parsed = DateTime::parse_from_rfc3339(input).map_err(|_| TxError::InvalidTimePoint {
        input: input.to_string(),
    })?;
    let secs = parsed.timestamp();
    if secs < 0 {
        return Err(TxError::InvalidTimePoint {
            input: input.to_string(),
        });
    }
    Ok(secs as u64)
}

impl XdrEncode for TimeBounds {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_u64(self.min_time);
        w.write_u64(self.max_time);
    }
}

impl XdrDecode for TimeBounds {
    const TYPE_NAME: &'static str = "TimeBounds";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            min_time: r.read_u64()?,
            max_time: r.read_u64()?,
        })
    }
}

// ---------------------------------------------------------------------------
// LedgerBounds
// ---------------------------------------------------------------------------

/// A validity window in ledger sequence numbers. Zero means unbounded on
/// that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBounds {
    /// First ledger the transaction is valid in, or 0 for unbounded.
    pub min_ledger: u32,
    /// Last ledger the transaction is valid in, or 0 for unbounded.
    pub max_ledger: u32,
}

impl LedgerBounds {
    /// A window from explicit ledger numbers.
    pub fn new(min_ledger: u32, max_ledger: u32) -> Self {
        Self {
            min_ledger,
            max_ledger,
        }
    }
}

impl XdrEncode for LedgerBounds {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_u32(self.min_ledger);
        w.write_u32(self.max_ledger);
    }
}

impl XdrDecode for LedgerBounds {
    const TYPE_NAME: &'static str = "LedgerBounds";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            min_ledger: r.read_u32()?,
            max_ledger: r.read_u32()?,
        })
    }
}

// ---------------------------------------------------------------------------
// PreconditionsV2
// ---------------------------------------------------------------------------

/// The full structured precondition set.
///
/// All fields except the optionals default to zero/empty, which the
/// protocol reads as "unconstrained".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreconditionsV2 {
    /// Optional validity time window.
    pub time_bounds: Option<TimeBounds>,
    /// Optional validity ledger window.
    pub ledger_bounds: Option<LedgerBounds>,
    /// The source sequence number must be at least this, when present.
    pub min_seq_num: Option<i64>,
    /// Seconds the current source sequence number must have existed.
    pub min_seq_age: u64,
    /// Ledgers that must have closed since the source sequence changed.
    pub min_seq_ledger_gap: u32,
    /// Extra signers required for validity, at most two.
    pub extra_signers: Vec<SignerKey>,
}

impl PreconditionsV2 {
    /// Replaces the extra-signer list, enforcing the protocol bound.
    pub fn with_extra_signers(mut self, signers: Vec<SignerKey>) -> Result<Self, TxError> {
        if signers.len() > MAX_EXTRA_SIGNERS {
            return Err(TxError::TooManyExtraSigners {
                count: signers.len(),
            });
        }
        self.extra_signers = signers;
        Ok(self)
    }
}

impl XdrEncode for PreconditionsV2 {
    fn encode(&self, w: &mut XdrWriter) {
        self.time_bounds.encode(w);
        self.ledger_bounds.encode(w);
        self.min_seq_num.encode(w);
        w.write_u64(self.min_seq_age);
        w.write_u32(self.min_seq_ledger_gap);
        self.extra_signers.encode(w);
    }
}

impl XdrDecode for PreconditionsV2 {
    const TYPE_NAME: &'static str = "PreconditionsV2";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            time_bounds: Option::<TimeBounds>::decode(r)?,
            ledger_bounds: Option::<LedgerBounds>::decode(r)?,
            min_seq_num: Option::<i64>::decode(r)?,
            min_seq_age: r.read_u64()?,
            min_seq_ledger_gap: r.read_u32()?,
            extra_signers: r.read_vec(MAX_EXTRA_SIGNERS as u32, "extra_signers")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

/// The precondition union carried by a current-shape transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preconditions {
    /// No constraints. Encodes as four zero bytes, nothing else.
    None,
    /// Legacy form: a time window only.
    Time(TimeBounds),
    /// Current form: the full structured set.
    V2(PreconditionsV2),
}

impl Preconditions {
    /// No constraints at all.
    pub fn none() -> Self {
        Self::None
    }

    /// Wraps an optional time window in the legacy variant.
    ///
    /// An absent window yields `None`; a present one yields `Time`, not
    /// `V2`, preserving the legacy wire shape for tools that still expect
    /// it.
    pub fn wrap_time_bounds(bounds: Option<TimeBounds>) -> Self {
        match bounds {
            Some(tb) => Self::Time(tb),
            None => Self::None,
        }
    }

    /// Wraps a structured set in the current variant.
    pub fn wrap_v2(v2: PreconditionsV2) -> Self {
        Self::V2(v2)
    }

    // -- read-through accessors --------------------------------------------

    /// The active time window, whichever variant carries it.
    pub fn time_bounds(&self) -> Option<&TimeBounds> {
        match self {
            Self::None => None,
            Self::Time(tb) => Some(tb),
            Self::V2(v2) => v2.time_bounds.as_ref(),
        }
    }

    /// The active ledger window. Only a V2 set can carry one.
    pub fn ledger_bounds(&self) -> Option<&LedgerBounds> {
        match self {
            Self::V2(v2) => v2.ledger_bounds.as_ref(),
            _ => None,
        }
    }

    /// The minimum source sequence number, when constrained.
    pub fn min_seq_num(&self) -> Option<i64> {
        match self {
            Self::V2(v2) => v2.min_seq_num,
            _ => None,
        }
    }

    /// The minimum sequence age in seconds; zero when unconstrained.
    pub fn min_seq_age(&self) -> u64 {
        match self {
            Self::V2(v2) => v2.min_seq_age,
            _ => 0,
        }
    }

    /// The minimum sequence ledger gap; zero when unconstrained.
    pub fn min_seq_ledger_gap(&self) -> u32 {
        match self {
            Self::V2(v2) => v2.min_seq_ledger_gap,
            _ => 0,
        }
    }

    /// The extra required signers; empty when unconstrained.
    pub fn extra_signers(&self) -> &[SignerKey] {
        match self {
            Self::V2(v2) => &v2.extra_signers,
            _ => &[],
        }
    }

    // -- promoting mutators ------------------------------------------------

    /// Promotes whatever is active into a V2 set, preserving a legacy time
    /// window. This is the one-way door: once any V2-only field is asked
    /// for, the value stays V2.
    fn into_v2(self) -> PreconditionsV2 {
        match self {
            Self::None => PreconditionsV2::default(),
            Self::Time(tb) => PreconditionsV2 {
                time_bounds: Some(tb),
                ..PreconditionsV2::default()
            },
            Self::V2(v2) => v2,
        }
    }

    /// Sets the lower edge of the time window, promoting to V2.
    pub fn with_min_time(self, min_time: u64) -> Self {
        let mut v2 = self.into_v2();
        let mut tb = v2.time_bounds.unwrap_or(TimeBounds::new(0, 0));
        tb.min_time = min_time;
        v2.time_bounds = Some(tb);
        Self::V2(v2)
    }

    /// Sets the upper edge of the time window, promoting to V2.
    pub fn with_max_time(self, max_time: u64) -> Self {
        let mut v2 = self.into_v2();
        let mut tb = v2.time_bounds.unwrap_or(TimeBounds::new(0, 0));
        tb.max_time = max_time;
        v2.time_bounds = Some(tb);
        Self::V2(v2)
    }

    /// Sets the lower edge of the ledger window, promoting to V2.
    pub fn with_min_ledger(self, min_ledger: u32) -> Self {
        let mut v2 = self.into_v2();
        let mut lb = v2.ledger_bounds.unwrap_or(LedgerBounds::new(0, 0));
        lb.min_ledger = min_ledger;
        v2.ledger_bounds = Some(lb);
        Self::V2(v2)
    }

    /// Sets the upper edge of the ledger window, promoting to V2.
    pub fn with_max_ledger(self, max_ledger: u32) -> Self {
        let mut v2 = self.into_v2();
        let mut lb = v2.ledger_bounds.unwrap_or(LedgerBounds::new(0, 0));
        lb.max_ledger = max_ledger;
        v2.ledger_bounds = Some(lb);
        Self::V2(v2)
    }

    /// Sets the minimum source sequence number, promoting to V2.
    pub fn with_min_seq_num(self, min_seq_num: i64) -> Self {
        let mut v2 = self.into_v2();
        v2.min_seq_num = Some(min_seq_num);
        Self::V2(v2)
    }

    /// Sets the minimum sequence age, promoting to V2.
    pub fn with_min_seq_age(self, min_seq_age: u64) -> Self {
        let mut v2 = self.into_v2();
        v2.min_seq_age = min_seq_age;
        Self::V2(v2)
    }

    /// Sets the minimum sequence ledger gap, promoting to V2.
    pub fn with_min_seq_ledger_gap(self, min_seq_ledger_gap: u32) -> Self {
        let mut v2 = self.into_v2();
        v2.min_seq_ledger_gap = min_seq_ledger_gap;
        Self::V2(v2)
    }

    /// Sets the extra required signers, promoting to V2. At most two.
    pub fn with_extra_signers(self, signers: Vec<SignerKey>) -> Result<Self, TxError> {
        let v2 = self.into_v2().with_extra_signers(signers)?;
        Ok(Self::V2(v2))
    }
}

/// The default precondition set is a V2 window that opened one minute ago
/// and closes in one hour: immediately valid despite clock skew, expired
/// soon enough that a lost transaction cannot resurface days later.
///
/// Note the distinction from [`Preconditions::none`], which is the
/// unconstrained starting point. `wrap_v2(PreconditionsV2::default())`
/// is the canonical *empty* V2 set; this is the canonical *sensible* one.
impl Default for Preconditions {
    fn default() -> Self {
        let now = Utc::now().timestamp() as u64;
        Self::V2(PreconditionsV2 {
            time_bounds: Some(TimeBounds::new(
                now.saturating_sub(DEFAULT_VALIDITY_PAST_SECS),
                now + DEFAULT_VALIDITY_SECS,
            )),
            ..PreconditionsV2::default()
        })
    }
}

impl XdrEncode for Preconditions {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::None => w.write_i32(PRECOND_NONE),
            Self::Time(tb) => {
                w.write_i32(PRECOND_TIME);
                tb.encode(w);
            }
            Self::V2(v2) => {
                w.write_i32(PRECOND_V2);
                v2.encode(w);
            }
        }
    }
}

impl XdrDecode for Preconditions {
    const TYPE_NAME: &'static str = "Preconditions";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            PRECOND_NONE => Ok(Self::None),
            PRECOND_TIME => Ok(Self::Time(TimeBounds::decode(r)?)),
            PRECOND_V2 => Ok(Self::V2(PreconditionsV2::decode(r)?)),
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
