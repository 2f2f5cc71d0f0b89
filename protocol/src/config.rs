//! # Protocol Constants
//!
//! Every protocol-fixed number lives here. If you are hardcoding a bound
//! somewhere else, you are doing it wrong.
//!
//! These values are consensus-critical: a node that disagrees on any of
//! them rejects valid traffic or accepts invalid traffic. Changing them
//! after mainnet launch is a hard fork.

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Passphrase of the public network. Its SHA-256 digest is the network id
/// mixed into every signature payload, so signatures never replay across
/// networks.
pub const MAINNET_PASSPHRASE: &str = "Public PULSAR Network ; August 2026";

/// Passphrase of the shared test network.
pub const TESTNET_PASSPHRASE: &str = "Test PULSAR Network ; August 2026";

/// Human-readable prefix for Bech32 account addresses.
pub const ADDRESS_HRP: &str = "pulsar";

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

/// Minimum fee per operation, in the smallest fee unit.
///
/// A transaction's fee must cover `operation_count * MIN_OPERATION_FEE`;
/// assembly raises the fee to that floor whenever an appended operation
/// would leave it short.
pub const MIN_OPERATION_FEE: u32 = 100;

// ---------------------------------------------------------------------------
// Structural Bounds
// ---------------------------------------------------------------------------

/// Maximum operations a single transaction may carry.
pub const MAX_OPERATIONS: usize = 100;

/// Maximum decorated signatures an envelope may carry.
pub const MAX_SIGNATURES: usize = 20;

/// Maximum extra signers in a V2 precondition set.
pub const MAX_EXTRA_SIGNERS: usize = 2;

/// Maximum byte length of a text memo.
pub const MEMO_TEXT_MAX_BYTES: usize = 28;

/// Maximum byte length of a signed-payload signer's payload.
pub const SIGNER_PAYLOAD_MAX_BYTES: usize = 64;

/// Maximum byte length of a signature in a decorated signature.
pub const SIGNATURE_MAX_BYTES: usize = 64;

// ---------------------------------------------------------------------------
// Default Validity Window
// ---------------------------------------------------------------------------

/// How far into the past the default precondition window opens. The slack
/// absorbs clock skew between the submitter and validators.
pub const DEFAULT_VALIDITY_PAST_SECS: u64 = 60;

/// How long the default precondition window stays open.
pub const DEFAULT_VALIDITY_SECS: u64 = 3600;
