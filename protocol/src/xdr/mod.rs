//! # Wire Codec
//!
//! The PULSAR wire format is a 4-byte-aligned, big-endian binary encoding.
//! This module carries the codec contract the rest of the crate is written
//! against:
//!
//! ```text
//! codec.rs - XdrWriter / XdrReader, the XdrEncode / XdrDecode traits,
//!            primitive integers, booleans, opaques, strings, optionals
//!            and counted arrays, plus WireError for everything that can
//!            go wrong while decoding untrusted bytes.
//! ext.rs   - ExtensionPoint, the forward-compatible reserved union that
//!            terminates most wire structs.
//! ```
//!
//! Two encoding rules do all the heavy lifting for the model layer:
//!
//! - **Discriminated unions** encode as a 4-byte big-endian discriminant
//!   followed by the payload of the selected arm (nothing for void arms).
//!   Decoding reads the discriminant first and matches it exhaustively;
//!   a value the type does not know is a [`WireError::UnknownDiscriminant`].
//! - **Optionals** encode as a 4-byte presence flag (0 or 1) followed by
//!   the payload when present. Any other flag value is rejected.
//!
//! Encoding is infallible: every length bound is enforced when a value is
//! constructed, so by the time a value exists it can always be written.
//! Decoding is where all the validation lives, because the input is the
//! network.

pub mod codec;
pub mod ext;

pub use codec::{WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};
pub use ext::ExtensionPoint;
