//! The reserved extension union that terminates most wire structs.

use serde::{Deserialize, Serialize};

use super::codec::{WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};

/// A forward-compatibility hook at the end of a wire struct.
///
/// Today the protocol defines a single arm, `V0`, which is void. Future
/// protocol revisions may add arms; a decoder built against this revision
/// must not choke on them. Unrecognized discriminants are therefore kept
/// as [`ExtensionPoint::Unknown`] and re-emitted verbatim on encode.
///
/// All deployed extension arms are void, so an unknown arm carries no
/// payload bytes. If a future revision attaches a payload to a new arm,
/// decoding that revision's data requires upgrading this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionPoint {
    /// The only defined arm. Void.
    V0,
    /// An arm this revision does not know. Round-trips opaquely.
    Unknown(i32),
}

impl Default for ExtensionPoint {
    fn default() -> Self {
        Self::V0
    }
}

impl XdrEncode for ExtensionPoint {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::V0 => w.write_i32(0),
            Self::Unknown(d) => w.write_i32(*d),
        }
    }
}

impl XdrDecode for ExtensionPoint {
    const TYPE_NAME: &'static str = "ExtensionPoint";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            0 => Ok(Self::V0),
            d => Ok(Self::Unknown(d)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v0_is_four_zero_bytes() {
        assert_eq!(ExtensionPoint::V0.to_xdr(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn unknown_arm_roundtrips() {
        let ext = ExtensionPoint::Unknown(3);
        let back = ExtensionPoint::from_xdr(&ext.to_xdr()).unwrap();
        assert_eq!(back, ext);
    }

    #[test]
    fn decode_zero_is_v0() {
        assert_eq!(
            ExtensionPoint::from_xdr(&[0, 0, 0, 0]).unwrap(),
            ExtensionPoint::V0
        );
    }
}
