//! The five-variant memo union.

use serde::{Deserialize, Serialize};

use super::TxError;
use crate::config::MEMO_TEXT_MAX_BYTES;
use crate::xdr::{WireError, XdrDecode, XdrEncode, XdrReader, XdrWriter};

const MEMO_NONE: i32 = 0;
const MEMO_TEXT: i32 = 1;
const MEMO_ID: i32 = 2;
const MEMO_HASH: i32 = 3;
const MEMO_RETURN: i32 = 4;

/// A short annotation attached to a transaction.
///
/// Memos mean nothing to the protocol itself; they exist for receivers
/// (text and id memos identify a customer behind a shared account, hash
/// and return memos reference external documents or a refunded
/// transaction). Text memos are bounded at 28 bytes of UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Memo {
    /// No memo.
    None,
    /// Up to 28 bytes of UTF-8 text.
    Text(String),
    /// A 64-bit identifier.
    Id(u64),
    /// A 32-byte hash of some external document.
    Hash([u8; 32]),
    /// The hash of the transaction being refunded by this one.
    Return([u8; 32]),
}

impl Memo {
    /// No memo.
    pub fn none() -> Self {
        Self::None
    }

    /// A text memo, enforcing the 28-byte bound.
    pub fn text(text: impl Into<String>) -> Result<Self, TxError> {
        let text = text.into();
        if text.len() > MEMO_TEXT_MAX_BYTES {
            return Err(TxError::MemoTextTooLong { len: text.len() });
        }
        Ok(Self::Text(text))
    }

    /// An id memo.
    pub fn id(id: u64) -> Self {
        Self::Id(id)
    }

    /// A hash memo.
    pub fn hash(hash: [u8; 32]) -> Self {
        Self::Hash(hash)
    }

    /// A return-hash memo.
    pub fn return_hash(hash: [u8; 32]) -> Self {
        Self::Return(hash)
    }
}

impl Default for Memo {
    fn default() -> Self {
        Self::None
    }
}

impl XdrEncode for Memo {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Self::None => w.write_i32(MEMO_NONE),
            Self::Text(text) => {
                w.write_i32(MEMO_TEXT);
                w.write_string(text);
            }
            Self::Id(id) => {
                w.write_i32(MEMO_ID);
                w.write_u64(*id);
            }
            Self::Hash(hash) => {
                w.write_i32(MEMO_HASH);
                w.write_fixed(hash);
            }
            Self::Return(hash) => {
                w.write_i32(MEMO_RETURN);
                w.write_fixed(hash);
            }
        }
    }
}

impl XdrDecode for Memo {
    const TYPE_NAME: &'static str = "Memo";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        match r.read_discriminant(Self::TYPE_NAME)? {
            MEMO_NONE => Ok(Self::None),
            MEMO_TEXT => Ok(Self::Text(
                r.read_string(MEMO_TEXT_MAX_BYTES as u32, "memo text")?,
            )),
            MEMO_ID => Ok(Self::Id(r.read_u64()?)),
            MEMO_HASH => Ok(Self::Hash(r.read_fixed::<32>(Self::TYPE_NAME)?)),
            MEMO_RETURN => Ok(Self::Return(r.read_fixed::<32>(Self::TYPE_NAME)?)),
            value => Err(WireError::UnknownDiscriminant {
                type_name: Self::TYPE_NAME,
                value,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_bound_enforced_at_construction() {
        assert!(Memo::text("a".repeat(28)).is_ok());
        let err = Memo::text("a".repeat(29)).unwrap_err();
        assert!(matches!(err, TxError::MemoTextTooLong { len: 29 }));
    }

    #[test]
    fn text_bound_is_bytes_not_chars() {
        // 10 snowmen are 30 UTF-8 bytes.
        let err = Memo::text("\u{2603}".repeat(10)).unwrap_err();
        assert!(matches!(err, TxError::MemoTextTooLong { len: 30 }));
    }

    #[test]
    fn roundtrip_all_variants() {
        let memos = vec![
            Memo::none(),
            Memo::text("invoice 1234").unwrap(),
            Memo::id(u64::MAX),
            Memo::hash([5u8; 32]),
            Memo::return_hash([6u8; 32]),
        ];
        for memo in memos {
            assert_eq!(Memo::from_xdr(&memo.to_xdr()).unwrap(), memo);
        }
    }

    #[test]
    fn none_is_four_zero_bytes() {
        assert_eq!(Memo::none().to_xdr(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn decode_rejects_oversized_text() {
        let mut w = XdrWriter::new();
        w.write_i32(MEMO_TEXT);
        w.write_string(&"b".repeat(32));
        let err = Memo::from_xdr(&w.finish()).unwrap_err();
        assert!(matches!(
            err,
            WireError::LengthOutOfBounds { len: 32, max: 28, .. }
        ));
    }

    #[test]
    fn unknown_discriminant_fails_decode() {
        let err = Memo::from_xdr(&[0, 0, 0, 5]).unwrap_err();
        assert!(matches!(err, WireError::UnknownDiscriminant { value: 5, .. }));
    }
}
