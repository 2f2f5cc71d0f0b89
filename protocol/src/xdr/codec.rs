//! Writer, reader and the encode/decode traits for the wire format.
//!
//! All multi-byte integers are big-endian. Variable-length data is
//! length-prefixed with an unsigned 32-bit count and padded with zero
//! bytes to the next 4-byte boundary. The reader rejects non-zero padding,
//! truncated buffers, oversized length fields and non-canonical booleans,
//! so a successful decode means the bytes were exactly one canonical
//! encoding of the value.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure modes when reading untrusted wire bytes.
///
/// Every variant names the type being decoded and the observed value, so a
/// caller can report exactly which field of which structure was malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The buffer ended before the value was complete.
    #[error("unexpected end of input while decoding {type_name}: need {needed} bytes, {remaining} remain")]
    UnexpectedEof {
        type_name: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// A union discriminant that maps to no known arm.
    #[error("unknown discriminant {value} for {type_name}")]
    UnknownDiscriminant {
        type_name: &'static str,
        value: i32,
    },

    /// A length field exceeds the protocol-fixed bound for that field.
    #[error("{type_name} length {len} exceeds the maximum of {max}")]
    LengthOutOfBounds {
        type_name: &'static str,
        len: u32,
        max: u32,
    },

    /// A boolean or optional presence flag that is neither 0 nor 1.
    #[error("presence flag for {type_name} must be 0 or 1, got {value}")]
    NonCanonicalFlag {
        type_name: &'static str,
        value: u32,
    },

    /// Padding bytes after variable-length data must be zero.
    #[error("non-zero padding after {type_name}")]
    NonZeroPadding { type_name: &'static str },

    /// A string field whose payload is not valid UTF-8.
    #[error("{type_name} payload is not valid UTF-8")]
    InvalidUtf8 { type_name: &'static str },

    /// Bytes remained after the outermost value was fully decoded.
    #[error("{remaining} trailing bytes after decoding {type_name}")]
    TrailingBytes {
        type_name: &'static str,
        remaining: usize,
    },
}

/// Rounds a byte count up to the next 4-byte boundary.
#[inline]
fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

// ---------------------------------------------------------------------------
// XdrWriter
// ---------------------------------------------------------------------------

/// Accumulates the canonical byte encoding of a value.
///
/// The writer is append-only. Model types implement [`XdrEncode`] by
/// writing their fields in wire order; composition falls out of calling
/// `encode` on nested values with the same writer.
#[derive(Debug, Default)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a writer with a pre-allocated buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes an unsigned 32-bit integer, big-endian.
    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Writes a signed 32-bit integer, big-endian.
    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Writes an unsigned 64-bit integer, big-endian.
    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Writes a signed 64-bit integer, big-endian.
    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Writes a boolean as a 4-byte flag (0 or 1).
    pub fn write_bool(&mut self, v: bool) {
        self.write_u32(v as u32);
    }

    /// Writes fixed-length opaque data, padded to a 4-byte boundary.
    pub fn write_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.write_padding(bytes.len());
    }

    /// Writes variable-length opaque data: 4-byte length, payload, padding.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
        self.write_padding(bytes.len());
    }

    /// Writes a string as variable-length opaque UTF-8.
    pub fn write_string(&mut self, s: &str) {
        self.write_var_bytes(s.as_bytes());
    }

    /// Consumes the writer and returns the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn write_padding(&mut self, payload_len: usize) {
        for _ in payload_len..padded_len(payload_len) {
            self.buf.push(0);
        }
    }
}

// ---------------------------------------------------------------------------
// XdrReader
// ---------------------------------------------------------------------------

/// A cursor over wire bytes being decoded.
///
/// Consumes the input strictly left to right. Every read validates before
/// it advances, so the position is always at a value boundary.
pub struct XdrReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> XdrReader<'a> {
    /// Creates a reader over the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize, type_name: &'static str) -> Result<&'a [u8], WireError> {
        if self.remaining() < n {
            return Err(WireError::UnexpectedEof {
                type_name,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads an unsigned 32-bit integer.
    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        let bytes = self.take(4, "u32")?;
        Ok(u32::from_be_bytes(bytes.try_into().expect("4-byte slice")))
    }

    /// Reads a signed 32-bit integer.
    pub fn read_i32(&mut self) -> Result<i32, WireError> {
        let bytes = self.take(4, "i32")?;
        Ok(i32::from_be_bytes(bytes.try_into().expect("4-byte slice")))
    }

    /// Reads an unsigned 64-bit integer.
    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        let bytes = self.take(8, "u64")?;
        Ok(u64::from_be_bytes(bytes.try_into().expect("8-byte slice")))
    }

    /// Reads a signed 64-bit integer.
    pub fn read_i64(&mut self) -> Result<i64, WireError> {
        let bytes = self.take(8, "i64")?;
        Ok(i64::from_be_bytes(bytes.try_into().expect("8-byte slice")))
    }

    /// Reads a union discriminant. Same wire shape as `i32`; split out so
    /// union decoders read as intended at the call site.
    pub fn read_discriminant(&mut self, type_name: &'static str) -> Result<i32, WireError> {
        let bytes = self.take(4, type_name)?;
        Ok(i32::from_be_bytes(bytes.try_into().expect("4-byte slice")))
    }

    /// Reads a boolean flag, rejecting anything but 0 or 1.
    pub fn read_bool(&mut self, type_name: &'static str) -> Result<bool, WireError> {
        let bytes = self.take(4, type_name)?;
        match u32::from_be_bytes(bytes.try_into().expect("4-byte slice")) {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(WireError::NonCanonicalFlag { type_name, value }),
        }
    }

    /// Reads fixed-length opaque data, consuming and checking its padding.
    pub fn read_fixed<const N: usize>(
        &mut self,
        type_name: &'static str,
    ) -> Result<[u8; N], WireError> {
        let bytes = self.take(N, type_name)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.read_padding(N, type_name)?;
        Ok(out)
    }

    /// Reads variable-length opaque data with a protocol-fixed upper bound.
    pub fn read_var_bytes(
        &mut self,
        max: u32,
        type_name: &'static str,
    ) -> Result<Vec<u8>, WireError> {
        let len = self.read_u32()?;
        if len > max {
            return Err(WireError::LengthOutOfBounds {
                type_name,
                len,
                max,
            });
        }
        let payload = self.take(len as usize, type_name)?.to_vec();
        self.read_padding(len as usize, type_name)?;
        Ok(payload)
    }

    /// Reads a bounded UTF-8 string.
    pub fn read_string(&mut self, max: u32, type_name: &'static str) -> Result<String, WireError> {
        let bytes = self.read_var_bytes(max, type_name)?;
        String::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { type_name })
    }

    /// Reads a counted array of decodable values with an element-count bound.
    pub fn read_vec<T: XdrDecode>(
        &mut self,
        max: u32,
        type_name: &'static str,
    ) -> Result<Vec<T>, WireError> {
        let count = self.read_u32()?;
        if count > max {
            return Err(WireError::LengthOutOfBounds {
                type_name,
                len: count,
                max,
            });
        }
        let mut out = Vec::with_capacity(count as usize);
        for _ in 0..count {
            out.push(T::decode(self)?);
        }
        Ok(out)
    }

    fn read_padding(&mut self, payload_len: usize, type_name: &'static str) -> Result<(), WireError> {
        let pad = padded_len(payload_len) - payload_len;
        let bytes = self.take(pad, type_name)?;
        if bytes.iter().any(|&b| b != 0) {
            return Err(WireError::NonZeroPadding { type_name });
        }
        Ok(())
    }
}

impl fmt::Debug for XdrReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XdrReader(pos={}, len={})", self.pos, self.data.len())
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A value with a canonical wire encoding.
pub trait XdrEncode {
    /// Appends the wire encoding of `self` to the writer.
    fn encode(&self, w: &mut XdrWriter);

    /// Encodes `self` into a fresh byte vector.
    fn to_xdr(&self) -> Vec<u8> {
        let mut w = XdrWriter::new();
        self.encode(&mut w);
        w.finish()
    }
}

/// A value decodable from its canonical wire encoding.
pub trait XdrDecode: Sized {
    /// Name used in decode errors for this type.
    const TYPE_NAME: &'static str;

    /// Decodes one value, advancing the reader past it.
    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError>;

    /// Decodes a value that must span the entire buffer.
    fn from_xdr(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = XdrReader::new(bytes);
        let value = Self::decode(&mut r)?;
        if r.remaining() > 0 {
            return Err(WireError::TrailingBytes {
                type_name: Self::TYPE_NAME,
                remaining: r.remaining(),
            });
        }
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Primitive impls
// ---------------------------------------------------------------------------

macro_rules! impl_xdr_int {
    ($ty:ty, $write:ident, $read:ident, $name:literal) => {
        impl XdrEncode for $ty {
            fn encode(&self, w: &mut XdrWriter) {
                w.$write(*self);
            }
        }

        impl XdrDecode for $ty {
            const TYPE_NAME: &'static str = $name;

            fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
                r.$read()
            }
        }
    };
}

impl_xdr_int!(u32, write_u32, read_u32, "u32");
impl_xdr_int!(i32, write_i32, read_i32, "i32");
impl_xdr_int!(u64, write_u64, read_u64, "u64");
impl_xdr_int!(i64, write_i64, read_i64, "i64");

impl XdrEncode for bool {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_bool(*self);
    }
}

impl XdrDecode for bool {
    const TYPE_NAME: &'static str = "bool";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        r.read_bool("bool")
    }
}

impl<const N: usize> XdrEncode for [u8; N] {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_fixed(self);
    }
}

impl<const N: usize> XdrDecode for [u8; N] {
    const TYPE_NAME: &'static str = "opaque";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        r.read_fixed::<N>("opaque")
    }
}

/// Optionals: a 4-byte presence flag, then the payload when present.
impl<T: XdrEncode> XdrEncode for Option<T> {
    fn encode(&self, w: &mut XdrWriter) {
        match self {
            Some(value) => {
                w.write_bool(true);
                value.encode(w);
            }
            None => w.write_bool(false),
        }
    }
}

impl<T: XdrDecode> XdrDecode for Option<T> {
    const TYPE_NAME: &'static str = "option";

    fn decode(r: &mut XdrReader<'_>) -> Result<Self, WireError> {
        if r.read_bool(T::TYPE_NAME)? {
            Ok(Some(T::decode(r)?))
        } else {
            Ok(None)
        }
    }
}

/// Counted arrays encode as a 4-byte count followed by the elements.
/// Decoding goes through [`XdrReader::read_vec`] so each field can apply
/// its own protocol-fixed bound.
impl<T: XdrEncode> XdrEncode for Vec<T> {
    fn encode(&self, w: &mut XdrWriter) {
        w.write_u32(self.len() as u32);
        for item in self {
            item.encode(w);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
