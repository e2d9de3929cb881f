// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for every wire format.
//!
//! All fixed-width integers are big-endian, fixed-size arrays are written raw
//! and variable-length byte fields carry a `u16` big-endian length prefix.
//! Decoding reads from a `&[u8]` cursor and never panics: running out of input,
//! an unknown tag or leftover bytes in a canonical decode all surface as a
//! [`CodecError`].

use crate::error::CodecError;
use bytes::{Buf, BufMut};

/// A value with a canonical binary encoding.
pub trait Encode {
    /// Appends the canonical encoding of `self` to `buf`.
    fn encode<B: BufMut>(&self, buf: &mut B);

    /// The exact number of bytes `encode` writes.
    fn encoded_len(&self) -> usize;
}

/// A value that can be read back from its canonical binary encoding.
pub trait Decode: Sized {
    /// Reads a value from the front of `reader`, advancing it past the bytes consumed.
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError>;
}

/// Encodes a value into its canonical byte representation.
///
/// This function should be used for all data that is hashed, signed or sent
/// over the wire.
pub fn to_bytes_canonical<T: Encode + ?Sized>(v: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(v.encoded_len());
    v.encode(&mut out);
    out
}

/// Decodes a value from a canonical byte representation.
///
/// Fails fast on any decoding error, and with [`CodecError::TrailingBytes`]
/// if the buffer holds more than one value.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, CodecError> {
    let (value, consumed) = from_bytes_prefix(b)?;
    if consumed != b.len() {
        return Err(CodecError::TrailingBytes(b.len() - consumed));
    }
    Ok(value)
}

/// Decodes a value from the front of `b` and reports how many bytes it used.
pub fn from_bytes_prefix<T: Decode>(b: &[u8]) -> Result<(T, usize), CodecError> {
    let mut reader = b;
    let value = T::decode(&mut reader)?;
    Ok((value, b.len() - reader.len()))
}

/// Fails with [`CodecError::LengthOverflow`] unless `len` fits a `u16` prefix.
pub fn check_var_len(len: usize) -> Result<u16, CodecError> {
    u16::try_from(len).map_err(|_| CodecError::LengthOverflow(len))
}

/// Writes `bytes` with a `u16` length prefix.
///
/// `bytes` must already have passed [`check_var_len`]. Types encoding such a
/// field keep it private and bound it in every constructor and setter, so
/// encoding never sees a longer slice.
pub fn put_var_bytes<B: BufMut>(buf: &mut B, bytes: &[u8]) {
    let len = u16::try_from(bytes.len()).unwrap_or(u16::MAX);
    buf.put_u16(len);
    buf.put_slice(bytes.get(..usize::from(len)).unwrap_or_default());
}

/// The encoded size of a `u16`-prefixed byte field.
pub fn var_bytes_len(bytes: &[u8]) -> usize {
    2 + bytes.len()
}

fn ensure(reader: &[u8], needed: usize) -> Result<(), CodecError> {
    if reader.remaining() < needed {
        return Err(CodecError::UnexpectedEnd {
            needed,
            remaining: reader.remaining(),
        });
    }
    Ok(())
}

/// Reads one byte.
pub fn read_u8(reader: &mut &[u8]) -> Result<u8, CodecError> {
    ensure(reader, 1)?;
    Ok(reader.get_u8())
}

/// Reads a big-endian `u16`.
pub fn read_u16(reader: &mut &[u8]) -> Result<u16, CodecError> {
    ensure(reader, 2)?;
    Ok(reader.get_u16())
}

/// Reads a big-endian `u32`.
pub fn read_u32(reader: &mut &[u8]) -> Result<u32, CodecError> {
    ensure(reader, 4)?;
    Ok(reader.get_u32())
}

/// Reads a big-endian `u64`.
pub fn read_u64(reader: &mut &[u8]) -> Result<u64, CodecError> {
    ensure(reader, 8)?;
    Ok(reader.get_u64())
}

/// Reads exactly `N` raw bytes.
pub fn read_array<const N: usize>(reader: &mut &[u8]) -> Result<[u8; N], CodecError> {
    ensure(reader, N)?;
    let mut out = [0u8; N];
    reader.copy_to_slice(&mut out);
    Ok(out)
}

/// Reads exactly `len` raw bytes.
pub fn read_bytes(reader: &mut &[u8], len: usize) -> Result<Vec<u8>, CodecError> {
    ensure(reader, len)?;
    let mut out = vec![0u8; len];
    reader.copy_to_slice(&mut out);
    Ok(out)
}

/// Reads a `u16`-prefixed byte field.
pub fn read_var_bytes(reader: &mut &[u8]) -> Result<Vec<u8>, CodecError> {
    let len = read_u16(reader)?;
    read_bytes(reader, usize::from(len))
}

/// Reads a boolean encoded as a single `0` or `1` byte.
pub fn read_bool(reader: &mut &[u8]) -> Result<bool, CodecError> {
    match read_u8(reader)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(CodecError::UnknownDiscriminant {
            ty: "bool",
            value: u64::from(other),
        }),
    }
}

/// Reads an optional value preceded by a `0`/`1` presence byte.
pub fn read_option<T: Decode>(reader: &mut &[u8]) -> Result<Option<T>, CodecError> {
    if read_bool(reader)? {
        Ok(Some(T::decode(reader)?))
    } else {
        Ok(None)
    }
}

macro_rules! impl_int {
    ($ty:ty, $put:ident, $read:ident) => {
        impl Encode for $ty {
            fn encode<B: BufMut>(&self, buf: &mut B) {
                buf.$put(*self);
            }

            fn encoded_len(&self) -> usize {
                std::mem::size_of::<$ty>()
            }
        }

        impl Decode for $ty {
            fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
                $read(reader)
            }
        }
    };
}

impl_int!(u8, put_u8, read_u8);
impl_int!(u16, put_u16, read_u16);
impl_int!(u32, put_u32, read_u32);
impl_int!(u64, put_u64, read_u64);

impl Encode for bool {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

impl Decode for bool {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        read_bool(reader)
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(self);
    }

    fn encoded_len(&self) -> usize {
        N
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        read_array(reader)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        match self {
            Some(v) => {
                buf.put_u8(1);
                v.encode(buf);
            }
            None => buf.put_u8(0),
        }
    }

    fn encoded_len(&self) -> usize {
        1 + self.as_ref().map_or(0, Encode::encoded_len)
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        read_option(reader)
    }
}
