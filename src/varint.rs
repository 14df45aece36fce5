//! Decoding of variable-length integers.
//!
//! Unsigned values are stored little-endian in groups of seven bits, with the high bit of each
//! byte set when more bytes follow. Signed values are zigzag-encoded on top of that: the low bit
//! of the unsigned value carries the sign, so small magnitudes of either sign stay short.

use thiserror::Error;

/// The maximum number of bytes a 64-bit varint can occupy.
pub const MAX_VARINT_LEN: usize = 10;

/// Errors that can occur when decoding a varint.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// The buffer has no bytes.
    #[error("buffer is empty")]
    Empty,

    /// The buffer ended while more bytes were expected.
    #[error("buffer ended in the middle of a varint")]
    Truncated,

    /// The encoded value does not fit in 64 bits.
    #[error("varint overflows a 64-bit integer")]
    Overflow,
}

/// Decodes an unsigned varint from the start of `buf`, returning the value and the number of
/// bytes read.
///
/// # Examples
///
/// ```
/// use membership_filter::varint::{read_uvarint, DecodeError};
///
/// assert_eq!(read_uvarint(&[0x01]), Ok((1, 1)));
/// assert_eq!(read_uvarint(&[0xac, 0x02, 0xff]), Ok((300, 2)));
/// assert_eq!(read_uvarint(&[0x80]), Err(DecodeError::Truncated));
/// ```
pub fn read_uvarint(buf: &[u8]) -> Result<(u64, usize), DecodeError> {
    if buf.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut value = 0u64;
    let mut shift = 0;
    for (i, &byte) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        if byte < 0x80 {
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(DecodeError::Overflow);
            }
            return Ok((value | u64::from(byte) << shift, i + 1));
        }
        value |= u64::from(byte & 0x7f) << shift;
        shift += 7;
    }

    if buf.len() < MAX_VARINT_LEN {
        Err(DecodeError::Truncated)
    } else {
        Err(DecodeError::Overflow)
    }
}

/// Decodes a zigzag-encoded signed varint from the start of `buf`, returning the value and the
/// number of bytes read.
///
/// # Examples
///
/// ```
/// use membership_filter::varint::read_varint;
///
/// assert_eq!(read_varint(&[0x00]), Ok((0, 1)));
/// assert_eq!(read_varint(&[0x01]), Ok((-1, 1)));
/// assert_eq!(read_varint(&[0x02]), Ok((1, 1)));
/// assert_eq!(read_varint(&[0x03]), Ok((-2, 1)));
/// ```
pub fn read_varint(buf: &[u8]) -> Result<(i64, usize), DecodeError> {
    let (unsigned, len) = read_uvarint(buf)?;
    let mut value = (unsigned >> 1) as i64;
    if unsigned & 1 != 0 {
        value = !value;
    }
    Ok((value, len))
}
