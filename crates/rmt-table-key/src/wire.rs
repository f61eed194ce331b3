//! Fixed-width big-endian wire encoding of integer key fields.
//!
//! A raw buffer must be exactly the native width of the field. Shorter or
//! longer buffers are rejected before anything is written; values are never
//! padded or truncated.

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

/// Wire width of a 32-bit key field.
pub const U32_WIRE_BYTES: usize = 4;

/// Buffer length did not equal the field's native width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("buffer size {received} is not equal to the field size {expected}")]
pub struct SizeMismatch {
    /// Native width of the field in bytes.
    pub expected: usize,
    /// Length of the supplied buffer.
    pub received: usize,
}

fn check_size(width: usize, len: usize) -> Result<(), SizeMismatch> {
    if len != width {
        return Err(SizeMismatch {
            expected: width,
            received: len,
        });
    }
    Ok(())
}

/// Largest value a field of `width` bytes holds.
pub const fn max_value(width: usize) -> u64 {
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (width * 8)) - 1
    }
}

/// Writes `value` into `out` in network byte order.
///
/// `width` is the field's native width in bytes (1..=8) and `out` must be
/// exactly that long. Bits of `value` above `width` are dropped; callers
/// range-check first.
pub fn encode(value: u64, width: usize, out: &mut [u8]) -> Result<(), SizeMismatch> {
    check_size(width, out.len())?;
    BigEndian::write_uint(out, value & max_value(width), width);
    Ok(())
}

/// Reads a network byte order value of `width` bytes from `buf`.
pub fn decode(width: usize, buf: &[u8]) -> Result<u64, SizeMismatch> {
    check_size(width, buf.len())?;
    Ok(BigEndian::read_uint(buf, width))
}

/// Writes a 32-bit value into a 4-byte buffer.
pub fn encode_u32(value: u32, out: &mut [u8]) -> Result<(), SizeMismatch> {
    check_size(U32_WIRE_BYTES, out.len())?;
    BigEndian::write_u32(out, value);
    Ok(())
}

/// Reads a 32-bit value from a 4-byte buffer.
pub fn decode_u32(buf: &[u8]) -> Result<u32, SizeMismatch> {
    check_size(U32_WIRE_BYTES, buf.len())?;
    Ok(BigEndian::read_u32(buf))
}
