//! Base-128 varint codec (X.690 "base 128" form).
//!
//! Seven bits per octet, most-significant group first, high bit set on every
//! octet except the last. Used for multi-byte tag numbers and for OID
//! subidentifiers, so errors are reported through [`Base128Error`] and mapped
//! to header or payload errors by the caller.

/// Failure modes of [`decode_base128`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Base128Error {
    /// Input ended before a terminating octet (high bit clear) was seen.
    Truncated,
    /// Accumulated value does not fit in u32.
    Overflow,
}

/// Append the base-128 encoding of `value`.
///
/// Zero encodes as a single zero byte.
pub fn encode_base128(out: &mut Vec<u8>, value: u32) {
    let groups = size_base128(value);
    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80; // continuation
        }
        out.push(byte);
    }
}

/// Number of bytes [`encode_base128`] produces for `value`.
pub fn size_base128(value: u32) -> usize {
    let mut count = 1;
    let mut rest = value >> 7;
    while rest > 0 {
        count += 1;
        rest >>= 7;
    }
    count
}

/// Decode a base-128 value, returning `(value, bytes_consumed)`.
///
/// Overflow is rejected rather than truncated.
pub(crate) fn decode_base128(data: &[u8]) -> Result<(u32, usize), Base128Error> {
    let mut value: u32 = 0;
    let mut i = 0;

    loop {
        if i >= data.len() {
            return Err(Base128Error::Truncated);
        }

        let byte = data[i];
        i += 1;

        // Check for overflow before shifting
        if value > (u32::MAX >> 7) {
            return Err(Base128Error::Overflow);
        }

        value = (value << 7) | ((byte & 0x7F) as u32);

        if byte & 0x80 == 0 {
            break;
        }
    }

    Ok((value, i))
}
