//! BER length header codec.
//!
//! Length encoding follows X.690 Section 8.1.3:
//! - Short form: single byte, high bit clear, value 0-127
//! - Long form: initial byte `0x80 | count`, followed by `count` big-endian
//!   length octets
//! - Indefinite form (0x80 alone) is rejected; this codec targets
//!   definite-length streams only.

use std::io::Write;

use crate::error::{Error, HeaderErrorKind, Result};

/// Default maximum length accepted by the decoder.
///
/// 2MB is far larger than any realistic message for the protocols this codec
/// serves while still bounding allocation from hostile input. The limit is
/// configurable via [`Codec::set_max_length`].
///
/// [`Codec::set_max_length`]: crate::codec::Codec::set_max_length
pub const DEFAULT_MAX_LENGTH: usize = 0x200000; // 2MB

/// Number of bytes the encoded length header occupies for `len`.
pub fn encoded_len(len: usize) -> usize {
    if len <= 127 {
        1
    } else {
        1 + length_octets(len)
    }
}

fn length_octets(len: usize) -> usize {
    let mut count = 1;
    let mut rest = len >> 8;
    while rest > 0 {
        count += 1;
        rest >>= 8;
    }
    count
}

/// Append the encoded length header.
///
/// Short form for lengths <= 127, minimal long form otherwise.
pub fn encode_length(out: &mut Vec<u8>, len: usize) {
    if len <= 127 {
        out.push(len as u8);
        return;
    }

    let octets = length_octets(len);
    out.push(0x80 | octets as u8);
    for i in (0..octets).rev() {
        out.push((len >> (i * 8)) as u8);
    }
}

/// Write the encoded length header to a stream.
pub fn write_length<W: Write>(w: &mut W, len: usize) -> std::io::Result<()> {
    let mut buf = Vec::with_capacity(encoded_len(len));
    encode_length(&mut buf, len);
    w.write_all(&buf)
}

/// Decode a length header, returning `(length, bytes_consumed)`.
///
/// `base_offset` is the slice's position in the enclosing stream and `max`
/// bounds the decoded value against hostile allocations.
pub fn decode_length(data: &[u8], base_offset: usize, max: usize) -> Result<(usize, usize)> {
    let Some(&first) = data.first() else {
        return Err(Error::header(base_offset, HeaderErrorKind::Truncated));
    };

    if first & 0x80 == 0 {
        // Short form, still subject to the configured cap
        let len = first as usize;
        if len > max {
            return Err(Error::header(
                base_offset,
                HeaderErrorKind::LengthExceedsMax { length: len, max },
            ));
        }
        return Ok((len, 1));
    }

    let octets = (first & 0x7F) as usize;

    if octets == 0 {
        // Indefinite form
        return Err(Error::header(base_offset, HeaderErrorKind::IndefiniteLength));
    }

    if octets > size_of::<usize>() {
        return Err(Error::header(
            base_offset,
            HeaderErrorKind::LengthOctetsTooLong { octets },
        ));
    }

    if data.len() < 1 + octets {
        return Err(Error::header(base_offset, HeaderErrorKind::Truncated));
    }

    let mut len: usize = 0;
    for &byte in &data[1..1 + octets] {
        len = (len << 8) | byte as usize;
    }

    if len > max {
        return Err(Error::header(
            base_offset,
            HeaderErrorKind::LengthExceedsMax { length: len, max },
        ));
    }

    Ok((len, 1 + octets))
}
