//! Stream-level codec driver.
//!
//! [`Codec`] wires a [`Factory`] into the recursive decoder and exposes the
//! two library entry points: [`Codec::encode`] writes one complete TLV to a
//! [`Write`] stream, [`Codec::decode`] reads exactly one TLV from a [`Read`]
//! stream and leaves the stream positioned immediately after it.

use std::io::{ErrorKind, Read, Write};
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{Error, HeaderErrorKind, Result};
use crate::factory::{DefaultFactory, Factory};
use crate::length::{self, DEFAULT_MAX_LENGTH};
use crate::tag::{Class, Tag};
use crate::value::{self, Value};

/// BER stream codec with a pluggable type factory.
///
/// Encode and decode are synchronous and hold no state between calls, so a
/// codec can be shared across threads (its factory permitting) for
/// concurrent use on distinct streams. Decoded trees are owned entirely by
/// the caller.
#[derive(Clone)]
pub struct Codec {
    factory: Arc<dyn Factory + Send + Sync>,
    max_length: usize,
}

impl Codec {
    /// Codec using [`DefaultFactory`].
    pub fn new() -> Self {
        Self::with_factory(DefaultFactory)
    }

    /// Codec using the given factory.
    pub fn with_factory(factory: impl Factory + Send + Sync + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Swap the factory used by subsequent decodes.
    pub fn set_factory(&mut self, factory: impl Factory + Send + Sync + 'static) {
        self.factory = Arc::new(factory);
    }

    /// Set the maximum declared length accepted by subsequent decodes.
    ///
    /// Bounds allocation from hostile input; defaults to
    /// [`DEFAULT_MAX_LENGTH`].
    pub fn set_max_length(&mut self, max: usize) {
        self.max_length = max;
    }

    /// The configured maximum declared length.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Write one complete TLV to the stream.
    ///
    /// I/O failures propagate unchanged as [`Error::Io`]; nothing else can
    /// fail, since lengths are pure arithmetic over the in-memory tree.
    pub fn encode<W: Write>(&self, value: &Value, w: &mut W) -> Result<()> {
        value.write_to(w)?;
        Ok(())
    }

    /// Read exactly one top-level TLV from the stream.
    ///
    /// The header is read incrementally, so no bytes beyond the single TLV
    /// are consumed and the stream is left positioned immediately after it.
    /// A clean end-of-stream before the first tag byte yields `Ok(None)`;
    /// truncation anywhere inside the value is an error.
    pub fn decode<R: Read>(&self, r: &mut R) -> Result<Option<Value>> {
        let Some((tag, tag_len)) = self.read_tag(r)? else {
            return Ok(None);
        };

        let (len, len_len) = self.read_length(r, tag_len)?;
        let header_len = tag_len + len_len;

        let mut payload = vec![0u8; len];
        r.read_exact(&mut payload).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                tracing::debug!(
                    target: "asn1_ber::codec",
                    offset = header_len,
                    declared = len,
                    "stream ended inside payload"
                );
                Error::payload(header_len, crate::error::PayloadErrorKind::Truncated)
            } else {
                Error::Io(e)
            }
        })?;

        let decoded = value::decode_value(
            self.factory.as_ref(),
            tag,
            Bytes::from(payload),
            header_len,
            0,
            self.max_length,
        )?;
        Ok(Some(decoded))
    }

    /// Read a tag from the stream, byte at a time, returning the tag and the
    /// number of bytes consumed. Non-minimal extensions consume more bytes
    /// than the tag re-encodes to, so the count is what offsets downstream
    /// errors, not [`Tag::encoded_len`].
    ///
    /// Returns `None` on clean end-of-stream at the first byte.
    fn read_tag<R: Read>(&self, r: &mut R) -> Result<Option<(Tag, usize)>> {
        let Some(first) = read_byte(r)? else {
            return Ok(None);
        };

        let class = Class::from_bits(first);
        let constructed = first & 0x20 != 0;
        let low = first & 0x1F;

        if low < 0x1F {
            return Ok(Some((Tag::new(class, constructed, low as u32), 1)));
        }

        // Multi-byte tag number extension
        let mut number: u32 = 0;
        let mut consumed = 1;
        loop {
            let Some(byte) = read_byte(r)? else {
                return Err(Error::header(consumed, HeaderErrorKind::Truncated));
            };
            consumed += 1;

            if number > (u32::MAX >> 7) {
                return Err(Error::header(consumed, HeaderErrorKind::TagNumberOverflow));
            }
            number = (number << 7) | (byte & 0x7F) as u32;

            if byte & 0x80 == 0 {
                return Ok(Some((Tag::new(class, constructed, number), consumed)));
            }
        }
    }

    /// Read a length header from the stream, returning `(length,
    /// bytes_consumed)`.
    fn read_length<R: Read>(&self, r: &mut R, base_offset: usize) -> Result<(usize, usize)> {
        let Some(first) = read_byte(r)? else {
            return Err(Error::header(base_offset, HeaderErrorKind::Truncated));
        };

        if first & 0x80 == 0 {
            let len = first as usize;
            if len > self.max_length {
                return Err(Error::header(
                    base_offset,
                    HeaderErrorKind::LengthExceedsMax {
                        length: len,
                        max: self.max_length,
                    },
                ));
            }
            return Ok((len, 1));
        }

        let octets = (first & 0x7F) as usize;
        if octets == 0 {
            return Err(Error::header(base_offset, HeaderErrorKind::IndefiniteLength));
        }
        if octets > size_of::<usize>() {
            return Err(Error::header(
                base_offset,
                HeaderErrorKind::LengthOctetsTooLong { octets },
            ));
        }

        let mut buf = vec![0u8; octets];
        r.read_exact(&mut buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                Error::header(base_offset, HeaderErrorKind::Truncated)
            } else {
                Error::Io(e)
            }
        })?;

        let (len, consumed) = {
            let mut len: usize = 0;
            for &byte in &buf {
                len = (len << 8) | byte as usize;
            }
            (len, 1 + octets)
        };

        if len > self.max_length {
            return Err(Error::header(
                base_offset,
                HeaderErrorKind::LengthExceedsMax {
                    length: len,
                    max: self.max_length,
                },
            ));
        }

        Ok((len, consumed))
    }

    /// Decode one value from an in-memory buffer.
    ///
    /// Convenience over [`decode`](Self::decode) for callers that already
    /// hold the full message.
    pub fn decode_slice(&self, data: &[u8]) -> Result<Option<Value>> {
        let mut cursor = std::io::Cursor::new(data);
        self.decode(&mut cursor)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

/// Read a single byte, mapping clean EOF to `None`.
fn read_byte<R: Read>(r: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        return match r.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => Err(Error::Io(e)),
        };
    }
}
