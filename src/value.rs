//! The polymorphic BER value tree.
//!
//! A [`Value`] pairs the [`Tag`] it is (or will be) encoded under with a
//! [`Kind`] holding the payload. Carrying the tag on every value is what lets
//! retagged scalars (application-class integers and the like) and the
//! [`Kind::Unknown`] fallback round-trip byte-exactly.

use std::io::Write;

use bytes::Bytes;

use crate::error::{Error, PayloadErrorKind, Result};
use crate::factory::Factory;
use crate::length;
use crate::oid::Oid;
use crate::tag::{Tag, universal};

/// Maximum constructed nesting depth accepted during decode.
///
/// Bounds stack growth from hostile deeply nested sequences.
pub const MAX_DEPTH: usize = 64;

/// Payload of a BER value.
///
/// The set of kinds is closed, but unrecognized tags decode into
/// [`Kind::Unknown`], which preserves the raw payload for lossless
/// re-encoding.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Kind {
    /// BOOLEAN. Decode is lenient (any nonzero octet is true); encode is
    /// canonical (0x01 / 0x00).
    Boolean(bool),

    /// Fixed-width unsigned 32-bit integer (4-byte big-endian payload).
    ///
    /// This codec deliberately does not implement BER's minimal-width
    /// integer encoding; the payload is always exactly 4 bytes.
    Integer(u32),

    /// Fixed-width unsigned 64-bit integer (8-byte big-endian payload).
    #[cfg(feature = "integer64")]
    Integer64(u64),

    /// OCTET STRING (arbitrary bytes).
    OctetString(Bytes),

    /// NULL (zero-length payload).
    Null,

    /// OBJECT IDENTIFIER.
    ObjectIdentifier(Oid),

    /// Constructed sequence of child values, in insertion order.
    Sequence(Vec<Value>),

    /// Raw undecoded payload for tags the active factory does not recognize.
    Unknown(Bytes),
}

/// A BER value: the tag it is encoded under plus its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    tag: Tag,
    kind: Kind,
}

impl Value {
    /// Create a value with an explicit tag.
    ///
    /// This is the escape hatch for application- and context-class
    /// retagging; the canonical constructors below cover the Universal
    /// types.
    pub fn with_tag(tag: Tag, kind: Kind) -> Self {
        Self { tag, kind }
    }

    /// BOOLEAN with its Universal tag.
    pub fn boolean(value: bool) -> Self {
        Self::with_tag(Tag::universal(universal::BOOLEAN), Kind::Boolean(value))
    }

    /// INTEGER with its Universal tag.
    pub fn integer(value: u32) -> Self {
        Self::with_tag(Tag::universal(universal::INTEGER), Kind::Integer(value))
    }

    /// 64-bit integer under an explicit tag.
    ///
    /// BER assigns no Universal tag number to a fixed 8-byte integer and the
    /// default factory maps tag 2 to the 4-byte kind, so callers supply the
    /// (normally application-class) tag their protocol uses, e.g. SNMP's
    /// Counter64.
    #[cfg(feature = "integer64")]
    pub fn integer64(tag: Tag, value: u64) -> Self {
        Self::with_tag(tag, Kind::Integer64(value))
    }

    /// OCTET STRING with its Universal tag.
    pub fn octet_string(data: impl Into<Bytes>) -> Self {
        Self::with_tag(
            Tag::universal(universal::OCTET_STRING),
            Kind::OctetString(data.into()),
        )
    }

    /// NULL with its Universal tag.
    pub fn null() -> Self {
        Self::with_tag(Tag::universal(universal::NULL), Kind::Null)
    }

    /// OBJECT IDENTIFIER with its Universal tag.
    pub fn object_identifier(oid: Oid) -> Self {
        Self::with_tag(
            Tag::universal(universal::OBJECT_IDENTIFIER),
            Kind::ObjectIdentifier(oid),
        )
    }

    /// SEQUENCE with its Universal (constructed) tag.
    pub fn sequence(children: Vec<Value>) -> Self {
        Self::with_tag(
            Tag::universal_constructed(universal::SEQUENCE),
            Kind::Sequence(children),
        )
    }

    /// Opaque value under an arbitrary tag, replayed verbatim on encode.
    pub fn unknown(tag: Tag, data: impl Into<Bytes>) -> Self {
        Self::with_tag(tag, Kind::Unknown(data.into()))
    }

    /// The tag this value encodes under.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The payload kind.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            Kind::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as u32.
    pub fn as_u32(&self) -> Option<u32> {
        match self.kind {
            Kind::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as u64. Widens [`Kind::Integer`] as well.
    pub fn as_u64(&self) -> Option<u64> {
        match self.kind {
            #[cfg(feature = "integer64")]
            Kind::Integer64(v) => Some(v),
            Kind::Integer(v) => Some(v as u64),
            _ => None,
        }
    }

    /// Try to get as bytes (OctetString or Unknown payload).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.kind {
            Kind::OctetString(data) | Kind::Unknown(data) => Some(data),
            _ => None,
        }
    }

    /// Try to get as UTF-8 string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Try to get as OID.
    pub fn as_oid(&self) -> Option<&Oid> {
        match &self.kind {
            Kind::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// Try to get the child values of a sequence.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match &self.kind {
            Kind::Sequence(children) => Some(children),
            _ => None,
        }
    }

    /// Payload size in bytes, excluding the tag/length header.
    ///
    /// Pure arithmetic over in-memory state; for sequences this is the sum
    /// of each child's *total* encoded length, since child headers live
    /// inside the parent's payload.
    pub fn payload_len(&self) -> usize {
        match &self.kind {
            Kind::Boolean(_) => 1,
            Kind::Integer(_) => 4,
            #[cfg(feature = "integer64")]
            Kind::Integer64(_) => 8,
            Kind::OctetString(data) => data.len(),
            Kind::Null => 0,
            Kind::ObjectIdentifier(oid) => oid.payload_len(),
            Kind::Sequence(children) => children.iter().map(Value::encoded_len).sum(),
            Kind::Unknown(data) => data.len(),
        }
    }

    /// Total encoded size: tag bytes + length bytes + payload bytes.
    pub fn encoded_len(&self) -> usize {
        let payload = self.payload_len();
        self.tag.encoded_len() + length::encoded_len(payload) + payload
    }

    /// Write exactly [`payload_len`](Self::payload_len) payload bytes.
    pub(crate) fn encode_payload<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        match &self.kind {
            Kind::Boolean(v) => w.write_all(&[if *v { 0x01 } else { 0x00 }]),
            Kind::Integer(v) => w.write_all(&v.to_be_bytes()),
            #[cfg(feature = "integer64")]
            Kind::Integer64(v) => w.write_all(&v.to_be_bytes()),
            Kind::OctetString(data) => w.write_all(data),
            Kind::Null => Ok(()),
            Kind::ObjectIdentifier(oid) => {
                let mut buf = Vec::with_capacity(oid.payload_len());
                oid.encode_payload(&mut buf);
                w.write_all(&buf)
            }
            Kind::Sequence(children) => {
                for child in children {
                    child.write_to(w)?;
                }
                Ok(())
            }
            Kind::Unknown(data) => w.write_all(data),
        }
    }

    /// Write the complete TLV (tag, length, payload).
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.tag.write_to(w)?;
        length::write_length(w, self.payload_len())?;
        self.encode_payload(w)
    }

    /// Encode the complete TLV into a fresh buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        // Writing to a Vec cannot fail
        self.write_to(&mut buf).expect("vec write");
        buf
    }
}

/// Decode a payload of exactly `data.len()` bytes into the kind the factory
/// selected for `tag`, recursing through the factory for sequence children.
pub(crate) fn decode_value(
    factory: &dyn Factory,
    tag: Tag,
    data: Bytes,
    base_offset: usize,
    depth: usize,
    max_length: usize,
) -> Result<Value> {
    if depth > MAX_DEPTH {
        tracing::debug!(
            target: "asn1_ber::value",
            offset = base_offset,
            "constructed nesting exceeds depth bound"
        );
        return Err(Error::payload(
            base_offset,
            PayloadErrorKind::NestingTooDeep { max: MAX_DEPTH },
        ));
    }

    let kind = match factory.create(tag)? {
        Kind::Boolean(_) => {
            if data.len() != 1 {
                return Err(Error::payload(
                    base_offset,
                    PayloadErrorKind::WrongBooleanWidth { actual: data.len() },
                ));
            }
            // Lenient decode: any nonzero octet is true
            Kind::Boolean(data[0] != 0)
        }
        Kind::Integer(_) => {
            let bytes: [u8; 4] = data.as_ref().try_into().map_err(|_| {
                Error::payload(
                    base_offset,
                    PayloadErrorKind::WrongIntegerWidth {
                        expected: 4,
                        actual: data.len(),
                    },
                )
            })?;
            Kind::Integer(u32::from_be_bytes(bytes))
        }
        #[cfg(feature = "integer64")]
        Kind::Integer64(_) => {
            let bytes: [u8; 8] = data.as_ref().try_into().map_err(|_| {
                Error::payload(
                    base_offset,
                    PayloadErrorKind::WrongIntegerWidth {
                        expected: 8,
                        actual: data.len(),
                    },
                )
            })?;
            Kind::Integer64(u64::from_be_bytes(bytes))
        }
        Kind::OctetString(_) => Kind::OctetString(data),
        Kind::Null => {
            if !data.is_empty() {
                return Err(Error::payload(
                    base_offset,
                    PayloadErrorKind::NonEmptyNull { length: data.len() },
                ));
            }
            Kind::Null
        }
        Kind::ObjectIdentifier(_) => {
            Kind::ObjectIdentifier(Oid::decode_payload(&data, base_offset)?)
        }
        Kind::Sequence(_) => {
            Kind::Sequence(decode_children(factory, data, base_offset, depth, max_length)?)
        }
        Kind::Unknown(_) => Kind::Unknown(data),
    };

    Ok(Value::with_tag(tag, kind))
}

/// Decode child TLVs until the parent's budget is exactly consumed.
fn decode_children(
    factory: &dyn Factory,
    data: Bytes,
    base_offset: usize,
    depth: usize,
    max_length: usize,
) -> Result<Vec<Value>> {
    let mut children = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let (tag, tag_len) = Tag::decode(&data[offset..], base_offset + offset)?;
        offset += tag_len;

        let (len, len_len) =
            length::decode_length(&data[offset..], base_offset + offset, max_length)?;
        offset += len_len;

        let remaining = data.len() - offset;
        if len > remaining {
            tracing::debug!(
                target: "asn1_ber::value",
                offset = base_offset + offset,
                declared = len,
                remaining,
                "child TLV overruns parent budget"
            );
            return Err(Error::payload(
                base_offset + offset,
                PayloadErrorKind::ChildOverrun {
                    declared: len,
                    remaining,
                },
            ));
        }

        let payload = data.slice(offset..offset + len);
        let child = decode_value(
            factory,
            tag,
            payload,
            base_offset + offset,
            depth + 1,
            max_length,
        )?;
        offset += len;
        children.push(child);
    }

    Ok(children)
}
