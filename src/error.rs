//! Error types for asn1-ber.
//!
//! Decode failures carry the byte offset at which they were detected plus a
//! [`HeaderErrorKind`] or [`PayloadErrorKind`] describing what went wrong.
//! Any decode error aborts the entire top-level [`Codec::decode`] call; a
//! malformed nested TLV invalidates the whole tree and the stream position
//! should be treated as unreliable afterwards.
//!
//! [`Codec::decode`]: crate::codec::Codec::decode

use crate::tag::Class;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Tag or length header decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderErrorKind {
    /// Header truncated unexpectedly.
    Truncated,
    /// Multi-byte tag number extension overflows u32.
    TagNumberOverflow,
    /// Indefinite length form (0x80) not supported.
    IndefiniteLength,
    /// Long-form length uses more octets than a usize can hold.
    LengthOctetsTooLong { octets: usize },
    /// Declared length exceeds the configured maximum.
    LengthExceedsMax { length: usize, max: usize },
}

impl std::fmt::Display for HeaderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated => write!(f, "unexpected end of header"),
            Self::TagNumberOverflow => write!(f, "tag number extension overflows u32"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::LengthOctetsTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
        }
    }
}

/// Payload decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadErrorKind {
    /// Payload ended before the declared length was satisfied.
    Truncated,
    /// Fixed-width integer payload has the wrong size.
    WrongIntegerWidth { expected: usize, actual: usize },
    /// BOOLEAN payload is not exactly one octet.
    WrongBooleanWidth { actual: usize },
    /// NULL with non-zero length.
    NonEmptyNull { length: usize },
    /// OID subidentifier overflows u32.
    ArcOverflow,
    /// OID has too many arcs.
    TooManyArcs { count: usize, max: usize },
    /// Child TLV extends past the parent's declared length.
    ChildOverrun { declared: usize, remaining: usize },
    /// Payload decode left unconsumed bytes behind.
    TrailingBytes { remaining: usize },
    /// Constructed nesting exceeds the recursion bound.
    NestingTooDeep { max: usize },
}

impl std::fmt::Display for PayloadErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated => write!(f, "payload shorter than declared length"),
            Self::WrongIntegerWidth { expected, actual } => {
                write!(
                    f,
                    "integer payload must be {} bytes, got {}",
                    expected, actual
                )
            }
            Self::WrongBooleanWidth { actual } => {
                write!(f, "boolean payload must be 1 byte, got {}", actual)
            }
            Self::NonEmptyNull { length } => {
                write!(f, "NULL with non-zero length {}", length)
            }
            Self::ArcOverflow => write!(f, "OID subidentifier overflows u32"),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
            Self::ChildOverrun {
                declared,
                remaining,
            } => {
                write!(
                    f,
                    "child TLV declares {} bytes but only {} remain in parent",
                    declared, remaining
                )
            }
            Self::TrailingBytes { remaining } => {
                write!(f, "{} unconsumed bytes after payload decode", remaining)
            }
            Self::NestingTooDeep { max } => {
                write!(f, "constructed nesting exceeds {} levels", max)
            }
        }
    }
}

/// The error type for all asn1-ber operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Tag or length header is truncated or uses an unsupported form.
    #[error("malformed header at offset {offset}: {kind}")]
    MalformedHeader {
        offset: usize,
        kind: HeaderErrorKind,
    },

    /// Payload bytes do not match the declared length or the type's shape.
    #[error("malformed payload at offset {offset}: {kind}")]
    MalformedPayload {
        offset: usize,
        kind: PayloadErrorKind,
    },

    /// A strict factory rejected the tag instead of falling back to Unknown.
    #[error("unsupported type: class {class:?}, tag number {number}")]
    UnsupportedType { class: Class, number: u32 },

    /// I/O error from the underlying stream, propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed-header error.
    pub fn header(offset: usize, kind: HeaderErrorKind) -> Self {
        Self::MalformedHeader { offset, kind }
    }

    /// Create a malformed-payload error.
    pub fn payload(offset: usize, kind: PayloadErrorKind) -> Self {
        Self::MalformedPayload { offset, kind }
    }
}
