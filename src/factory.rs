//! Factory dispatch: mapping a decoded tag to the value kind to decode into.

use bytes::Bytes;

use crate::error::Result;
use crate::oid::Oid;
use crate::tag::{Class, Tag, universal};
use crate::value::Kind;

/// Maps a decoded [`Tag`] to the empty [`Kind`] the payload decoder fills
/// in.
///
/// Derived factories recognize their own (class, number) combinations and
/// delegate everything else to [`DefaultFactory`], so one recursive decode
/// can mix universal and protocol-specific types inside a single sequence:
///
/// ```
/// use asn1_ber::{DefaultFactory, Factory, Kind, Tag};
///
/// struct CounterFactory;
///
/// impl Factory for CounterFactory {
///     fn create(&self, tag: Tag) -> asn1_ber::Result<Kind> {
///         use asn1_ber::Class;
///         match (tag.class(), tag.number()) {
///             (Class::Application, 1) => Ok(Kind::Integer(0)), // Counter32
///             _ => DefaultFactory.create(tag),
///         }
///     }
/// }
/// ```
///
/// A strict factory may instead reject a tag with
/// [`Error::UnsupportedType`](crate::Error::UnsupportedType), aborting the
/// decode.
pub trait Factory {
    /// Produce the empty kind to decode a payload with `tag` into.
    fn create(&self, tag: Tag) -> Result<Kind>;
}

/// The stock factory covering the Universal-class primitive types.
///
/// Tags it does not recognize map to [`Kind::Unknown`], which keeps the raw
/// payload so the value still round-trips losslessly. Stateless, so a single
/// instance is safe to share across concurrent decodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFactory;

impl Factory for DefaultFactory {
    fn create(&self, tag: Tag) -> Result<Kind> {
        if tag.class() != Class::Universal {
            return Ok(Kind::Unknown(Bytes::new()));
        }

        Ok(match (tag.is_constructed(), tag.number()) {
            (false, universal::BOOLEAN) => Kind::Boolean(false),
            (false, universal::INTEGER) => Kind::Integer(0),
            (false, universal::OCTET_STRING) => Kind::OctetString(Bytes::new()),
            (false, universal::NULL) => Kind::Null,
            (false, universal::OBJECT_IDENTIFIER) => Kind::ObjectIdentifier(Oid::empty()),
            (true, universal::SEQUENCE) => Kind::Sequence(Vec::new()),
            _ => Kind::Unknown(Bytes::new()),
        })
    }
}
