//! # asn1-ber
//!
//! Definite-length ASN.1 BER (Basic Encoding Rules) codec with a pluggable
//! type factory.
//!
//! ## Features
//!
//! - Tag/length header codec with multi-byte tag numbers and long-form
//!   lengths
//! - Base-128 varint codec shared by tag extensions and OID subidentifiers
//! - Polymorphic value tree with a lossless `Unknown` fallback for
//!   unrecognized tags
//! - Pluggable [`Factory`] so protocol layers (SNMP-style application and
//!   context tags) extend decoding without touching the core
//! - Configurable length cap and bounded nesting depth against hostile input
//!
//! ## Quick Start
//!
//! ```
//! use asn1_ber::{Codec, Value, oid};
//!
//! fn main() -> asn1_ber::Result<()> {
//!     let codec = Codec::new();
//!
//!     let message = Value::sequence(vec![
//!         Value::integer(1),
//!         Value::octet_string(&b"public"[..]),
//!         Value::object_identifier(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
//!     ]);
//!
//!     let mut wire = Vec::new();
//!     codec.encode(&message, &mut wire)?;
//!
//!     let decoded = codec.decode(&mut wire.as_slice())?.expect("one value");
//!     assert_eq!(decoded, message);
//!     Ok(())
//! }
//! ```
//!
//! ## Scope
//!
//! Definite-length BER only: indefinite lengths are rejected, DER
//! canonical-form checks are not performed, and integers use a fixed 4-byte
//! (or, with the `integer64` feature, 8-byte) width rather than BER's
//! minimal-width encoding.

pub mod base128;
pub mod codec;
pub mod error;
pub mod factory;
pub mod length;
pub mod oid;
pub mod tag;
pub mod value;

// Re-exports for convenience
pub use codec::Codec;
pub use error::{Error, HeaderErrorKind, PayloadErrorKind, Result};
pub use factory::{DefaultFactory, Factory};
pub use length::DEFAULT_MAX_LENGTH;
pub use oid::{MAX_OID_ARCS, Oid};
pub use tag::{Class, Tag};
pub use value::{Kind, MAX_DEPTH, Value};
