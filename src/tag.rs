//! BER tag header codec.
//!
//! The identifier octet packs class (bits 8-7), constructed flag (bit 6) and
//! tag number (bits 5-1). Numbers 0-30 fit in the single octet; larger
//! numbers set the low five bits to 0x1F and follow with a base-128
//! extension.

use std::io::Write;

use crate::base128::{self, Base128Error};
use crate::error::{Error, HeaderErrorKind, Result};

/// Standard Universal-class tag numbers recognized by the default factory.
pub mod universal {
    pub const BOOLEAN: u32 = 1;
    pub const INTEGER: u32 = 2;
    pub const OCTET_STRING: u32 = 4;
    pub const NULL: u32 = 5;
    pub const OBJECT_IDENTIFIER: u32 = 6;
    pub const SEQUENCE: u32 = 16;
}

/// BER tag class (bits 8-7 of the identifier octet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Universal = 0,
    Application = 1,
    ContextSpecific = 2,
    Private = 3,
}

impl Class {
    /// Extract the class from an identifier octet.
    pub fn from_bits(byte: u8) -> Self {
        match (byte >> 6) & 0x03 {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }

    /// Class bits positioned for the identifier octet.
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// BER tag: class, constructed flag, and tag number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: Class,
    constructed: bool,
    number: u32,
}

impl Tag {
    /// Create a tag.
    pub fn new(class: Class, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    /// Universal-class primitive tag.
    pub fn universal(number: u32) -> Self {
        Self::new(Class::Universal, false, number)
    }

    /// Universal-class constructed tag.
    pub fn universal_constructed(number: u32) -> Self {
        Self::new(Class::Universal, true, number)
    }

    /// Application-class tag.
    pub fn application(constructed: bool, number: u32) -> Self {
        Self::new(Class::Application, constructed, number)
    }

    /// Context-specific tag.
    pub fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(Class::ContextSpecific, constructed, number)
    }

    /// Private-class tag.
    pub fn private(constructed: bool, number: u32) -> Self {
        Self::new(Class::Private, constructed, number)
    }

    pub fn class(&self) -> Class {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    fn leading_bits(&self) -> u8 {
        self.class.to_bits() | if self.constructed { 0x20 } else { 0x00 }
    }

    /// Number of bytes the encoded tag occupies.
    pub fn encoded_len(&self) -> usize {
        if self.number <= 30 {
            1
        } else {
            1 + base128::size_base128(self.number)
        }
    }

    /// Append the encoded tag.
    pub fn encode_to(&self, out: &mut Vec<u8>) {
        if self.number <= 30 {
            out.push(self.leading_bits() | self.number as u8);
        } else {
            out.push(self.leading_bits() | 0x1F);
            base128::encode_base128(out, self.number);
        }
    }

    /// Write the encoded tag to a stream.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_to(&mut buf);
        w.write_all(&buf)
    }

    /// Decode a tag from a byte slice, returning `(tag, bytes_consumed)`.
    ///
    /// `base_offset` is the slice's position in the enclosing stream, used
    /// for error reporting.
    pub fn decode(data: &[u8], base_offset: usize) -> Result<(Self, usize)> {
        let Some(&first) = data.first() else {
            return Err(Error::header(base_offset, HeaderErrorKind::Truncated));
        };

        let class = Class::from_bits(first);
        let constructed = first & 0x20 != 0;
        let low = first & 0x1F;

        if low < 0x1F {
            return Ok((Self::new(class, constructed, low as u32), 1));
        }

        let (number, consumed) = base128::decode_base128(&data[1..]).map_err(|e| match e {
            Base128Error::Truncated => {
                Error::header(base_offset + 1, HeaderErrorKind::Truncated)
            }
            Base128Error::Overflow => {
                Error::header(base_offset + 1, HeaderErrorKind::TagNumberOverflow)
            }
        })?;

        Ok((Self::new(class, constructed, number), 1 + consumed))
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = match self.class {
            Class::Universal => "universal",
            Class::Application => "application",
            Class::ContextSpecific => "context",
            Class::Private => "private",
        };
        let form = if self.constructed { "constructed" } else { "primitive" };
        write!(f, "[{} {} {}]", class, form, self.number)
    }
}
