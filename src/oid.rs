//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for
//! common identifiers.

use std::fmt;

use smallvec::SmallVec;

use crate::base128::{self, Base128Error};
use crate::error::{Error, PayloadErrorKind, Result};

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a
/// value". Enforced during payload decode as protection against hostile
/// input.
pub const MAX_OID_ARCS: usize = 128;

/// Object Identifier.
///
/// A sequence of unsigned arc values, rendered as dotted decimal
/// (`"1.3.6.1.2.1.1.1.0"`).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    ///
    /// Arcs are taken as-is. The wire format combines the first two arcs
    /// into a single `arc1 * 40 + arc2` subidentifier, so only OIDs whose
    /// combined first subidentifier fits in u32 re-encode losslessly
    /// (standard OIDs have a first arc of 0-2); larger values wrap.
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted decimal notation (e.g. "1.3.6.1.2.1.1.1.0").
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(Self::empty());
        }

        let mut arcs = SmallVec::new();
        for part in s.split('.') {
            arcs.push(part.parse().ok()?);
        }
        Some(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Check if this OID starts with another OID.
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.len() >= other.arcs.len() && self.arcs[..other.arcs.len()] == other.arcs[..]
    }

    /// Create a child OID by appending an arc.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// The combined first subidentifier. Wraps rather than panics when the
    /// first two arcs exceed the standard range, keeping `payload_len` and
    /// `encode_payload` consistent with each other.
    fn first_subidentifier(&self) -> u32 {
        let second = self.arcs.get(1).copied().unwrap_or(0);
        self.arcs[0].wrapping_mul(40).wrapping_add(second)
    }

    /// BER payload size in bytes, without materializing the encoding.
    pub(crate) fn payload_len(&self) -> usize {
        if self.arcs.is_empty() {
            return 0;
        }
        base128::size_base128(self.first_subidentifier())
            + self
                .arcs
                .iter()
                .skip(2)
                .map(|&arc| base128::size_base128(arc))
                .sum::<usize>()
    }

    /// Append the BER payload encoding.
    ///
    /// X.690 Section 8.19: the first two arcs combine as `arc1 * 40 + arc2`
    /// into a single base-128 subidentifier; each remaining arc is base-128
    /// encoded on its own.
    pub(crate) fn encode_payload(&self, out: &mut Vec<u8>) {
        if self.arcs.is_empty() {
            return;
        }
        base128::encode_base128(out, self.first_subidentifier());
        for &arc in self.arcs.iter().skip(2) {
            base128::encode_base128(out, arc);
        }
    }

    /// Decode a BER payload of exactly `data.len()` bytes.
    ///
    /// The first subidentifier `v` splits as `v / 40` and `v % 40`; the
    /// remaining subidentifiers become one arc each. The base-128 stream
    /// must consume the payload exactly.
    pub(crate) fn decode_payload(data: &[u8], base_offset: usize) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::empty());
        }

        let map_err = |e: Base128Error, at: usize| match e {
            Base128Error::Truncated => Error::payload(at, PayloadErrorKind::Truncated),
            Base128Error::Overflow => Error::payload(at, PayloadErrorKind::ArcOverflow),
        };

        let mut arcs = SmallVec::new();

        let (first, consumed) =
            base128::decode_base128(data).map_err(|e| map_err(e, base_offset))?;
        arcs.push(first / 40);
        arcs.push(first % 40);

        let mut i = consumed;
        while i < data.len() {
            let (arc, consumed) =
                base128::decode_base128(&data[i..]).map_err(|e| map_err(e, base_offset + i))?;
            arcs.push(arc);
            i += consumed;

            if arcs.len() > MAX_OID_ARCS {
                return Err(Error::payload(
                    base_offset + i,
                    PayloadErrorKind::TooManyArcs {
                        count: arcs.len(),
                        max: MAX_OID_ARCS,
                    },
                ));
            }
        }

        Ok(Self { arcs })
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut arcs = SmallVec::new();
        if !s.is_empty() {
            for part in s.split('.') {
                arcs.push(part.parse()?);
            }
        }
        Ok(Self { arcs })
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Macro to create an OID from literal arcs.
///
/// # Examples
///
/// ```
/// use asn1_ber::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1, 1, 1, 0]);
        assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");
    }

    #[test]
    fn test_fromstr() {
        let oid: Oid = "1.3.6.1".parse().unwrap();
        assert_eq!(oid, oid!(1, 3, 6, 1));
        assert!("1.3.abc".parse::<Oid>().is_err());
        assert!("1.3.-6".parse::<Oid>().is_err());
    }

    #[test]
    fn test_starts_with() {
        let oid = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
        assert!(oid.starts_with(&oid!(1, 3, 6, 1)));
        assert!(oid.starts_with(&oid));
        assert!(oid.starts_with(&Oid::empty()));
        assert!(!oid!(1, 3).starts_with(&oid));
    }

    #[test]
    fn test_payload_encoding() {
        // 1.3.6.1 encodes as (1*40+3)=43, 6, 1 = [0x2B, 0x06, 0x01]
        let mut out = Vec::new();
        oid!(1, 3, 6, 1).encode_payload(&mut out);
        assert_eq!(out, vec![0x2B, 0x06, 0x01]);
        assert_eq!(oid!(1, 3, 6, 1).payload_len(), 3);
    }

    #[test]
    fn test_payload_encoding_multibyte_arc() {
        // Arc 1000 needs two base-128 bytes: 0x87 0x68
        let mut out = Vec::new();
        oid!(1, 3, 1000).encode_payload(&mut out);
        assert_eq!(out, vec![0x2B, 0x87, 0x68]);
        assert_eq!(oid!(1, 3, 1000).payload_len(), 3);
    }

    #[test]
    fn test_single_arc_encodes_times_40() {
        let mut out = Vec::new();
        oid!(1).encode_payload(&mut out);
        assert_eq!(out, vec![40]);
    }

    #[test]
    fn test_oversized_first_arc_does_not_panic() {
        // Out-of-range first arcs wrap in the combined subidentifier; the
        // declared length still matches the bytes written
        for oid in [oid!(u32::MAX, 39, 5), oid!(0x0800_0000, 0), oid!(u32::MAX)] {
            let mut out = Vec::new();
            oid.encode_payload(&mut out);
            assert_eq!(out.len(), oid.payload_len());
        }
    }

    #[test]
    fn test_payload_roundtrip() {
        let oid = oid!(1, 3, 6, 1, 4, 1, 9, 9, 42, 1000, 0);
        let mut out = Vec::new();
        oid.encode_payload(&mut out);
        assert_eq!(out.len(), oid.payload_len());
        let decoded = Oid::decode_payload(&out, 0).unwrap();
        assert_eq!(decoded, oid);
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(Oid::empty().payload_len(), 0);
        let decoded = Oid::decode_payload(&[], 0).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_first_subidentifier_split() {
        // 0x2B = 43 splits as 43/40=1, 43%40=3
        let decoded = Oid::decode_payload(&[0x2B], 0).unwrap();
        assert_eq!(decoded.arcs(), &[1, 3]);

        // 0x00 splits as 0.0
        let decoded = Oid::decode_payload(&[0x00], 0).unwrap();
        assert_eq!(decoded.arcs(), &[0, 0]);
    }

    #[test]
    fn test_decode_truncated_arc() {
        // Final arc's continuation bit never clears within the payload
        let err = Oid::decode_payload(&[0x2B, 0x87], 10).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedPayload {
                offset: 11,
                kind: PayloadErrorKind::Truncated,
            }
        ));
    }

    #[test]
    fn test_decode_arc_overflow() {
        let err = Oid::decode_payload(&[0x2B, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F], 0).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedPayload {
                kind: PayloadErrorKind::ArcOverflow,
                ..
            }
        ));
    }

    #[test]
    fn test_max_arcs_enforced() {
        // First byte yields two arcs; pad up to exactly MAX_OID_ARCS
        let mut data = vec![0x2B];
        data.extend(std::iter::repeat_n(0x01, MAX_OID_ARCS - 2));
        let decoded = Oid::decode_payload(&data, 0).unwrap();
        assert_eq!(decoded.len(), MAX_OID_ARCS);

        // One more arc exceeds the limit
        data.push(0x01);
        assert!(matches!(
            Oid::decode_payload(&data, 0),
            Err(Error::MalformedPayload {
                kind: PayloadErrorKind::TooManyArcs { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_non_minimal_subidentifier_accepted() {
        // 0x80 0x01 is a non-minimal encoding of arc 1
        let decoded = Oid::decode_payload(&[0x2B, 0x80, 0x01], 0).unwrap();
        assert_eq!(decoded.arcs(), &[1, 3, 1]);
    }
}
