//! Known-answer and robustness tests for the BER codec.
//!
//! Byte vectors follow X.690; the truncation sweep verifies that every
//! prefix of a valid TLV is rejected rather than silently accepted.

use asn1_ber::{
    Class, Codec, DefaultFactory, Error, Kind, Tag, Value, oid,
};
use bytes::Bytes;
use std::io::Cursor;

fn encode(value: &Value) -> Vec<u8> {
    let codec = Codec::new();
    let mut buf = Vec::new();
    codec.encode(value, &mut buf).unwrap();
    buf
}

fn decode(data: &[u8]) -> asn1_ber::Result<Option<Value>> {
    Codec::new().decode(&mut Cursor::new(data))
}

#[test]
fn boolean_known_answer() {
    assert_eq!(encode(&Value::boolean(true)), [0x01, 0x01, 0x01]);
    assert_eq!(encode(&Value::boolean(false)), [0x01, 0x01, 0x00]);

    // Lenient decode: any nonzero payload octet is true
    let decoded = decode(&[0x01, 0x01, 0xFF]).unwrap().unwrap();
    assert_eq!(decoded.as_bool(), Some(true));

    // Canonical re-encode
    assert_eq!(encode(&decoded), [0x01, 0x01, 0x01]);
}

#[test]
fn integer_known_answer() {
    assert_eq!(
        encode(&Value::integer(0x00000001)),
        [0x02, 0x04, 0x00, 0x00, 0x00, 0x01]
    );

    let decoded = decode(&[0x02, 0x04, 0x00, 0x00, 0x00, 0x01]).unwrap().unwrap();
    assert_eq!(decoded.as_u32(), Some(1));
}

#[test]
fn octet_string_known_answer() {
    assert_eq!(
        encode(&Value::octet_string(&b"hi"[..])),
        [0x04, 0x02, 0x68, 0x69]
    );

    let decoded = decode(&[0x04, 0x02, 0x68, 0x69]).unwrap().unwrap();
    assert_eq!(decoded.as_str(), Some("hi"));
}

#[test]
fn null_known_answer() {
    assert_eq!(encode(&Value::null()), [0x05, 0x00]);
    let decoded = decode(&[0x05, 0x00]).unwrap().unwrap();
    assert_eq!(decoded.kind(), &Kind::Null);
}

#[test]
fn oid_known_answer() {
    // 1.3.6.1.2.1.1.1.0: first subidentifier 1*40+3 = 43 = 0x2B
    let value = Value::object_identifier(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
    let wire = [0x06, 0x08, 0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x01, 0x00];
    assert_eq!(encode(&value), wire);

    let decoded = decode(&wire).unwrap().unwrap();
    assert_eq!(decoded.as_oid().unwrap().to_string(), "1.3.6.1.2.1.1.1.0");
}

#[test]
fn sequence_roundtrip() {
    let value = Value::sequence(vec![
        Value::integer(1),
        Value::octet_string(&b"x"[..]),
    ]);
    let wire = encode(&value);
    assert_eq!(wire[0], 0x30);
    assert_eq!(wire[1] as usize, wire.len() - 2);

    let decoded = decode(&wire).unwrap().unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn nested_sequence_roundtrip() {
    let value = Value::sequence(vec![
        Value::integer(99),
        Value::sequence(vec![
            Value::object_identifier(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)),
            Value::octet_string(&b"router1"[..]),
        ]),
        Value::boolean(false),
    ]);

    let decoded = decode(&encode(&value)).unwrap().unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn long_form_length_roundtrip() {
    // 128-byte payload forces the first long-form length (81 80)
    let value = Value::octet_string(Bytes::from(vec![0xAB; 128]));
    let wire = encode(&value);
    assert_eq!(&wire[..3], &[0x04, 0x81, 0x80]);

    let decoded = decode(&wire).unwrap().unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn multibyte_tag_roundtrip() {
    // Tag number 31 is the first to need the extension byte
    let value = Value::unknown(Tag::new(Class::Private, false, 31), &[0x01][..]);
    let wire = encode(&value);
    assert_eq!(&wire[..2], &[0xDF, 0x1F]);

    let decoded = decode(&wire).unwrap().unwrap();
    assert_eq!(decoded, value);
    assert_eq!(encode(&decoded), wire);
}

#[test]
fn truncation_sweep_rejects_every_prefix() {
    let value = Value::sequence(vec![
        Value::integer(0xCAFE),
        Value::object_identifier(oid!(1, 3, 6, 1, 4, 1, 1000)),
        Value::sequence(vec![Value::boolean(true), Value::null()]),
        Value::unknown(Tag::new(Class::ContextSpecific, false, 40), &[0xEE; 5][..]),
    ]);
    let wire = encode(&value);

    // Sanity: the full encoding decodes
    assert_eq!(decode(&wire).unwrap().unwrap(), value);

    for cut in 1..wire.len() {
        let result = decode(&wire[..cut]);
        match result {
            Err(Error::MalformedHeader { .. }) | Err(Error::MalformedPayload { .. }) => {}
            other => panic!("prefix of {} bytes did not fail cleanly: {:?}", cut, other),
        }
    }
}

#[test]
fn unknown_type_is_lossless_inside_sequence() {
    // Application tag 9 is not recognized by DefaultFactory
    let mut wire = Vec::new();
    let inner_tlv = [0x49, 0x03, 0xDE, 0xAD, 0xBF];
    wire.extend_from_slice(&[0x30, 0x0B, 0x02, 0x04, 0x00, 0x00, 0x00, 0x05]);
    wire.extend_from_slice(&inner_tlv);

    let decoded = decode(&wire).unwrap().unwrap();
    let children = decoded.as_sequence().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].as_u32(), Some(5));
    assert!(matches!(children[1].kind(), Kind::Unknown(_)));
    assert_eq!(children[1].tag(), Tag::application(false, 9));

    // Re-encoding reproduces the original bytes exactly
    assert_eq!(encode(&decoded), wire);
}

#[test]
fn sequence_budget_overrun_rejected() {
    // SEQUENCE declares 4 bytes; the child claims 6
    let wire = [0x30, 0x04, 0x04, 0x06, 0x01, 0x02];
    let err = decode(&wire).unwrap_err();
    assert!(matches!(err, Error::MalformedPayload { .. }));
}

#[test]
fn sequence_budget_underrun_rejected() {
    // SEQUENCE declares 3 bytes: one NULL (2 bytes) plus a stray byte that
    // cannot form a complete child TLV
    let wire = [0x30, 0x03, 0x05, 0x00, 0x04];
    let err = decode(&wire).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedHeader { .. } | Error::MalformedPayload { .. }
    ));
}

#[test]
fn empty_sequence_roundtrip() {
    let value = Value::sequence(vec![]);
    let wire = encode(&value);
    assert_eq!(wire, [0x30, 0x00]);
    assert_eq!(decode(&wire).unwrap().unwrap(), value);
}

#[test]
fn zero_length_octet_string_roundtrip() {
    let value = Value::octet_string(Bytes::new());
    let wire = encode(&value);
    assert_eq!(wire, [0x04, 0x00]);
    assert_eq!(decode(&wire).unwrap().unwrap(), value);
}

#[test]
fn retagged_integer_roundtrips_through_custom_tag() {
    // A Counter32-style value: integer payload under an application tag
    let value = Value::with_tag(Tag::application(false, 1), Kind::Integer(12345));
    let wire = encode(&value);
    assert_eq!(wire, [0x41, 0x04, 0x00, 0x00, 0x30, 0x39]);

    // DefaultFactory does not know the tag, so it comes back Unknown but
    // byte-identical on re-encode
    let decoded = decode(&wire).unwrap().unwrap();
    assert!(matches!(decoded.kind(), Kind::Unknown(_)));
    assert_eq!(encode(&decoded), wire);
}

#[test]
fn decoded_tree_reencode_is_stable() {
    let value = Value::sequence(vec![
        Value::integer(1),
        Value::sequence(vec![Value::octet_string(&b"nested"[..])]),
        Value::unknown(Tag::context_specific(false, 3), &[1, 2, 3][..]),
    ]);
    let wire = encode(&value);
    let decoded = decode(&wire).unwrap().unwrap();
    let rewire = encode(&decoded);
    assert_eq!(wire, rewire);
}

#[test]
fn shared_codec_across_threads() {
    let codec = std::sync::Arc::new(Codec::with_factory(DefaultFactory));
    let wire = encode(&Value::sequence(vec![Value::integer(1), Value::null()]));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let codec = codec.clone();
            let wire = wire.clone();
            std::thread::spawn(move || {
                let decoded = codec.decode(&mut Cursor::new(&wire)).unwrap().unwrap();
                assert_eq!(decoded.as_sequence().unwrap().len(), 2);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
