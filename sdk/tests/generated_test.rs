#![cfg(test)]

#[path = "generated/demo.rs"]
mod demo;

use std::collections::HashMap;

use demo::{Demo, Entry};
use wirecast::{
    compile_schema, compile_schema_to_rust, codec_from_source, encode_from_json, Codec, DecodeError, EncodeError,
    Encoded, Error, GenOptions, Value,
};

const DEMO_WIRE: &str = include_str!("demo.wire");

fn codec() -> Codec {
    codec_from_source(DEMO_WIRE, "Demo").expect("demo.wire should compile")
}

fn sample() -> Demo {
    let mut d = Demo::default();
    d.version = 3;
    d.id = [1, 2, 3, 4];
    d.flags = [true, false];
    d.entries = vec![Entry { key: "ab".to_string(), weight: 1.5 }];
    d.index = HashMap::from([(7, "seven".to_string())]);
    d.payload = vec![9, 9];
    d
}

fn sample_value() -> Value {
    Value::Object(vec![
        Value::UInt16(3),
        Value::Bytes(vec![1, 2, 3, 4]),
        Value::Array(vec![Value::Bool(true), Value::Bool(false)]),
        Value::Array(vec![Value::Object(vec![Value::String("ab".into()), Value::Float32(1.5)])]),
        Value::Map(vec![(Value::Int32(7), Value::String("seven".into()))]),
        Value::UInt64(0),
        Value::Bytes(vec![9, 9]),
    ])
}

#[test]
fn test_generated_code_is_current() {
    let schema = compile_schema(DEMO_WIRE, "Demo").unwrap();
    let rust_code = compile_schema_to_rust(&schema, &GenOptions::default()).unwrap();
    assert_eq!(rust_code, include_str!("generated/demo.rs"));
}

#[test]
fn test_generated_matches_codec() {
    let codec = codec();
    let d = sample();
    let value = sample_value();

    assert_eq!(d.size_of(), 45);
    assert_eq!(codec.size_of(&value), 45);

    let bytes = d.encode().unwrap();
    assert_eq!(bytes, codec.encode(&value).unwrap());

    let mut decoded = Demo::default();
    Demo::decode_exact(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, d);
    assert_eq!(codec.decode(&bytes).unwrap(), value);
}

#[test]
fn test_generated_omit_empty() {
    let codec = codec();
    let mut d = sample();
    d.payload.clear();
    let mut value = sample_value();
    value.set(6, Value::Bytes(vec![]));

    let bytes = d.encode().unwrap();
    assert_eq!(bytes.len(), 39);
    assert_eq!(bytes, codec.encode(&value).unwrap());

    // an absent trailing field resets whatever the destination held
    let mut decoded = sample();
    Demo::decode_exact(&bytes, &mut decoded).unwrap();
    assert!(decoded.payload.is_empty());
}

#[test]
fn test_generated_errors_match_codec() {
    let codec = codec();

    let mut d = sample();
    d.entries = vec![Entry::default(); 9];
    let mut value = sample_value();
    value.set(3, Value::Array(vec![Value::Object(vec![Value::String(String::new()), Value::Float32(0.0)]); 9]));
    let expected = EncodeError::MaxLengthExceeded { len: 9, max: 8 };
    assert_eq!(d.encode().unwrap_err(), expected);
    assert_eq!(codec.encode(&value).unwrap_err(), expected);

    let mut small = [0u8; 10];
    assert_eq!(
        sample().encode_into(&mut small).unwrap_err(),
        EncodeError::BufferTooSmall { needed: 45, available: 10 }
    );

    let mut bytes = sample().encode().unwrap();
    bytes[6] = 2;
    assert_eq!(Demo::decode_exact(&bytes, &mut Demo::default()).unwrap_err(), DecodeError::InvalidBool(2));
    assert_eq!(codec.decode(&bytes).unwrap_err(), DecodeError::InvalidBool(2));
}

#[test]
fn test_generated_rejects_duplicate_keys() {
    let codec = codec();
    let mut value = sample_value();
    value.set(4, Value::Map(vec![
        (Value::Int32(7), Value::String("a".into())),
        (Value::Int32(7), Value::String("b".into())),
    ]));
    assert_eq!(codec.encode(&value).unwrap_err(), EncodeError::MapDuplicateKey);

    // Index holding key 7 twice: count 2, then (7, "a") and (7, "b")
    let good = sample().encode().unwrap();
    let index_at = 2 + 4 + 2 + 4 + (4 + 2 + 4);
    let index_end = index_at + 4 + 4 + (4 + 5);
    let entries: [u8; 22] = [2, 0, 0, 0, 7, 0, 0, 0, 1, 0, 0, 0, b'a', 7, 0, 0, 0, 1, 0, 0, 0, b'b'];
    let bytes = [&good[..index_at], &entries[..], &good[index_end..]].concat();

    assert_eq!(Demo::decode_exact(&bytes, &mut Demo::default()).unwrap_err(), DecodeError::MapDuplicateKey);
    assert_eq!(codec.decode(&bytes).unwrap_err(), DecodeError::MapDuplicateKey);
}

#[test]
fn test_json_pairs_with_repeated_key_do_not_encode() {
    let codec = codec();
    let json = r#"{"Version": 1, "Index": [[7, "a"], [7, "b"]]}"#;
    assert!(matches!(encode_from_json(&codec, json), Err(Error::Encode(EncodeError::MapDuplicateKey))));

    let json = r#"{"Version": 1, "Index": [[7, "a"], [8, "b"]]}"#;
    let bytes = encode_from_json(&codec, json).unwrap();
    assert!(codec.decode(&bytes).is_ok());
}

#[test]
fn test_generated_truncation_matches_codec() {
    let codec = codec();
    let bytes = sample().encode().unwrap();

    for cut in 0..bytes.len() {
        let generated = Demo::decode_exact(&bytes[..cut], &mut Demo::default());
        let dynamic = codec.decode(&bytes[..cut]);
        assert_eq!(generated.err(), dynamic.err(), "cut at {}", cut);
    }

    let mut extra = bytes.clone();
    extra.push(0);
    assert_eq!(Demo::decode_exact(&extra, &mut Demo::default()).unwrap_err(), DecodeError::TrailingBytes(1));
    assert_eq!(Demo::decode_prefix(&extra, &mut Demo::default()).unwrap(), bytes.len());
}
