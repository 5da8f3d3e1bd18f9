// example/src/main.rs

use wirecast::*;

fn main() -> Result<(), Error> {
    // Build the codec once; it can be shared by reference from here on.
    let codec = codec_from_source(include_str!("../demo.wire"), "Block")?;
    println!("static size: {:?}", codec.static_size());

    // Start from the zero value and fill in the slots in declaration order.
    let mut block = codec.zero_value();
    block.set(0, Value::UInt64(42));
    block.set(1, Value::Bytes(vec![0xaa; 32]));
    block.set(
        2,
        Value::Array(vec![Value::Object(vec![Value::Bytes(vec![0x11; 20]), Value::UInt64(1_000)])]),
    );
    block.set(3, Value::Map(vec![(Value::String("miner".into()), Value::String("alice".into()))]));

    let bytes = codec.encode(&block)?;
    println!("encoded {} bytes (size_of = {})", bytes.len(), codec.size_of(&block));

    let decoded = codec.decode(&bytes)?;
    assert_eq!(decoded, block);
    println!("{}", decode_to_json(&codec, &bytes)?);

    // The same value can come from JSON.
    let from_text = encode_from_json(
        &codec,
        r#"{"Height": 42, "Parent": [0], "Memo": "hello"}"#,
    );
    match from_text {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("rejected: {}", e),
    }

    let json = serde_json::json!({ "Height": 7, "Memo": "hello" });
    let value = from_json(codec.schema(), &json)?;
    let bytes = codec.encode(&value)?;
    println!("memo block: {} bytes", bytes.len());

    // Too many transfers
    let mut big = block.clone();
    big.set(
        2,
        Value::Array(vec![Value::Object(vec![Value::Bytes(vec![0; 20]), Value::UInt64(0)]); 65]),
    );
    match codec.encode(&big) {
        Err(EncodeError::MaxLengthExceeded { len, max }) => println!("too many transfers: {} > {}", len, max),
        other => println!("unexpected: {:?}", other),
    }

    Ok(())
}
