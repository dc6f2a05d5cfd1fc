// SPDX-License-Identifier: Apache-2.0

use bsonjson::{
    decode_from_reader, decode_slice, to_json_vec, ChunkReader, Container, DecodeError, Document,
    PushDecoder, Value,
};

fn decode_str(json: &str) -> Result<Container, DecodeError> {
    decode_slice(json.as_bytes())
}

#[test]
fn test_scalar_document() {
    let root = decode_str(r#"{"a": 1, "b": true, "c": null}"#).unwrap();
    let doc = root.as_document().unwrap();

    let keys: Vec<&str> = doc.keys().collect();
    assert_eq!(keys, ["a", "b", "c"]);
    assert_eq!(doc.get("a"), Some(&Value::Int64(1)));
    assert_eq!(doc.get("b"), Some(&Value::Boolean(true)));
    assert_eq!(doc.get("c"), Some(&Value::Null));

    let json = to_json_vec(&root).unwrap();
    assert_eq!(
        String::from_utf8(json).unwrap(),
        r#"{ "a" : 1, "b" : true, "c" : null }"#
    );
}

#[test]
fn test_nested_array_positions() {
    let root = decode_str(r#"{"a": [10, 20, 30]}"#).unwrap();
    let array = root
        .as_document()
        .and_then(|d| d.get("a"))
        .and_then(Value::as_array)
        .unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(array.get(0), Some(&Value::Int64(10)));
    assert_eq!(array.get(1), Some(&Value::Int64(20)));
    assert_eq!(array.get(2), Some(&Value::Int64(30)));
}

#[test]
fn test_truncated_input() {
    assert_eq!(decode_str(r#"{"a": [1, 2"#), Err(DecodeError::IncompleteInput));
    assert_eq!(decode_str(r#"{"a": "#), Err(DecodeError::IncompleteInput));
    assert_eq!(decode_str("{"), Err(DecodeError::IncompleteInput));
}

#[test]
fn test_scalar_root() {
    assert_eq!(decode_str("42"), Err(DecodeError::InvalidRoot));
    assert_eq!(decode_str("null"), Err(DecodeError::InvalidRoot));
}

#[test]
fn test_root_array() {
    let root = decode_str(r#"[1, "two", {"three": 3.0}]"#).unwrap();
    let array = root.as_array().unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(array.get(1), Some(&Value::string("two")));
    assert_eq!(
        array.get(2),
        Some(&Value::Document(Document::new().with("three", Value::Double(3.0))))
    );
}

#[test]
fn test_unicode_escape() {
    let root = decode_str(r#"{"s": "caf\u00e9"}"#).unwrap();
    let doc = root.as_document().unwrap();
    assert_eq!(doc.get("s"), Some(&Value::String("café".as_bytes().to_vec())));

    let json = to_json_vec(&root).unwrap();
    let text = String::from_utf8(json).unwrap();
    assert!(
        text == r#"{ "s" : "café" }"# || text == r#"{ "s" : "caf\u00e9" }"#,
        "unexpected encoding {text}"
    );
}

#[test]
fn test_escapes_never_leak_unescaped() {
    let root = decode_str(r#"{"q": "say \"hi\" \\ bye\n"}"#).unwrap();
    let json = to_json_vec(&root).unwrap();
    assert_eq!(
        String::from_utf8(json).unwrap(),
        r#"{ "q" : "say \"hi\" \\ bye\n" }"#
    );
}

#[test]
fn test_number_kinds() {
    let root = decode_str(
        r#"{"int": -7, "big": 9223372036854775807, "frac": 0.5, "exp": 1e3, "neg_exp": 25E-1}"#,
    )
    .unwrap();
    let doc = root.as_document().unwrap();
    assert_eq!(doc.get("int"), Some(&Value::Int64(-7)));
    assert_eq!(doc.get("big"), Some(&Value::Int64(i64::MAX)));
    assert_eq!(doc.get("frac"), Some(&Value::Double(0.5)));
    assert_eq!(doc.get("exp"), Some(&Value::Double(1000.0)));
    assert_eq!(doc.get("neg_exp"), Some(&Value::Double(2.5)));
}

#[test]
fn test_integer_overflow() {
    assert_eq!(
        decode_str(r#"{"n": 9223372036854775808}"#),
        Err(DecodeError::IntegerOverflow)
    );
}

#[test]
fn test_duplicate_keys_are_kept_in_order() {
    let root = decode_str(r#"{"k": 1, "k": 2}"#).unwrap();
    let doc = root.as_document().unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.get("k"), Some(&Value::Int64(1)));
}

#[test]
fn test_chunk_size_does_not_matter() {
    let json = r#"{"name": "Zoë", "tags": ["a\tb", "😀"], "n": {"x": -1.25e-2, "y": [[], {}]}}"#;
    let whole = decode_str(json).unwrap();
    for chunk_size in 1..=json.len() {
        let root = decode_from_reader(ChunkReader::new(json.as_bytes(), chunk_size)).unwrap();
        assert_eq!(root, whole, "chunk size {chunk_size}");
    }
}

#[test]
fn test_push_decoder_byte_by_byte() {
    let json = br#"{"a": {"b": [true, false, null]}}"#;
    let mut decoder = PushDecoder::new();
    for byte in json {
        decoder.write(core::slice::from_ref(byte)).unwrap();
    }
    let root = decoder.finish().unwrap();
    assert_eq!(
        String::from_utf8(to_json_vec(&root).unwrap()).unwrap(),
        r#"{ "a" : { "b" : [ true, false, null ] } }"#
    );
}

#[test]
fn test_io_reader() {
    let cursor = std::io::Cursor::new(br#"{"from": "io"}"#.to_vec());
    let root = decode_from_reader(bsonjson::IoReader(cursor)).unwrap();
    assert_eq!(
        root.as_document().and_then(|d| d.get("from")),
        Some(&Value::string("io"))
    );
}
