// SPDX-License-Identifier: Apache-2.0

//! Decoding the encoder's output and encoding again must reproduce it byte for byte.

use bsonjson::{
    decode_slice, encode, to_json_vec, Array, Binary, CodeWithScope, DbPointer, Document,
    ObjectId, Regex, Timestamp, Value,
};

fn encode_doc(doc: &Document) -> Vec<u8> {
    let mut out = Vec::new();
    encode(doc, &mut out, true).unwrap();
    out
}

fn assert_fixed_point(doc: &Document) {
    let first = encode_doc(doc);
    let decoded = decode_slice(&first).unwrap_or_else(|e| {
        panic!(
            "re-decoding {:?} failed: {e}",
            String::from_utf8_lossy(&first)
        )
    });
    let second = to_json_vec(&decoded).unwrap();
    assert_eq!(
        String::from_utf8_lossy(&second),
        String::from_utf8_lossy(&first)
    );
}

fn oid() -> ObjectId {
    ObjectId::from_hex("507f1f77bcf86cd799439011").unwrap()
}

macro_rules! round_trip_tests {
    ($($name:ident: $value:expr,)*) => {
        $(
            paste::paste! {
                #[test]
                fn [<test_round_trip_ $name>]() {
                    let doc = Document::new().with("v", $value);
                    assert_fixed_point(&doc);
                }
            }
        )*
    };
}

round_trip_tests! {
    double: Value::Double(-12.5),
    double_integral: Value::Double(3.0),
    string: Value::string("tab\there \"quoted\" back\\slash"),
    string_multibyte: Value::string("Grüße 😀"),
    code: Value::Code(b"function () { return 1; }".to_vec()),
    symbol: Value::Symbol(b"sym".to_vec()),
    code_with_scope: Value::CodeWithScope(CodeWithScope {
        code: b"x".to_vec(),
        scope: Document::new(),
    }),
    int32: Value::Int32(-2147483648),
    int64: Value::Int64(9007199254740993),
    boolean: Value::Boolean(false),
    null: Value::Null,
    object_id: Value::ObjectId(oid()),
    binary: Value::Binary(Binary { subtype: 4, bytes: (0u8..100).collect() }),
    binary_empty: Value::Binary(Binary { subtype: 0, bytes: Vec::new() }),
    date_time: Value::DateTime(1_700_000_000_000),
    regex: Value::Regex(Regex {
        pattern: String::from(r"^\w+$"),
        options: String::from("i"),
    }),
    db_pointer: Value::DbPointer(DbPointer { collection: String::from("c"), oid: None }),
    db_pointer_with_id: Value::DbPointer(DbPointer {
        collection: String::from("c"),
        oid: Some(oid()),
    }),
    min_key: Value::MinKey,
    max_key: Value::MaxKey,
    empty_document: Value::Document(Document::new()),
    empty_array: Value::Array(Array::new()),
    mixed_array: Value::Array(
        Array::new()
            .with(Value::Int32(1))
            .with(Value::Array(Array::new().with(Value::Null)))
            .with(Value::Document(Document::new().with("k", Value::Boolean(true)))),
    ),
}

#[test]
fn test_object_id_shape() {
    let doc = Document::new().with("_id", Value::ObjectId(oid()));
    assert_eq!(
        String::from_utf8(encode_doc(&doc)).unwrap(),
        r#"{ "_id" : { "$oid" : "507f1f77bcf86cd799439011" } }"#
    );
}

#[test]
fn test_extended_json_decodes_as_plain_documents() {
    let doc = Document::new().with("d", Value::DateTime(5));
    let decoded = decode_slice(&encode_doc(&doc)).unwrap();
    let inner = decoded
        .as_document()
        .and_then(|d| d.get("d"))
        .and_then(Value::as_document)
        .unwrap();
    assert_eq!(inner.get("$date"), Some(&Value::Int64(5)));
}

#[test]
fn test_broken_utf8_before_quote_stays_valid_json() {
    let doc = Document::new().with("v", Value::String(vec![0xE0, b'"', b'}']));
    let first = encode_doc(&doc);
    assert_eq!(first, br#"{ "v" : "\ufffd\"}" }"#);

    let decoded = decode_slice(&first).unwrap();
    let value = decoded.as_document().and_then(|d| d.get("v"));
    assert_eq!(value, Some(&Value::string("\u{FFFD}\"}")));

    let second = to_json_vec(&decoded).unwrap();
    let third = to_json_vec(&decode_slice(&second).unwrap()).unwrap();
    assert_eq!(second, third);
}

#[test]
fn test_broken_utf8_before_escape_keeps_escape() {
    let mut json = br#"{"v": ""#.to_vec();
    json.extend_from_slice(&[0xE0, b'A', b'\\', b'"', b'x']);
    json.extend_from_slice(br#""}"#);

    let decoded = decode_slice(&json).unwrap();
    let value = decoded.as_document().and_then(|d| d.get("v"));
    assert_eq!(value, Some(&Value::String(vec![0xE0, b'A', b'"', b'x'])));

    let encoded = to_json_vec(&decoded).unwrap();
    assert_eq!(encoded, br#"{ "v" : "\ufffdA\"x" }"#);
    let again = decode_slice(&encoded).unwrap();
    let value = again.as_document().and_then(|d| d.get("v"));
    assert_eq!(value, Some(&Value::string("\u{FFFD}A\"x")));
}

#[test]
fn test_timestamp_reencodes_with_object_spacing() {
    let doc = Document::new().with("v", Value::Timestamp(Timestamp { t: 7, i: 3 }));
    let first = encode_doc(&doc);
    assert_eq!(
        String::from_utf8_lossy(&first),
        r#"{ "v" : { "$timestamp" : { "t": 7, "i": 3 } } }"#
    );

    let second = to_json_vec(&decode_slice(&first).unwrap()).unwrap();
    assert_eq!(
        String::from_utf8_lossy(&second),
        r#"{ "v" : { "$timestamp" : { "t" : 7, "i" : 3 } } }"#
    );

    let third = to_json_vec(&decode_slice(&second).unwrap()).unwrap();
    assert_eq!(third, second);
}
