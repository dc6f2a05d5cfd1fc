// SPDX-License-Identifier: Apache-2.0

//! The typed document model.
//!
//! A [`Document`] is an ordered list of `(key, Value)` pairs and an [`Array`] is an
//! ordered list of values. Insertion order is the iteration order and therefore
//! the order in which the encoder emits entries.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Length of an object id in bytes.
pub const OBJECT_ID_LEN: usize = 12;

/// A 12-byte object identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    pub const fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; OBJECT_ID_LEN] {
        self.0
    }

    /// Parses 24 hexadecimal characters, either case.
    pub fn from_hex(text: &str) -> Option<Self> {
        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(text, &mut bytes).ok()?;
        Some(Self(bytes))
    }

    /// Renders the id as 24 lowercase hexadecimal characters.
    pub fn to_hex(&self) -> [u8; OBJECT_ID_LEN * 2] {
        let mut out = [b'0'; OBJECT_ID_LEN * 2];
        if let Err(e) = hex::encode_to_slice(self.0, &mut out) {
            log::warn!("ObjectId hex rendering failed: {e}");
        }
        out
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        let text = core::str::from_utf8(&hex).map_err(|_| fmt::Error)?;
        f.write_str(text)
    }
}

/// Binary payload tagged with a one-byte subtype.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Binary {
    pub subtype: u8,
    pub bytes: Vec<u8>,
}

/// Regular expression with its option letters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Regex {
    pub pattern: String,
    pub options: String,
}

/// Legacy timestamp: seconds and an ordinal within the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub t: u32,
    pub i: u32,
}

/// Database pointer, a collection name and an optional object id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DbPointer {
    pub collection: String,
    pub oid: Option<ObjectId>,
}

/// Code with an attached scope document.
///
/// Only the code is rendered as JSON; the scope is carried but not emitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeWithScope {
    pub code: Vec<u8>,
    pub scope: Document,
}

/// A single typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    /// UTF-8 text, kept as raw bytes.
    String(Vec<u8>),
    Document(Document),
    Array(Array),
    Binary(Binary),
    Undefined,
    ObjectId(ObjectId),
    Boolean(bool),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    Null,
    Regex(Regex),
    DbPointer(DbPointer),
    Code(Vec<u8>),
    Symbol(Vec<u8>),
    CodeWithScope(CodeWithScope),
    Int32(i32),
    Timestamp(Timestamp),
    Int64(i64),
    MinKey,
    MaxKey,
}

impl Value {
    /// Short type name, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Document(_) => "document",
            Value::Array(_) => "array",
            Value::Binary(_) => "binary",
            Value::Undefined => "undefined",
            Value::ObjectId(_) => "objectId",
            Value::Boolean(_) => "bool",
            Value::DateTime(_) => "date",
            Value::Null => "null",
            Value::Regex(_) => "regex",
            Value::DbPointer(_) => "dbPointer",
            Value::Code(_) => "code",
            Value::Symbol(_) => "symbol",
            Value::CodeWithScope(_) => "codeWithScope",
            Value::Int32(_) => "int",
            Value::Timestamp(_) => "timestamp",
            Value::Int64(_) => "long",
            Value::MinKey => "minKey",
            Value::MaxKey => "maxKey",
        }
    }

    pub fn string(text: &str) -> Self {
        Value::String(text.as_bytes().to_vec())
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }
}

/// Ordered key/value container.
///
/// Keys are not required to be unique; lookups return the first match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    entries: Vec<(String, Value)>,
}

impl Document {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry after all existing ones.
    pub fn append(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push((key.into(), value));
    }

    /// Builder-style [`Document::append`].
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.append(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, (String, Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a (String, Value);
    type IntoIter = core::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Ordered sequence of values. Positions are implicit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    values: Vec<Value>,
}

impl Array {
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn with(mut self, value: Value) -> Self {
        self.push(value);
        self
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = core::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A document or array, the two shapes a decoded root can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Document(Document),
    Array(Array),
}

impl Container {
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Container::Document(doc) => Some(doc),
            Container::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Container::Array(array) => Some(array),
            Container::Document(_) => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Container::Document(doc) => Value::Document(doc),
            Container::Array(array) => Value::Array(array),
        }
    }
}
