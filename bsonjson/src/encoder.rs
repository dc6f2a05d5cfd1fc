// SPDX-License-Identifier: Apache-2.0

//! Streams a document tree out as JSON text.
//!
//! Containers are walked with an explicit worklist of open levels, so the
//! call stack stays flat however deep the input is. Past
//! [`MAX_NESTING_DEPTH`] a subtree is replaced by [`ELISION_MARKER`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use base64::Engine;

use crate::abort::{AbortSignal, NeverAbort};
use crate::document::{Array, Container, Document, Value};
use crate::escape_processor::encode_json_string;
use crate::parse_error::EncodeError;
use crate::tokenizer::MAX_NESTING_DEPTH;
use crate::writer::{Writer, CONTENT_TYPE_JSON};

/// Written in place of a container nested too deeply to descend into.
pub const ELISION_MARKER: &str = "{ ... }";

/// Input bytes per base64 block; encodes to exactly 64 output bytes.
const BASE64_BLOCK: usize = 48;

type Result<T, E> = core::result::Result<T, EncodeError<E>>;

/// Remaining entries of one open container.
enum Entries<'a> {
    /// Document entries rendered as `"key" : value`
    Keyed(core::slice::Iter<'a, (String, Value)>),
    /// Document entries rendered by value only
    Unkeyed(core::slice::Iter<'a, (String, Value)>),
    Items(core::slice::Iter<'a, Value>),
}

impl<'a> Entries<'a> {
    fn next_entry(&mut self) -> Option<(Option<&'a str>, &'a Value)> {
        match self {
            Entries::Keyed(iter) => iter.next().map(|(k, v)| (Some(k.as_str()), v)),
            Entries::Unkeyed(iter) => iter.next().map(|(_, v)| (None, v)),
            Entries::Items(iter) => iter.next().map(|v| (None, v)),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Entries::Keyed(iter) | Entries::Unkeyed(iter) => iter.len() == 0,
            Entries::Items(iter) => iter.len() == 0,
        }
    }
}

#[derive(Clone, Copy)]
enum Bracket {
    Brace,
    Square,
}

impl Bracket {
    fn open(self) -> &'static [u8] {
        match self {
            Bracket::Brace => b"{ ",
            Bracket::Square => b"[ ",
        }
    }

    fn close(self) -> &'static [u8] {
        match self {
            Bracket::Brace => b" }",
            Bracket::Square => b" ]",
        }
    }

    fn empty(self) -> &'static [u8] {
        match self {
            Bracket::Brace => b"{ }",
            Bracket::Square => b"[ ]",
        }
    }
}

struct Level<'a> {
    entries: Entries<'a>,
    bracket: Bracket,
    first: bool,
}

impl<'a> Level<'a> {
    fn document(doc: &'a Document, emit_keys: bool) -> Self {
        let (entries, bracket) = if emit_keys {
            (Entries::Keyed(doc.iter()), Bracket::Brace)
        } else {
            (Entries::Unkeyed(doc.iter()), Bracket::Square)
        };
        Self {
            entries,
            bracket,
            first: true,
        }
    }

    fn array(array: &'a Array) -> Self {
        Self {
            entries: Entries::Items(array.iter()),
            bracket: Bracket::Square,
            first: true,
        }
    }
}

/// JSON encoder polling an [`AbortSignal`] between visited entries.
#[derive(Debug, Clone)]
pub struct JsonEncoder<A: AbortSignal = NeverAbort> {
    abort: A,
    max_depth: usize,
}

impl Default for JsonEncoder<NeverAbort> {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonEncoder<NeverAbort> {
    pub fn new() -> Self {
        Self::with_abort(NeverAbort)
    }
}

impl<A: AbortSignal> JsonEncoder<A> {
    pub fn with_abort(abort: A) -> Self {
        Self {
            abort,
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    /// Encodes `document` into `sink`.
    ///
    /// With `emit_keys` unset the entries are written positionally, wrapped in
    /// `[ ]`, the way array elements are.
    pub fn encode<W: Writer>(
        &self,
        document: &Document,
        mut sink: W,
        emit_keys: bool,
    ) -> Result<(), W::Error> {
        self.run(Level::document(document, emit_keys), &mut sink)
    }

    pub fn encode_array<W: Writer>(&self, array: &Array, mut sink: W) -> Result<(), W::Error> {
        self.run(Level::array(array), &mut sink)
    }

    pub fn encode_container<W: Writer>(
        &self,
        container: &Container,
        sink: W,
    ) -> Result<(), W::Error> {
        match container {
            Container::Document(doc) => self.encode(doc, sink, true),
            Container::Array(array) => self.encode_array(array, sink),
        }
    }

    fn run<W: Writer>(&self, root: Level<'_>, sink: &mut W) -> Result<(), W::Error> {
        sink.announce_content_type(CONTENT_TYPE_JSON)?;
        if root.entries.is_empty() {
            sink.write(root.bracket.empty())?;
            return Ok(());
        }

        sink.write(root.bracket.open())?;
        let mut levels: Vec<Level<'_>> = Vec::new();
        levels.push(root);

        loop {
            if self.abort.is_aborted() {
                log::debug!("Encode aborted at depth {}", levels.len().saturating_sub(1));
                return Err(EncodeError::Aborted);
            }
            let Some(level) = levels.last_mut() else {
                break;
            };
            let Some((key, value)) = level.entries.next_entry() else {
                sink.write(level.bracket.close())?;
                levels.pop();
                continue;
            };
            if !level.first {
                sink.write(b", ")?;
            }
            level.first = false;
            if let Some(key) = key {
                write_string(key.as_bytes(), sink)?;
                sink.write(b" : ")?;
            }

            let nested = match value {
                Value::Document(doc) => Level::document(doc, true),
                Value::Array(array) => Level::array(array),
                scalar => {
                    write_scalar(scalar, sink)?;
                    continue;
                }
            };
            // Depth of the nested container; the root sits at 0
            let depth = levels.len();
            if depth >= self.max_depth {
                log::warn!("Eliding container at depth {}", depth);
                sink.write(ELISION_MARKER.as_bytes())?;
            } else if nested.entries.is_empty() {
                sink.write(nested.bracket.empty())?;
            } else {
                sink.write(nested.bracket.open())?;
                levels.push(nested);
            }
        }
        Ok(())
    }
}

/// Encodes `document` with a [`JsonEncoder`] that never aborts.
pub fn encode<W: Writer>(document: &Document, sink: W, emit_keys: bool) -> Result<(), W::Error> {
    JsonEncoder::new().encode(document, sink, emit_keys)
}

pub fn encode_array<W: Writer>(array: &Array, sink: W) -> Result<(), W::Error> {
    JsonEncoder::new().encode_array(array, sink)
}

pub fn encode_container<W: Writer>(container: &Container, sink: W) -> Result<(), W::Error> {
    JsonEncoder::new().encode_container(container, sink)
}

/// Encodes `container` into a fresh buffer.
pub fn to_json_vec(container: &Container) -> Result<Vec<u8>, core::convert::Infallible> {
    let mut out = Vec::new();
    encode_container(container, &mut out)?;
    Ok(out)
}

fn write_scalar<W: Writer>(value: &Value, sink: &mut W) -> Result<(), W::Error> {
    match value {
        Value::Double(d) if d.is_finite() => write_fmt(sink, format_args!("{:.6}", d))?,
        Value::Double(d) => {
            log::warn!("Rendering non-finite double {} as null", d);
            sink.write(b"null")?
        }
        Value::String(bytes) | Value::Code(bytes) | Value::Symbol(bytes) => {
            write_string(bytes, sink)?
        }
        Value::CodeWithScope(cws) => write_string(&cws.code, sink)?,
        Value::Int32(n) => write_fmt(sink, format_args!("{}", n))?,
        Value::Int64(n) => write_fmt(sink, format_args!("{}", n))?,
        Value::Boolean(true) => sink.write(b"true")?,
        Value::Boolean(false) => sink.write(b"false")?,
        Value::Null => sink.write(b"null")?,
        Value::Undefined => sink.write(br#"{ "$undefined" : true }"#)?,
        Value::ObjectId(oid) => {
            sink.write(br#"{ "$oid" : ""#)?;
            sink.write(&oid.to_hex())?;
            sink.write(br#"" }"#)?;
        }
        Value::Binary(binary) => {
            write_fmt(sink, format_args!(r#"{{ "$type" : "{:02x}", "$binary" : ""#, binary.subtype))?;
            write_base64(&binary.bytes, sink)?;
            sink.write(br#"" }"#)?;
        }
        Value::DateTime(ms) => write_fmt(sink, format_args!(r#"{{ "$date" : {} }}"#, ms))?,
        Value::Regex(regex) => {
            sink.write(br#"{ "$regex" : "#)?;
            write_string(regex.pattern.as_bytes(), sink)?;
            sink.write(br#", "$options" : "#)?;
            write_string(regex.options.as_bytes(), sink)?;
            sink.write(b" }")?;
        }
        Value::Timestamp(ts) => write_fmt(
            sink,
            format_args!(r#"{{ "$timestamp" : {{ "t": {}, "i": {} }} }}"#, ts.t, ts.i),
        )?,
        Value::DbPointer(pointer) => {
            sink.write(br#"{ "$ref" : "#)?;
            write_string(pointer.collection.as_bytes(), sink)?;
            if let Some(oid) = &pointer.oid {
                sink.write(br#", "$id" : ""#)?;
                sink.write(&oid.to_hex())?;
                sink.write(b"\"")?;
            }
            sink.write(b" }")?;
        }
        Value::MinKey => sink.write(br#"{ "$minKey" : 1 }"#)?,
        Value::MaxKey => sink.write(br#"{ "$maxKey" : 1 }"#)?,
        Value::Document(_) | Value::Array(_) => {
            return Err(EncodeError::UnexpectedState("Container passed as scalar"))
        }
    }
    Ok(())
}

/// Writes `bytes` as a quoted JSON string.
fn write_string<W: Writer>(bytes: &[u8], sink: &mut W) -> Result<(), W::Error> {
    sink.write(b"\"")?;
    encode_json_string(bytes, sink)?;
    sink.write(b"\"")?;
    Ok(())
}

/// Base64 in fixed blocks; only the final block can carry padding.
fn write_base64<W: Writer>(bytes: &[u8], sink: &mut W) -> Result<(), W::Error> {
    let mut out = [0u8; BASE64_BLOCK / 3 * 4];
    for block in bytes.chunks(BASE64_BLOCK) {
        let Ok(written) = base64::engine::general_purpose::STANDARD.encode_slice(block, &mut out)
        else {
            return Err(EncodeError::UnexpectedState("Base64 block overflow"));
        };
        let Some(encoded) = out.get(..written) else {
            return Err(EncodeError::UnexpectedState("Base64 block overflow"));
        };
        sink.write(encoded)?;
    }
    Ok(())
}

/// Routes `core::fmt` output straight into a [`Writer`].
struct FmtSink<'s, W: Writer> {
    sink: &'s mut W,
    error: Option<W::Error>,
}

impl<W: Writer> fmt::Write for FmtSink<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.sink.write(s.as_bytes()) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.error = Some(e);
                Err(fmt::Error)
            }
        }
    }
}

fn write_fmt<W: Writer>(sink: &mut W, args: fmt::Arguments<'_>) -> Result<(), W::Error> {
    let mut adapter = FmtSink { sink, error: None };
    if fmt::Write::write_fmt(&mut adapter, args).is_err() {
        return Err(match adapter.error {
            Some(e) => EncodeError::Sink(e),
            None => EncodeError::UnexpectedState("Formatter failed"),
        });
    }
    Ok(())
}
