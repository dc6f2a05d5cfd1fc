// SPDX-License-Identifier: Apache-2.0

//! Streaming conversion between a typed, BSON-style document tree and JSON text.
//!
//! Decoding is push-driven: bytes go through a byte-at-a-time tokenizer whose
//! events drive a builder holding an explicit, depth-bounded stack of open
//! containers. Encoding walks a [`Document`] with an explicit worklist and
//! writes straight into a [`Writer`], never buffering the whole output.
//!
//! ```rust
//! use bsonjson::{decode_slice, to_json_vec};
//!
//! let root = decode_slice(br#"{"a": 1, "b": true, "c": null}"#).unwrap();
//! let json = to_json_vec(&root).unwrap();
//! assert_eq!(json, br#"{ "a" : 1, "b" : true, "c" : null }"#);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod abort;
pub use abort::{AbortSignal, NeverAbort};

mod builder;
pub use builder::Builder;

mod chunk_reader;
#[cfg(feature = "std")]
pub use chunk_reader::IoReader;
pub use chunk_reader::{ChunkReader, Reader, READ_CHUNK_SIZE};

mod document;
pub use document::{
    Array, Binary, CodeWithScope, Container, DbPointer, Document, ObjectId, Regex, Timestamp,
    Value,
};

mod encoder;
pub use encoder::{
    encode, encode_array, encode_container, to_json_vec, JsonEncoder, ELISION_MARKER,
};

mod escape_processor;
pub use escape_processor::{decode_json_string, encode_json_string, EscapeProcessor};

mod parse_error;
pub use parse_error::{DecodeError, EncodeError};

mod push_decoder;
pub use push_decoder::{
    decode_from_reader, decode_from_reader_with_abort, decode_slice, PushDecoder,
};

pub mod tokenizer;
pub use tokenizer::MAX_NESTING_DEPTH;

mod writer;
#[cfg(feature = "std")]
pub use writer::IoWriter;
pub use writer::{Writer, CONTENT_TYPE_JSON};
