// SPDX-License-Identifier: Apache-2.0

//! Chunked JSON to document decoding.
//!
//! [`PushDecoder`] accepts input in arbitrary slices and yields the root
//! [`Container`] once the stream ends. [`decode_from_reader`] drives it from a
//! pull-style [`Reader`].

use crate::abort::{AbortSignal, NeverAbort};
use crate::builder::Builder;
use crate::chunk_reader::{ChunkReader, Reader, READ_CHUNK_SIZE};
use crate::document::Container;
use crate::parse_error::DecodeError;
use crate::tokenizer::{Event, Tokenizer};

/// A push decoder that turns JSON text into a document tree.
///
/// Chunk boundaries may fall anywhere, including inside strings, escapes and
/// numbers. After the first error the decoder is poisoned: every further call
/// returns that same error.
///
/// ```rust
/// use bsonjson::{PushDecoder, Value};
///
/// let mut decoder = PushDecoder::new();
/// decoder.write(br#"{"a": [1, "#).unwrap();
/// decoder.write(br#"2]}"#).unwrap();
/// let root = decoder.finish().unwrap();
/// let doc = root.as_document().unwrap();
/// assert_eq!(doc.get("a").and_then(Value::as_array).map(|a| a.len()), Some(2));
/// ```
pub struct PushDecoder<A: AbortSignal = NeverAbort> {
    tokenizer: Tokenizer,
    builder: Builder,
    abort: A,
    error: Option<DecodeError>,
}

impl Default for PushDecoder<NeverAbort> {
    fn default() -> Self {
        Self::new()
    }
}

impl PushDecoder<NeverAbort> {
    pub fn new() -> Self {
        Self::with_abort(NeverAbort)
    }
}

impl<A: AbortSignal> PushDecoder<A> {
    /// Creates a decoder that checks `abort` before consuming each chunk.
    pub fn with_abort(abort: A) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            builder: Builder::new(),
            abort,
            error: None,
        }
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.builder.depth()
    }

    /// Processes a chunk of input data.
    pub fn write(&mut self, data: &[u8]) -> Result<(), DecodeError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.abort.is_aborted() {
            return self.poison(DecodeError::Aborted);
        }

        let builder = &mut self.builder;
        let mut callback = |event: Event<'_>, _pos: usize| -> Result<(), DecodeError> {
            builder.handle_event(event)
        };
        match self.tokenizer.parse_chunk(data, &mut callback) {
            Ok(consumed) => {
                log::trace!("Consumed {} bytes, depth {}", consumed, self.builder.depth());
                Ok(())
            }
            Err(err) => self.poison(err),
        }
    }

    /// Signals end of input and returns the finished root container.
    pub fn finish(mut self) -> Result<Container, DecodeError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.abort.is_aborted() {
            return Err(DecodeError::Aborted);
        }

        let builder = &mut self.builder;
        let mut callback = |event: Event<'_>, _pos: usize| -> Result<(), DecodeError> {
            builder.handle_event(event)
        };
        let consumed = self.tokenizer.finish(&mut callback)?;

        if self.builder.depth() != 0 {
            return Err(DecodeError::IncompleteInput);
        }
        let root = self.builder.take_result().ok_or(DecodeError::IncompleteInput)?;
        log::debug!("Decoded root container from {} bytes", consumed);
        Ok(root)
    }

    fn poison(&mut self, err: DecodeError) -> Result<(), DecodeError> {
        log::warn!("Decode failed: {}", err);
        self.builder.reset();
        self.error = Some(err.clone());
        Err(err)
    }
}

/// Decodes a complete in-memory JSON text.
pub fn decode_slice(data: &[u8]) -> Result<Container, DecodeError> {
    decode_from_reader(ChunkReader::full_slice(data))
}

/// Pulls `reader` dry in [`READ_CHUNK_SIZE`] chunks and decodes the result.
pub fn decode_from_reader<R: Reader>(reader: R) -> Result<Container, DecodeError> {
    decode_from_reader_with_abort(reader, NeverAbort)
}

/// Like [`decode_from_reader`], polling `abort` between chunks.
pub fn decode_from_reader_with_abort<R: Reader, A: AbortSignal>(
    mut reader: R,
    abort: A,
) -> Result<Container, DecodeError> {
    let mut decoder = PushDecoder::with_abort(abort);
    let mut buf = [0u8; READ_CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(n) => n,
            Err(_) => {
                log::warn!("Reader failed after {} bytes", decoder.tokenizer.consumed());
                return Err(DecodeError::ReaderError);
            }
        };
        let Some(chunk) = buf.get(..n) else {
            return Err(DecodeError::UnexpectedState("Reader returned more than buffer length"));
        };
        if chunk.is_empty() {
            break;
        }
        decoder.write(chunk)?;
    }
    decoder.finish()
}
