// SPDX-License-Identifier: Apache-2.0

//! Builds a [`Container`] from tokenizer events.
//!
//! Open objects and arrays live on an explicit stack of [`Frame`]s rather than on
//! the call stack, so nesting depth is a plain length check against the bound.

use alloc::string::String;
use alloc::vec::Vec;

use crate::document::{Array, Container, Document, Value};
use crate::escape_processor::decode_json_string;
use crate::parse_error::DecodeError;
use crate::tokenizer::{ContainerKind, Event, ScalarKind, MAX_NESTING_DEPTH};

/// The container under construction in a frame.
#[derive(Debug)]
enum Body {
    Document(Document),
    Array(Array),
}

/// One open object or array.
#[derive(Debug)]
struct Frame {
    body: Body,
    /// Key announced for the next value (object frames only)
    pending_key: Option<String>,
    /// Position of the next element (array frames only). Arrays are
    /// positional, so this only feeds diagnostics
    next_index: usize,
    /// Key under which this frame is installed in an object parent
    install_key: Option<String>,
}

impl Frame {
    fn new(kind: ContainerKind, install_key: Option<String>) -> Self {
        let body = match kind {
            ContainerKind::Object => Body::Document(Document::new()),
            ContainerKind::Array => Body::Array(Array::new()),
        };
        Self {
            body,
            pending_key: None,
            next_index: 0,
            install_key,
        }
    }

    fn kind(&self) -> ContainerKind {
        match self.body {
            Body::Document(_) => ContainerKind::Object,
            Body::Array(_) => ContainerKind::Array,
        }
    }

    /// Appends `value` under the pending key or the next array position.
    fn install(&mut self, key: Option<String>, value: Value) -> Result<(), DecodeError> {
        match &mut self.body {
            Body::Document(doc) => {
                let key = key.ok_or(DecodeError::UnexpectedState("Object value without key"))?;
                doc.append(key, value);
            }
            Body::Array(array) => {
                array.push(value);
                self.next_index += 1;
            }
        }
        Ok(())
    }

    fn into_container(self) -> Container {
        match self.body {
            Body::Document(doc) => Container::Document(doc),
            Body::Array(array) => Container::Array(array),
        }
    }
}

/// State machine turning tokenizer events into a document tree.
#[derive(Debug)]
pub struct Builder {
    frames: Vec<Frame>,
    max_depth: usize,
    result: Option<Container>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_NESTING_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
            result: None,
        }
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True once the root container has been closed.
    pub fn is_complete(&self) -> bool {
        self.frames.is_empty() && self.result.is_some()
    }

    pub fn take_result(&mut self) -> Option<Container> {
        self.result.take()
    }

    /// Discards all frames and any finished result.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.result = None;
    }

    pub fn handle_event(&mut self, event: Event<'_>) -> Result<(), DecodeError> {
        match event {
            Event::ContainerOpen(kind) => self.open(kind),
            Event::Key(raw) => self.key(raw),
            Event::ContainerClose(kind) => self.close(kind),
            Event::Scalar(kind, raw) => self.scalar(kind, raw),
        }
    }

    fn open(&mut self, kind: ContainerKind) -> Result<(), DecodeError> {
        if self.frames.len() >= self.max_depth {
            return Err(DecodeError::NestingTooDeep);
        }
        if self.result.is_some() {
            return Err(DecodeError::InvalidRoot);
        }
        let install_key = match self.frames.last_mut() {
            Some(parent) => parent.pending_key.take(),
            None => None,
        };
        log::trace!("Open {:?} at depth {}", kind, self.frames.len());
        self.frames.push(Frame::new(kind, install_key));
        Ok(())
    }

    fn key(&mut self, raw: &[u8]) -> Result<(), DecodeError> {
        let frame = self
            .frames
            .last_mut()
            .ok_or(DecodeError::UnexpectedState("Key outside of an object"))?;
        if frame.kind() != ContainerKind::Object {
            return Err(DecodeError::UnexpectedState("Key inside an array"));
        }
        let key = String::from_utf8(decode_json_string(raw)?).map_err(|e| e.utf8_error())?;
        frame.pending_key = Some(key);
        Ok(())
    }

    fn close(&mut self, kind: ContainerKind) -> Result<(), DecodeError> {
        let frame = self
            .frames
            .pop()
            .ok_or(DecodeError::UnexpectedState("Close without open container"))?;
        if frame.kind() != kind {
            return Err(DecodeError::UnexpectedState("Close does not match open container"));
        }
        log::trace!("Close {:?} at depth {}", kind, self.frames.len());
        let install_key = frame.install_key.clone();
        let container = frame.into_container();
        match self.frames.last_mut() {
            Some(parent) => parent.install(install_key, container.into_value()),
            None => {
                self.result = Some(container);
                Ok(())
            }
        }
    }

    fn scalar(&mut self, kind: ScalarKind, raw: &[u8]) -> Result<(), DecodeError> {
        let frame = self.frames.last_mut().ok_or(DecodeError::InvalidRoot)?;
        let value = match kind {
            ScalarKind::Bool(b) => Value::Boolean(b),
            ScalarKind::Null => Value::Null,
            ScalarKind::Integer => Value::Int64(parse_integer(raw)?),
            ScalarKind::Float => Value::Double(parse_float(raw)?),
            ScalarKind::String => Value::String(decode_json_string(raw)?),
        };
        log::trace!("Scalar {} at index {}", value.kind_name(), frame.next_index);
        let key = frame.pending_key.take();
        frame.install(key, value)
    }
}

/// Parses the whole literal straight into an `i64`.
fn parse_integer(raw: &[u8]) -> Result<i64, DecodeError> {
    let text = core::str::from_utf8(raw)?;
    text.parse::<i64>().map_err(|_| DecodeError::IntegerOverflow)
}

fn parse_float(raw: &[u8]) -> Result<f64, DecodeError> {
    let text = core::str::from_utf8(raw)?;
    text.parse::<f64>().map_err(|_| DecodeError::InvalidNumber)
}
