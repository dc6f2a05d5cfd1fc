// SPDX-License-Identifier: Apache-2.0

//! Byte-at-a-time JSON tokenizer.
//!
//! The tokenizer validates JSON syntax incrementally and raises structural
//! events through a callback as soon as they are recognized. Input may be fed in
//! arbitrarily small chunks; the only buffered state is the raw text of the
//! key, string or number currently being scanned.

use alloc::vec::Vec;

/// Maximum number of simultaneously open objects and arrays.
pub const MAX_NESTING_DEPTH: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Object,
    Array,
}

/// Kind of a completed scalar token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool(bool),
    Null,
    /// A number without fraction or exponent.
    Integer,
    /// A number with a fraction or an exponent.
    Float,
    String,
}

/// Structural events raised while tokenizing.
///
/// Raw text for keys and strings starts with the opening quote and excludes
/// the closing one; escapes are left as written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    ContainerOpen(ContainerKind),
    ContainerClose(ContainerKind),
    Key(&'a [u8]),
    Scalar(ScalarKind, &'a [u8]),
}

#[derive(Debug, Clone)]
struct ParseContext {
    /// Open containers, innermost last
    stack: Vec<ContainerKind>,
    max_depth: usize,
    /// Keeps track of the last comma and its position
    after_comma: Option<(u8, usize)>,
}

impl ParseContext {
    fn new(max_depth: usize) -> Self {
        ParseContext {
            stack: Vec::new(),
            max_depth,
            after_comma: None,
        }
    }
    fn depth(&self) -> usize {
        self.stack.len()
    }
    fn enter(&mut self, kind: ContainerKind, data: u8, pos: usize) -> Result<(), Error> {
        if self.stack.len() >= self.max_depth {
            return Error::new(ErrKind::MaxDepthReached, data, pos);
        }
        self.stack.push(kind);
        Ok(())
    }
    fn exit(&mut self, kind: ContainerKind, data: u8, pos: usize) -> Result<(), Error> {
        if self.stack.last() != Some(&kind) {
            let err = match kind {
                ContainerKind::Object => ErrKind::UnopenedObject,
                ContainerKind::Array => ErrKind::UnopenedArray,
            };
            return Error::new(err, data, pos);
        }
        self.stack.pop();
        Ok(())
    }
    fn top(&self) -> Option<ContainerKind> {
        self.stack.last().copied()
    }
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    String { state: Str, key: bool },
    Number { state: Num },
    Token { token: TokenProgress },
    Object { expect: Object },
    Array { expect: Array },
    Finished,
}

#[derive(Debug, Clone)]
enum Str {
    Normal,
    Escaping,
    Unicode0, // Just tracks number of hex digits seen (0-3)
    Unicode1,
    Unicode2,
    Unicode3,
}

#[derive(Debug, Clone)]
enum Num {
    Sign,
    LeadingZero,
    BeforeDecimalPoint,
    Decimal,
    AfterDecimalPoint,
    Exponent,
    ExponentSign,
    AfterExponent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenType {
    True,
    False,
    Null,
}

#[derive(Debug, Clone, Copy)]
struct TokenProgress {
    token_type: TokenType,
    position: usize, // Current position in token string
}

#[derive(Debug, Clone, PartialEq)]
enum Object {
    Key,
    Colon,
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, PartialEq)]
enum Array {
    ItemOrEnd,
    CommaOrEnd,
}

impl TokenType {
    const fn as_str(&self) -> &'static [u8] {
        match self {
            TokenType::True => b"true",
            TokenType::False => b"false",
            TokenType::Null => b"null",
        }
    }

    const fn as_scalar_kind(&self) -> ScalarKind {
        match self {
            TokenType::True => ScalarKind::Bool(true),
            TokenType::False => ScalarKind::Bool(false),
            TokenType::Null => ScalarKind::Null,
        }
    }
}

/// Outcome of feeding one byte to a literal token.
enum TokenStep {
    Continue(TokenProgress),
    Complete(TokenType),
    Mismatch,
}

const fn process_token_char(progress: &TokenProgress, ch: u8) -> TokenStep {
    let token_string = progress.token_type.as_str();
    if progress.position < token_string.len() && ch == token_string[progress.position] {
        let position = progress.position + 1;
        if position == token_string.len() {
            TokenStep::Complete(progress.token_type)
        } else {
            TokenStep::Continue(TokenProgress {
                token_type: progress.token_type,
                position,
            })
        }
    } else {
        TokenStep::Mismatch
    }
}

/// A syntax error: what went wrong, on which byte, at which absolute offset.
#[derive(Clone, PartialEq)]
pub struct Error {
    kind: ErrKind,
    character: u8,
    position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    EmptyStream,
    UnfinishedStream,
    UnterminatedString,
    InvalidRoot,
    InvalidToken,
    UnescapedControlCharacter,
    TrailingComma,
    ContentEnded,
    UnopenedArray,
    UnopenedObject,
    MaxDepthReached,
    InvalidNumber,
    InvalidUnicodeEscape,
    InvalidStringEscape,
    ExpectedObjectKey,
    ExpectedObjectValue,
    ExpectedColon,
    ExpectedCommaOrEnd,
    ExpectedArrayItem,
}

fn fail<T, E: From<Error>>(kind: ErrKind, character: u8, position: usize) -> Result<T, E> {
    Err(E::from(Error {
        kind,
        character,
        position,
    }))
}

impl Error {
    pub fn new<T>(kind: ErrKind, character: u8, position: usize) -> Result<T, Self> {
        Err(Self {
            kind,
            character,
            position,
        })
    }

    pub fn kind(&self) -> ErrKind {
        self.kind
    }

    /// The byte the tokenizer rejected, or a space when input ended early.
    pub fn character(&self) -> u8 {
        self.character
    }

    /// Absolute offset from the start of the input.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?}({}) at {}",
            self.kind, self.character as char, self.position
        )
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// Streaming JSON tokenizer.
pub struct Tokenizer {
    state: State,
    total_consumed: usize,
    context: ParseContext,
    /// Raw text of the key, string or number being scanned
    token: Vec<u8>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_NESTING_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Tokenizer {
            state: State::Idle,
            total_consumed: 0,
            context: ParseContext::new(max_depth),
            token: Vec::new(),
        }
    }

    /// Number of currently open containers.
    pub fn depth(&self) -> usize {
        self.context.depth()
    }

    /// Total number of bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.total_consumed
    }

    /// Signals end of input. A number at the very end of the input is
    /// completed here since no delimiter will follow it.
    pub fn finish<F, E>(&mut self, callback: &mut F) -> Result<usize, E>
    where
        F: FnMut(Event<'_>, usize) -> Result<(), E> + ?Sized,
        E: From<Error>,
    {
        let end = self.total_consumed;
        if let State::String { .. } = self.state {
            return fail(ErrKind::UnterminatedString, b' ', end);
        }
        if self.context.depth() != 0 {
            return fail(ErrKind::UnfinishedStream, b' ', end);
        }
        if end == 0 {
            return fail(ErrKind::EmptyStream, b' ', end);
        }

        match &self.state {
            State::Finished => Ok(end),
            State::Number {
                state:
                    Num::LeadingZero
                    | Num::BeforeDecimalPoint
                    | Num::AfterDecimalPoint
                    | Num::AfterExponent,
            } => {
                callback(Event::Scalar(self.number_kind(), &self.token), end)?;
                self.state = State::Finished;
                Ok(end)
            }
            _ => fail(ErrKind::UnfinishedStream, b' ', end),
        }
    }

    /// Feeds a chunk of input. Events fire synchronously, in input order, with
    /// the absolute position of the byte that completed them.
    pub fn parse_chunk<F, E>(&mut self, data: &[u8], callback: &mut F) -> Result<usize, E>
    where
        F: FnMut(Event<'_>, usize) -> Result<(), E> + ?Sized,
        E: From<Error>,
    {
        for &current_byte in data {
            let pos = self.total_consumed;
            self.step(current_byte, pos, callback)?;
            self.total_consumed = self.total_consumed.wrapping_add(1);
        }
        Ok(self.total_consumed)
    }

    fn number_kind(&self) -> ScalarKind {
        if self.token.iter().any(|b| matches!(b, b'.' | b'e' | b'E')) {
            ScalarKind::Float
        } else {
            ScalarKind::Integer
        }
    }

    fn maybe_exit_level(&self) -> State {
        match self.context.top() {
            Some(ContainerKind::Object) => State::Object {
                expect: Object::CommaOrEnd,
            },
            Some(ContainerKind::Array) => State::Array {
                expect: Array::CommaOrEnd,
            },
            None => State::Finished,
        }
    }

    fn saw_a_comma_now_what(&mut self, data: u8, pos: usize) -> Result<State, Error> {
        self.context.after_comma = Some((data, pos));
        match self.context.top() {
            Some(ContainerKind::Object) => Ok(State::Object {
                expect: Object::Key,
            }),
            Some(ContainerKind::Array) => Ok(State::Array {
                expect: Array::ItemOrEnd,
            }),
            None => Error::new(ErrKind::ContentEnded, data, pos),
        }
    }

    fn check_trailing_comma(&mut self, data: u8) -> Result<(), Error> {
        // Check for trailing comma if we're at a closing bracket/brace
        if let Some((c, pos)) = self.context.after_comma {
            if data == b']' || data == b'}' {
                return Error::new(ErrKind::TrailingComma, c, pos);
            }
        }

        // Only reset after_comma for non-whitespace characters
        if !matches!(data, b' ' | b'\t' | b'\n' | b'\r') {
            self.context.after_comma = None;
        }
        Ok(())
    }

    fn start_token(token: u8, pos: usize) -> Result<State, Error> {
        let token_type = match token {
            b't' => TokenType::True,
            b'f' => TokenType::False,
            b'n' => TokenType::Null,
            _ => return Error::new(ErrKind::InvalidToken, token, pos),
        };
        Ok(State::Token {
            token: TokenProgress {
                token_type,
                position: 1,
            },
        })
    }

    fn start_text(&mut self, first: u8) {
        self.token.clear();
        self.token.push(first);
    }

    fn open<F, E>(
        &mut self,
        kind: ContainerKind,
        data: u8,
        pos: usize,
        callback: &mut F,
    ) -> Result<State, E>
    where
        F: FnMut(Event<'_>, usize) -> Result<(), E> + ?Sized,
        E: From<Error>,
    {
        self.context.enter(kind, data, pos)?;
        callback(Event::ContainerOpen(kind), pos)?;
        Ok(match kind {
            ContainerKind::Object => State::Object {
                expect: Object::Key,
            },
            ContainerKind::Array => State::Array {
                expect: Array::ItemOrEnd,
            },
        })
    }

    fn close<F, E>(
        &mut self,
        kind: ContainerKind,
        data: u8,
        pos: usize,
        callback: &mut F,
    ) -> Result<State, E>
    where
        F: FnMut(Event<'_>, usize) -> Result<(), E> + ?Sized,
        E: From<Error>,
    {
        self.context.exit(kind, data, pos)?;
        callback(Event::ContainerClose(kind), pos)?;
        Ok(self.maybe_exit_level())
    }

    fn step<F, E>(&mut self, current_byte: u8, pos: usize, callback: &mut F) -> Result<(), E>
    where
        F: FnMut(Event<'_>, usize) -> Result<(), E> + ?Sized,
        E: From<Error>,
    {
        // Special case - this needs to be done for every Array match arm
        if let State::Array {
            expect: Array::ItemOrEnd,
        } = &self.state
        {
            self.check_trailing_comma(current_byte)?;
        }

        self.state = match (&self.state, current_byte) {
            (State::Number { state: Num::Sign }, b'0') => {
                self.token.push(current_byte);
                State::Number {
                    state: Num::LeadingZero,
                }
            }
            (State::Number { state: Num::Sign }, b'1'..=b'9') => {
                self.token.push(current_byte);
                State::Number {
                    state: Num::BeforeDecimalPoint,
                }
            }
            (
                State::Number {
                    state: Num::LeadingZero | Num::BeforeDecimalPoint | Num::AfterDecimalPoint,
                },
                b'e' | b'E',
            ) => {
                self.token.push(current_byte);
                State::Number {
                    state: Num::Exponent,
                }
            }
            (
                State::Number {
                    state: Num::LeadingZero | Num::BeforeDecimalPoint,
                },
                b'.',
            ) => {
                self.token.push(current_byte);
                State::Number {
                    state: Num::Decimal,
                }
            }
            (
                State::Number {
                    state: Num::BeforeDecimalPoint,
                },
                b'0'..=b'9',
            ) => {
                self.token.push(current_byte);
                State::Number {
                    state: Num::BeforeDecimalPoint,
                }
            }
            (
                State::Number {
                    state: Num::Decimal | Num::AfterDecimalPoint,
                },
                b'0'..=b'9',
            ) => {
                self.token.push(current_byte);
                State::Number {
                    state: Num::AfterDecimalPoint,
                }
            }
            (
                State::Number {
                    state: Num::Exponent,
                },
                b'+' | b'-',
            ) => {
                self.token.push(current_byte);
                State::Number {
                    state: Num::ExponentSign,
                }
            }
            (
                State::Number {
                    state: Num::Exponent | Num::ExponentSign | Num::AfterExponent,
                },
                b'0'..=b'9',
            ) => {
                self.token.push(current_byte);
                State::Number {
                    state: Num::AfterExponent,
                }
            }
            // A number must not end right after a sign, point or exponent marker
            (
                State::Number {
                    state: Num::Sign | Num::Decimal | Num::Exponent | Num::ExponentSign,
                },
                _,
            ) => {
                return fail(ErrKind::InvalidNumber, current_byte, pos);
            }
            (State::Number { state: _ }, b',') => {
                callback(Event::Scalar(self.number_kind(), &self.token), pos)?;
                self.saw_a_comma_now_what(current_byte, pos)?
            }
            (State::Number { state: _ }, b' ' | b'\t' | b'\n' | b'\r') => {
                callback(Event::Scalar(self.number_kind(), &self.token), pos)?;
                self.maybe_exit_level()
            }
            (State::Number { state: _ }, b']') => {
                callback(Event::Scalar(self.number_kind(), &self.token), pos)?;
                self.close(ContainerKind::Array, current_byte, pos, callback)?
            }
            (State::Number { state: _ }, b'}') => {
                callback(Event::Scalar(self.number_kind(), &self.token), pos)?;
                self.close(ContainerKind::Object, current_byte, pos, callback)?
            }
            (State::Number { state: _ }, _) => {
                return fail(ErrKind::InvalidNumber, current_byte, pos);
            }
            (
                State::String {
                    state: Str::Normal,
                    key,
                },
                b'"',
            ) => {
                if *key {
                    callback(Event::Key(&self.token), pos)?;
                    State::Object {
                        expect: Object::Colon,
                    }
                } else {
                    callback(Event::Scalar(ScalarKind::String, &self.token), pos)?;
                    self.maybe_exit_level()
                }
            }
            (
                State::String {
                    state: Str::Normal,
                    key,
                },
                b'\\',
            ) => {
                let key = *key;
                self.token.push(current_byte);
                State::String {
                    state: Str::Escaping,
                    key,
                }
            }
            (
                State::String {
                    state: Str::Normal,
                    key: _,
                },
                b'\x00'..=b'\x1F',
            ) => {
                return fail(
                    ErrKind::UnescapedControlCharacter,
                    current_byte,
                    pos,
                );
            }
            (
                State::String {
                    state: Str::Normal,
                    key,
                },
                _,
            ) => {
                let key = *key;
                self.token.push(current_byte);
                State::String {
                    state: Str::Normal,
                    key,
                }
            }
            (
                State::String {
                    state: Str::Escaping,
                    key,
                },
                b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't',
            ) => {
                let key = *key;
                self.token.push(current_byte);
                State::String {
                    state: Str::Normal,
                    key,
                }
            }
            (
                State::String {
                    state: Str::Escaping,
                    key,
                },
                b'u',
            ) => {
                let key = *key;
                self.token.push(current_byte);
                State::String {
                    state: Str::Unicode0,
                    key,
                }
            }
            (
                State::String {
                    state: Str::Escaping,
                    key: _,
                },
                _,
            ) => return fail(ErrKind::InvalidStringEscape, current_byte, pos),
            (
                State::String {
                    state:
                        hex_state @ (Str::Unicode0 | Str::Unicode1 | Str::Unicode2 | Str::Unicode3),
                    key,
                },
                b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F',
            ) => {
                let key = *key;
                let state = match hex_state {
                    Str::Unicode0 => Str::Unicode1,
                    Str::Unicode1 => Str::Unicode2,
                    Str::Unicode2 => Str::Unicode3,
                    _ => Str::Normal,
                };
                self.token.push(current_byte);
                State::String { state, key }
            }
            (State::String { state: _, key: _ }, _) => {
                return fail(
                    ErrKind::InvalidUnicodeEscape,
                    current_byte,
                    pos,
                );
            }
            (
                State::Idle
                | State::Object { expect: _ }
                | State::Array { expect: _ }
                | State::Finished,
                b' ' | b'\t' | b'\n' | b'\r',
            ) => self.state.clone(),
            (
                State::Idle
                | State::Object {
                    expect: Object::Value,
                }
                | State::Array {
                    expect: Array::ItemOrEnd,
                },
                b'[',
            ) => self.open(ContainerKind::Array, current_byte, pos, callback)?,
            (
                State::Idle
                | State::Object {
                    expect: Object::Value,
                }
                | State::Array {
                    expect: Array::ItemOrEnd,
                },
                b'{',
            ) => self.open(ContainerKind::Object, current_byte, pos, callback)?,
            (
                State::Idle
                | State::Object {
                    expect: Object::Value,
                }
                | State::Array {
                    expect: Array::ItemOrEnd,
                },
                b'"',
            ) => {
                self.start_text(current_byte);
                State::String {
                    state: Str::Normal,
                    key: false,
                }
            }
            (
                State::Idle
                | State::Object {
                    expect: Object::Value,
                }
                | State::Array {
                    expect: Array::ItemOrEnd,
                },
                b't' | b'f' | b'n',
            ) => Self::start_token(current_byte, pos)?,
            (
                State::Idle
                | State::Object {
                    expect: Object::Value,
                }
                | State::Array {
                    expect: Array::ItemOrEnd,
                },
                b'-' | b'0'..=b'9',
            ) => {
                self.start_text(current_byte);
                let state = match current_byte {
                    b'-' => Num::Sign,
                    b'0' => Num::LeadingZero,
                    _ => Num::BeforeDecimalPoint,
                };
                State::Number { state }
            }
            (
                State::Object {
                    expect: Object::Value,
                },
                _,
            ) => return fail(ErrKind::ExpectedObjectValue, current_byte, pos),
            (
                State::Array {
                    expect: Array::ItemOrEnd | Array::CommaOrEnd,
                },
                b']',
            ) => self.close(ContainerKind::Array, current_byte, pos, callback)?,
            (
                State::Object {
                    expect: Object::Key,
                },
                b'"',
            ) => {
                self.context.after_comma = None;
                self.start_text(current_byte);
                State::String {
                    state: Str::Normal,
                    key: true,
                }
            }
            (
                State::Object {
                    expect: Object::Key,
                },
                b'}',
            ) => {
                if let Some((comma_char, comma_pos)) = self.context.after_comma {
                    return fail(ErrKind::TrailingComma, comma_char, comma_pos);
                }
                self.close(ContainerKind::Object, current_byte, pos, callback)?
            }
            (
                State::Object {
                    expect: Object::Colon,
                },
                b':',
            ) => State::Object {
                expect: Object::Value,
            },
            (
                State::Object {
                    expect: Object::CommaOrEnd,
                }
                | State::Array {
                    expect: Array::CommaOrEnd,
                },
                b',',
            ) => self.saw_a_comma_now_what(current_byte, pos)?,
            (
                State::Object {
                    expect: Object::CommaOrEnd,
                },
                b'}',
            ) => self.close(ContainerKind::Object, current_byte, pos, callback)?,
            (State::Token { token }, _) => match process_token_char(token, current_byte) {
                TokenStep::Continue(progress) => State::Token { token: progress },
                TokenStep::Complete(token_type) => {
                    callback(
                        Event::Scalar(token_type.as_scalar_kind(), token_type.as_str()),
                        pos,
                    )?;
                    self.maybe_exit_level()
                }
                TokenStep::Mismatch => {
                    return fail(ErrKind::InvalidToken, current_byte, pos);
                }
            },

            // Wrong tokens
            (State::Idle, _) => return fail(ErrKind::InvalidRoot, current_byte, pos),
            (
                State::Object {
                    expect: Object::Key,
                },
                _,
            ) => return fail(ErrKind::ExpectedObjectKey, current_byte, pos),
            (
                State::Object {
                    expect: Object::Colon,
                },
                _,
            ) => return fail(ErrKind::ExpectedColon, current_byte, pos),
            (
                State::Object {
                    expect: Object::CommaOrEnd,
                },
                _,
            ) => return fail(ErrKind::ExpectedCommaOrEnd, current_byte, pos),
            (State::Array { expect: _ }, _) => {
                return fail(ErrKind::ExpectedArrayItem, current_byte, pos)
            }
            (State::Finished, _) => {
                return fail(ErrKind::ContentEnded, current_byte, pos)
            }
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use log::warn;
    use test_log::test;

    /// Owned copy of an event, for comparisons after the callback returns.
    #[derive(Debug, PartialEq)]
    enum Recorded {
        Open(ContainerKind),
        Close(ContainerKind),
        Key(String),
        Scalar(ScalarKind, String),
    }

    fn record(event: Event<'_>) -> Recorded {
        let text = |raw: &[u8]| String::from_utf8_lossy(raw).into_owned();
        match event {
            Event::ContainerOpen(kind) => Recorded::Open(kind),
            Event::ContainerClose(kind) => Recorded::Close(kind),
            Event::Key(raw) => Recorded::Key(text(raw)),
            Event::Scalar(kind, raw) => Recorded::Scalar(kind, text(raw)),
        }
    }

    fn collect_chunks(chunks: &[&[u8]]) -> Result<Vec<Recorded>, Error> {
        let mut tokenizer = Tokenizer::new();
        let mut events = Vec::new();
        let mut callback = |event: Event<'_>, _pos: usize| -> Result<(), Error> {
            warn!("Event: {:?}", event);
            events.push(record(event));
            Ok(())
        };
        for chunk in chunks {
            tokenizer.parse_chunk(chunk, &mut callback)?;
        }
        tokenizer.finish(&mut callback)?;
        Ok(events)
    }

    fn collect(data: &[u8]) -> Result<Vec<Recorded>, Error> {
        collect_chunks(&[data])
    }

    fn kind_of(data: &[u8]) -> ErrKind {
        collect(data).unwrap_err().kind()
    }

    #[test]
    fn test_zero_input() {
        assert_eq!(kind_of(b""), ErrKind::EmptyStream);
    }

    #[test]
    fn test_root_is_garbage() {
        let err = collect(b" a").unwrap_err();
        assert_eq!(err.kind(), ErrKind::InvalidRoot);
        assert_eq!(err.position(), 1);
        assert_eq!(err.character(), b'a');
    }

    #[test]
    fn test_object_with_scalars() {
        let events = collect(br#"{"a": 1, "b": true, "c": null, "d": "x\ny", "e": -2.5e3}"#);
        assert_eq!(
            events.unwrap(),
            [
                Recorded::Open(ContainerKind::Object),
                Recorded::Key("\"a".into()),
                Recorded::Scalar(ScalarKind::Integer, "1".into()),
                Recorded::Key("\"b".into()),
                Recorded::Scalar(ScalarKind::Bool(true), "true".into()),
                Recorded::Key("\"c".into()),
                Recorded::Scalar(ScalarKind::Null, "null".into()),
                Recorded::Key("\"d".into()),
                Recorded::Scalar(ScalarKind::String, "\"x\\ny".into()),
                Recorded::Key("\"e".into()),
                Recorded::Scalar(ScalarKind::Float, "-2.5e3".into()),
                Recorded::Close(ContainerKind::Object),
            ]
        );
    }

    #[test]
    fn test_numbers_closing_containers() {
        assert_eq!(
            collect(b"[1,[0.5]]").unwrap(),
            [
                Recorded::Open(ContainerKind::Array),
                Recorded::Scalar(ScalarKind::Integer, "1".into()),
                Recorded::Open(ContainerKind::Array),
                Recorded::Scalar(ScalarKind::Float, "0.5".into()),
                Recorded::Close(ContainerKind::Array),
                Recorded::Close(ContainerKind::Array),
            ]
        );
    }

    #[test]
    fn test_split_across_chunks_matches_single_chunk() {
        let json = br#"{"key": ["va\u00e9lue", 12345, false], "n": {}}"#;
        let whole = collect(json).unwrap();
        let bytewise: Vec<&[u8]> = json.chunks(1).collect();
        assert_eq!(collect_chunks(&bytewise).unwrap(), whole);
        let threes: Vec<&[u8]> = json.chunks(3).collect();
        assert_eq!(collect_chunks(&threes).unwrap(), whole);
    }

    #[test]
    fn test_root_number_completed_at_finish() {
        assert_eq!(
            collect(b"42").unwrap(),
            [Recorded::Scalar(ScalarKind::Integer, "42".into())]
        );
    }

    #[test]
    fn test_trailing_commas() {
        assert_eq!(kind_of(b"[1,]"), ErrKind::TrailingComma);
        assert_eq!(kind_of(br#"{"a":1,}"#), ErrKind::TrailingComma);
        // A comma earlier in the object must not leak into a nested empty object
        assert!(collect(br#"{"a":1,"b":{}}"#).is_ok());
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(kind_of(b"[01]"), ErrKind::InvalidNumber);
        assert_eq!(kind_of(b"[1.]"), ErrKind::InvalidNumber);
        assert_eq!(kind_of(b"[-]"), ErrKind::InvalidNumber);
        assert_eq!(kind_of(b"[1e+]"), ErrKind::InvalidNumber);
        assert_eq!(kind_of(b"[tru]"), ErrKind::InvalidToken);
        assert_eq!(kind_of(br#"{"a" 1}"#), ErrKind::ExpectedColon);
        assert_eq!(kind_of(b"{1:2}"), ErrKind::ExpectedObjectKey);
        assert_eq!(kind_of(br#"{"a":}"#), ErrKind::ExpectedObjectValue);
        assert_eq!(kind_of(br#"{"a":1 "b":2}"#), ErrKind::ExpectedCommaOrEnd);
        assert_eq!(kind_of(b"[1 2]"), ErrKind::ExpectedArrayItem);
        assert_eq!(kind_of(b"[1}"), ErrKind::UnopenedObject);
        assert_eq!(kind_of(b"{}]"), ErrKind::ContentEnded);
        assert_eq!(kind_of(b"[] x"), ErrKind::ContentEnded);
        assert_eq!(kind_of(b"[\"\\x\"]"), ErrKind::InvalidStringEscape);
        assert_eq!(kind_of(b"[\"\\u12z4\"]"), ErrKind::InvalidUnicodeEscape);
        assert_eq!(kind_of(b"[\"a\nb\"]"), ErrKind::UnescapedControlCharacter);
    }

    #[test]
    fn test_unfinished_input() {
        assert_eq!(kind_of(br#"{"a": [1, 2"#), ErrKind::UnfinishedStream);
        assert_eq!(kind_of(b"[\"abc"), ErrKind::UnterminatedString);
        assert_eq!(kind_of(b"   "), ErrKind::UnfinishedStream);
    }

    #[test]
    fn test_depth_limit() {
        let mut tokenizer = Tokenizer::with_max_depth(2);
        let mut callback = |_: Event<'_>, _: usize| -> Result<(), Error> { Ok(()) };
        let err = tokenizer
            .parse_chunk(b"[[[", &mut callback)
            .unwrap_err();
        assert_eq!(err.kind(), ErrKind::MaxDepthReached);
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_callback_error_stops_tokenizing() {
        let mut tokenizer = Tokenizer::new();
        let mut seen = 0;
        let result = tokenizer.parse_chunk(b"[1, 2, 3]", &mut |_: Event<'_>, _: usize| {
            seen += 1;
            if seen == 2 {
                Error::new(ErrKind::InvalidToken, b'!', 0)
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(seen, 2);
    }
}
