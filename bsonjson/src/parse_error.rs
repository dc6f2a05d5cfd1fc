// SPDX-License-Identifier: Apache-2.0

use crate::tokenizer::{self, ErrKind};

/// Errors that can occur while decoding JSON into a document.
///
/// Any of these aborts the whole decode; no partial document is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The tokenizer rejected the input. The inner error carries the kind,
    /// offending byte and absolute position.
    ParseSyntaxError(tokenizer::Error),
    /// More than [`crate::MAX_NESTING_DEPTH`] containers were open at once.
    NestingTooDeep,
    /// Input ended with containers still open, or without any root at all.
    IncompleteInput,
    /// The root value is not an object or an array.
    InvalidRoot,
    /// An integer literal does not fit into 64 bits.
    IntegerOverflow,
    /// A string contains an invalid or truncated escape sequence.
    MalformedEscape,
    /// A number literal with fraction or exponent could not be parsed.
    InvalidNumber,
    /// A decoded object key is not valid UTF-8.
    InvalidUtf8(core::str::Utf8Error),
    /// The pull reader reported an error.
    ReaderError,
    /// The abort signal fired.
    Aborted,
    /// The decoder entered an unexpected internal state.
    UnexpectedState(&'static str),
}

impl From<tokenizer::Error> for DecodeError {
    fn from(err: tokenizer::Error) -> Self {
        match err.kind() {
            ErrKind::EmptyStream | ErrKind::UnfinishedStream => DecodeError::IncompleteInput,
            ErrKind::MaxDepthReached => DecodeError::NestingTooDeep,
            ErrKind::InvalidRoot => DecodeError::InvalidRoot,
            _ => DecodeError::ParseSyntaxError(err),
        }
    }
}

impl From<core::str::Utf8Error> for DecodeError {
    fn from(err: core::str::Utf8Error) -> Self {
        DecodeError::InvalidUtf8(err)
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::ParseSyntaxError(e) => write!(f, "syntax error: {e}"),
            DecodeError::InvalidUtf8(e) => write!(f, "invalid UTF-8 in key: {e}"),
            DecodeError::UnexpectedState(msg) => write!(f, "unexpected state: {msg}"),
            _ => write!(f, "{self:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Errors that can occur while encoding a document.
#[derive(Debug, PartialEq)]
pub enum EncodeError<E> {
    /// The sink rejected a write.
    Sink(E),
    /// The abort signal fired. Output written so far is not rolled back.
    Aborted,
    /// The encoder entered an unexpected internal state.
    UnexpectedState(&'static str),
}

impl<E> From<E> for EncodeError<E> {
    fn from(e: E) -> Self {
        EncodeError::Sink(e)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for EncodeError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::Sink(e) => write!(f, "sink error: {e:?}"),
            EncodeError::Aborted => write!(f, "aborted"),
            EncodeError::UnexpectedState(msg) => write!(f, "unexpected state: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for EncodeError<E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_tokenizer_error_mapping() {
        let unfinished =
            tokenizer::Error::new::<()>(ErrKind::UnfinishedStream, b' ', 4).unwrap_err();
        assert_eq!(DecodeError::from(unfinished), DecodeError::IncompleteInput);

        let depth =
            tokenizer::Error::new::<()>(ErrKind::MaxDepthReached, b'[', 1024).unwrap_err();
        assert_eq!(DecodeError::from(depth), DecodeError::NestingTooDeep);

        let comma = tokenizer::Error::new::<()>(ErrKind::TrailingComma, b',', 3).unwrap_err();
        match DecodeError::from(comma) {
            DecodeError::ParseSyntaxError(e) => {
                assert_eq!(e.kind(), ErrKind::TrailingComma);
                assert_eq!(e.position(), 3);
            }
            other => panic!("Expected ParseSyntaxError, got {other:?}"),
        }
    }

    #[test]
    fn test_utf8_error_conversion() {
        // Lone continuation byte, built at runtime to keep the literal valid
        let mut invalid = [0u8; 1];
        invalid[0] = 0b1000_0000;
        match core::str::from_utf8(&invalid) {
            Err(utf8_error) => {
                assert!(matches!(
                    DecodeError::from(utf8_error),
                    DecodeError::InvalidUtf8(_)
                ));
            }
            Ok(_) => panic!("Expected UTF-8 validation to fail"),
        }
    }

    #[test]
    fn test_display() {
        let err = tokenizer::Error::new::<()>(ErrKind::ExpectedColon, b'x', 7).unwrap_err();
        let text = alloc::format!("{}", DecodeError::ParseSyntaxError(err));
        assert_eq!(text, "syntax error: ExpectedColon(x) at 7");
        assert_eq!(alloc::format!("{}", EncodeError::<()>::Aborted), "aborted");
    }
}
