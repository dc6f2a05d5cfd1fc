// SPDX-License-Identifier: Apache-2.0

//! Conversion between JSON string-literal escape syntax and raw UTF-8 bytes.

use alloc::vec::Vec;

use crate::parse_error::DecodeError;
use crate::writer::Writer;

/// Shape of the raw UTF-8 sequence at some position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sequence {
    Complete(usize),
    /// Well-formed so far but runs past the end of input
    Truncated,
    /// Bad lead byte, or a trailing byte that is not a continuation
    Invalid,
}

/// Pure helpers for escape processing shared by the decoder and the encoder.
pub struct EscapeProcessor;

impl EscapeProcessor {
    /// Process a simple escape sequence character and return the unescaped byte.
    ///
    /// # Arguments
    /// * `escape_char` - The character following the backslash in an escape sequence
    ///
    /// # Returns
    /// The unescaped byte, or `None` for `u` and anything that is not a simple escape.
    pub const fn process_simple_escape(escape_char: u8) -> Option<u8> {
        match escape_char {
            b'n' => Some(b'\n'),
            b't' => Some(b'\t'),
            b'r' => Some(b'\r'),
            b'\\' => Some(b'\\'),
            b'"' => Some(b'"'),
            b'/' => Some(b'/'),
            b'b' => Some(0x08), // Backspace
            b'f' => Some(0x0C), // Form feed
            _ => None,
        }
    }

    /// The short escape for a byte that must not appear raw in a JSON string,
    /// if one exists.
    pub const fn short_escape(byte: u8) -> Option<&'static [u8]> {
        match byte {
            b'"' => Some(b"\\\""),
            b'\\' => Some(b"\\\\"),
            0x08 => Some(b"\\b"),
            0x0C => Some(b"\\f"),
            b'\n' => Some(b"\\n"),
            b'\r' => Some(b"\\r"),
            b'\t' => Some(b"\\t"),
            _ => None,
        }
    }

    pub const fn hex_digit_value(byte: u8) -> Option<u32> {
        match byte {
            b'0'..=b'9' => Some((byte - b'0') as u32),
            b'a'..=b'f' => Some((byte - b'a' + 10) as u32),
            b'A'..=b'F' => Some((byte - b'A' + 10) as u32),
            _ => None,
        }
    }

    /// Check if a Unicode codepoint is a high surrogate (0xD800-0xDBFF)
    pub const fn is_high_surrogate(codepoint: u32) -> bool {
        matches!(codepoint, 0xD800..=0xDBFF)
    }

    /// Check if a Unicode codepoint is a low surrogate (0xDC00-0xDFFF)
    pub const fn is_low_surrogate(codepoint: u32) -> bool {
        matches!(codepoint, 0xDC00..=0xDFFF)
    }

    /// Combine a high and low surrogate pair into a single Unicode codepoint
    pub const fn combine_surrogate_pair(high: u32, low: u32) -> u32 {
        0x10000 + ((high & 0x3FF) << 10) + (low & 0x3FF)
    }

    /// Length of the UTF-8 sequence introduced by `lead`, or 0 when `lead`
    /// cannot start a sequence.
    pub const fn utf8_sequence_len(lead: u8) -> usize {
        if lead & 0x80 == 0 {
            1
        } else if lead & 0xE0 == 0xC0 {
            2
        } else if lead & 0xF0 == 0xE0 {
            3
        } else if lead & 0xF8 == 0xF0 {
            4
        } else {
            0
        }
    }

    /// True for a `10xxxxxx` byte that continues a multi-byte sequence.
    pub const fn is_continuation(byte: u8) -> bool {
        byte & 0xC0 == 0x80
    }

    /// Classifies the raw UTF-8 sequence starting at `bytes[pos]`.
    ///
    /// Trailing bytes are checked before the length, so a lead byte followed
    /// by a non-continuation byte is `Invalid` even near the end of input.
    fn sequence_at(bytes: &[u8], pos: usize) -> Sequence {
        let Some(&lead) = bytes.get(pos) else {
            return Sequence::Truncated;
        };
        let len = Self::utf8_sequence_len(lead);
        if len == 0 {
            return Sequence::Invalid;
        }
        let end = (pos + len).min(bytes.len());
        let trailing = bytes.get(pos + 1..end).unwrap_or(&[]);
        if !trailing.iter().all(|&b| Self::is_continuation(b)) {
            return Sequence::Invalid;
        }
        if end < pos + len {
            Sequence::Truncated
        } else {
            Sequence::Complete(len)
        }
    }

    /// Reads the four hex digits of a `\uXXXX` escape starting at `at`.
    fn read_hex4(text: &[u8], at: usize) -> Result<u32, DecodeError> {
        let digits = text.get(at..at + 4).ok_or(DecodeError::MalformedEscape)?;
        let mut codepoint = 0u32;
        for &byte in digits {
            let digit = Self::hex_digit_value(byte).ok_or(DecodeError::MalformedEscape)?;
            codepoint = (codepoint << 4) | digit;
        }
        Ok(codepoint)
    }
}

/// Decodes the raw text of a JSON string literal into bytes.
///
/// One leading `"` is skipped if present. Unescaped bytes are copied verbatim.
/// A raw multi-byte UTF-8 sequence cut short by the end of `text` ends the
/// string silently; a `\u` escape cut short is a [`DecodeError::MalformedEscape`].
pub fn decode_json_string(text: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let text = text.strip_prefix(b"\"").unwrap_or(text);
    let mut out = Vec::with_capacity(text.len());
    let mut pos = 0;

    while let Some(&byte) = text.get(pos) {
        if byte != b'\\' {
            let len = match EscapeProcessor::sequence_at(text, pos) {
                Sequence::Complete(len) => len,
                Sequence::Invalid => 1,
                Sequence::Truncated => {
                    log::trace!("Truncated UTF-8 sequence at {pos}, dropping tail");
                    break;
                }
            };
            out.extend_from_slice(&text[pos..pos + len]);
            pos += len;
            continue;
        }

        let escape_char = *text.get(pos + 1).ok_or(DecodeError::MalformedEscape)?;
        if let Some(unescaped) = EscapeProcessor::process_simple_escape(escape_char) {
            out.push(unescaped);
            pos += 2;
            continue;
        }
        if escape_char != b'u' {
            return Err(DecodeError::MalformedEscape);
        }

        let mut codepoint = EscapeProcessor::read_hex4(text, pos + 2)?;
        pos += 6;
        if EscapeProcessor::is_high_surrogate(codepoint) {
            if text.get(pos..pos + 2) != Some(b"\\u".as_slice()) {
                return Err(DecodeError::MalformedEscape);
            }
            let low = EscapeProcessor::read_hex4(text, pos + 2)?;
            if !EscapeProcessor::is_low_surrogate(low) {
                return Err(DecodeError::MalformedEscape);
            }
            codepoint = EscapeProcessor::combine_surrogate_pair(codepoint, low);
            pos += 6;
        }

        // Lone low surrogates are rejected here
        let ch = char::from_u32(codepoint).ok_or(DecodeError::MalformedEscape)?;
        let mut utf8 = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    }

    Ok(out)
}

/// Writes `bytes` as the content of a JSON string literal, without the
/// surrounding quotes.
///
/// `"` and `\` get a preceding backslash, control characters below 0x20 use
/// their short escape or `\u00XX`. Everything else in a complete UTF-8
/// sequence passes through untouched. A byte that cannot start a sequence is
/// written as `\ufffd`, as is a lead byte whose trailing bytes are not all
/// continuation bytes; a sequence running past the end of `bytes` stops the
/// output.
pub fn encode_json_string<W: Writer + ?Sized>(
    bytes: &[u8],
    sink: &mut W,
) -> Result<(), W::Error> {
    let mut pos = 0;
    // Start of the pending run of bytes that need no escaping
    let mut run_start = 0;

    while let Some(&byte) = bytes.get(pos) {
        let len = match EscapeProcessor::sequence_at(bytes, pos) {
            Sequence::Complete(len) => len,
            Sequence::Truncated => break,
            Sequence::Invalid => {
                sink.write(&bytes[run_start..pos])?;
                sink.write(b"\\ufffd")?;
                pos += 1;
                run_start = pos;
                continue;
            }
        };
        if len == 1 {
            if let Some(escape) = EscapeProcessor::short_escape(byte) {
                sink.write(&bytes[run_start..pos])?;
                sink.write(escape)?;
                run_start = pos + 1;
            } else if byte < 0x20 {
                sink.write(&bytes[run_start..pos])?;
                sink.write(&control_escape(byte))?;
                run_start = pos + 1;
            }
        }
        pos += len;
    }

    sink.write(&bytes[run_start..pos])
}

fn control_escape(byte: u8) -> [u8; 6] {
    let mut out = *b"\\u0000";
    if hex::encode_to_slice([byte], &mut out[4..]).is_err() {
        log::warn!("Control escape buffer mismatch for {byte:#04x}");
    }
    out
}
