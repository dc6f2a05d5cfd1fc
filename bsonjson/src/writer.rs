// SPDX-License-Identifier: Apache-2.0

//! The push-style byte sink the encoder writes into.

use alloc::vec::Vec;

/// Media type announced before the first byte of encoder output.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A push-style byte sink.
///
/// The encoder calls [`Writer::announce_content_type`] exactly once, before any
/// call to [`Writer::write`]. Transports may use either call to trigger side
/// effects such as sending response headers; the encoder does not depend on them.
pub trait Writer {
    /// The error type returned by write operations
    type Error;

    /// Writes all of `data`.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Announces the media type of the bytes that follow. Defaults to a no-op.
    fn announce_content_type(&mut self, _content_type: &'static str) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    type Error = W::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(data)
    }

    fn announce_content_type(&mut self, content_type: &'static str) -> Result<(), Self::Error> {
        (**self).announce_content_type(content_type)
    }
}

impl Writer for Vec<u8> {
    type Error = core::convert::Infallible;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(data);
        Ok(())
    }
}

/// Adapts any [`std::io::Write`] into a [`Writer`].
///
/// The content type announcement is dropped; wrap the writer yourself if the
/// transport needs it.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoWriter<W> {
    inner: W,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> IoWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> Writer for IoWriter<W> {
    type Error = std::io::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_vec_writer_appends() {
        let mut out = Vec::new();
        out.write(b"{ ").unwrap();
        out.announce_content_type(CONTENT_TYPE_JSON).unwrap();
        out.write(b" }").unwrap();
        assert_eq!(out, b"{  }");
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_io_writer_forwards_bytes() {
        let mut writer = IoWriter::new(std::io::Cursor::new(Vec::new()));
        writer.write(b"null").unwrap();
        assert_eq!(writer.into_inner().into_inner(), b"null");
    }
}
