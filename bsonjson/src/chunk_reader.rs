// SPDX-License-Identifier: Apache-2.0

//! Pull-style input sources for [`crate::decode_from_reader`].
//!
//! [`ChunkReader`] serves an in-memory slice, either whole or in fixed-size
//! chunks to simulate streaming. With the `std` feature, [`IoReader`] adapts any
//! [`std::io::Read`].

/// Size of the buffer the decoder pulls into on each read.
pub const READ_CHUNK_SIZE: usize = 1024;

/// Trait for pull-style input sources.
pub trait Reader {
    /// The error type returned by read operations
    type Error;

    /// Read data into the provided buffer.
    /// Returns the number of bytes read, or an error.
    ///
    /// # Contract
    /// - A return value of 0 **MUST** indicate true end of stream
    /// - Implementations **MUST NOT** return 0 unless no more data will ever be available
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<R: Reader + ?Sized> Reader for &mut R {
    type Error = R::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}

/// A [`Reader`] over a byte slice, optionally limited to `chunk_size` bytes per read.
///
/// ```rust
/// use bsonjson::{decode_from_reader, ChunkReader};
///
/// let json = br#"{"status": "ok"}"#;
/// // Hand the decoder 3 bytes at a time
/// let root = decode_from_reader(ChunkReader::new(json, 3)).unwrap();
/// assert!(root.as_document().is_some());
/// ```
#[derive(Debug)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkReader<'a> {
    /// Each `read()` returns at most `chunk_size` bytes (minimum 1).
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Reads as much of the slice as the caller's buffer allows.
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: usize::MAX,
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl Reader for ChunkReader<'_> {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let to_copy = self.remaining().min(buf.len()).min(self.chunk_size);
        let (Some(dest), Some(src)) = (
            buf.get_mut(..to_copy),
            self.data.get(self.pos..self.pos + to_copy),
        ) else {
            return Ok(0);
        };
        dest.copy_from_slice(src);
        self.pos += to_copy;
        Ok(to_copy)
    }
}

/// Adapts a [`std::io::Read`] source, retrying reads that were interrupted.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<R>(pub R);

#[cfg(feature = "std")]
impl<R: std::io::Read> Reader for IoReader<R> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.0.read(buf) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_full_slice_reader_basic() {
        let mut reader = ChunkReader::full_slice(b"hello world");

        let mut buf = [0u8; 5];
        assert_eq!(reader.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");

        let mut buf = [0u8; 10];
        assert_eq!(reader.read(&mut buf).unwrap(), 6);
        assert_eq!(&buf[..6], b" world");

        // EOF
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_full_slice_reader_empty() {
        let mut reader = ChunkReader::full_slice(b"");
        let mut buf = [0u8; 10];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_chunk_reader_basic() {
        let mut reader = ChunkReader::new(b"hello world", 3);
        let mut buf = [0u8; 10];
        let mut collected = alloc::vec::Vec::new();
        let mut sizes = alloc::vec::Vec::new();
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            sizes.push(n);
            collected.extend_from_slice(&buf[..n]);
        }
        assert_eq!(sizes, [3, 3, 3, 2]);
        assert_eq!(collected, b"hello world");
    }

    #[test]
    fn test_chunk_size_zero_is_clamped() {
        let mut reader = ChunkReader::new(b"ab", 0);
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf).unwrap(), 1);
        assert_eq!(reader.remaining(), 1);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_io_reader() {
        let mut reader = IoReader(std::io::Cursor::new(b"{}".to_vec()));
        let mut buf = [0u8; READ_CHUNK_SIZE];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }
}
