//! Tagged chunk codec used by packed walkmesh files.
//!
//! A chunk is a 4-byte ASCII tag, a little-endian `u32` element count and
//! `count * size_of::<T>()` bytes of raw element data. Element payloads are
//! plain-old-data reinterpreted through `bytemuck`, so they are stored in the
//! host byte order of the writer; every supported target is little-endian.

use bytemuck::{AnyBitPattern, NoUninit};

/// Size of a chunk header in bytes (tag + element count).
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Errors raised while reading a chunk stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkError {
    /// The stream ended inside a chunk header or payload.
    #[error("unexpected end of data reading chunk '{tag}': need {needed} bytes, {available} left")]
    UnexpectedEof {
        /// Tag of the chunk being read.
        tag: String,
        /// Bytes required.
        needed: usize,
        /// Bytes remaining in the stream.
        available: usize,
    },
    /// The next chunk carries a different tag.
    #[error("expected chunk '{expected}', found '{found}'")]
    TagMismatch {
        /// Tag the reader asked for.
        expected: String,
        /// Tag present in the stream.
        found: String,
    },
    /// The element count does not fit in memory.
    #[error("chunk '{tag}' declares {count} elements, which overflows the payload size")]
    CountOverflow {
        /// Tag of the chunk being read.
        tag: String,
        /// Declared element count.
        count: u32,
    },
}

fn tag_str(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

/// Sequential reader over an in-memory chunk stream.
pub struct ChunkReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ChunkReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Read the next chunk, which must carry `tag`, as a vector of `T`.
    ///
    /// The payload is copied, so the stream does not need to be aligned
    /// for `T`.
    pub fn read<T: AnyBitPattern + NoUninit>(&mut self, tag: &[u8; 4]) -> Result<Vec<T>, ChunkError> {
        let header = self.take(tag, CHUNK_HEADER_SIZE)?;
        let found: [u8; 4] = [header[0], header[1], header[2], header[3]];
        let count = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        if &found != tag {
            // Leave the header unread so the caller can report the position.
            self.offset -= CHUNK_HEADER_SIZE;
            return Err(ChunkError::TagMismatch {
                expected: tag_str(tag),
                found: tag_str(&found),
            });
        }

        let size = (count as usize)
            .checked_mul(std::mem::size_of::<T>())
            .ok_or_else(|| ChunkError::CountOverflow {
                tag: tag_str(tag),
                count,
            })?;
        let payload = self.take(tag, size)?;

        log::trace!("read chunk '{}': {} elements", tag_str(tag), count);
        Ok(bytemuck::pod_collect_to_vec(payload))
    }

    fn take(&mut self, tag: &[u8; 4], len: usize) -> Result<&'a [u8], ChunkError> {
        if self.remaining() < len {
            return Err(ChunkError::UnexpectedEof {
                tag: tag_str(tag),
                needed: len,
                available: self.remaining(),
            });
        }
        let data: &'a [u8] = self.data;
        let slice = &data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }
}

/// Builder for a chunk stream.
#[derive(Debug, Default)]
pub struct ChunkWriter {
    buffer: Vec<u8>,
}

impl ChunkWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk holding `items` under `tag`.
    ///
    /// # Panics
    ///
    /// Panics if `items` has more than `u32::MAX` elements.
    pub fn write<T: NoUninit>(&mut self, tag: &[u8; 4], items: &[T]) -> &mut Self {
        let count = u32::try_from(items.len()).expect("chunk element count exceeds u32");
        self.buffer.extend_from_slice(tag);
        self.buffer.extend_from_slice(&count.to_le_bytes());
        self.buffer.extend_from_slice(bytemuck::cast_slice(items));
        self
    }

    /// Finish and return the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}
