//! Block-aligned chunking of synchronous readers.
//!
//! - [`BlockIter`] - Iterator of block-aligned chunks from a [`std::io::Read`]
//! - [`digest_read`] - Digest of everything a reader yields
//!
//! # Example
//!
//! ```
//! use md5arena::{CancelSignal, Engine, digest_read};
//! use std::io::Cursor;
//!
//! let mut engine = Engine::new()?;
//! let view = digest_read(Cursor::new(b"abc"), &mut engine, &CancelSignal::new())?;
//! assert_eq!(view.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
//! # Ok::<(), md5arena::DigestError>(())
//! ```

use std::io::{self, Read};

use bytes::{Bytes, BytesMut};

use super::{DEFAULT_READ_SIZE, aligned_chunk_size};
use crate::cancel::CancelSignal;
use crate::digest::DigestView;
use crate::engine::Engine;
use crate::error::Result;
use crate::primitive::CompressionPrimitive;
use crate::session::try_digest_blocking;

/// An iterator that reads fixed-size, block-aligned chunks from a reader.
///
/// Short reads are retried until a full chunk is collected, so every chunk
/// but the last is exactly `chunk_size` bytes. The last one holds whatever
/// remained, and is omitted when the input ends on a chunk boundary.
pub struct BlockIter<R> {
    reader: R,
    buffer: BytesMut,
    chunk_size: usize,
    finished: bool,
}

impl<R: Read> BlockIter<R> {
    /// Creates a new iterator.
    ///
    /// # Arguments
    ///
    /// * `reader` - The source of data to digest
    /// * `chunk_size` - Chunk length, rounded up to a multiple of 64
    fn new(reader: R, chunk_size: usize) -> Self {
        let chunk_size = aligned_chunk_size(chunk_size);
        Self {
            reader,
            buffer: BytesMut::with_capacity(chunk_size),
            chunk_size,
            finished: false,
        }
    }

    /// Returns the length of every chunk but the last.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl<R: Read> Iterator for BlockIter<R> {
    type Item = io::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        // Reclaims the allocation once the previous chunk has been dropped.
        self.buffer.resize(self.chunk_size, 0);

        let mut filled = 0;
        while filled < self.chunk_size {
            match self.reader.read(&mut self.buffer[filled..]) {
                Ok(0) => {
                    self.finished = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }

        if filled == 0 {
            return None;
        }

        self.buffer.truncate(filled);
        Some(Ok(self.buffer.split().freeze()))
    }
}

/// Splits a reader into block-aligned chunks of `chunk_size` bytes.
pub fn read_blocks<R: Read>(reader: R, chunk_size: usize) -> BlockIter<R> {
    BlockIter::new(reader, chunk_size)
}

/// Computes the MD5 digest of everything `reader` yields.
///
/// Read errors abort the session and are returned as
/// [`DigestError::Io`](crate::DigestError::Io).
pub fn digest_read<'e, R, P>(
    reader: R,
    engine: &'e mut Engine<P>,
    cancel: &CancelSignal,
) -> Result<DigestView<'e>>
where
    R: Read,
    P: CompressionPrimitive,
{
    try_digest_blocking(read_blocks(reader, DEFAULT_READ_SIZE), engine, cancel)
}
