//! Block-aligned chunking of async readers.
//!
//! Uses `futures_io::AsyncRead`, so it works with tokio (through
//! `tokio_util::compat`), async-std, smol, or any futures-compatible runtime.
//!
//! # Example
//!
//! ```ignore
//! use md5arena::{CancelSignal, Engine, digest_reader};
//! use tokio_util::compat::TokioAsyncReadCompatExt;
//!
//! let file = tokio::fs::File::open("data.bin").await?;
//! let mut engine = Engine::new()?;
//! let view = digest_reader(file.compat(), &mut engine, &CancelSignal::new()).await?;
//! println!("{}", view);
//! ```

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use super::{DEFAULT_READ_SIZE, aligned_chunk_size};
use crate::cancel::CancelSignal;
use crate::digest::DigestView;
use crate::engine::Engine;
use crate::error::Result;
use crate::primitive::CompressionPrimitive;
use crate::session::try_digest;

pin_project! {
    /// A stream of block-aligned chunks read from an async reader.
    ///
    /// Partial reads are accumulated across polls until `chunk_size` bytes
    /// are available, so every chunk but the last is exactly that long.
    pub struct BlockStream<R> {
        #[pin]
        reader: R,
        buffer: BytesMut,
        filled: usize,
        chunk_size: usize,
        finished: bool,
    }
}

impl<R> BlockStream<R> {
    /// Creates a new block stream.
    ///
    /// # Arguments
    ///
    /// * `reader` - An async reader implementing `AsyncRead`
    /// * `chunk_size` - Chunk length, rounded up to a multiple of 64
    pub fn new(reader: R, chunk_size: usize) -> Self {
        let chunk_size = aligned_chunk_size(chunk_size);
        Self {
            reader,
            buffer: BytesMut::with_capacity(chunk_size),
            filled: 0,
            chunk_size,
            finished: false,
        }
    }

    /// Returns the length of every chunk but the last.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl<R: AsyncRead> Stream for BlockStream<R> {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        if *this.filled == 0 {
            this.buffer.resize(*this.chunk_size, 0);
        }

        while *this.filled < *this.chunk_size {
            let buf = &mut this.buffer[*this.filled..];
            match this.reader.as_mut().poll_read(cx, buf) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == io::ErrorKind::Interrupted => {}
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(Ok(0)) => {
                    *this.finished = true;
                    break;
                }
                Poll::Ready(Ok(n)) => *this.filled += n,
            }
        }

        if *this.filled == 0 {
            return Poll::Ready(None);
        }

        this.buffer.truncate(*this.filled);
        *this.filled = 0;
        Poll::Ready(Some(Ok(this.buffer.split().freeze())))
    }
}

/// Creates a stream of block-aligned chunks from an async reader.
pub fn block_stream<R: AsyncRead>(reader: R, chunk_size: usize) -> BlockStream<R> {
    BlockStream::new(reader, chunk_size)
}

/// Computes the MD5 digest of everything an async reader yields.
pub async fn digest_reader<'e, R, P>(
    reader: R,
    engine: &'e mut Engine<P>,
    cancel: &CancelSignal,
) -> Result<DigestView<'e>>
where
    R: AsyncRead,
    P: CompressionPrimitive,
{
    try_digest(block_stream(reader, DEFAULT_READ_SIZE), engine, cancel).await
}
