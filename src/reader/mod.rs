//! Chunk producers over byte readers.
//!
//! Turns a reader into chunks that honour the block contract (every chunk but
//! the last a multiple of 64 bytes), then digests them.
//!
//! - [`read_blocks`], [`digest_read`] - Synchronous `std::io::Read`
//! - [`block_stream`], [`digest_reader`] - `futures_io::AsyncRead`
//!   (requires the `async-io` feature)

mod iter;
#[cfg(feature = "async-io")]
mod stream;

pub use iter::{BlockIter, digest_read, read_blocks};
#[cfg(feature = "async-io")]
pub use stream::{BlockStream, block_stream, digest_reader};

use crate::primitive::BLOCK_SIZE;

/// Chunk length used by [`digest_read`] and `digest_reader` (64 KiB).
pub const DEFAULT_READ_SIZE: usize = 64 * 1024;

/// Rounds `size` up to a non-zero multiple of the block size.
pub(crate) fn aligned_chunk_size(size: usize) -> usize {
    size.max(1).next_multiple_of(BLOCK_SIZE)
}
