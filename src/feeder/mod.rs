//! Chunk feeder: stages chunks in the arena and absorbs whole blocks.
//!
//! Every chunk is copied in one pass to the input offset. A chunk whose
//! length is a multiple of [`BLOCK_SIZE`] is absorbed right away; any other
//! length marks the terminal chunk and is left staged for padding.
//!
//! Only the final chunk may have a length that is not block-aligned. A
//! misaligned chunk earlier in the stream is not reported: it is taken as the
//! terminal chunk and whatever follows is never pulled, so the digest covers
//! a prefix of the input.

use log::trace;

use crate::engine::Engine;
use crate::error::Result;
use crate::primitive::{BLOCK_SIZE, CompressionPrimitive};

/// Room kept past every staged chunk so a short terminal chunk can be padded
/// in place.
pub(crate) const PADDING_MARGIN: usize = BLOCK_SIZE;

/// Outcome of feeding one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Feed {
    /// The chunk was block-aligned and has been absorbed.
    Absorbed,
    /// The chunk is terminal; this many bytes are staged for padding.
    Terminal(usize),
}

/// Stages `chunk` at the input offset, growing the arena first if needed.
pub(crate) fn feed<P: CompressionPrimitive>(engine: &mut Engine<P>, chunk: &[u8]) -> Result<Feed> {
    let len = chunk.len();

    let arena = engine.arena_mut();
    arena.ensure_capacity(len.saturating_add(PADDING_MARGIN))?;
    arena.staging_mut()[..len].copy_from_slice(chunk);

    if len % BLOCK_SIZE != 0 {
        trace!("terminal chunk staged: {} bytes", len);
        return Ok(Feed::Terminal(len));
    }

    engine.absorb(len)?;
    trace!("absorbed {} bytes", len);
    Ok(Feed::Absorbed)
}
