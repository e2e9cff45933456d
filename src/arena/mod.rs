//! Growable linear memory shared with the compression primitive.
//!
//! The arena is one contiguous `Vec<u8>` split into two fixed regions:
//!
//! ```text
//! 0        header_offset     input_offset                    capacity
//! |  ...   | running state   | staging region  ...           |
//!          |<- HEADER_SIZE ->|
//! ```
//!
//! Only the capacity moves, upward, a whole page at a time. Every view handed
//! out borrows the arena, so a slice taken before [`Arena::ensure_capacity`]
//! cannot be used after it; callers re-derive their view instead.

use log::debug;

use crate::config::EngineConfig;
use crate::error::{DigestError, Result};
use crate::primitive::HEADER_SIZE;

/// Growth granularity of the arena (64 KiB).
pub const PAGE_SIZE: usize = 64 * 1024;

/// Linear memory owned by one [`Engine`](crate::Engine).
#[derive(Debug)]
pub struct Arena {
    memory: Vec<u8>,
    header_offset: usize,
    input_offset: usize,
    max_pages: usize,
    growths: usize,
}

impl Arena {
    /// Allocates the initial pages described by `config`.
    pub(crate) fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let mut arena = Self {
            memory: Vec::new(),
            header_offset: config.header_offset(),
            input_offset: config.input_offset(),
            max_pages: config.max_pages(),
            growths: 0,
        };
        arena.grow_to(config.initial_pages())?;
        arena.growths = 0;
        Ok(arena)
    }

    /// Returns the current size of the arena in bytes.
    pub fn capacity(&self) -> usize {
        self.memory.len()
    }

    /// Returns the current size of the arena in pages.
    pub fn pages(&self) -> usize {
        self.memory.len() / PAGE_SIZE
    }

    /// Returns how many times the arena has grown since it was created.
    pub fn growth_count(&self) -> usize {
        self.growths
    }

    /// Returns the offset of the primitive's running state.
    pub fn header_offset(&self) -> usize {
        self.header_offset
    }

    /// Returns the offset where chunks are staged.
    pub fn input_offset(&self) -> usize {
        self.input_offset
    }

    /// Returns the bytes available from the input offset to the end.
    pub fn staging_capacity(&self) -> usize {
        self.memory.len() - self.input_offset
    }

    /// Makes sure at least `additional` bytes are addressable from the
    /// input offset, growing by the fewest whole pages that suffice.
    ///
    /// # Errors
    ///
    /// [`DigestError::ResourceExhausted`] if the growth limit would be
    /// exceeded or the allocation fails. The arena is left unchanged.
    pub(crate) fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        if additional <= self.staging_capacity() {
            return Ok(());
        }

        let limit = self.max_pages.saturating_mul(PAGE_SIZE);
        let required = self
            .input_offset
            .checked_add(additional)
            .ok_or(DigestError::ResourceExhausted {
                requested: usize::MAX,
                limit,
            })?;

        self.grow_to(required.div_ceil(PAGE_SIZE))
    }

    fn grow_to(&mut self, pages: usize) -> Result<()> {
        let limit = self.max_pages.saturating_mul(PAGE_SIZE);
        let requested = pages.saturating_mul(PAGE_SIZE);
        if pages > self.max_pages {
            return Err(DigestError::ResourceExhausted { requested, limit });
        }

        let additional = requested - self.memory.len();
        self.memory
            .try_reserve_exact(additional)
            .map_err(|_| DigestError::ResourceExhausted { requested, limit })?;
        self.memory.resize(requested, 0);
        self.growths += 1;

        debug!(
            "arena grown to {} pages ({} bytes, {} staging)",
            pages,
            requested,
            self.staging_capacity()
        );
        Ok(())
    }

    /// Whole memory, as handed to the primitive.
    pub(crate) fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// Staging region, from the input offset to the end of the arena.
    pub(crate) fn staging_mut(&mut self) -> &mut [u8] {
        &mut self.memory[self.input_offset..]
    }

    /// Header region holding the primitive's running state.
    pub fn header(&self) -> &[u8] {
        &self.memory[self.header_offset..self.input_offset]
    }
}
