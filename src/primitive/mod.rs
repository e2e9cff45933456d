//! The compression primitive contract.
//!
//! The driver never looks inside the running state. It hands the primitive
//! the whole arena memory plus offsets and lets it read and write there:
//!
//! - [`CompressionPrimitive`] - `init` / `absorb` / `pad` over arena memory
//! - [`Md5Kernel`] - the MD5 block transform shipped with the crate

mod md5;

pub use md5::Md5Kernel;

use crate::error::PrimitiveError;

/// Size of one MD5 block in bytes.
pub const BLOCK_SIZE: usize = 64;

/// Size of the running-state region reserved at the header offset.
pub const HEADER_SIZE: usize = 24;

/// Size of an MD5 digest in bytes.
pub const DIGEST_SIZE: usize = 16;

/// A block-transform engine operating in place on arena memory.
///
/// Implementations own the layout of the `HEADER_SIZE` bytes at
/// `header_offset`; by convention the first [`DIGEST_SIZE`] of them hold the
/// digest once `pad` and the final `absorb` have run.
pub trait CompressionPrimitive {
    /// Resets the running state at `header_offset`.
    fn init(&mut self, memory: &mut [u8], header_offset: usize) -> Result<(), PrimitiveError>;

    /// Consumes `len` staged bytes at `input_offset`. `len` is a multiple of
    /// [`BLOCK_SIZE`].
    fn absorb(
        &mut self,
        memory: &mut [u8],
        input_offset: usize,
        len: usize,
        header_offset: usize,
    ) -> Result<(), PrimitiveError>;

    /// Pads the `len` valid bytes staged at `input_offset` in place and
    /// returns how many bytes the final `absorb` must consume from
    /// `input_offset`.
    ///
    /// Callers guarantee at least `len + BLOCK_SIZE` addressable bytes from
    /// `input_offset`, and never fewer than two blocks.
    fn pad(
        &mut self,
        memory: &mut [u8],
        input_offset: usize,
        len: usize,
        header_offset: usize,
    ) -> Result<usize, PrimitiveError>;

    /// Position of the digest inside the header region.
    fn digest_offset(&self) -> usize {
        0
    }
}

/// Checks that `offset..offset + len` lies inside `memory`.
pub(crate) fn check_bounds(memory: &[u8], offset: usize, len: usize) -> Result<(), PrimitiveError> {
    match offset.checked_add(len) {
        Some(end) if end <= memory.len() => Ok(()),
        _ => Err(PrimitiveError::OutOfBounds {
            offset,
            len,
            memory: memory.len(),
        }),
    }
}
