//! Error types for md5arena.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DigestError>;

/// Errors that can end a digest session.
///
/// None of these are retried internally and no partial digest is ever
/// produced once one has been returned.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The cancellation signal was observed before pulling the next chunk.
    #[error("digest cancelled: {reason}")]
    Cancelled {
        /// The reason supplied to [`CancelSignal::cancel`](crate::CancelSignal::cancel).
        reason: String,
    },

    /// The arena could not grow to the capacity the next chunk needs.
    #[error("arena exhausted: {requested} bytes requested (limit {limit})")]
    ResourceExhausted {
        /// Total arena size in bytes that would have been required.
        requested: usize,
        /// Largest arena size in bytes the engine may grow to.
        limit: usize,
    },

    /// The compression primitive rejected a call.
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),

    /// The chunk producer failed while reading input.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid engine configuration.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// A session operation was called in a state that does not allow it.
    #[error("session is {state}, operation not allowed")]
    InvalidState {
        /// Name of the state the session was in.
        state: &'static str,
    },
}

/// Failures reported by a [`CompressionPrimitive`](crate::CompressionPrimitive).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// A call addressed bytes outside the arena memory.
    #[error("primitive access out of bounds: {len} bytes at offset {offset} (memory {memory})")]
    OutOfBounds {
        /// Start of the addressed range.
        offset: usize,
        /// Length of the addressed range.
        len: usize,
        /// Size of the memory handed to the primitive.
        memory: usize,
    },

    /// `absorb` was asked to consume a byte count that is not block-aligned.
    #[error("absorb length {len} is not a multiple of {block}")]
    Unaligned {
        /// The requested byte count.
        len: usize,
        /// Block size of the primitive.
        block: usize,
    },
}
