//! md5arena
//!
//! Streaming MD5 over a growable memory arena.
//!
//! `md5arena` drives an MD5 compression primitive over a stream of byte
//! chunks. Chunks are staged in a linear arena shared with the primitive,
//! whole blocks are absorbed as they arrive, and padding is applied exactly
//! once when the terminal chunk shows up.
//!
//! The crate intentionally:
//! - does NOT re-chunk input: every chunk but the last must be a multiple of
//!   64 bytes (use [`read_blocks`] or `block_stream` to get such chunks)
//! - does NOT share an engine between concurrent digests
//! - does NOT spawn tasks or depend on a particular async runtime
//!
//! It only does one thing: **chunks in → digest out**
//!
//! # Chunk contract
//!
//! A chunk whose length is not a multiple of 64 is the terminal chunk: the
//! stream is not pulled any further. Passing such a chunk earlier in the
//! stream is not detected and yields the digest of a prefix of the input.
//!
//! # Sync
//!
//! ```
//! use md5arena::{CancelSignal, Engine, digest_blocking};
//!
//! fn main() -> Result<(), md5arena::DigestError> {
//!     let mut engine = Engine::new()?;
//!     let chunks = [vec![0u8; 4096], b"last, unaligned chunk".to_vec()];
//!
//!     let digest = digest_blocking(&chunks, &mut engine, &CancelSignal::new())?;
//!     println!("md5 {}", digest);
//!     Ok(())
//! }
//! ```
//!
//! # Async
//!
//! ```ignore
//! use futures_core::Stream;
//! use md5arena::{CancelSignal, Engine, digest};
//!
//! async fn demo(chunks: impl Stream<Item = bytes::Bytes>) -> Result<(), md5arena::DigestError> {
//!     let mut engine = Engine::new()?;
//!     let cancel = CancelSignal::new();
//!
//!     let digest = digest(chunks, &mut engine, &cancel).await?;
//!     println!("md5 {}", digest);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod arena;
mod cancel;
mod config;
mod digest;
mod engine;
mod error;
mod primitive;
mod reader;
mod session;

mod feeder; // internal chunk staging
mod padding; // internal finalization

//
// Public surface
//

pub use arena::{Arena, PAGE_SIZE};
pub use cancel::CancelSignal;
pub use config::EngineConfig;
pub use digest::{DigestView, Md5Digest};
pub use engine::{Engine, md5, with_default_engine};
pub use error::{DigestError, PrimitiveError, Result};
pub use primitive::{BLOCK_SIZE, CompressionPrimitive, DIGEST_SIZE, HEADER_SIZE, Md5Kernel};
pub use reader::{BlockIter, DEFAULT_READ_SIZE, digest_read, read_blocks};
pub use session::{
    Flow, Session, SessionState, digest, digest_blocking, try_digest, try_digest_blocking,
};

#[cfg(feature = "async-io")]
pub use reader::{BlockStream, block_stream, digest_reader};
