//! Engine instances: one arena plus the primitive that works on it.
//!
//! - [`Engine`] - Exclusive owner of an arena; one digest in flight at a time
//! - [`with_default_engine`] - Lazily-built engine reused on the current thread

mod default;

pub use default::{md5, with_default_engine};

use crate::arena::Arena;
use crate::config::EngineConfig;
use crate::digest::DigestView;
use crate::error::{PrimitiveError, Result};
use crate::primitive::{CompressionPrimitive, DIGEST_SIZE, HEADER_SIZE, Md5Kernel};

/// An arena and the compression primitive bound to it.
///
/// Every digest borrows the engine mutably for its whole duration, which is
/// what limits an engine to one digest at a time. Run concurrent digests on
/// separate engines.
///
/// # Example
///
/// ```
/// use md5arena::{Engine, EngineConfig};
///
/// let engine = Engine::new()?;
/// assert_eq!(engine.arena().pages(), 1);
///
/// let config = EngineConfig::new(256, 2, 64)?;
/// let engine = Engine::with_config(config)?;
/// assert_eq!(engine.arena().input_offset(), 256 + 24);
/// # Ok::<(), md5arena::DigestError>(())
/// ```
#[derive(Debug)]
pub struct Engine<P = Md5Kernel> {
    arena: Arena,
    primitive: P,
}

impl Engine<Md5Kernel> {
    /// Creates an engine with the default configuration and [`Md5Kernel`].
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine with `config` and [`Md5Kernel`].
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        Self::with_primitive(config, Md5Kernel::new())
    }
}

impl<P: CompressionPrimitive> Engine<P> {
    /// Creates an engine around a custom compression primitive.
    pub fn with_primitive(config: EngineConfig, primitive: P) -> Result<Self> {
        Ok(Self {
            arena: Arena::new(&config)?,
            primitive,
        })
    }

    /// Returns the engine's arena.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns the compression primitive.
    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    pub(crate) fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub(crate) fn init(&mut self) -> Result<()> {
        let header = self.arena.header_offset();
        self.primitive.init(self.arena.memory_mut(), header)?;
        Ok(())
    }

    pub(crate) fn absorb(&mut self, len: usize) -> Result<()> {
        let header = self.arena.header_offset();
        let input = self.arena.input_offset();
        self.primitive
            .absorb(self.arena.memory_mut(), input, len, header)?;
        Ok(())
    }

    pub(crate) fn pad(&mut self, len: usize) -> Result<usize> {
        let header = self.arena.header_offset();
        let input = self.arena.input_offset();
        let padded = self
            .primitive
            .pad(self.arena.memory_mut(), input, len, header)?;
        Ok(padded)
    }

    /// Reads the digest out of the header region.
    pub(crate) fn digest_view(&self) -> Result<DigestView<'_>> {
        let offset = self.primitive.digest_offset();
        let header = self.arena.header();
        let bytes = offset
            .checked_add(DIGEST_SIZE)
            .and_then(|end| header.get(offset..end))
            .and_then(|slice| <&[u8; DIGEST_SIZE]>::try_from(slice).ok())
            .ok_or(PrimitiveError::OutOfBounds {
                offset,
                len: DIGEST_SIZE,
                memory: HEADER_SIZE,
            })?;
        Ok(DigestView::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DigestError;

    #[test]
    fn test_default_engine_layout() {
        let engine = Engine::new().unwrap();
        assert_eq!(engine.arena().header_offset(), 0);
        assert_eq!(engine.arena().input_offset(), HEADER_SIZE);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig::default().with_initial_pages(0);
        assert!(matches!(
            Engine::with_config(config),
            Err(DigestError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_init_then_pad_empty_gives_empty_digest() {
        let mut engine = Engine::new().unwrap();
        engine.init().unwrap();
        let n = engine.pad(0).unwrap();
        engine.absorb(n).unwrap();
        assert_eq!(
            engine.digest_view().unwrap().to_hex(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_digest_offset_outside_header_is_an_error() {
        struct Misplaced;

        impl CompressionPrimitive for Misplaced {
            fn init(&mut self, _: &mut [u8], _: usize) -> std::result::Result<(), PrimitiveError> {
                Ok(())
            }
            fn absorb(
                &mut self,
                _: &mut [u8],
                _: usize,
                _: usize,
                _: usize,
            ) -> std::result::Result<(), PrimitiveError> {
                Ok(())
            }
            fn pad(
                &mut self,
                _: &mut [u8],
                _: usize,
                _: usize,
                _: usize,
            ) -> std::result::Result<usize, PrimitiveError> {
                Ok(64)
            }
            fn digest_offset(&self) -> usize {
                HEADER_SIZE - 4
            }
        }

        let engine = Engine::with_primitive(EngineConfig::default(), Misplaced).unwrap();
        assert!(matches!(
            engine.digest_view(),
            Err(DigestError::Primitive(PrimitiveError::OutOfBounds { .. }))
        ));
    }
}
