//! Configuration for digest engines.
//!
//! - [`EngineConfig`] - Arena placement and growth limits
//!
//! # Example
//!
//! ```
//! use md5arena::EngineConfig;
//!
//! // Header at offset 64, start with two pages, never exceed 16 MiB
//! let config = EngineConfig::new(64, 2, 256)?;
//!
//! // Builder pattern
//! let config = EngineConfig::default().with_max_pages(1024);
//!
//! # Ok::<(), md5arena::DigestError>(())
//! ```

use crate::arena::PAGE_SIZE;
use crate::error::DigestError;
use crate::primitive::{BLOCK_SIZE, HEADER_SIZE};

/// Default header offset inside the arena.
pub const DEFAULT_HEADER_OFFSET: usize = 0;

/// Default number of pages the arena starts with (64 KiB).
pub const DEFAULT_INITIAL_PAGES: usize = 1;

/// Default growth limit in pages (4 GiB, the 32-bit linear memory ceiling).
pub const DEFAULT_MAX_PAGES: usize = 65_536;

/// Bytes that must fit past the header in the initial pages: two blocks of
/// padding for an empty or short terminal chunk.
const MIN_STAGING: usize = 2 * BLOCK_SIZE;

/// Configuration for an [`Engine`](crate::Engine).
///
/// The header region sits at `header_offset` and is followed directly by the
/// staging region, so `input_offset = header_offset + HEADER_SIZE`.
///
/// # Constraints
///
/// - `initial_pages` is non-zero and not larger than `max_pages`
/// - `header_offset` is a multiple of 8
/// - header plus two blocks of staging fit in the initial pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineConfig {
    /// Offset of the primitive's running state.
    header_offset: usize,

    /// Pages allocated when the engine is created.
    initial_pages: usize,

    /// Hard limit on arena growth, in pages.
    max_pages: usize,
}

impl EngineConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidConfig`] if any constraint listed on
    /// [`EngineConfig`] is violated.
    pub fn new(
        header_offset: usize,
        initial_pages: usize,
        max_pages: usize,
    ) -> Result<Self, DigestError> {
        if initial_pages == 0 {
            return Err(DigestError::InvalidConfig {
                message: "initial_pages must be non-zero",
            });
        }

        if initial_pages > max_pages {
            return Err(DigestError::InvalidConfig {
                message: "initial_pages cannot be greater than max_pages",
            });
        }

        if header_offset % 8 != 0 {
            return Err(DigestError::InvalidConfig {
                message: "header_offset must be a multiple of 8",
            });
        }

        let needed = header_offset
            .checked_add(HEADER_SIZE + MIN_STAGING)
            .ok_or(DigestError::InvalidConfig {
                message: "header_offset overflows",
            })?;
        if needed > initial_pages.saturating_mul(PAGE_SIZE) {
            return Err(DigestError::InvalidConfig {
                message: "header and padding room must fit in the initial pages",
            });
        }

        Ok(Self {
            header_offset,
            initial_pages,
            max_pages,
        })
    }

    /// Sets the header offset.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`EngineConfig::validate`] to check it.
    pub fn with_header_offset(mut self, offset: usize) -> Self {
        self.header_offset = offset;
        self
    }

    /// Sets the number of pages allocated up front.
    pub fn with_initial_pages(mut self, pages: usize) -> Self {
        self.initial_pages = pages;
        self
    }

    /// Sets the growth limit in pages.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages;
        self
    }

    /// Returns the header offset.
    pub fn header_offset(&self) -> usize {
        self.header_offset
    }

    /// Returns the offset of the staging region.
    pub fn input_offset(&self) -> usize {
        self.header_offset + HEADER_SIZE
    }

    /// Returns the initial page count.
    pub fn initial_pages(&self) -> usize {
        self.initial_pages
    }

    /// Returns the growth limit in pages.
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), DigestError> {
        Self::new(self.header_offset, self.initial_pages, self.max_pages).map(|_| ())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            header_offset: DEFAULT_HEADER_OFFSET,
            initial_pages: DEFAULT_INITIAL_PAGES,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.header_offset(), 0);
        assert_eq!(config.input_offset(), HEADER_SIZE);
        assert_eq!(config.initial_pages(), 1);
        assert_eq!(config.max_pages(), DEFAULT_MAX_PAGES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_header_offset(128)
            .with_initial_pages(2)
            .with_max_pages(8);

        assert_eq!(config.header_offset(), 128);
        assert_eq!(config.input_offset(), 128 + HEADER_SIZE);
        assert_eq!(config.initial_pages(), 2);
        assert_eq!(config.max_pages(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_zero_pages() {
        assert!(EngineConfig::new(0, 0, 4).is_err());
    }

    #[test]
    fn test_invalid_initial_gt_max() {
        assert!(EngineConfig::new(0, 4, 2).is_err());
    }

    #[test]
    fn test_invalid_unaligned_header() {
        assert!(EngineConfig::new(3, 1, 1).is_err());
    }

    #[test]
    fn test_invalid_header_past_initial_pages() {
        let offset = PAGE_SIZE - HEADER_SIZE - 64;
        assert!(EngineConfig::new(offset, 1, 2).is_err());
        assert!(EngineConfig::new(offset, 2, 2).is_ok());
    }
}
