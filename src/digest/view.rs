//! Borrowed view of a finished digest inside the arena.

use std::fmt;

use super::Md5Digest;
use super::value::to_hex;
use crate::primitive::DIGEST_SIZE;

/// The digest bytes as they sit in the engine's header region.
///
/// The view borrows the engine, so it cannot outlive the next digest or any
/// growth of the arena. Call [`DigestView::to_digest`] to keep the value.
///
/// # Example
///
/// ```
/// use md5arena::{CancelSignal, Engine, digest_blocking};
///
/// let mut engine = Engine::new()?;
/// let view = digest_blocking([&b"abc"[..]], &mut engine, &CancelSignal::new())?;
/// assert_eq!(view.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
///
/// let kept = view.to_digest();
/// # let _ = kept;
/// # Ok::<(), md5arena::DigestError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestView<'a> {
    bytes: &'a [u8; DIGEST_SIZE],
}

impl<'a> DigestView<'a> {
    pub(crate) fn new(bytes: &'a [u8; DIGEST_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the digest bytes.
    pub fn as_bytes(&self) -> &'a [u8; DIGEST_SIZE] {
        self.bytes
    }

    /// Copies the digest out of the arena.
    pub fn to_digest(&self) -> Md5Digest {
        Md5Digest::new(*self.bytes)
    }

    /// Returns the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        to_hex(self.bytes)
    }
}

impl AsRef<[u8]> for DigestView<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl PartialEq<Md5Digest> for DigestView<'_> {
    fn eq(&self, other: &Md5Digest) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl From<DigestView<'_>> for Md5Digest {
    fn from(view: DigestView<'_>) -> Self {
        view.to_digest()
    }
}

impl fmt::Display for DigestView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
