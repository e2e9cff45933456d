//! Owned digest values.

use std::fmt;
use std::hash::{Hash as StdHash, Hasher};

use crate::primitive::DIGEST_SIZE;

/// A 16-byte MD5 digest.
///
/// Copied out of the arena, so it stays valid after the engine is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Md5Digest([u8; DIGEST_SIZE]);

impl Md5Digest {
    /// The size of the digest in bytes.
    pub const SIZE: usize = DIGEST_SIZE;

    /// Creates a digest from a byte array.
    pub const fn new(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates a digest from a slice.
    ///
    /// Returns `None` if the slice is not exactly 16 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != DIGEST_SIZE {
            return None;
        }
        let mut bytes = [0u8; DIGEST_SIZE];
        bytes.copy_from_slice(slice);
        Some(Self(bytes))
    }

    /// Returns the digest as a byte array.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Returns the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Parses a 32-character hex string.
    ///
    /// Returns `None` if the string is not valid hex or has the wrong length.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        if hex_str.len() != DIGEST_SIZE * 2 || !hex_str.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; DIGEST_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex_str[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut result = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        result.push(HEX[(byte >> 4) as usize] as char);
        result.push(HEX[(byte & 0xf) as usize] as char);
    }
    result
}

impl From<[u8; DIGEST_SIZE]> for Md5Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Md5Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl StdHash for Md5Digest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(&self.0);
    }
}

impl fmt::Display for Md5Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
