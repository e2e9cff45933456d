//! Digest result types.
//!
//! - [`DigestView`] - Borrowed 16 bytes in the engine's header region
//! - [`Md5Digest`] - Owned 16-byte digest

mod value;
mod view;

pub use value::Md5Digest;
pub use view::DigestView;
