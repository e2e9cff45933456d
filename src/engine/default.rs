//! Thread-local default engine.

use std::cell::RefCell;

use log::debug;

use super::Engine;
use crate::cancel::CancelSignal;
use crate::digest::Md5Digest;
use crate::error::Result;
use crate::primitive::BLOCK_SIZE;
use crate::reader::DEFAULT_READ_SIZE;
use crate::session::digest_blocking;

// One engine per thread, built on first use.
thread_local! {
    static DEFAULT_ENGINE: RefCell<Option<Engine>> = const { RefCell::new(None) };
}

/// Runs `f` with this thread's default engine.
///
/// The engine is created on first use and kept for later calls on the same
/// thread. It serves one digest at a time: if `f` calls back into
/// `with_default_engine`, the inner call gets a fresh engine instead of the
/// one already in flight.
pub fn with_default_engine<R>(f: impl FnOnce(&mut Engine) -> Result<R>) -> Result<R> {
    DEFAULT_ENGINE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => {
            let mut engine = match slot.take() {
                Some(engine) => engine,
                None => Engine::new()?,
            };
            let result = f(&mut engine);
            *slot = Some(engine);
            result
        }
        Err(_) => {
            debug!("default engine busy on this thread, using a temporary one");
            f(&mut Engine::new()?)
        }
    })
}

/// Computes the MD5 digest of an in-memory buffer on the default engine.
///
/// The buffer is fed in [`DEFAULT_READ_SIZE`] chunks, so the thread's arena
/// stays at two pages however large the input is.
///
/// # Example
///
/// ```
/// let digest = md5arena::md5(b"abc")?;
/// assert_eq!(digest.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
/// # Ok::<(), md5arena::DigestError>(())
/// ```
pub fn md5(data: &[u8]) -> Result<Md5Digest> {
    let (body, tail) = data.split_at(data.len() - data.len() % BLOCK_SIZE);
    let chunks = body.chunks(DEFAULT_READ_SIZE).chain(std::iter::once(tail));
    with_default_engine(|engine| {
        digest_blocking(chunks, engine, &CancelSignal::new()).map(|view| view.to_digest())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_values() {
        assert_eq!(
            md5(b"").unwrap().to_hex(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            md5(b"The quick brown fox jumps over the lazy dog")
                .unwrap()
                .to_hex(),
            "9e107d9d372bb6826bd81d3542a419d6"
        );
    }

    #[test]
    fn test_large_input_does_not_pin_memory() {
        let data = vec![1u8; 8 * 1024 * 1024 + 5];
        let expected = {
            let mut engine = Engine::new().unwrap();
            digest_blocking([&data], &mut engine, &CancelSignal::new())
                .unwrap()
                .to_digest()
        };

        assert_eq!(md5(&data).unwrap(), expected);
        let pages = with_default_engine(|engine| Ok(engine.arena().pages())).unwrap();
        assert!(pages <= 2, "default arena kept {pages} pages");
    }

    #[test]
    fn test_default_engine_is_reused() {
        md5(&[7u8; 1000]).unwrap();
        md5(&vec![7u8; 200 * 1024]).unwrap();
        // Growth counts survive between calls only if the engine does.
        let growths = with_default_engine(|engine| Ok(engine.arena().growth_count())).unwrap();
        assert_eq!(growths, 1);
    }

    #[test]
    fn test_reentrant_use_gets_separate_engine() {
        let digest = with_default_engine(|_outer| md5(b"abc")).unwrap();
        assert_eq!(digest.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_block_aligned_input() {
        let data = vec![0x61u8; 128];
        let expected = {
            let mut engine = Engine::new().unwrap();
            digest_blocking([&data[..64], &data[64..]], &mut engine, &CancelSignal::new())
                .unwrap()
                .to_digest()
        };
        assert_eq!(md5(&data).unwrap(), expected);
    }
}
