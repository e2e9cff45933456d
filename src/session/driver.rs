//! Drivers pulling chunks from a producer into a [`Session`].
//!
//! The async drivers suspend only while waiting for the next chunk. They work
//! with any `futures_core::Stream`, so any runtime can poll them.

use std::future::{Future, poll_fn};
use std::pin::pin;
use std::task::Poll;

use futures_core::Stream;

use super::{Flow, Session};
use crate::cancel::CancelSignal;
use crate::digest::DigestView;
use crate::engine::Engine;
use crate::error::{DigestError, Result};
use crate::primitive::CompressionPrimitive;

/// Computes the MD5 digest of a stream of chunks.
///
/// Every chunk except the last must be a multiple of 64 bytes long; the
/// first one that is not is treated as the end of the input.
///
/// `cancel` is checked before the first pull and again each time a chunk
/// arrives, before it is staged. Raising it while the driver waits on a
/// suspended pull ends the wait at once. Once the stream is exhausted the
/// digest is always completed.
///
/// # Example
///
/// ```
/// use md5arena::{CancelSignal, Engine, digest};
///
/// # tokio_test::block_on(async {
/// let chunks = futures_util::stream::iter(vec![vec![0u8; 64], b"end".to_vec()]);
/// let mut engine = Engine::new()?;
/// let view = digest(chunks, &mut engine, &CancelSignal::new()).await?;
/// println!("{}", view);
/// # Ok::<(), md5arena::DigestError>(())
/// # }).unwrap();
/// ```
pub async fn digest<'e, S, B, P>(
    chunks: S,
    engine: &'e mut Engine<P>,
    cancel: &CancelSignal,
) -> Result<DigestView<'e>>
where
    S: Stream<Item = B>,
    B: AsRef<[u8]>,
    P: CompressionPrimitive,
{
    drive(chunks, engine, cancel, Ok).await
}

/// Like [`digest`], for producers whose chunks can fail.
///
/// A producer error aborts the session and is returned converted into
/// [`DigestError`].
pub async fn try_digest<'e, S, B, E, P>(
    chunks: S,
    engine: &'e mut Engine<P>,
    cancel: &CancelSignal,
) -> Result<DigestView<'e>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<DigestError>,
    P: CompressionPrimitive,
{
    drive(chunks, engine, cancel, |item| item.map_err(Into::into)).await
}

/// Result of one pull raced against the cancellation signal.
enum Pull<T> {
    Item(T),
    End,
    Cancelled,
}

async fn drive<'e, S, B, P, F>(
    chunks: S,
    engine: &'e mut Engine<P>,
    cancel: &CancelSignal,
    mut lift: F,
) -> Result<DigestView<'e>>
where
    S: Stream,
    B: AsRef<[u8]>,
    P: CompressionPrimitive,
    F: FnMut(S::Item) -> Result<B>,
{
    let mut chunks = pin!(chunks);
    let mut cancelled = pin!(cancel.token().cancelled());
    let mut session = Session::start(engine)?;

    session.check_cancel(cancel)?;
    loop {
        // A ready producer wins over the signal, so an exhausted stream
        // always gets its digest.
        let pulled = poll_fn(|cx| match chunks.as_mut().poll_next(cx) {
            Poll::Ready(Some(item)) => Poll::Ready(Pull::Item(item)),
            Poll::Ready(None) => Poll::Ready(Pull::End),
            Poll::Pending => cancelled.as_mut().poll(cx).map(|()| Pull::Cancelled),
        })
        .await;

        let item = match pulled {
            Pull::Item(item) => item,
            Pull::End => break,
            Pull::Cancelled => {
                // The token has fired, so this reports the reason.
                session.check_cancel(cancel)?;
                continue;
            }
        };

        session.check_cancel(cancel)?;
        let chunk = lift(item).map_err(|err| session.fail(err))?;
        if session.feed(chunk.as_ref())? == Flow::Terminal {
            break;
        }
    }

    session.finish()
}

/// Computes the MD5 digest of chunks from an iterator.
///
/// Same chunk contract and cancellation points as [`digest`].
///
/// # Example
///
/// ```
/// use md5arena::{CancelSignal, Engine, digest_blocking};
///
/// let mut engine = Engine::new()?;
/// let view = digest_blocking(Vec::<Vec<u8>>::new(), &mut engine, &CancelSignal::new())?;
/// assert_eq!(view.to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
/// # Ok::<(), md5arena::DigestError>(())
/// ```
pub fn digest_blocking<'e, I, P>(
    chunks: I,
    engine: &'e mut Engine<P>,
    cancel: &CancelSignal,
) -> Result<DigestView<'e>>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
    P: CompressionPrimitive,
{
    drive_blocking(chunks, engine, cancel, Ok)
}

/// Like [`digest_blocking`], for iterators of fallible chunks such as
/// [`read_blocks`](crate::read_blocks).
pub fn try_digest_blocking<'e, I, B, E, P>(
    chunks: I,
    engine: &'e mut Engine<P>,
    cancel: &CancelSignal,
) -> Result<DigestView<'e>>
where
    I: IntoIterator<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<DigestError>,
    P: CompressionPrimitive,
{
    drive_blocking(chunks, engine, cancel, |item| item.map_err(Into::into))
}

fn drive_blocking<'e, I, B, P, F>(
    chunks: I,
    engine: &'e mut Engine<P>,
    cancel: &CancelSignal,
    mut lift: F,
) -> Result<DigestView<'e>>
where
    I: IntoIterator,
    B: AsRef<[u8]>,
    P: CompressionPrimitive,
    F: FnMut(I::Item) -> Result<B>,
{
    let mut session = Session::start(engine)?;

    session.check_cancel(cancel)?;
    for item in chunks {
        session.check_cancel(cancel)?;
        let chunk = lift(item).map_err(|err| session.fail(err))?;
        if session.feed(chunk.as_ref())? == Flow::Terminal {
            break;
        }
    }

    session.finish()
}
