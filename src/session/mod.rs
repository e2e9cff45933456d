//! Digest sessions: the state machine tying feeder and padding together.
//!
//! ```text
//! Init ──> Streaming ──> Padding ──> Done
//!              │
//!              └──> Aborted   (cancellation, growth or primitive failure)
//! ```
//!
//! - [`Session`] - Push-style API: `start()` / `feed()` / `finish()`
//! - [`digest`], [`try_digest`] - Drive a session from an async stream
//! - [`digest_blocking`], [`try_digest_blocking`] - Drive it from an iterator

mod driver;

pub use driver::{digest, digest_blocking, try_digest, try_digest_blocking};

use std::fmt;

use log::debug;

use crate::cancel::CancelSignal;
use crate::digest::DigestView;
use crate::engine::Engine;
use crate::error::{DigestError, Result};
use crate::feeder::{self, Feed};
use crate::padding;
use crate::primitive::{CompressionPrimitive, Md5Kernel};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Running state is being reset. Only seen while [`Session::start`] runs.
    Init,
    /// Accepting chunks.
    Streaming,
    /// The terminal chunk has been staged; only `finish` is allowed.
    Padding,
    /// The digest has been produced. Reached inside [`Session::finish`],
    /// which consumes the session.
    Done,
    /// A fatal error or cancellation ended the session without a digest.
    Aborted,
}

impl SessionState {
    /// Returns the lowercase name of the state.
    pub const fn name(&self) -> &'static str {
        match self {
            SessionState::Init => "init",
            SessionState::Streaming => "streaming",
            SessionState::Padding => "padding",
            SessionState::Done => "done",
            SessionState::Aborted => "aborted",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the caller should do after [`Session::feed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Pull the next chunk.
    Continue,
    /// The chunk was terminal. Stop pulling and call [`Session::finish`].
    Terminal,
}

/// One digest computation on an exclusively borrowed [`Engine`].
///
/// # Example
///
/// ```
/// use md5arena::{CancelSignal, Engine, Flow, Session};
///
/// let mut engine = Engine::new()?;
/// let cancel = CancelSignal::new();
/// let mut session = Session::start(&mut engine)?;
///
/// session.check_cancel(&cancel)?;
/// for chunk in [&[0u8; 64][..], &b"tail"[..]] {
///     session.check_cancel(&cancel)?;
///     if session.feed(chunk)? == Flow::Terminal {
///         break;
///     }
/// }
///
/// let digest = session.finish()?;
/// println!("{}", digest);
/// # Ok::<(), md5arena::DigestError>(())
/// ```
#[derive(Debug)]
pub struct Session<'e, P: CompressionPrimitive = Md5Kernel> {
    engine: &'e mut Engine<P>,
    state: SessionState,
    terminal_len: usize,
    chunks: u64,
    absorbed: u64,
}

impl<'e, P: CompressionPrimitive> Session<'e, P> {
    /// Resets the engine's running state and opens the stream.
    ///
    /// The session is in [`SessionState::Init`] while the primitive resets;
    /// a failure there aborts it before any chunk is accepted.
    pub fn start(engine: &'e mut Engine<P>) -> Result<Self> {
        let mut session = Self {
            engine,
            state: SessionState::Init,
            terminal_len: 0,
            chunks: 0,
            absorbed: 0,
        };
        if let Err(err) = session.engine.init() {
            return Err(session.fail(err));
        }

        debug!(
            "session started: header at {}, input at {}",
            session.engine.arena().header_offset(),
            session.engine.arena().input_offset()
        );
        session.state = SessionState::Streaming;
        Ok(session)
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the number of chunks fed so far, terminal included.
    pub fn chunks(&self) -> u64 {
        self.chunks
    }

    /// Returns the number of bytes absorbed before padding.
    pub fn absorbed(&self) -> u64 {
        self.absorbed
    }

    /// Aborts the session if `signal` has been raised.
    ///
    /// Call before the first pull, before feeding each chunk that arrives,
    /// and when a suspended pull is interrupted by the signal. Never call it
    /// once the producer is exhausted: a finished stream always gets its
    /// digest.
    pub fn check_cancel(&mut self, signal: &CancelSignal) -> Result<()> {
        self.ensure_state(SessionState::Streaming)?;
        match signal.reason() {
            Some(reason) => {
                debug!(
                    "session cancelled after {} chunks: {}",
                    self.chunks, reason
                );
                self.state = SessionState::Aborted;
                Err(DigestError::Cancelled {
                    reason: reason.to_owned(),
                })
            }
            None => Ok(()),
        }
    }

    /// Stages one chunk and absorbs it unless it is terminal.
    ///
    /// All chunks but the last must be a multiple of 64 bytes long. The
    /// first chunk that is not ends the stream.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Flow> {
        self.ensure_state(SessionState::Streaming)?;
        self.chunks += 1;

        match feeder::feed(self.engine, chunk) {
            Ok(Feed::Absorbed) => {
                self.absorbed += chunk.len() as u64;
                Ok(Flow::Continue)
            }
            Ok(Feed::Terminal(len)) => {
                self.terminal_len = len;
                self.state = SessionState::Padding;
                Ok(Flow::Terminal)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Marks the session aborted and hands `err` back for propagation.
    pub fn fail(&mut self, err: DigestError) -> DigestError {
        debug!("session aborted in {} state: {}", self.state, err);
        self.state = SessionState::Aborted;
        err
    }

    /// Pads the terminal chunk (or nothing, if the stream ended on a block
    /// boundary) and returns the digest.
    ///
    /// The session is consumed: it ends in [`SessionState::Done`] when the
    /// digest is returned and in [`SessionState::Aborted`] when padding or
    /// the final absorb fails. Both transitions are logged.
    pub fn finish(self) -> Result<DigestView<'e>> {
        match self.state {
            SessionState::Streaming | SessionState::Padding => {}
            state => return Err(DigestError::InvalidState { state: state.name() }),
        }

        let Self {
            engine,
            state,
            terminal_len,
            chunks,
            absorbed,
        } = self;
        match padding::finalize(engine, terminal_len) {
            Ok(view) => {
                debug!(
                    "session {} -> {}: {} chunks, {} bytes absorbed",
                    state,
                    SessionState::Done,
                    chunks,
                    absorbed
                );
                Ok(view)
            }
            Err(err) => {
                debug!("session {} -> {}: {}", state, SessionState::Aborted, err);
                Err(err)
            }
        }
    }

    fn ensure_state(&self, state: SessionState) -> Result<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(DigestError::InvalidState {
                state: self.state.name(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::PrimitiveError;

    #[test]
    fn test_start_enters_streaming() {
        let mut engine = Engine::new().unwrap();
        let session = Session::start(&mut engine).unwrap();
        assert_eq!(session.state(), SessionState::Streaming);
    }

    #[test]
    fn test_terminal_chunk_moves_to_padding() {
        let mut engine = Engine::new().unwrap();
        let mut session = Session::start(&mut engine).unwrap();
        assert_eq!(session.feed(&[0u8; 64]).unwrap(), Flow::Continue);
        assert_eq!(session.feed(b"xyz").unwrap(), Flow::Terminal);
        assert_eq!(session.state(), SessionState::Padding);
        assert_eq!(session.chunks(), 2);
        assert_eq!(session.absorbed(), 64);
    }

    #[test]
    fn test_feed_after_terminal_is_rejected() {
        let mut engine = Engine::new().unwrap();
        let mut session = Session::start(&mut engine).unwrap();
        session.feed(b"xyz").unwrap();
        assert!(matches!(
            session.feed(b"more"),
            Err(DigestError::InvalidState { state: "padding" })
        ));
    }

    #[test]
    fn test_cancel_aborts_and_blocks_finish() {
        let mut engine = Engine::new().unwrap();
        let mut session = Session::start(&mut engine).unwrap();
        let signal = CancelSignal::new();
        signal.cancel("enough");

        let err = session.check_cancel(&signal).unwrap_err();
        assert!(matches!(err, DigestError::Cancelled { ref reason } if reason == "enough"));
        assert_eq!(session.state(), SessionState::Aborted);
        assert!(matches!(
            session.feed(b"x"),
            Err(DigestError::InvalidState { state: "aborted" })
        ));
        assert!(matches!(
            session.finish(),
            Err(DigestError::InvalidState { state: "aborted" })
        ));
    }

    #[test]
    fn test_finish_on_block_boundary() {
        let mut engine = Engine::new().unwrap();
        let mut session = Session::start(&mut engine).unwrap();
        session.feed(&[b'a'; 64]).unwrap();
        assert_eq!(
            session.finish().unwrap().to_hex(),
            "014842d480b571495a4a0363793f7367"
        );
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SessionState::Init.to_string(), "init");
        assert_eq!(SessionState::Done.name(), "done");
    }

    struct Failing {
        on_init: bool,
    }

    impl CompressionPrimitive for Failing {
        fn init(&mut self, memory: &mut [u8], _: usize) -> std::result::Result<(), PrimitiveError> {
            if self.on_init {
                return Err(PrimitiveError::OutOfBounds {
                    offset: 0,
                    len: 0,
                    memory: memory.len(),
                });
            }
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
            len: usize,
            _: usize,
        ) -> std::result::Result<usize, PrimitiveError> {
            Err(PrimitiveError::Unaligned { len, block: 64 })
        }
    }

    #[test]
    fn test_init_failure_aborts_start() {
        let mut engine =
            Engine::with_primitive(EngineConfig::default(), Failing { on_init: true }).unwrap();
        assert!(matches!(
            Session::start(&mut engine),
            Err(DigestError::Primitive(PrimitiveError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_pad_failure_is_returned_from_finish() {
        let mut engine =
            Engine::with_primitive(EngineConfig::default(), Failing { on_init: false }).unwrap();
        let mut session = Session::start(&mut engine).unwrap();
        assert_eq!(session.feed(b"tail").unwrap(), Flow::Terminal);
        assert!(matches!(
            session.finish(),
            Err(DigestError::Primitive(PrimitiveError::Unaligned { len: 4, .. }))
        ));
    }
}
