//! Cooperative cancellation.
//!
//! A [`CancelSignal`] is observed by the session at pull boundaries only:
//! before the first pull, while a pull is suspended, and when a chunk
//! arrives. A copy or primitive call that has started always runs to
//! completion.

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

/// A cloneable cancellation signal carrying the reason it was raised with.
///
/// Clones share state, so one clone can be handed to the task computing the
/// digest while another stays with whoever may want to stop it. The signal
/// wraps a [`CancellationToken`], which needs no particular runtime.
///
/// # Example
///
/// ```
/// use md5arena::{CancelSignal, DigestError, Engine, digest_blocking};
///
/// let cancel = CancelSignal::new();
/// cancel.cancel("shutting down");
///
/// let mut engine = Engine::new()?;
/// let err = digest_blocking([&b"data"[..]], &mut engine, &cancel).unwrap_err();
/// assert!(matches!(err, DigestError::Cancelled { reason } if reason == "shutting down"));
/// # Ok::<(), DigestError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: CancellationToken,
    reason: Arc<OnceLock<String>>,
}

impl CancelSignal {
    /// Creates a signal that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a signal raised whenever `token` is cancelled, for callers
    /// that already manage a token tree.
    ///
    /// Cancelling the token directly reports an empty reason.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            reason: Arc::default(),
        }
    }

    /// Raises the signal. Only the first reason is kept.
    pub fn cancel(&self, reason: impl Into<String>) {
        // Reason first, so it is visible to anyone woken by the token.
        let _ = self.reason.set(reason.into());
        self.token.cancel();
    }

    /// Returns true once the signal has been raised on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns the reason the signal was raised with, if it was.
    pub fn reason(&self) -> Option<&str> {
        if !self.token.is_cancelled() {
            return None;
        }
        Some(self.reason.get().map_or("", String::as_str))
    }

    /// Completes once the signal has been raised.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Returns the underlying token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
