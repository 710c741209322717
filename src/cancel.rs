//! Cooperative cancellation for render calls.
//!
//! A [`Cancellation`] is checked between content items and before every
//! transformer invocation. Firing it makes the current render return
//! [`Error::Cancelled`](crate::Error::Cancelled) at the next check point.
//!
//! Deadlines are composed by the caller: derive a child signal and cancel it
//! from a timer thread.

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// A cancellation signal shared between a render call and its caller.
///
/// Clones share state: cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    inner: CancellationToken,
}

impl Cancellation {
    /// Create a new, not yet fired signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal nobody holds a handle to cancel.
    pub fn never() -> Self {
        Self::default()
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.inner.cancel()
    }

    /// Derive a signal that fires when this one fires, but can also be
    /// cancelled on its own without affecting the parent.
    pub fn child(&self) -> Self {
        Self {
            inner: self.inner.child_token(),
        }
    }

    /// Return `Err(Error::Cancelled)` if the signal has fired.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl From<CancellationToken> for Cancellation {
    fn from(token: CancellationToken) -> Self {
        Self { inner: token }
    }
}
