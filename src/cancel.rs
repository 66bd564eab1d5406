use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{FrameError, FrameResult};

/// Cooperative cancellation signal shared between a caller and long running operations.
///
/// Operations poll the token at fixed points (once per comparison while sorting,
/// once per row while filtering, applying or comparing) and stop as soon as it
/// reports cancelled. Cloning is cheap and every clone observes the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<TokenState>,
}

#[derive(Debug, Default)]
struct TokenState {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<CancelToken>,
}

impl CancelToken {
    /// Creates a token that is only cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that reports cancelled once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            inner: Arc::new(TokenState {
                deadline: Instant::now().checked_add(timeout),
                ..TokenState::default()
            }),
        }
    }

    /// Creates a token that is cancelled together with `self`, but can also be
    /// cancelled on its own without affecting `self`.
    pub fn child(&self) -> Self {
        Self {
            inner: Arc::new(TokenState {
                parent: Some(self.clone()),
                ..TokenState::default()
            }),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.inner.cancelled.load(Ordering::Acquire) {
            return true;
        }
        if let Some(deadline) = self.inner.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        self.inner
            .parent
            .as_ref()
            .is_some_and(CancelToken::is_cancelled)
    }

    /// Returns [`FrameError::Cancelled`] once the token has fired.
    pub fn check(&self) -> FrameResult<()> {
        if self.is_cancelled() {
            Err(FrameError::Cancelled)
        } else {
            Ok(())
        }
    }
}
