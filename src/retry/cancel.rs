//! Cooperative cancellation for retry sequences.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// A cloneable handle that stops a retry sequence between attempts.
///
/// Cancellation is checked before every attempt and races the interval
/// timer. An attempt that has already started is never interrupted.
///
/// # Examples
///
/// ```rust
/// use covidash::{CancellationToken, RetryPolicy};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let token = CancellationToken::new();
/// token.cancel();
///
/// let result = RetryPolicy::new(3, Duration::from_secs(60))
///     .retry_cancellable(|| async { Err::<(), _>("down") }, &token)
///     .await;
///
/// assert!(result.unwrap_err().is_cancelled());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    /// Create a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every retry sequence watching this token.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before re-checking the flag so a concurrent cancel()
            // cannot slip between the check and the wait.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
