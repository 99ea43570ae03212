//! Error and outcome types for retry operations.

use std::fmt;
use std::time::Duration;

/// Error returned by [`RetryPolicy::retry_with_report`] when every attempt fails.
///
/// Carries the final error along with metadata about the retry sequence, so
/// callers can tell "failed once" apart from "failed on the last of five".
///
/// [`RetryPolicy::retry_with_report`]: crate::RetryPolicy::retry_with_report
///
/// # Examples
///
/// ```rust
/// use covidash::{RetryPolicy, RetryExhausted};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let policy = RetryPolicy::new(3, Duration::from_millis(1));
///
/// match policy.retry_with_report(|| async { Err::<(), _>("always fails") }).await {
///     Err(exhausted) => {
///         assert_eq!(exhausted.final_error, "always fails");
///         assert_eq!(exhausted.attempts, 3);
///     }
///     Ok(_) => panic!("Expected failure"),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// The error from the final attempt.
    pub final_error: E,
    /// Total number of attempts made.
    pub attempts: u32,
    /// Total time spent, attempts and waits included.
    pub total_duration: Duration,
}

impl<E> RetryExhausted<E> {
    /// Create a new RetryExhausted error.
    pub fn new(final_error: E, attempts: u32, total_duration: Duration) -> Self {
        Self {
            final_error,
            attempts,
            total_duration,
        }
    }

    /// Extract the final error, discarding metadata.
    pub fn into_error(self) -> E {
        self.final_error
    }

    /// Get a reference to the final error.
    pub fn error(&self) -> &E {
        &self.final_error
    }
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "retry exhausted after {} attempts ({:?}): {}",
            self.attempts, self.total_duration, self.final_error
        )
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryExhausted<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.final_error)
    }
}

/// A successful value together with how long it took to get it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempted<T> {
    /// The value produced by the successful attempt.
    pub value: T,
    /// Which attempt succeeded (1-indexed).
    pub attempts: u32,
    /// Total time spent, attempts and waits included.
    pub total_duration: Duration,
}

impl<T> Attempted<T> {
    /// Extract the value, discarding metadata.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns true if the first attempt succeeded.
    pub fn is_first_try(&self) -> bool {
        self.attempts == 1
    }
}

/// Every failure reason observed during a retry sequence, oldest first.
///
/// Always holds at least one error; [`last`](Self::last) is the reason the
/// plain [`retry`](crate::retry()) would have surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureHistory<E> {
    earlier: Vec<E>,
    last: E,
}

impl<E> FailureHistory<E> {
    pub(crate) fn new(earlier: Vec<E>, last: E) -> Self {
        Self { earlier, last }
    }

    /// The failure from the final attempt.
    pub fn last(&self) -> &E {
        &self.last
    }

    /// The failure from the first attempt.
    pub fn first(&self) -> &E {
        self.earlier.first().unwrap_or(&self.last)
    }

    /// Number of failed attempts recorded.
    pub fn len(&self) -> usize {
        self.earlier.len() + 1
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the failures in the order they happened.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.earlier.iter().chain(std::iter::once(&self.last))
    }

    /// Keep only the final failure.
    pub fn into_last(self) -> E {
        self.last
    }

    /// Convert into a `Vec`, oldest failure first.
    pub fn into_vec(self) -> Vec<E> {
        let mut all = self.earlier;
        all.push(self.last);
        all
    }
}

impl<E: fmt::Display> fmt::Display for FailureHistory<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} attempts failed", self.len())?;
        for (i, e) in self.iter().enumerate() {
            write!(f, "; #{}: {}", i + 1, e)?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display + 'static> std::error::Error for FailureHistory<E> {}

/// Outcome of a cancellable retry that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The final attempt failed with this reason.
    Failed(E),
    /// The token fired before the next attempt could start.
    Cancelled {
        /// Attempts that completed before cancellation.
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Returns true if the sequence was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Get the failure reason, if the sequence ran to exhaustion.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Cancelled { .. } => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(e) => write!(f, "{}", e),
            Self::Cancelled { attempts } => {
                write!(f, "retry cancelled after {} attempts", attempts)
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Cancelled { .. } => None,
        }
    }
}
