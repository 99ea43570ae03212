//! Testing utilities for code that retries.
//!
//! [`ScriptedOperation`] stands in for a flaky network call: it fails a
//! scripted number of times, then succeeds (or keeps failing), and records
//! every call so tests can assert on attempt counts and spacing.
//!
//! # Examples
//!
//! ```rust
//! use covidash::testing::ScriptedOperation;
//! use covidash::{assert_calls, RetryPolicy};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let op = ScriptedOperation::failing_then(vec!["timeout", "timeout"], "ok");
//!
//! let result = RetryPolicy::new(3, Duration::from_millis(1))
//!     .retry(|| op.call())
//!     .await;
//!
//! assert_eq!(result, Ok("ok"));
//! assert_calls!(op, 3);
//! # });
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use futures::future::{ready, Ready};

/// A scripted stand-in for a fallible async operation.
///
/// Call `n` (0-indexed) returns the `n`-th scripted failure while there are
/// failures left. After that it either succeeds every time or keeps failing
/// with one repeated error.
#[derive(Debug)]
pub struct ScriptedOperation<T, E> {
    script: Vec<E>,
    then: Then<T, E>,
    calls: AtomicU32,
    started_at: Mutex<Vec<Instant>>,
}

/// What happens once the scripted failures run out.
#[derive(Debug)]
enum Then<T, E> {
    Succeed(T),
    KeepFailing(E),
}

impl<T: Clone, E: Clone> ScriptedOperation<T, E> {
    fn new(script: Vec<E>, then: Then<T, E>) -> Self {
        Self {
            script,
            then,
            calls: AtomicU32::new(0),
            started_at: Mutex::new(Vec::new()),
        }
    }

    /// Fail once with each of `failures`, in order, then succeed with `value`.
    pub fn failing_then(failures: Vec<E>, value: T) -> Self {
        Self::new(failures, Then::Succeed(value))
    }

    /// Succeed on the first call.
    pub fn succeeding(value: T) -> Self {
        Self::failing_then(Vec::new(), value)
    }

    /// Fail on every call with `error`.
    pub fn always_failing(error: E) -> Self {
        Self::new(Vec::new(), Then::KeepFailing(error))
    }

    /// Fail on every call: first with `first`, then with each of `rest` in
    /// order, repeating the last error once the list runs out.
    pub fn always_failing_with(first: E, rest: Vec<E>) -> Self {
        let repeated = rest.last().unwrap_or(&first).clone();
        let mut script = Vec::with_capacity(rest.len() + 1);
        script.push(first);
        script.extend(rest);
        Self::new(script, Then::KeepFailing(repeated))
    }

    /// Run one attempt.
    pub fn call(&self) -> Ready<Result<T, E>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        if let Ok(mut started) = self.started_at.lock() {
            started.push(Instant::now());
        }

        let outcome = match (self.script.get(n), &self.then) {
            (Some(error), _) => Err(error.clone()),
            (None, Then::Succeed(value)) => Ok(value.clone()),
            (None, Then::KeepFailing(error)) => Err(error.clone()),
        };
        ready(outcome)
    }
}

impl<T, E> ScriptedOperation<T, E> {
    /// Number of times [`call`](Self::call) has run.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Time between the start of each call and the start of the next.
    pub fn gaps(&self) -> Vec<Duration> {
        let started = match self.started_at.lock() {
            Ok(started) => started.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        started
            .windows(2)
            .map(|pair| pair[1].duration_since(pair[0]))
            .collect()
    }
}

/// Assert how many times a [`ScriptedOperation`] was called.
///
/// # Example
///
/// ```rust
/// use covidash::assert_calls;
/// use covidash::testing::ScriptedOperation;
///
/// let op = ScriptedOperation::<(), _>::always_failing("x");
/// let _ = op.call();
/// assert_calls!(op, 1);
/// ```
#[macro_export]
macro_rules! assert_calls {
    ($op:expr, $expected:expr) => {
        assert_eq!(
            $op.calls(),
            $expected,
            "expected {} calls, operation was called {} times",
            $expected,
            $op.calls()
        );
    };
}

#[cfg(feature = "proptest")]
use crate::RetryPolicy;
#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for RetryPolicy {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    /// Policies with 1-10 attempts and intervals short enough to run in tests.
    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (1u32..=10, 0u64..=3)
            .prop_map(|(attempts, ms)| RetryPolicy::new(attempts, Duration::from_millis(ms)))
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn scripted_failures_then_success() {
        let op = ScriptedOperation::failing_then(vec!["a", "b"], 7);
        assert_eq!(op.call().now_or_never(), Some(Err("a")));
        assert_eq!(op.call().now_or_never(), Some(Err("b")));
        assert_eq!(op.call().now_or_never(), Some(Ok(7)));
        assert_eq!(op.call().now_or_never(), Some(Ok(7)));
        assert_calls!(op, 4);
    }

    #[test]
    fn always_failing_repeats() {
        let op = ScriptedOperation::<(), _>::always_failing("down");
        for _ in 0..3 {
            assert_eq!(op.call().now_or_never(), Some(Err("down")));
        }
        assert_eq!(op.calls(), 3);
    }

    #[test]
    fn always_failing_with_repeats_last() {
        let op = ScriptedOperation::<(), _>::always_failing_with(1, vec![2]);
        let seen: Vec<_> = (0..4).map(|_| op.call().now_or_never()).collect();
        assert_eq!(seen, vec![Some(Err(1)), Some(Err(2)), Some(Err(2)), Some(Err(2))]);
    }

    #[test]
    fn always_failing_with_single_error_never_succeeds() {
        let op = ScriptedOperation::<u8, _>::always_failing_with("only", Vec::new());
        for _ in 0..3 {
            assert_eq!(op.call().now_or_never(), Some(Err("only")));
        }
        assert_calls!(op, 3);
    }

    #[test]
    fn gaps_track_calls() {
        let op = ScriptedOperation::<_, ()>::succeeding(1);
        assert!(op.gaps().is_empty());
        let _ = op.call();
        let _ = op.call();
        assert_eq!(op.gaps().len(), 1);
    }

    #[test]
    #[should_panic(expected = "expected 2 calls")]
    fn assert_calls_panics_on_mismatch() {
        let op = ScriptedOperation::<_, ()>::succeeding(1);
        let _ = op.call();
        assert_calls!(op, 2);
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn arbitrary_policy_is_bounded(policy in any::<RetryPolicy>()) {
                prop_assert!((1..=10).contains(&policy.max_attempts()));
                prop_assert!(policy.interval() <= Duration::from_millis(3));
            }
        }
    }
}
