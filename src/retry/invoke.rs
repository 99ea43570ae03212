//! The retry loop.
//!
//! Every entry point funnels into `RetryPolicy::drive`, an explicit loop
//! over a single async task: attempt, and on failure either give up or wait
//! the policy's interval and go again. Attempts never overlap.

use std::convert::Infallible;
use std::future::Future;
use std::time::{Duration, Instant};

use super::cancel::CancellationToken;
use super::error::{Attempted, FailureHistory, RetryError, RetryExhausted};
use super::policy::RetryPolicy;

/// Information about a failed attempt that is about to be retried.
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, E> {
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// The error from the failed attempt.
    pub error: &'a E,
    /// Delay before the next attempt.
    pub next_delay: Duration,
    /// Total elapsed time since the first attempt started.
    pub elapsed: Duration,
}

/// How a run ended. `S` is the stop signal of the run's `Interrupt`;
/// runs that cannot be interrupted use `Infallible`.
enum Outcome<T, E, S> {
    Succeeded(T),
    Exhausted(E),
    Stopped(S),
}

struct Run<T, E, S> {
    outcome: Outcome<T, E, S>,
    attempts: u32,
    elapsed: Duration,
}

/// Something that can stop a run between attempts.
trait Interrupt {
    type Stop;

    /// A stop signal raised before the next attempt, if any.
    fn check(&self) -> Option<Self::Stop>;

    /// Wait out `delay`, or return early with a stop signal.
    async fn wait(&self, delay: Duration) -> Option<Self::Stop>;
}

/// The interrupt of the plain entry points: never fires.
struct Uninterrupted;

impl Interrupt for Uninterrupted {
    type Stop = Infallible;

    fn check(&self) -> Option<Infallible> {
        None
    }

    async fn wait(&self, delay: Duration) -> Option<Infallible> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        None
    }
}

impl Interrupt for CancellationToken {
    type Stop = ();

    fn check(&self) -> Option<()> {
        self.is_cancelled().then_some(())
    }

    async fn wait(&self, delay: Duration) -> Option<()> {
        tokio::select! {
            _ = tokio::time::sleep(delay) => None,
            _ = self.cancelled() => Some(()),
        }
    }
}

/// Retry `operation` with the default policy: 5 attempts, 1 second apart.
///
/// Resolves with the first success, or with the error of the fifth failed
/// attempt. Earlier errors are dropped.
///
/// # Examples
///
/// ```rust
/// use covidash::retry;
///
/// # tokio_test::block_on(async {
/// let value = retry(|| async { Ok::<_, String>(42) }).await;
/// assert_eq!(value, Ok(42));
/// # });
/// ```
pub async fn retry<T, E, F, Fut>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryPolicy::default().retry(operation).await
}

/// Retry `operation` up to `max_attempts` times, waiting `interval` after
/// each failure that still has budget left.
///
/// `max_attempts` of zero behaves like one.
///
/// # Examples
///
/// ```rust
/// use covidash::retry_with;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let mut calls = 0;
/// let result = retry_with(
///     || {
///         calls += 1;
///         async { Err::<(), _>("x") }
///     },
///     2,
///     Duration::ZERO,
/// )
/// .await;
///
/// assert_eq!(result, Err("x"));
/// assert_eq!(calls, 2);
/// # });
/// ```
pub async fn retry_with<T, E, F, Fut>(
    operation: F,
    max_attempts: u32,
    interval: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryPolicy::new(max_attempts, interval)
        .retry(operation)
        .await
}

impl RetryPolicy {
    /// Run `operation` until it succeeds or the attempt budget is spent.
    ///
    /// The error of the final attempt is returned unchanged.
    pub async fn retry<T, E, F, Fut>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let run = self.drive(operation, &Uninterrupted, |_| {}, drop).await;
        run.settle()
    }

    /// Like [`retry`](Self::retry), calling `on_retry` after every failed
    /// attempt that will be retried.
    ///
    /// The hook is synchronous and runs before the interval wait; use it for
    /// logging or metrics.
    ///
    /// ```rust
    /// use covidash::{RetryEvent, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let mut seen = Vec::new();
    /// let result = RetryPolicy::new(3, Duration::ZERO)
    ///     .retry_with_hooks(
    ///         || async { Err::<(), _>("flaky") },
    ///         |event: &RetryEvent<'_, &str>| seen.push(event.attempt),
    ///     )
    ///     .await;
    ///
    /// assert_eq!(result, Err("flaky"));
    /// assert_eq!(seen, vec![1, 2]); // the last failure is not retried
    /// # });
    /// ```
    pub async fn retry_with_hooks<T, E, F, Fut, H>(
        &self,
        operation: F,
        on_retry: H,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        H: FnMut(&RetryEvent<'_, E>),
    {
        let run = self.drive(operation, &Uninterrupted, on_retry, drop).await;
        run.settle()
    }

    /// Like [`retry`](Self::retry), reporting how many attempts were made and
    /// how long the whole sequence took.
    pub async fn retry_with_report<T, E, F, Fut>(
        &self,
        operation: F,
    ) -> Result<Attempted<T>, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let run = self.drive(operation, &Uninterrupted, |_| {}, drop).await;
        match run.outcome {
            Outcome::Succeeded(value) => Ok(Attempted {
                value,
                attempts: run.attempts,
                total_duration: run.elapsed,
            }),
            Outcome::Exhausted(error) => {
                Err(RetryExhausted::new(error, run.attempts, run.elapsed))
            }
            Outcome::Stopped(never) => match never {},
        }
    }

    /// Like [`retry`](Self::retry), keeping every failure reason instead of
    /// only the last one.
    ///
    /// ```rust
    /// use covidash::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let mut n = 0;
    /// let history = RetryPolicy::new(3, Duration::ZERO)
    ///     .retry_collecting(|| {
    ///         n += 1;
    ///         let reason = format!("failure {}", n);
    ///         async move { Err::<(), _>(reason) }
    ///     })
    ///     .await
    ///     .unwrap_err();
    ///
    /// assert_eq!(history.len(), 3);
    /// assert_eq!(history.first(), "failure 1");
    /// assert_eq!(history.last(), "failure 3");
    /// # });
    /// ```
    pub async fn retry_collecting<T, E, F, Fut>(
        &self,
        operation: F,
    ) -> Result<T, FailureHistory<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut earlier = Vec::new();
        let run = self
            .drive(operation, &Uninterrupted, |_| {}, |e| earlier.push(e))
            .await;
        run.settle()
            .map_err(|last| FailureHistory::new(earlier, last))
    }

    /// Like [`retry`](Self::retry), stopping early once `token` is cancelled.
    ///
    /// The token is checked before each attempt and raced against the
    /// interval wait. An attempt that is already running is allowed to
    /// finish; if it succeeds, its value is returned.
    pub async fn retry_cancellable<T, E, F, Fut>(
        &self,
        operation: F,
        token: &CancellationToken,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let run = self.drive(operation, token, |_| {}, drop).await;
        match run.outcome {
            Outcome::Succeeded(value) => Ok(value),
            Outcome::Exhausted(error) => Err(RetryError::Failed(error)),
            Outcome::Stopped(()) => Err(RetryError::Cancelled {
                attempts: run.attempts,
            }),
        }
    }

    async fn drive<T, E, F, Fut, I, H, D>(
        &self,
        mut operation: F,
        interrupt: &I,
        mut on_retry: H,
        mut discard: D,
    ) -> Run<T, E, I::Stop>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        I: Interrupt,
        H: FnMut(&RetryEvent<'_, E>),
        D: FnMut(E),
    {
        let start = Instant::now();
        let mut attempt = 0u32;

        loop {
            if let Some(stop) = interrupt.check() {
                return stopped(stop, attempt, start);
            }

            attempt += 1;
            let error = match operation().await {
                Ok(value) => {
                    return Run {
                        outcome: Outcome::Succeeded(value),
                        attempts: attempt,
                        elapsed: start.elapsed(),
                    };
                }
                Err(error) => error,
            };

            let Some(delay) = self.delay_after(attempt) else {
                #[cfg(feature = "tracing")]
                tracing::warn!(attempts = attempt, "retry budget exhausted");
                return Run {
                    outcome: Outcome::Exhausted(error),
                    attempts: attempt,
                    elapsed: start.elapsed(),
                };
            };

            on_retry(&RetryEvent {
                attempt,
                error: &error,
                next_delay: delay,
                elapsed: start.elapsed(),
            });
            discard(error);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt,
                remaining = self.max_attempts() - attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "attempt failed, retrying"
            );

            if let Some(stop) = interrupt.wait(delay).await {
                return stopped(stop, attempt, start);
            }
        }
    }
}

impl<T, E> Run<T, E, Infallible> {
    fn settle(self) -> Result<T, E> {
        match self.outcome {
            Outcome::Succeeded(value) => Ok(value),
            Outcome::Exhausted(error) => Err(error),
            Outcome::Stopped(never) => match never {},
        }
    }
}

fn stopped<T, E, S>(stop: S, attempts: u32, start: Instant) -> Run<T, E, S> {
    #[cfg(feature = "tracing")]
    tracing::debug!(attempts, "retry cancelled");
    Run {
        outcome: Outcome::Stopped(stop),
        attempts,
        elapsed: start.elapsed(),
    }
}
