//! Retry policy types and configuration.

use std::num::NonZeroU32;
use std::time::Duration;

/// Attempts made by [`RetryPolicy::default`].
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Interval used by [`RetryPolicy::default`].
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// A retry policy describing how often and how patiently to retry.
///
/// Policies are pure data: they describe the retry budget and the pause
/// between attempts but don't execute anything. The execution lives in
/// [`RetryPolicy::retry`] and friends.
///
/// The interval is constant. Every failed attempt that still has budget left
/// is followed by the same pause, and the first attempt always starts
/// immediately.
///
/// # Examples
///
/// ```rust
/// use covidash::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts(), 5);
/// assert_eq!(policy.interval(), Duration::from_millis(1000));
///
/// let policy = RetryPolicy::constant(Duration::from_millis(10)).with_max_attempts(3);
/// assert_eq!(policy.delay_after(1), Some(Duration::from_millis(10)));
/// assert_eq!(policy.delay_after(2), Some(Duration::from_millis(10)));
/// assert_eq!(policy.delay_after(3), None); // budget spent
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawPolicy", into = "RawPolicy"))]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    interval: Duration,
}

impl RetryPolicy {
    /// Create a policy with the given interval and the default budget of
    /// [`DEFAULT_MAX_ATTEMPTS`].
    pub fn constant(interval: Duration) -> Self {
        Self {
            max_attempts: clamp_attempts(DEFAULT_MAX_ATTEMPTS),
            interval,
        }
    }

    /// Create a policy from an attempt count and an interval.
    ///
    /// A count of zero is treated as one: the operation always runs at least
    /// once.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self::constant(interval).with_max_attempts(max_attempts)
    }

    /// Set the total number of attempts, including the first one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use covidash::RetryPolicy;
    ///
    /// let policy = RetryPolicy::default().with_max_attempts(1);
    /// assert_eq!(policy.max_attempts(), 1);
    ///
    /// // Zero is clamped, an operation is always tried once.
    /// let policy = RetryPolicy::default().with_max_attempts(0);
    /// assert_eq!(policy.max_attempts(), 1);
    /// ```
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = clamp_attempts(n);
        self
    }

    /// Set the pause between a failed attempt and the next one.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Total number of attempts this policy permits.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    /// The fixed pause between attempts.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Delay to wait after the `attempt`-th failure (1-indexed) before trying
    /// again.
    ///
    /// Returns `None` when `attempt` was the last permitted attempt.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts.get() {
            None
        } else {
            Some(self.interval)
        }
    }

    /// Upper bound on the time spent waiting between attempts.
    ///
    /// This excludes the time spent inside the operation itself.
    ///
    /// ```rust
    /// use covidash::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(3, Duration::from_millis(10));
    /// assert_eq!(policy.total_wait(), Duration::from_millis(20));
    /// ```
    pub fn total_wait(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts.get() - 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::constant(DEFAULT_INTERVAL)
    }
}

fn clamp_attempts(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
}

/// Wire shape of a policy: `{ "max_attempts": 5, "interval_ms": 1000 }`.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct RawPolicy {
    max_attempts: u32,
    interval_ms: u64,
}

#[cfg(feature = "serde")]
impl Default for RawPolicy {
    fn default() -> Self {
        RetryPolicy::default().into()
    }
}

#[cfg(feature = "serde")]
impl From<RawPolicy> for RetryPolicy {
    fn from(raw: RawPolicy) -> Self {
        RetryPolicy::new(raw.max_attempts, Duration::from_millis(raw.interval_ms))
    }
}

#[cfg(feature = "serde")]
impl From<RetryPolicy> for RawPolicy {
    fn from(policy: RetryPolicy) -> Self {
        RawPolicy {
            max_attempts: policy.max_attempts(),
            interval_ms: u64::try_from(policy.interval.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
