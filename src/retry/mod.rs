//! Bounded, fixed-interval retry for fallible async operations.
//!
//! The dashboard's network calls are wrapped in a retry loop that follows a
//! small contract:
//!
//! - the first attempt starts immediately;
//! - after a failure with budget left, wait a fixed interval and try again;
//! - resolve with the first success, or with the *last* failure once the
//!   budget is spent.
//!
//! Attempts run one after another on the caller's task and never overlap.
//!
//! # Quick Start
//!
//! ```rust
//! use covidash::{retry_with, RetryPolicy};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! // Three attempts, 10ms apart
//! let result = retry_with(|| async { Ok::<_, String>("ok") }, 3, Duration::from_millis(10)).await;
//! assert_eq!(result, Ok("ok"));
//!
//! // The same thing through a reusable policy
//! let policy = RetryPolicy::new(3, Duration::from_millis(10));
//! let result = policy.retry(|| async { Err::<(), _>("boom") }).await;
//! assert_eq!(result, Err("boom"));
//! # });
//! ```
//!
//! # Richer outcomes
//!
//! The plain entry points pass the final error through untouched. When a
//! caller needs more, it can opt in:
//!
//! - [`RetryPolicy::retry_with_report`]: attempt count and elapsed time
//!   ([`Attempted`] / [`RetryExhausted`])
//! - [`RetryPolicy::retry_collecting`]: every failure, in order
//!   ([`FailureHistory`])
//! - [`RetryPolicy::retry_cancellable`]: stop between attempts via a
//!   [`CancellationToken`] ([`RetryError`])
//! - [`RetryPolicy::retry_with_hooks`]: a callback per retried failure
//!   ([`RetryEvent`])

mod cancel;
mod error;
mod invoke;
mod policy;

pub use cancel::CancellationToken;
pub use error::{Attempted, FailureHistory, RetryError, RetryExhausted};
pub use invoke::{retry, retry_with, RetryEvent};
pub use policy::{RetryPolicy, DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS};
