//! # covidash
//!
//! Building blocks for a COVID-19 dashboard front end.
//!
//! The centrepiece is a bounded, fixed-interval retry loop for the
//! dashboard's data fetches ([`retry`]). Around it sit the pure helpers the
//! dashboard uses to present data:
//!
//! - [`dates`]: Indian Standard Time, pattern formatting and "last updated"
//!   phrases
//! - [`number`]: en-IN grouping and K / L / Cr abbreviations
//! - [`statistic`]: active cases, ratios, per-capita and moving-average
//!   figures from a region's raw counts
//! - [`text`]: capitalization helpers for labels
//! - [`locale`]: the locale tables the date helpers take as a parameter
//! - [`config`]: run mode and tunable settings
//!
//! ## Quick Example
//!
//! ```rust
//! use covidash::number::{format_number, NumberStyle};
//! use covidash::retry_with;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let mut calls = 0;
//! let confirmed = retry_with(
//!     || {
//!         calls += 1;
//!         let attempt = calls;
//!         async move {
//!             if attempt < 2 {
//!                 Err("connection reset")
//!             } else {
//!                 Ok(1_23_456.0)
//!             }
//!         }
//!     },
//!     3,
//!     Duration::from_millis(5),
//! )
//! .await;
//!
//! assert_eq!(confirmed.map(|n| format_number(n, NumberStyle::Plain, None)), Ok("1,23,456".to_string()));
//! # });
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): debug and warn events from the retry loop
//! - `serde` (default): deserialize region data, locale tables and settings
//! - `proptest`: `Arbitrary` impls in [`testing`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod dates;
pub mod locale;
pub mod number;
pub mod retry;
pub mod statistic;
pub mod testing;
pub mod text;

// Re-exports
pub use retry::{
    retry, retry_with, Attempted, CancellationToken, FailureHistory, RetryError, RetryEvent,
    RetryExhausted, RetryPolicy,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{DashboardSettings, RunMode};
    pub use crate::dates::{format_date, format_last_updated, parse_india_date, DateError, IST};
    pub use crate::locale::LocaleTable;
    pub use crate::number::{abbreviate_number, format_number, NumberStyle};
    pub use crate::retry::{
        retry, retry_with, Attempted, CancellationToken, FailureHistory, RetryError, RetryEvent,
        RetryExhausted, RetryPolicy,
    };
    pub use crate::statistic::{
        get_statistic, get_table_statistic, RegionData, SeriesKind, Statistic, StatisticOptions,
        TableStatistic,
    };
    pub use crate::text::{capitalize, to_title_case};
}
