//! Runtime settings.
//!
//! [`RunMode`] comes from the `DASHBOARD_ENV` environment variable.
//! [`DashboardSettings`] groups the tunables the other modules take as
//! parameters, with defaults matching the dashboard's behaviour. With the
//! `serde` feature the settings deserialize from any serde format, and
//! missing fields keep their defaults.
//!
//! ```rust
//! use covidash::config::{DashboardSettings, RunMode};
//!
//! let settings = DashboardSettings::default();
//! assert_eq!(settings.retry.max_attempts(), 5);
//! assert_eq!(settings.tested_lookback_days, 7);
//!
//! assert_eq!(RunMode::from_value(Some("test")), RunMode::Test);
//! ```

use std::fmt;

use chrono::{DateTime, FixedOffset};

use crate::retry::RetryPolicy;
use crate::statistic::{
    get_table_statistic, RegionData, SeriesKind, Statistic, StatisticOptions, TableStatistic,
    TESTED_LOOKBACK_DAYS,
};

/// Environment variable holding the run mode.
pub const RUN_MODE_VAR: &str = "DASHBOARD_ENV";

/// Where the dashboard is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunMode {
    /// Local development.
    Development,
    /// Test runs.
    Test,
    /// Anything else.
    #[default]
    Production,
}

impl RunMode {
    /// Read the run mode from [`RUN_MODE_VAR`].
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(RUN_MODE_VAR).ok().as_deref())
    }

    /// Interpret a raw run-mode value. Unset or unknown values mean
    /// production.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("development") => Self::Development,
            Some("test") => Self::Test,
            _ => Self::Production,
        }
    }

    /// True outside production.
    pub fn is_development_or_test(self) -> bool {
        matches!(self, Self::Development | Self::Test)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        })
    }
}

/// Tunables for fetching and presenting dashboard data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DashboardSettings {
    /// Retry policy for data fetches.
    pub retry: RetryPolicy,
    /// Days after which testing figures are hidden from the table.
    pub tested_lookback_days: i64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            tested_lookback_days: TESTED_LOOKBACK_DAYS,
        }
    }
}

impl DashboardSettings {
    /// [`get_table_statistic`] with this configuration's lookback.
    pub fn table_statistic(
        &self,
        data: &RegionData,
        statistic: Statistic,
        options: StatisticOptions,
        last_updated: DateTime<FixedOffset>,
        table_kind: SeriesKind,
    ) -> TableStatistic {
        get_table_statistic(
            data,
            statistic,
            options,
            last_updated,
            table_kind,
            self.tested_lookback_days,
        )
    }
}
