//! Derived dashboard statistics.
//!
//! A [`RegionData`] record holds a region's cumulative (`total`), daily
//! (`delta`) and seven-day (`delta7`) counts plus some metadata. The
//! functions here turn it into the numbers the dashboard shows: active
//! cases, ratios, per-capita figures and moving averages.
//!
//! ```rust
//! use covidash::statistic::{get_statistic, Counts, RegionData, SeriesKind, Statistic, StatisticOptions};
//!
//! let data = RegionData {
//!     total: Some(Counts {
//!         confirmed: Some(1000.0),
//!         recovered: Some(900.0),
//!         deceased: Some(10.0),
//!         ..Counts::default()
//!     }),
//!     ..RegionData::default()
//! };
//!
//! let active = get_statistic(&data, SeriesKind::Total, Statistic::Active, StatisticOptions::default());
//! assert_eq!(active, 90.0);
//!
//! let cfr = get_statistic(&data, SeriesKind::Total, Statistic::Cfr, StatisticOptions::default());
//! assert_eq!(cfr, 1.0);
//! ```

mod derive;
mod model;

pub use derive::{
    get_statistic, get_table_statistic, StatisticOptions, TableStatistic, TESTED_LOOKBACK_DAYS,
};
pub use model::{Counts, Meta, ParseStatisticError, RegionData, SeriesKind, Statistic, TestedMeta};
