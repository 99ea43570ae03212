//! Turning raw counts into displayed statistics.

use chrono::{DateTime, FixedOffset, Utc};

use super::model::{RegionData, SeriesKind, Statistic};
use crate::dates::{difference_in_days, parse_india_date};

/// Days after which testing figures count as stale.
pub const TESTED_LOOKBACK_DAYS: i64 = 7;

/// Scaling applied by [`get_statistic`].
///
/// `per_million` wins over `per_cent` when both are set. Ratios are never
/// scaled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct StatisticOptions {
    /// Per 100 people.
    pub per_cent: bool,
    /// Per million people.
    pub per_million: bool,
    /// For the daily series, read the seven-day series and divide by seven.
    pub moving_average: bool,
}

impl StatisticOptions {
    /// Scale per million people.
    pub fn per_million(mut self) -> Self {
        self.per_million = true;
        self
    }

    /// Scale per 100 people.
    pub fn per_cent(mut self) -> Self {
        self.per_cent = true;
        self
    }

    /// Use the seven-day average for daily figures.
    pub fn moving_average(mut self) -> Self {
        self.moving_average = true;
        self
    }
}

/// A table cell: the figure and, for cumulative figures, the day's change.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableStatistic {
    /// The figure itself.
    pub total: f64,
    /// Change since the previous day; zero unless the figure is cumulative.
    pub delta: f64,
}

/// Compute `statistic` for one series of `data`.
///
/// Missing counts read as zero and any result that isn't finite (a ratio
/// over zero, say) becomes zero.
pub fn get_statistic(
    data: &RegionData,
    kind: SeriesKind,
    statistic: Statistic,
    options: StatisticOptions,
) -> f64 {
    let mut kind = kind;
    let mut factor = 1.0;

    if kind == SeriesKind::Delta && options.moving_average {
        kind = SeriesKind::Delta7;
        factor /= 7.0;
    }

    if options.per_million {
        factor *= per_population(data, 1e6);
    } else if options.per_cent {
        factor *= per_population(data, 1e2);
    }

    let counts = data.series(kind);
    let count = |stat: Statistic| counts.map_or(0.0, |c| c.count(stat));

    let active = || {
        count(Statistic::Confirmed)
            - count(Statistic::Deceased)
            - count(Statistic::Recovered)
            - count(Statistic::Other)
    };

    let value = match statistic {
        Statistic::Active => active() * factor,
        Statistic::ActiveRatio => 100.0 * active() / count(Statistic::Confirmed),
        Statistic::Vaccinated => {
            (count(Statistic::Vaccinated1) + count(Statistic::Vaccinated2)) * factor
        }
        Statistic::Tpr => 100.0 * count(Statistic::Confirmed) / count(Statistic::Tested),
        Statistic::Cfr => 100.0 * count(Statistic::Deceased) / count(Statistic::Confirmed),
        Statistic::RecoveryRatio => {
            100.0 * count(Statistic::Recovered) / count(Statistic::Confirmed)
        }
        Statistic::Population => match kind {
            SeriesKind::Total => data.meta.population.unwrap_or(0.0),
            _ => 0.0,
        },
        raw => counts.and_then(|c| c.get(raw)).map_or(f64::NAN, |v| v * factor),
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn per_population(data: &RegionData, scale: f64) -> f64 {
    match data.meta.population {
        Some(population) if population > 0.0 => scale / population,
        _ => 0.0,
    }
}

/// Compute the table cell for `statistic`.
///
/// `table_kind` is the series the dashboard's statistic configuration shows
/// in the table; the day's change is only filled in for [`SeriesKind::Total`].
/// Testing-based statistics read zero once the region's testing data is more
/// than `lookback_days` older than `last_updated`.
///
/// ```rust
/// use covidash::statistic::*;
/// use chrono::DateTime;
///
/// let data = RegionData {
///     meta: Meta {
///         tested: Some(TestedMeta { last_updated: Some("2021-06-01".into()) }),
///         ..Meta::default()
///     },
///     total: Some(Counts { tested: Some(5000.0), ..Counts::default() }),
///     delta: Some(Counts { tested: Some(100.0), ..Counts::default() }),
///     ..RegionData::default()
/// };
///
/// let fresh = DateTime::parse_from_rfc3339("2021-06-05T10:00:00+05:30").unwrap();
/// let cell = get_table_statistic(
///     &data, Statistic::Tested, StatisticOptions::default(),
///     fresh, SeriesKind::Total, TESTED_LOOKBACK_DAYS,
/// );
/// assert_eq!(cell, TableStatistic { total: 5000.0, delta: 100.0 });
///
/// let stale = DateTime::parse_from_rfc3339("2021-06-20T10:00:00+05:30").unwrap();
/// let cell = get_table_statistic(
///     &data, Statistic::Tested, StatisticOptions::default(),
///     stale, SeriesKind::Total, TESTED_LOOKBACK_DAYS,
/// );
/// assert_eq!(cell, TableStatistic::default());
/// ```
pub fn get_table_statistic(
    data: &RegionData,
    statistic: Statistic,
    options: StatisticOptions,
    last_updated: DateTime<FixedOffset>,
    table_kind: SeriesKind,
    lookback_days: i64,
) -> TableStatistic {
    if statistic.depends_on_testing() && testing_expired(data, last_updated, lookback_days) {
        return TableStatistic::default();
    }

    let total = get_statistic(data, table_kind, statistic, options);
    let delta = match table_kind {
        SeriesKind::Total => get_statistic(data, SeriesKind::Delta, statistic, options),
        _ => 0.0,
    };
    TableStatistic { total, delta }
}

fn testing_expired(data: &RegionData, last_updated: DateTime<FixedOffset>, lookback_days: i64) -> bool {
    let tested_on = data
        .meta
        .tested
        .as_ref()
        .and_then(|tested| tested.last_updated.as_deref());

    match parse_india_date(tested_on, last_updated.with_timezone(&Utc)) {
        Ok(tested_at) => difference_in_days(&last_updated, &tested_at) > lookback_days,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_err, "unreadable testing date, keeping figures");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistic::{Counts, Meta, TestedMeta};

    fn region() -> RegionData {
        RegionData {
            meta: Meta {
                population: Some(2_000_000.0),
                last_updated: None,
                tested: Some(TestedMeta {
                    last_updated: Some("2021-06-18".to_string()),
                }),
            },
            total: Some(Counts {
                confirmed: Some(10_000.0),
                deceased: Some(100.0),
                recovered: Some(9_000.0),
                other: Some(50.0),
                tested: Some(200_000.0),
                vaccinated1: Some(500_000.0),
                vaccinated2: Some(100_000.0),
            }),
            delta: Some(Counts {
                confirmed: Some(70.0),
                deceased: Some(1.0),
                recovered: Some(60.0),
                tested: Some(1_000.0),
                ..Counts::default()
            }),
            delta7: Some(Counts {
                confirmed: Some(700.0),
                tested: Some(14_000.0),
                ..Counts::default()
            }),
        }
    }

    fn plain() -> StatisticOptions {
        StatisticOptions::default()
    }

    #[test]
    fn active_cases() {
        let data = region();
        assert_eq!(get_statistic(&data, SeriesKind::Total, Statistic::Active, plain()), 850.0);
        assert_eq!(get_statistic(&data, SeriesKind::Delta, Statistic::Active, plain()), 9.0);
    }

    #[test]
    fn ratios() {
        let data = region();
        assert_eq!(get_statistic(&data, SeriesKind::Total, Statistic::Cfr, plain()), 1.0);
        assert_eq!(get_statistic(&data, SeriesKind::Total, Statistic::Tpr, plain()), 5.0);
        assert_eq!(
            get_statistic(&data, SeriesKind::Total, Statistic::RecoveryRatio, plain()),
            90.0
        );
        assert_eq!(
            get_statistic(&data, SeriesKind::Total, Statistic::ActiveRatio, plain()),
            8.5
        );
    }

    #[test]
    fn ratios_ignore_scaling() {
        let data = region();
        let cfr = get_statistic(
            &data,
            SeriesKind::Total,
            Statistic::Cfr,
            plain().per_million(),
        );
        assert_eq!(cfr, 1.0);
    }

    #[test]
    fn ratio_over_zero_is_zero() {
        let data = RegionData::default();
        assert_eq!(get_statistic(&data, SeriesKind::Total, Statistic::Tpr, plain()), 0.0);
        assert_eq!(get_statistic(&data, SeriesKind::Total, Statistic::Cfr, plain()), 0.0);
    }

    #[test]
    fn vaccinated_sums_doses() {
        let data = region();
        assert_eq!(
            get_statistic(&data, SeriesKind::Total, Statistic::Vaccinated, plain()),
            600_000.0
        );
        let per_cent =
            get_statistic(&data, SeriesKind::Total, Statistic::Vaccinated, plain().per_cent());
        assert!((per_cent - 30.0).abs() < 1e-9, "got {}", per_cent);
    }

    #[test]
    fn per_million_scales_raw_counts() {
        let data = region();
        assert_eq!(
            get_statistic(&data, SeriesKind::Total, Statistic::Confirmed, plain().per_million()),
            5_000.0
        );
    }

    #[test]
    fn per_million_wins_over_per_cent() {
        let data = region();
        let options = plain().per_million().per_cent();
        assert_eq!(
            get_statistic(&data, SeriesKind::Total, Statistic::Confirmed, options),
            5_000.0
        );
    }

    #[test]
    fn missing_population_zeroes_per_capita() {
        let mut data = region();
        data.meta.population = None;
        assert_eq!(
            get_statistic(&data, SeriesKind::Total, Statistic::Confirmed, plain().per_million()),
            0.0
        );
        data.meta.population = Some(0.0);
        assert_eq!(
            get_statistic(&data, SeriesKind::Total, Statistic::Active, plain().per_cent()),
            0.0
        );
    }

    #[test]
    fn moving_average_reads_seven_day_series() {
        let data = region();
        let average =
            get_statistic(&data, SeriesKind::Delta, Statistic::Confirmed, plain().moving_average());
        assert!((average - 100.0).abs() < 1e-9, "got {}", average);
        // The ratio uses the seven-day counts but is not divided by seven.
        assert_eq!(
            get_statistic(&data, SeriesKind::Delta, Statistic::Tpr, plain().moving_average()),
            5.0
        );
    }

    #[test]
    fn moving_average_leaves_totals_alone() {
        let data = region();
        assert_eq!(
            get_statistic(&data, SeriesKind::Total, Statistic::Confirmed, plain().moving_average()),
            10_000.0
        );
    }

    #[test]
    fn population_only_for_totals() {
        let data = region();
        assert_eq!(
            get_statistic(&data, SeriesKind::Total, Statistic::Population, plain()),
            2_000_000.0
        );
        assert_eq!(
            get_statistic(&data, SeriesKind::Delta, Statistic::Population, plain()),
            0.0
        );
    }

    #[test]
    fn missing_raw_count_is_zero() {
        let data = region();
        assert_eq!(get_statistic(&data, SeriesKind::Delta, Statistic::Other, plain()), 0.0);
        assert_eq!(
            get_statistic(&RegionData::default(), SeriesKind::Total, Statistic::Confirmed, plain()),
            0.0
        );
    }

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn table_cell_with_delta() {
        let data = region();
        let cell = get_table_statistic(
            &data,
            Statistic::Confirmed,
            plain(),
            at("2021-06-20T20:00:00+05:30"),
            SeriesKind::Total,
            TESTED_LOOKBACK_DAYS,
        );
        assert_eq!(
            cell,
            TableStatistic {
                total: 10_000.0,
                delta: 70.0
            }
        );
    }

    #[test]
    fn table_cell_without_delta_for_non_total() {
        let data = region();
        let cell = get_table_statistic(
            &data,
            Statistic::Tpr,
            plain(),
            at("2021-06-20T20:00:00+05:30"),
            SeriesKind::Delta7,
            TESTED_LOOKBACK_DAYS,
        );
        assert_eq!(cell, TableStatistic { total: 5.0, delta: 0.0 });
    }

    #[test]
    fn stale_testing_data_is_hidden() {
        let data = region();
        let last_updated = at("2021-06-26T00:00:01+05:30");
        for stat in [Statistic::Tested, Statistic::Tpr] {
            let cell = get_table_statistic(
                &data,
                stat,
                plain(),
                last_updated,
                SeriesKind::Total,
                TESTED_LOOKBACK_DAYS,
            );
            assert_eq!(cell, TableStatistic::default(), "{} should be expired", stat);
        }

        // Other statistics don't care about the testing date.
        let cell = get_table_statistic(
            &data,
            Statistic::Confirmed,
            plain(),
            last_updated,
            SeriesKind::Total,
            TESTED_LOOKBACK_DAYS,
        );
        assert_eq!(cell.total, 10_000.0);
    }

    #[test]
    fn lookback_boundary_is_exclusive() {
        let data = region();
        // Exactly seven days after 2021-06-18 midnight IST.
        let cell = get_table_statistic(
            &data,
            Statistic::Tested,
            plain(),
            at("2021-06-25T23:59:59+05:30"),
            SeriesKind::Total,
            TESTED_LOOKBACK_DAYS,
        );
        assert_eq!(cell.total, 200_000.0);
    }

    #[test]
    fn missing_testing_date_never_expires() {
        let mut data = region();
        data.meta.tested = None;
        let cell = get_table_statistic(
            &data,
            Statistic::Tested,
            plain(),
            at("2030-01-01T00:00:00+05:30"),
            SeriesKind::Total,
            TESTED_LOOKBACK_DAYS,
        );
        assert_eq!(cell.total, 200_000.0);
    }

    #[test]
    fn unreadable_testing_date_keeps_figures() {
        let mut data = region();
        data.meta.tested = Some(TestedMeta {
            last_updated: Some("not a date".to_string()),
        });
        let cell = get_table_statistic(
            &data,
            Statistic::Tested,
            plain(),
            at("2030-01-01T00:00:00+05:30"),
            SeriesKind::Total,
            TESTED_LOOKBACK_DAYS,
        );
        assert_eq!(cell.total, 200_000.0);
    }
}
