//! Integration tests running dashboard JSON through the statistic and
//! formatting helpers.

#![cfg(feature = "serde")]

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use covidash::dates::{format_date, format_last_updated_at, parse_india_date};
use covidash::locale::LocaleTable;
use covidash::number::{format_number, NumberStyle};
use covidash::statistic::{
    get_statistic, get_table_statistic, RegionData, SeriesKind, Statistic, StatisticOptions,
    TESTED_LOOKBACK_DAYS,
};
use covidash::text::to_title_case;

const FIXTURE: &str = r#"{
  "TT": {
    "meta": {
      "population": 1000000000,
      "last_updated": "2021-06-20T21:05:22+05:30",
      "tested": { "last_updated": "2021-06-19", "source": "ICMR" }
    },
    "total": {
      "confirmed": 30000000,
      "deceased": 400000,
      "recovered": 29000000,
      "other": 10000,
      "tested": 400000000,
      "vaccinated1": 250000000,
      "vaccinated2": 50000000
    },
    "delta": {
      "confirmed": 60000,
      "deceased": 1500,
      "recovered": 80000,
      "tested": 1800000
    },
    "delta7": {
      "confirmed": 420000,
      "tested": 12600000
    }
  },
  "AN": {
    "meta": {
      "population": 400000,
      "last_updated": "2021-06-20T10:00:00+05:30",
      "tested": { "last_updated": "2021-05-01" }
    },
    "total": { "confirmed": 7000, "recovered": 6900, "deceased": 100, "tested": 450000 },
    "districts": { "Unknown": {} }
  }
}"#;

fn regions() -> BTreeMap<String, RegionData> {
    serde_json::from_str(FIXTURE).unwrap()
}

fn plain() -> StatisticOptions {
    StatisticOptions::default()
}

fn show(value: f64, style: NumberStyle, statistic: Statistic) -> String {
    format_number(value, style, Some(statistic))
}

#[test]
fn fixture_deserializes_with_unknown_fields() {
    let regions = regions();
    assert_eq!(regions.len(), 2);
    let an = &regions["AN"];
    assert!(an.delta.is_none());
    assert_eq!(an.meta.population, Some(400_000.0));
}

#[test]
fn headline_numbers() {
    let regions = regions();
    let india = &regions["TT"];

    let active = get_statistic(india, SeriesKind::Total, Statistic::Active, plain());
    assert_eq!(show(active, NumberStyle::Plain, Statistic::Active), "5,90,000");
    assert_eq!(show(active, NumberStyle::Short, Statistic::Active), "5.9L");

    let cfr = get_statistic(india, SeriesKind::Total, Statistic::Cfr, plain());
    assert_eq!(show(cfr, NumberStyle::Percent, Statistic::Cfr), "1.3%");

    let tpr = get_statistic(india, SeriesKind::Total, Statistic::Tpr, plain());
    assert_eq!(show(tpr, NumberStyle::Percent, Statistic::Tpr), "7.5%");
}

#[test]
fn per_capita_and_averages() {
    let regions = regions();
    let india = &regions["TT"];

    let per_million = get_statistic(
        india,
        SeriesKind::Total,
        Statistic::Confirmed,
        plain().per_million(),
    );
    assert_eq!(show(per_million, NumberStyle::Plain, Statistic::Confirmed), "30,000");

    let vaccinated_pct = get_statistic(
        india,
        SeriesKind::Total,
        Statistic::Vaccinated,
        plain().per_cent(),
    );
    assert_eq!(show(vaccinated_pct, NumberStyle::Percent, Statistic::Vaccinated), "30%");

    let daily_average = get_statistic(
        india,
        SeriesKind::Delta,
        Statistic::Confirmed,
        plain().moving_average(),
    );
    assert_eq!(show(daily_average, NumberStyle::Plain, Statistic::Confirmed), "60,000");
}

#[test]
fn table_cells() {
    let regions = regions();
    let india = &regions["TT"];
    let now = DateTime::parse_from_rfc3339("2021-06-21T09:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let last_updated = parse_india_date(india.meta.last_updated.as_deref(), now).unwrap();

    let confirmed = get_table_statistic(
        india,
        Statistic::Confirmed,
        plain(),
        last_updated,
        SeriesKind::Total,
        TESTED_LOOKBACK_DAYS,
    );
    assert_eq!(show(confirmed.total, NumberStyle::Plain, Statistic::Confirmed), "3,00,00,000");
    assert_eq!(show(confirmed.delta, NumberStyle::Plain, Statistic::Confirmed), "60,000");

    let tested = get_table_statistic(
        india,
        Statistic::Tested,
        plain(),
        last_updated,
        SeriesKind::Total,
        TESTED_LOOKBACK_DAYS,
    );
    assert_eq!(show(tested.total, NumberStyle::Short, Statistic::Tested), "40Cr");
    assert_eq!(show(tested.delta, NumberStyle::Short, Statistic::Tested), "18L");
}

#[test]
fn stale_testing_shows_placeholder() {
    let regions = regions();
    let islands = &regions["AN"];
    let now = DateTime::parse_from_rfc3339("2021-06-21T09:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let last_updated = parse_india_date(islands.meta.last_updated.as_deref(), now).unwrap();

    let tested = get_table_statistic(
        islands,
        Statistic::Tested,
        plain(),
        last_updated,
        SeriesKind::Total,
        TESTED_LOOKBACK_DAYS,
    );
    assert_eq!(show(tested.total, NumberStyle::Plain, Statistic::Tested), "-");
    assert_eq!(show(tested.delta, NumberStyle::Plain, Statistic::Tested), "-");

    let recovered = get_table_statistic(
        islands,
        Statistic::Recovered,
        plain(),
        last_updated,
        SeriesKind::Total,
        TESTED_LOOKBACK_DAYS,
    );
    assert_eq!(show(recovered.total, NumberStyle::Plain, Statistic::Recovered), "6,900");
    // No daily series in the fixture.
    assert_eq!(show(recovered.delta, NumberStyle::Plain, Statistic::Recovered), "0");
}

#[test]
fn header_labels() {
    let regions = regions();
    let english = LocaleTable::english();
    let updated = regions["TT"].meta.last_updated.as_deref().unwrap();

    let now = DateTime::parse_from_rfc3339("2021-06-20T23:10:00+05:30")
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(
        format_last_updated_at(updated, now, &english).unwrap(),
        "about 2 hours"
    );

    assert_eq!(format_date("2021-06-20", "do MMM", &english).unwrap(), "20th Jun");
    assert_eq!(
        format_date(updated, "dd MMMM yyyy, p", &english).unwrap(),
        "20 June 2021, 9:05 PM"
    );
    assert_eq!(to_title_case("andaman and nicobar islands"), "Andaman And Nicobar Islands");
}
